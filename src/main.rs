// exprtree: infix expression parser and explorer

use std::io::{self, BufRead};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use thiserror::Error as ThisError;

use exprtree::ui::App;
use exprtree::{logging, parse_expression, tokenize, Error};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Indented node outline
    Tree,
    /// List-literal nested form, e.g. [2, '+', 3]
    Nested,
    /// Nested form as JSON
    Json,
    /// Fully parenthesized infix text
    Infix,
    /// Token stream only
    Tokens,
}

/// Failure to produce output for one expression
#[derive(Debug, ThisError)]
enum RenderError {
    #[error(transparent)]
    Expression(#[from] Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl RenderError {
    /// Message for stderr; expression errors point at the offending column.
    fn report(&self, expression: &str) -> String {
        match self {
            RenderError::Expression(e) => e.report(expression),
            RenderError::Json(_) => format!("Error: {}", self),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "exprtree", version, about = "Parse infix math expressions into syntax trees")]
struct Cli {
    /// Expression to parse. Reads one expression per line from stdin when omitted.
    expression: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Tree)]
    format: OutputFormat,

    /// Open the interactive explorer, starting from EXPRESSION if given
    #[arg(long)]
    tui: bool,

    /// Log parser activity to stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.tui {
        return match run_tui(cli.expression.unwrap_or_default()) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("Warning: logging unavailable: {}", e);
    }

    let ok = match &cli.expression {
        Some(expression) => process(expression, cli.format),
        None => {
            let mut all_ok = true;
            for line in io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        eprintln!("Error reading stdin: {}", e);
                        return ExitCode::FAILURE;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                all_ok &= process(&line, cli.format);
            }
            all_ok
        }
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Parse one expression and print it; errors go to stderr.
fn process(expression: &str, format: OutputFormat) -> bool {
    match render(expression, format) {
        Ok(output) => {
            println!("{}", output);
            true
        }
        Err(e) => {
            eprintln!("{}", e.report(expression));
            false
        }
    }
}

fn render(expression: &str, format: OutputFormat) -> Result<String, RenderError> {
    if format == OutputFormat::Tokens {
        let tokens = tokenize(expression).map_err(Error::from)?;
        let lines: Vec<String> = tokens
            .iter()
            .map(|t| format!("{:>4}  {:<10} {}", t.position(), format!("{:?}", t.kind), t.text))
            .collect();
        return Ok(lines.join("\n"));
    }

    let expr = parse_expression(expression)?;
    let output = match format {
        OutputFormat::Tree => expr.to_tree_string().trim_end().to_string(),
        OutputFormat::Nested => expr.to_nested().to_string(),
        OutputFormat::Json => serde_json::to_string(&expr)?,
        OutputFormat::Infix | OutputFormat::Tokens => expr.to_string(),
    };
    Ok(output)
}

fn run_tui(initial: String) -> io::Result<()> {
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(initial);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}
