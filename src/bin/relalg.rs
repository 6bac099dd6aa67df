//! relalg — SQL to relational algebra CLI
//!
//! # Usage
//!
//! ```bash
//! # Translate a query
//! relalg "select nome, email from cliente"
//!
//! # Prompt for a query on stdin
//! relalg
//!
//! # Use the second built-in schema and LaTeX output
//! relalg "select id from pedido where valor_total > 100" --schema sales --notation latex
//! ```

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use relalg::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "relalg")]
#[command(version)]
#[command(about = "Validate SQL SELECT queries and translate them to relational algebra", long_about = None)]
#[command(after_help = "EXAMPLES:
    relalg 'select nome, email from cliente'
    relalg 'select id from pedido join cliente on pedido.cliente_id=cliente.id' --schema sales
    relalg repl --notation latex")]
struct Cli {
    /// The SQL query to translate (read from stdin when omitted)
    query: Option<String>,

    /// Built-in schema to validate against (store, sales)
    #[arg(short, long, env = "RELALG_SCHEMA")]
    schema: Option<String>,

    /// TOML schema file (overrides --schema)
    #[arg(long)]
    schema_file: Option<PathBuf>,

    /// Operator notation (unicode, latex)
    #[arg(short, long)]
    notation: Option<Notation>,

    /// Config file path
    #[arg(short, long, env = "RELALG_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive REPL mode
    Repl,
    /// Show the tables and columns of the active schema
    Tables,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(2);
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("relalg=debug")
    } else {
        EnvFilter::try_from_env("RELALG_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Returns whether the evaluated query (if any) was valid.
fn run(cli: &Cli) -> anyhow::Result<bool> {
    let engine = build_engine(cli)?;

    match &cli.command {
        Some(Commands::Repl) => {
            run_repl(&engine, cli.format)?;
            Ok(true)
        }
        Some(Commands::Tables) => {
            show_tables(engine.schema());
            Ok(true)
        }
        None => {
            let query = match &cli.query {
                Some(q) => q.clone(),
                None => prompt_query()?,
            };
            let outcome = engine.evaluate(&query);
            print_outcome(&outcome, cli.format)?;
            Ok(outcome.valid)
        }
    }
}

fn build_engine(cli: &Cli) -> anyhow::Result<Engine> {
    let mut config = Config::discover(cli.config.as_deref()).context("loading config")?;
    if let Some(name) = &cli.schema {
        config.schema = name.clone();
        config.schema_file = None;
    }
    if let Some(path) = &cli.schema_file {
        config.schema_file = Some(path.clone());
    }
    if let Some(notation) = cli.notation {
        config.notation = notation;
    }
    tracing::debug!("Effective config: {:?}", config);

    let schema = config.load_schema().context("loading schema")?;
    Ok(Engine::new(schema).notation(config.notation))
}

fn prompt_query() -> anyhow::Result<String> {
    print!("Input SQL Query: ");
    std::io::stdout().flush().context("flush stdout")?;

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("reading query from stdin")?;
    Ok(line.trim().to_string())
}

fn print_outcome(outcome: &Outcome, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(outcome)?);
        }
        OutputFormat::Text => {
            println!("{} {}", "Query:".dimmed(), outcome.query.yellow());
            if let Some(algebra) = &outcome.algebra {
                println!("{} {}", "Algebra:".cyan().bold(), algebra.white());
                println!("{} {}", "Result:".green().bold(), "valid SQL query.".green());
            } else {
                println!("{} {}", "Result:".red().bold(), "invalid SQL query.".red());
                for error in &outcome.errors {
                    println!("  - {}", error);
                }
            }
        }
    }
    Ok(())
}

fn run_repl(engine: &Engine, format: OutputFormat) -> anyhow::Result<()> {
    use rustyline::DefaultEditor;
    use rustyline::error::ReadlineError;

    println!("{}", "relalg REPL — Interactive Mode".cyan().bold());
    println!("{}", "Type SQL queries to see their relational algebra. Commands:".dimmed());
    println!("  {}   - Exit the REPL", ".exit".yellow());
    println!("  {} - Show the active schema", ".tables".yellow());
    println!();

    let mut rl = DefaultEditor::new().context("initializing REPL")?;
    let history_path = dirs::home_dir()
        .map(|p| p.join(".relalg_history"))
        .unwrap_or_default();
    let _ = rl.load_history(&history_path);

    loop {
        let prompt = "relalg> ".cyan().bold().to_string();
        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                match line {
                    ".exit" | ".quit" | "exit" | "quit" => break,
                    ".tables" => show_tables(engine.schema()),
                    query => {
                        print_outcome(&engine.evaluate(query), format)?;
                        println!();
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{} {}", "Error:".red(), e);
                break;
            }
        }
    }

    let _ = rl.save_history(&history_path);
    Ok(())
}

fn show_tables(schema: &Schema) {
    println!(
        "{:20} {}",
        "Table".white().bold(),
        "Columns".white().bold()
    );
    println!("{}", "─".repeat(70).dimmed());
    for table in schema.tables() {
        println!("{:20} {}", table.name.cyan(), table.columns.join(", ").dimmed());
    }
}
