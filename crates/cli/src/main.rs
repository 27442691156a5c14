//! # tabsage-cli
//!
//! Ask questions about a spreadsheet from the terminal.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use tabsage_analyzer::Analyzer;
use tabsage_assistant::{FallbackAsker, GroqClient, LlmConfig, OfflineAsker, Role, Session};
use tracing_subscriber::EnvFilter;

/// tabsage - ask questions about employee, sales, and feedback tables
#[derive(Parser, Debug)]
#[command(name = "tabsage")]
#[command(author, version, about = "Question answering over CSV and Excel files", long_about = None)]
struct Cli {
    /// CSV or workbook file to load
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Answer one question and exit
    #[arg(short = 'q', long = "question")]
    question: Option<String>,

    /// Never call the remote model
    #[arg(long)]
    offline: bool,

    /// API key for the remote model
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Remote model name
    #[arg(long, env = "TABSAGE_LLM_MODEL")]
    model: Option<String>,

    /// Base URL of the chat-completions API
    #[arg(long, env = "TABSAGE_LLM_BASE_URL")]
    base_url: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn llm_config(&self) -> LlmConfig {
        let mut config = LlmConfig::from_env();
        if let Some(key) = &self.api_key {
            config = config.with_api_key(key.clone());
        }
        if let Some(model) = &self.model {
            config = config.with_model(model.clone());
        }
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url.clone());
        }
        config
    }

    fn asker(&self) -> Result<Box<dyn FallbackAsker>> {
        if self.offline {
            return Ok(Box::new(OfflineAsker));
        }
        let client =
            GroqClient::new(self.llm_config()).context("Failed to create model client")?;
        Ok(Box::new(client))
    }
}

/// A line typed at the prompt.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Quit,
    Help,
    Tables,
    History,
    Clear,
    Load(PathBuf),
    Unknown(String),
    Ask(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if !line.starts_with(':') {
        return Command::Ask(line.to_string());
    }

    let (name, arg) = match line.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (line, ""),
    };
    match name {
        ":quit" | ":q" | ":exit" => Command::Quit,
        ":help" | ":h" | ":?" => Command::Help,
        ":tables" => Command::Tables,
        ":history" => Command::History,
        ":clear" => Command::Clear,
        ":load" if !arg.is_empty() => Command::Load(PathBuf::from(arg)),
        _ => Command::Unknown(line.to_string()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    }

    let Some(file) = cli.file.clone() else {
        // No arguments - show help
        Cli::parse_from(["tabsage", "--help"]);
        return Ok(());
    };

    tracing::info!(file = %file.display(), offline = cli.offline, "starting tabsage");
    let mut session = Session::open(&file, cli.asker()?)?;

    if let Some(question) = &cli.question {
        println!("{}", session.answer(question).await);
        return Ok(());
    }

    print_summary(session.analyzer());
    run_repl(&mut session).await
}

/// Run the REPL.
async fn run_repl(session: &mut Session) -> Result<()> {
    println!(
        "{} {} - Interactive Mode",
        "tabsage".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(
        "Type a question, {} for help, {} to exit\n",
        ":help".yellow(),
        ":quit".yellow()
    );

    let mut rl = DefaultEditor::new()?;
    let history_path = dirs_history_path();

    // Load history if available
    if let Some(ref path) = history_path {
        let _ = rl.load_history(path);
    }

    loop {
        let prompt = "ask> ".green().bold().to_string();

        match rl.readline(&prompt) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.trim());

                match parse_command(&line) {
                    Command::Quit => break,
                    Command::Help => print_help(),
                    Command::Tables => print_summary(session.analyzer()),
                    Command::History => print_conversation(session),
                    Command::Clear => {
                        session.clear();
                        println!("{}", "Conversation cleared".yellow());
                    }
                    Command::Load(path) => match session.reload(&path) {
                        Ok(()) => print_summary(session.analyzer()),
                        Err(e) => println!("{} {e}", "Error:".red().bold()),
                    },
                    Command::Unknown(line) => {
                        println!("{} Unknown command: {}", "Error:".red().bold(), line);
                    }
                    Command::Ask(question) => {
                        let answer = session.answer(&question).await;
                        println!("{answer}");
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(e) => {
                println!("{} {e}", "Error:".red().bold());
                break;
            }
        }
    }

    // Save history
    if let Some(ref path) = history_path {
        let _ = rl.save_history(path);
    }

    Ok(())
}

/// Get the history file path.
fn dirs_history_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|mut p| {
        p.push("tabsage");
        let _ = std::fs::create_dir_all(&p);
        p.push("history.txt");
        p
    })
}

/// One block of lines per table: size, then columns by kind.
fn summary_lines(analyzer: &Analyzer) -> Vec<String> {
    let mut lines = Vec::new();
    for (name, sheet) in analyzer.book().sheets() {
        lines.push(format!(
            "{name}: {} rows x {} columns",
            sheet.row_count(),
            sheet.col_count()
        ));
        if let Some(kinds) = analyzer.classification(name) {
            for (label, columns) in [
                ("numeric", &kinds.numeric),
                ("categorical", &kinds.categorical),
                ("date", &kinds.date),
                ("id", &kinds.id),
            ] {
                if !columns.is_empty() {
                    lines.push(format!("  {label}: {}", columns.join(", ")));
                }
            }
        }
    }
    lines
}

fn print_summary(analyzer: &Analyzer) {
    if let Some(source) = analyzer.source() {
        println!("{} {}", "Loaded".cyan().bold(), source.display());
    }
    for line in summary_lines(analyzer) {
        if line.starts_with(' ') {
            println!("{line}");
        } else {
            println!("{}", line.bold());
        }
    }
    println!();
}

fn print_conversation(session: &Session) {
    if session.history().is_empty() {
        println!("{}", "(no conversation yet)".dimmed());
        return;
    }
    for entry in session.history() {
        match entry.role {
            Role::User => println!("{} {}", "you:".green().bold(), entry.content),
            Role::Assistant => println!("{} {}", "tabsage:".cyan().bold(), entry.content),
        }
    }
}

fn print_help() {
    println!("{}", "tabsage REPL Commands:".cyan().bold());
    println!("  {}    Show this help", ":help, :h, :?".yellow());
    println!("  {}  Exit the REPL", ":quit, :q, :exit".yellow());
    println!("  {}        Summarize the loaded tables", ":tables".yellow());
    println!("  {}       Show the conversation", ":history".yellow());
    println!("  {}         Clear the conversation", ":clear".yellow());
    println!("  {}    Load another file", ":load PATH".yellow());
    println!();
    println!("{}", "Examples:".cyan().bold());
    println!("  How many employees are in the Sales department?");
    println!("  What is the salary of Alice?");
    println!("  Who has the most feedback entries?");
}
