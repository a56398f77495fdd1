//! Foodbot - eating preferences over a pluggable record store
//!
//! CLI entry point.

use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use foodbot::cli::mark::parse_flag;
use foodbot::cli::{EatingsCommand, Mark, MarkCommand, MigrateCommand, ShowCommand};
use foodbot::config::{BackendKind, Config};
use foodbot::eating::{parse_date, EatingBook, DATE_FORMAT};
use foodbot::people::PersonDirectory;
use foodbot::storage::{open_configured, open_engine};

// =============================================================================
// CLI Definition
// =============================================================================

/// Foodbot - who is eating on which day
#[derive(Parser)]
#[command(name = "foodbot")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dump every record in the configured backend
    Show {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
    },

    /// List everyone's eating mark for a date
    Eatings {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
    },

    /// Mark a person as eating, not eating, or unset for a date
    Set {
        /// Person id or display name
        person: String,
        /// yes, no or unset
        #[arg(value_parser = parse_flag_arg)]
        flag: FlagArg,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
    },

    /// Set a person's default eating preference
    Default {
        /// Person id or display name
        person: String,
        /// yes or no
        #[arg(value_parser = parse_flag_arg)]
        flag: FlagArg,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
    },

    /// Remove everything recorded for a person
    Forget {
        /// Person id or display name
        person: String,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
    },

    /// Copy all records from the configured backend into another one
    Migrate {
        /// Target backend
        #[arg(long, value_enum)]
        to: BackendArg,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendArg {
    File,
    Sheet,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::File => BackendKind::File,
            BackendArg::Sheet => BackendKind::Sheet,
        }
    }
}

/// Parsed yes/no/unset argument.
#[derive(Clone, Copy)]
struct FlagArg(Option<bool>);

fn parse_flag_arg(value: &str) -> Result<FlagArg, String> {
    parse_flag(value)
        .map(FlagArg)
        .ok_or_else(|| format!("expected yes, no or unset, got '{}'", value))
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_date(value).ok_or_else(|| format!("expected a date like {}", DATE_FORMAT))
}

// =============================================================================
// Main Entry Point
// =============================================================================

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("foodbot error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr, filtered by `FOODBOT_LOG` (default `warn`).
fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("FOODBOT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run the CLI and return the exit code.
fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load();

    match cli.command {
        Commands::Show { json } => run_show(&config, json),
        Commands::Eatings { date, json } => {
            run_eatings(&config, date.unwrap_or_else(today), json)
        }
        Commands::Set {
            person,
            flag,
            date,
            json,
        } => run_mark(
            &config,
            &person,
            Mark::Date(date.unwrap_or_else(today), flag.0),
            json,
        ),
        Commands::Default { person, flag, json } => {
            let Some(flag) = flag.0 else {
                return Err("a default must be yes or no".into());
            };
            run_mark(&config, &person, Mark::Default(flag), json)
        }
        Commands::Forget { person, json } => run_mark(&config, &person, Mark::Forget, json),
        Commands::Migrate { to, json } => run_migrate(&config, to.into(), json),
    }
}

// =============================================================================
// Command Implementations
// =============================================================================

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn success_to_exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn run_show(config: &Config, json: bool) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let engine = open_configured(&config.storage)?;
    let output = ShowCommand::new(&engine).run();

    if json {
        print_json(&output)?;
    } else {
        println!("{}", output.format_text());
    }
    Ok(ExitCode::SUCCESS)
}

fn run_eatings(
    config: &Config,
    date: NaiveDate,
    json: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let engine = open_configured(&config.storage)?;
    let book = EatingBook::new(engine, PersonDirectory::new(config.people.clone()));
    let output = EatingsCommand::new(&book).run(date);

    if json {
        print_json(&output)?;
    } else {
        println!("{}", output.format_text());
    }
    Ok(ExitCode::SUCCESS)
}

fn run_mark(
    config: &Config,
    person: &str,
    mark: Mark,
    json: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let engine = open_configured(&config.storage)?;
    let directory = PersonDirectory::new(config.people.clone());
    let person = directory.find(person);
    let mut book = EatingBook::new(engine, directory);

    let output = MarkCommand::new(&mut book).run(&person, mark);

    if json {
        print_json(&output)?;
    } else if output.success {
        println!("{}", output.format_text());
    } else {
        eprintln!("{}", output.format_text());
    }
    Ok(success_to_exit_code(output.success))
}

fn run_migrate(
    config: &Config,
    to: BackendKind,
    json: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let from = config.storage.backend;
    if from == to {
        return Err(format!("already using the {} backend", to.as_str()).into());
    }

    let source = open_engine(from, &config.storage)?;
    let target = open_engine(to, &config.storage)?;
    let output = MigrateCommand::new(source, target).run();

    if json {
        print_json(&output)?;
    } else if output.success {
        println!("{}", output.format_text());
    } else {
        eprintln!("{}", output.format_text());
    }
    Ok(success_to_exit_code(output.success))
}
