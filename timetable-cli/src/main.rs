mod commands;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use timetable_core::config::TimetableConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "timetable")]
#[command(about = "Import lecture timetables and view them as grids or calendars")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import HTML timetable exports (department name = file name)
    Import {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List imported departments
    Departments,
    /// List the modules of a department
    Modules { department: String },
    /// Print the weekly grid for some modules
    Show {
        #[arg(required = true)]
        codes: Vec<String>,
    },
    /// Write an .ics calendar for some modules
    Export {
        #[arg(required = true)]
        codes: Vec<String>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = TimetableConfig::load()?;

    match cli.command {
        Commands::Import { files } => commands::import::run(&config, &files),
        Commands::Departments => commands::departments::run(&config),
        Commands::Modules { department } => commands::modules::run(&config, &department),
        Commands::Show { codes } => commands::show::run(&config, &split_codes(&codes)),
        Commands::Export { codes, output } => {
            commands::export::run(&config, &split_codes(&codes), output.as_deref())
        }
    }
}

/// Logs go to stderr so they never mix with exported calendars on stdout.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Accept both `CS101 CS102` and `CS101,CS102`.
fn split_codes(codes: &[String]) -> Vec<String> {
    codes
        .iter()
        .flat_map(|c| c.split(','))
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect()
}
