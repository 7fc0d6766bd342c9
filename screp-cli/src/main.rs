//! `screp`: a command-line reader for StarCraft II replay files.

mod commands;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use output::{Opts, OutputFormat, GLOBAL_OPTS};

/// Inspect and extract StarCraft II (`.SC2Replay`) files.
#[derive(Parser)]
#[command(name = "screp")]
#[command(about = "Inspect and extract StarCraft II replay files", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format for commands that print structured data.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Restrict `(attributes)` lookups to this scope (player slot).
    #[arg(long, global = true)]
    locale: Option<u8>,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StreamArg {
    Game,
    Message,
    Tracker,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the replay header and archive-level facts.
    Info {
        /// Path to the `.SC2Replay` file.
        path: String,
    },
    /// List member file names.
    List {
        /// Path to the `.SC2Replay` file.
        path: String,
    },
    /// Extract one or all member files to disk.
    Extract {
        /// Path to the `.SC2Replay` file.
        path: String,
        /// Directory to write extracted files into.
        #[arg(long, default_value = ".")]
        output: String,
        /// Extract only this member file, instead of every known member.
        #[arg(long)]
        file: Option<String>,
    },
    /// Decode and print an event stream.
    Parse {
        /// Path to the `.SC2Replay` file.
        path: String,
        /// Which event stream to decode.
        #[arg(long, value_enum)]
        stream: StreamArg,
        /// Stop after this many events.
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    GLOBAL_OPTS
        .set(Opts { format: cli.format, no_color: cli.no_color, locale: cli.locale })
        .expect("GLOBAL_OPTS is set exactly once, before any command runs");

    let result = match cli.command {
        Commands::Info { path } => commands::info::run(&path),
        Commands::List { path } => commands::list::run(&path),
        Commands::Extract { path, output, file } => {
            commands::extract::run(&path, &output, file.as_deref())
        }
        Commands::Parse { path, stream, limit } => {
            let kind = match stream {
                StreamArg::Game => commands::parse::StreamArg::Game,
                StreamArg::Message => commands::parse::StreamArg::Message,
                StreamArg::Tracker => commands::parse::StreamArg::Tracker,
            };
            commands::parse::run(&path, kind, limit)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", output::error_prefix());
            ExitCode::FAILURE
        }
    }
}
