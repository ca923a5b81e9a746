/* 📖 # What does the filestage binary do?

Two demonstrations over the current working directory:

1. `filestage lifecycle` walks the staging lifecycle: ensure the staging
   directory exists (creating it plus a batch of placeholder files if
   absent), inspect the target entry, then tear the directory down,
   showing the distinct outcomes of deleting a populated vs. an absent
   directory.
2. `filestage copy` clones a file with one of the four byte-stream
   strategies.

Every step prints a human-readable status line. Classified deletion
outcomes (not found / not empty) are reported as normal output; only
unexpected errors exit nonzero.

Exit codes:
- 0: Demo ran to completion
- 1: Unexpected error (population failure, unreadable source, ...)
*/

use std::env;
use std::process;
use std::time::UNIX_EPOCH;

use clap::{Parser, Subcommand, ValueEnum};

use filestage_base::tracing::init_tracing;
use filestage_base::{FilePath, PalHandle, RealPal};
use filestage_engine::{
    copy_file, run_lifecycle, CopyStrategy, DeleteOutcome, EnsureOutcome, InspectReport,
};

#[derive(Parser)]
#[command(name = "filestage", about = "Staging lifecycle and byte-stream copy demos")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the staging lifecycle: ensure, populate, inspect, tear down
    Lifecycle {
        /// Target file path, relative to the current directory
        #[arg(long, default_value = "staging/hi1.txt")]
        path: String,
        /// Number of placeholder files to create when populating
        #[arg(long, default_value_t = 100_000)]
        count: usize,
    },
    /// Copy a file with one of the byte-stream strategies
    Copy {
        /// Source path, relative to the current directory
        from: String,
        /// Destination path, relative to the current directory
        to: String,
        #[arg(long, value_enum, default_value_t = StrategyArg::Buffered)]
        strategy: StrategyArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    PerByte,
    Batched,
    Buffered,
    WholeFile,
}

impl From<StrategyArg> for CopyStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::PerByte => CopyStrategy::PerByte,
            StrategyArg::Batched => CopyStrategy::Batched,
            StrategyArg::Buffered => CopyStrategy::Buffered,
            StrategyArg::WholeFile => CopyStrategy::WholeFile,
        }
    }
}

fn main() {
    init_tracing().unwrap();

    let cli = Cli::parse();

    let current_dir = env::current_dir().unwrap_or_else(|e| {
        eprintln!("Error: Failed to get current directory: {}", e);
        process::exit(1);
    });

    let pal = PalHandle::new(RealPal::new(current_dir));

    match cli.command {
        Command::Lifecycle { path, count } => run_lifecycle_demo(&pal, &path, count),
        Command::Copy { from, to, strategy } => run_copy_demo(&pal, &from, &to, strategy.into()),
    }
}

fn run_lifecycle_demo(pal: &PalHandle, path: &str, count: usize) {
    let target = FilePath::from(path);

    let report = match run_lifecycle(pal, &target, count) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: Staging lifecycle failed: {}", e);
            process::exit(1);
        }
    };

    match &report.ensure {
        EnsureOutcome::Created { directory, files } => {
            println!("Staging folder '{}' created successfully!", directory);
            println!("{} placeholder files created successfully!", files);
        }
        EnsureOutcome::AlreadyPresent => {
            println!("Target already present, skipping population.");
        }
    }

    match &report.inspect {
        Some(inspect) => print_inspect(inspect),
        None => println!("Target '{}' does not exist.", target),
    }

    let Some(teardown) = &report.teardown else {
        println!("Target is not a regular file, skipping teardown.");
        return;
    };

    print_delete_outcome(&teardown.first_attempt);
    println!("Cleared {} entries from the staging folder.", teardown.cleared);
    match &teardown.second_attempt {
        DeleteOutcome::Deleted => {
            println!("Attempt to delete the staging folder again succeeded!");
        }
        other => print_delete_outcome(other),
    }
}

fn print_inspect(inspect: &InspectReport) {
    println!("Name: {}", inspect.name);
    println!("Absolute Path: {}", inspect.absolute_path.display());
    println!("Is File: {}", inspect.is_file);
    println!("Is Directory: {}", inspect.is_directory);

    if let Some(details) = &inspect.details {
        let modified_millis = details
            .modified
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        println!("Last Modified: {}", modified_millis);
        println!("Length: {}", details.len);
        println!("Is Hidden: {}", details.hidden);
    }
}

fn print_delete_outcome(outcome: &DeleteOutcome) {
    match outcome {
        DeleteOutcome::Deleted => {
            println!("Staging folder deleted successfully!");
        }
        DeleteOutcome::NotEmpty => {
            println!("Staging folder deletion failed because the folder is not empty.");
        }
        DeleteOutcome::NotFound => {
            println!("Staging folder deletion failed because the folder doesn't exist!");
        }
        DeleteOutcome::Failed(message) => {
            println!("Staging folder deletion failed: {}", message);
        }
    }
}

fn run_copy_demo(pal: &PalHandle, from: &str, to: &str, strategy: CopyStrategy) {
    match copy_file(pal, &FilePath::from(from), &FilePath::from(to), strategy) {
        Ok(copied) => {
            println!("Copied {} bytes from '{}' to '{}'. Done!", copied, from, to);
        }
        Err(e) => {
            eprintln!("Error: Copy failed: {}", e);
            process::exit(1);
        }
    }
}
