use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the trip analytics workspace",
    long_about = "A unified CLI for cleaning trip data, running benchmarks,\n\
                  and CI checks in the trip analytics workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a raw trip CSV with the release build of the CLI
    Clean {
        /// Raw trip CSV
        #[arg(long, env = "TRIP_DATA", default_value = "data/train.csv")]
        data: String,
        /// Cleaned trips CSV
        #[arg(long, default_value = "cleaned_taxi_data.csv")]
        output: String,
    },
    /// Run Criterion benchmarks
    Bench,
    /// Run CI checks (fmt, clippy, tests, benchmarks)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Run benchmarks
    Bench,
    /// Run check + bench
    All,
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str]) -> ExitStatus {
    eprintln!("+ cargo {}", args.join(" "));
    Command::new("cargo")
        .args(args)
        .status()
        .expect("failed to execute cargo")
}

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);

    step("Test trip_core");
    run_cargo(&["test", "-p", "trip_core"]);

    step("Test trip_analytics");
    run_cargo(&["test", "-p", "trip_analytics"]);
}

fn ci_bench() {
    step("Run benchmarks");
    run_cargo(&["bench", "--package", "trip_core", "--bench", "selection"]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Clean { data, output } => {
            step("Clean raw trips");
            run_cargo(&[
                "run",
                "-p",
                "trip_analytics",
                "--release",
                "--",
                "--data",
                &data,
                "--progress",
                "clean",
                "--output",
                &output,
            ]);
        }
        Commands::Bench => ci_bench(),
        Commands::Ci { job } => {
            match job {
                CiJob::Check => ci_check(),
                CiJob::Bench => ci_bench(),
                CiJob::All => {
                    ci_check();
                    ci_bench();
                }
            }
            eprintln!("\nCI job passed.");
        }
    }
}
