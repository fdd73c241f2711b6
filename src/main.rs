mod cli;

use std::error::Error;
use std::process::ExitCode;

use clap::Parser;
use freqcheck_rs::Verdict;

use crate::cli::Args;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    match run(&args) {
        Ok(verdict) => ExitCode::from(verdict.exit_code() as u8),
        Err(err) => {
            eprintln!("freqcheck: {err}");
            ExitCode::from(Verdict::Indeterminate.exit_code() as u8)
        }
    }
}

fn run(args: &Args) -> Result<Verdict, Box<dyn Error>> {
    let oracle = args.oracle()?;
    let report = oracle.run(&args.inputs());
    println!("{report}");

    if let Some(path) = &args.json {
        std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
        log::info!("wrote JSON report to {}", path.display());
    }
    Ok(report.verdict)
}
