#![forbid(unsafe_code)]

//! Edit-script runner.
//!
//! # Running
//!
//! ```sh
//! cargo run -p fence-harness -- script.txt
//! printf 'input-type integer\ntype 12a3\n' | cargo run -p fence-harness
//! ```
//!
//! The starting text field is configured from `FENCE_COLUMNS`,
//! `FENCE_MAX_LENGTH` and `FENCE_INPUT_TYPE`; it always starts empty. Log output goes to stderr and
//! is filtered by `FENCE_LOG` (default `warn`), e.g. `FENCE_LOG=fence=trace`.

use std::io::{self, Read};
use std::process::ExitCode;

use fence::FieldConfig;
use fence_harness::{Session, parse_script};
use tracing_subscriber::EnvFilter;

const ENV_LOG: &str = "FENCE_LOG";

fn init_logging() {
    let filter = std::env::var(ENV_LOG)
        .ok()
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}

fn read_script() -> io::Result<String> {
    match std::env::args().nth(1) {
        Some(path) if path != "-" => std::fs::read_to_string(path),
        _ => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            Ok(source)
        }
    }
}

fn main() -> ExitCode {
    init_logging();

    let parsed = FieldConfig::from_env_with_diagnostics();
    for err in &parsed.errors {
        tracing::warn!(%err, "ignoring configuration value");
    }

    let source = match read_script() {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: cannot read script: {err}");
            return ExitCode::from(2);
        }
    };
    let steps = match parse_script(&source) {
        Ok(steps) => steps,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(2);
        }
    };

    let mut session = Session::new(parsed.config);
    println!("{:>4}  {:<28} [{}] {:?}", 0, "<start>", session.kind(), session.display());
    for step in &steps {
        if let Err(err) = session.apply(&step.command) {
            eprintln!("error: line {}: {err}", step.line);
            return ExitCode::FAILURE;
        }
        println!(
            "{:>4}  {:<28} [{}] {:?}",
            step.line,
            step.source,
            session.kind(),
            session.display()
        );
    }
    ExitCode::SUCCESS
}
