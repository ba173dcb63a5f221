//! Command-line entry point: generates the synthetic feedback corpus and
//! writes it to the configured JSONL and table paths.

use std::io::{self, Write};
use std::process::ExitCode;

use feedback_synth::{
    ExportReport, RunError, SynthConfig, SynthSettings, default_table_writer, generate_messages,
    write_outputs,
};
use mockable::DefaultClock;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> ExitCode {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    match run() {
        Ok(report) => {
            if let Err(err) = writeln!(io::stdout().lock(), "{report}") {
                drop(err);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            if let Err(write_err) = writeln!(io::stderr().lock(), "{err}") {
                drop(write_err);
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExportReport, RunError> {
    let settings = SynthSettings::load_with_args(std::env::args_os())?;
    let config = SynthConfig::from_settings(&settings)?;
    let corpus = generate_messages(&config, &DefaultClock)?;
    let table_writer = default_table_writer();
    Ok(write_outputs(&corpus.records, &config, table_writer.as_ref())?)
}
