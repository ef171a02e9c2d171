#![deny(clippy::all)]
#![forbid(unsafe_code)]

mod app;
mod command;
mod console;

use env_logger::{Env, Target};
use error_iter::ErrorIter as _;
use life_grid::GridConfig;
use life_loop::LoopRates;
use log::error;
use std::io::Write;
use std::process::ExitCode;

fn main() -> ExitCode {
    init_logging();
    match app::run(GridConfig::default(), LoopRates::default()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log_error("run", err);
            ExitCode::FAILURE
        }
    }
}

/// Plain `[LEVEL]: message` lines on stdout, `info` unless `RUST_LOG` says
/// otherwise.
fn init_logging() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stdout)
        .format(|buf, record| writeln!(buf, "[{}]: {}", record.level(), record.args()))
        .init();
}

fn log_error<E: std::error::Error + 'static>(method_name: &str, err: E) {
    error!("{method_name}() failed: {err}");
    for source in err.sources().skip(1) {
        error!("  Caused by: {source}");
    }
}
