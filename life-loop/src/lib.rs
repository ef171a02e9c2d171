#![deny(clippy::all)]
#![forbid(unsafe_code)]

//! Drives a [`life_grid::SharedGrid`] at independent update and redraw rates
//! on a dedicated thread.

mod engine;
mod error;
mod scheduler;

pub use engine::{Engine, LoopHost, RunFlag};
pub use error::LoopError;
pub use scheduler::{
    Due, LoopRates, Scheduler, Throughput, DEFAULT_RENDER_RATE_HZ, DEFAULT_UPDATE_RATE_HZ,
    REPORT_INTERVAL,
};
