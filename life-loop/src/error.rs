use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoopError {
    #[error("simulation loop is already running")]
    AlreadyRunning,
    #[error("failed to spawn the simulation loop thread")]
    Spawn(#[source] io::Error),
}
