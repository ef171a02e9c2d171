use crate::{LoopError, LoopRates, Scheduler};
use life_grid::SharedGrid;
use log::{error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// The window side of the loop: where redraw requests go, and whether there
/// is still anything to draw on.
pub trait LoopHost {
    fn request_redraw(&mut self);

    fn is_visible(&self) -> bool {
        true
    }
}

/// The `running` flag, shared by the loop thread and whoever stops it.
#[derive(Clone, Debug, Default)]
pub struct RunFlag(Arc<AtomicBool>);

impl RunFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn set(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn stop(&self) {
        info!("Stopping");
        self.0.store(false, Ordering::Release);
    }
}

/// Owns the simulation loop thread.
///
/// `start` launches the loop and `stop` asks it to finish; after a stop the
/// engine can be started again, which joins the old thread first.
pub struct Engine<H> {
    grid: Arc<SharedGrid>,
    rates: LoopRates,
    host: H,
    running: RunFlag,
    thread: Option<JoinHandle<()>>,
}

impl<H> Engine<H>
where
    H: LoopHost + Clone + Send + 'static,
{
    pub fn new(grid: Arc<SharedGrid>, rates: LoopRates, host: H) -> Self {
        Self {
            grid,
            rates,
            host,
            running: RunFlag::new(),
            thread: None,
        }
    }

    pub fn start(&mut self) -> Result<(), LoopError> {
        if self.running.is_running() {
            return Err(LoopError::AlreadyRunning);
        }
        info!("Starting");
        // The flag is clear, so any previous loop exits within one sleep.
        self.join();
        self.running.set();

        let grid = Arc::clone(&self.grid);
        let running = self.running.clone();
        let mut host = self.host.clone();
        let rates = self.rates;
        let spawned = thread::Builder::new()
            .name("life-loop".to_string())
            .spawn(move || {
                Scheduler::new(rates, Instant::now()).run(&running, &grid, &mut host);
            });

        match spawned {
            Ok(handle) => {
                self.thread = Some(handle);
                Ok(())
            }
            Err(err) => {
                self.running.stop();
                Err(LoopError::Spawn(err))
            }
        }
    }
}

impl<H> Engine<H> {
    pub fn grid(&self) -> &Arc<SharedGrid> {
        &self.grid
    }

    pub fn run_flag(&self) -> RunFlag {
        self.running.clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.is_running()
    }

    pub fn stop(&self) {
        self.running.stop();
    }

    /// Waits for the loop thread, if any, to exit. Call after `stop`.
    pub fn join(&mut self) {
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                error!("Simulation loop panicked");
            }
        }
    }
}

impl<H> Drop for Engine<H> {
    fn drop(&mut self) {
        if self.is_running() {
            self.stop();
        }
        self.join();
    }
}
