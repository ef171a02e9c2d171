use crate::{LoopHost, RunFlag};
use life_grid::SharedGrid;
use log::info;
use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

pub const DEFAULT_UPDATE_RATE_HZ: u32 = 10;
pub const DEFAULT_RENDER_RATE_HZ: u32 = 30;
pub const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Maximum update and redraw frequencies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopRates {
    pub update_rate_hz: u32,
    pub render_rate_hz: u32,
}

impl LoopRates {
    pub fn new(update_rate_hz: u32, render_rate_hz: u32) -> Self {
        assert!(update_rate_hz > 0 && render_rate_hz > 0);
        Self {
            update_rate_hz,
            render_rate_hz,
        }
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(1) / self.update_rate_hz
    }

    pub fn render_interval(&self) -> Duration {
        Duration::from_secs(1) / self.render_rate_hz
    }
}

impl Default for LoopRates {
    fn default() -> Self {
        Self::new(DEFAULT_UPDATE_RATE_HZ, DEFAULT_RENDER_RATE_HZ)
    }
}

/// Updates and frames counted over one report window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Throughput {
    pub updates: u32,
    pub frames: u32,
}

impl fmt::Display for Throughput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} updates / sec; {} frames / sec",
            self.updates, self.frames
        )
    }
}

/// What a single poll found due.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Due {
    pub update: bool,
    pub render: bool,
    pub report: Option<Throughput>,
}

/// Wall-clock throttling for updates, redraws and the throughput report.
///
/// Each of the three actions fires once the time since it last fired reaches
/// its interval, and its timestamp restarts from the poll that fired it.
#[derive(Debug)]
pub struct Scheduler {
    rates: LoopRates,
    last_update: Instant,
    last_render: Instant,
    last_report: Instant,
    window: Throughput,
}

impl Scheduler {
    pub fn new(rates: LoopRates, now: Instant) -> Self {
        Self {
            rates,
            last_update: now,
            last_render: now,
            last_report: now,
            window: Throughput::default(),
        }
    }

    pub fn poll(&mut self, now: Instant) -> Due {
        let mut due = Due::default();

        if now.saturating_duration_since(self.last_update) >= self.rates.update_interval() {
            due.update = true;
            self.last_update = now;
            self.window.updates += 1;
        }

        if now.saturating_duration_since(self.last_render) >= self.rates.render_interval() {
            due.render = true;
            self.last_render = now;
            self.window.frames += 1;
        }

        if now.saturating_duration_since(self.last_report) >= REPORT_INTERVAL {
            due.report = Some(self.window);
            self.window = Throughput::default();
            self.last_report = now;
        }

        due
    }

    /// The earliest instant at which `poll` will find something due.
    pub fn next_deadline(&self) -> Instant {
        (self.last_update + self.rates.update_interval())
            .min(self.last_render + self.rates.render_interval())
            .min(self.last_report + REPORT_INTERVAL)
    }

    /// Runs until `running` is cleared or the host stops being visible.
    ///
    /// Sleeps between deadlines instead of spinning. A sleep never exceeds
    /// one render interval, so a cleared flag is noticed promptly.
    pub fn run<H: LoopHost>(&mut self, running: &RunFlag, grid: &SharedGrid, host: &mut H) {
        info!("Running");
        while running.is_running() {
            if !host.is_visible() {
                running.stop();
                break;
            }

            let due = self.poll(Instant::now());
            if due.update {
                grid.update();
            }
            if due.render {
                host.request_redraw();
            }
            if let Some(throughput) = due.report {
                info!("{throughput}");
            }

            self.sleep_until_next_deadline();
        }
    }

    fn sleep_until_next_deadline(&self) {
        let wait = self
            .next_deadline()
            .saturating_duration_since(Instant::now())
            .min(self.rates.render_interval());
        if !wait.is_zero() {
            thread::sleep(wait);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn millis(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    #[test]
    fn default_rates() {
        let rates = LoopRates::default();
        assert_eq!(rates.update_interval(), millis(100));
        assert_eq!(rates.render_interval(), Duration::from_nanos(33_333_333));
    }

    #[test]
    fn nothing_is_due_at_start() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new(LoopRates::default(), start);
        assert_eq!(scheduler.poll(start), Due::default());
        assert_eq!(scheduler.poll(start + millis(33)), Due::default());
    }

    #[test]
    fn update_fires_once_per_interval() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new(LoopRates::new(10, 1), start);
        assert!(!scheduler.poll(start + millis(99)).update);
        assert!(scheduler.poll(start + millis(100)).update);
        assert!(!scheduler.poll(start + millis(150)).update);
        // The interval restarts from the poll that fired, not from the
        // nominal tick.
        assert!(!scheduler.poll(start + millis(199)).update);
        assert!(scheduler.poll(start + millis(200)).update);
    }

    #[test]
    fn update_and_render_are_throttled_independently() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new(LoopRates::new(10, 30), start);
        let due = scheduler.poll(start + millis(40));
        assert!(due.render);
        assert!(!due.update);
        let due = scheduler.poll(start + millis(100));
        assert!(due.update);
        assert!(due.render);
    }

    #[test]
    fn one_second_of_fine_polling_stays_within_rate_bounds() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new(LoopRates::default(), start);
        let mut report = None;
        for ms in 1..=1000 {
            if let Some(throughput) = scheduler.poll(start + millis(ms)).report {
                report = Some(throughput);
            }
        }
        let report = report.expect("a report after one second");
        assert!((9..=11).contains(&report.updates), "{report}");
        assert!((28..=32).contains(&report.frames), "{report}");
    }

    #[test]
    fn polling_at_each_deadline_hits_the_nominal_rates() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new(LoopRates::default(), start);
        let mut now;
        let report = loop {
            now = scheduler.next_deadline();
            if let Some(throughput) = scheduler.poll(now).report {
                break throughput;
            }
        };
        assert_eq!(now, start + REPORT_INTERVAL);
        assert_eq!(
            report,
            Throughput {
                updates: 10,
                frames: 30
            }
        );
    }

    #[test]
    fn report_resets_the_window() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new(LoopRates::new(10, 10), start);
        for ms in (100..=1000).step_by(100) {
            scheduler.poll(start + millis(ms));
        }
        let due = scheduler.poll(start + millis(1100));
        assert_eq!(due.report, None);
        let mut last = None;
        for ms in (1200..=2000).step_by(100) {
            last = scheduler.poll(start + millis(ms)).report.or(last);
        }
        assert_eq!(
            last,
            Some(Throughput {
                updates: 10,
                frames: 10
            })
        );
    }

    #[test]
    fn next_deadline_is_the_earliest_pending_action() {
        let start = Instant::now();
        let scheduler = Scheduler::new(LoopRates::new(10, 30), start);
        assert_eq!(scheduler.next_deadline(), start + Duration::from_nanos(33_333_333));
    }

    #[test]
    fn throughput_log_line() {
        let throughput = Throughput {
            updates: 10,
            frames: 29,
        };
        assert_eq!(throughput.to_string(), "10 updates / sec; 29 frames / sec");
    }
}
