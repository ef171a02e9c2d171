use crate::command::Command;
use log::warn;
use std::io::{self, BufRead};
use std::thread::{self, JoinHandle};

/// Reads commands from stdin on a background thread, handing each decoded
/// command to `send`. Stops when stdin closes or `send` returns false.
pub fn spawn<F>(send: F) -> io::Result<JoinHandle<()>>
where
    F: FnMut(Command) -> bool + Send + 'static,
{
    thread::Builder::new()
        .name("life-console".to_string())
        .spawn(move || read_commands(io::stdin().lock(), send))
}

/// Lines that fail to parse are logged and skipped.
pub fn read_commands<R, F>(input: R, mut send: F)
where
    R: BufRead,
    F: FnMut(Command) -> bool,
{
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                warn!("Console input closed: {err}");
                return;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Command>() {
            Ok(command) => {
                if !send(command) {
                    return;
                }
            }
            Err(err) => warn!("Ignoring {:?}: {err}", line.trim()),
        }
    }
}
