use life_grid::{Color, DEFAULT_HEIGHT, DEFAULT_WIDTH, Direction, LifeError, Painter};
use std::str::FromStr;
use thiserror::Error;

/// Probability used by the randomize action when none is given.
pub const DEFAULT_RANDOMIZE_PROBABILITY: u32 = 8;

/// Largest cell scale whose frame for the default grid fits a GPU texture.
pub const MAX_SCALE: u32 = Painter::MAX_FRAME_SIDE / if DEFAULT_WIDTH > DEFAULT_HEIGHT {
    DEFAULT_WIDTH
} else {
    DEFAULT_HEIGHT
};

/// A user action, decoded once from a key press or a console line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Reset,
    Randomize { probability: u32 },
    Glider { x: i64, y: i64, direction: Direction },
    SetDeadColor(Color),
    SetAliveColor(Color),
    Scale(u32),
    Start,
    Stop,
    Exit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command {0:?}")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("{0:?} is not a whole number")]
    NotANumber(String),
    #[error(transparent)]
    Grid(#[from] LifeError),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let name = words.next().ok_or(CommandError::Empty)?.to_ascii_lowercase();
        let args: Vec<&str> = words.collect();

        let command = match (name.as_str(), args.as_slice()) {
            ("reset", []) => Command::Reset,
            ("randomize", []) => Command::Randomize {
                probability: DEFAULT_RANDOMIZE_PROBABILITY,
            },
            ("randomize", [probability]) => Command::Randomize {
                probability: number(probability)?,
            },
            ("glider", [x, y, direction]) => Command::Glider {
                x: number(x)?,
                y: number(y)?,
                direction: Direction::try_from(number::<i64>(direction)?)?,
            },
            ("dead", [color]) => Command::SetDeadColor(color.parse()?),
            ("alive", [color]) => Command::SetAliveColor(color.parse()?),
            ("scale", [scale]) => match number::<u32>(scale)? {
                scale @ 1..=MAX_SCALE => Command::Scale(scale),
                _ => return Err(CommandError::Usage(SCALE_USAGE)),
            },
            ("start", []) => Command::Start,
            ("stop", []) => Command::Stop,
            ("exit" | "quit", []) => Command::Exit,
            (name, _) => {
                return Err(usage(name)
                    .unwrap_or_else(|| CommandError::Unknown(s.trim().to_string())));
            }
        };
        Ok(command)
    }
}

const SCALE_USAGE: &str = "scale <pixels per cell, 1-32>";

fn number<T: FromStr>(word: &str) -> Result<T, CommandError> {
    word.parse()
        .map_err(|_| CommandError::NotANumber(word.to_string()))
}

fn usage(name: &str) -> Option<CommandError> {
    let usage = match name {
        "reset" => "reset",
        "randomize" => "randomize [probability]",
        "glider" => "glider <x> <y> <direction 0-3>",
        "dead" => "dead <#rrggbb>",
        "alive" => "alive <#rrggbb>",
        "scale" => SCALE_USAGE,
        "start" => "start",
        "stop" => "stop",
        "exit" | "quit" => "exit",
        _ => return None,
    };
    Some(CommandError::Usage(usage))
}
