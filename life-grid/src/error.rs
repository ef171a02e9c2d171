use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LifeError {
    #[error("randomize probability must be at least 1, got {0}")]
    InvalidProbability(u32),
    #[error("glider at ({x}, {y}) does not fit inside a {width}x{height} grid")]
    GliderOutOfBounds {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },
    #[error("glider direction must be 0-3, got {0}")]
    InvalidDirection(i64),
    #[error("frame holds {actual} bytes but the grid needs {expected}")]
    FrameSize { expected: usize, actual: usize },
    #[error("cell scale must be at least 1")]
    ZeroScale,
    #[error("a {width}x{height} grid at scale {scale} does not fit in a {max}x{max} pixel frame")]
    FrameTooLarge {
        width: u32,
        height: u32,
        scale: u32,
        max: u32,
    },
    #[error("invalid color {0:?}, expected #rrggbb")]
    InvalidColor(String),
}
