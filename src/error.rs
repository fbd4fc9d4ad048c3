use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("map dimensions {width}x{height} are too small (minimum 3x3)")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("room size range {min}..={max} is invalid")]
    InvalidRoomSize { min: i32, max: i32 },

    #[error("player sight range {0} is negative")]
    InvalidSight(i32),

    #[error("invalid dice expression: {0}")]
    InvalidDice(String),

    #[error("map generation produced no walkable cells")]
    NoWalkableCells,

    #[error("walkable cells exhausted: placed {placed} of {required} actors")]
    PoolExhausted { required: usize, placed: usize },

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
