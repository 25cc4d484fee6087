use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LevelError {
    UnknownStage { stage: usize, available: usize },
    InvalidPlatform { index: usize, width: i32, height: i32 },
    InvalidLayout(String),
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownStage { stage, available } => {
                write!(f, "unknown stage {stage} (available 1..={available})")
            }
            Self::InvalidPlatform {
                index,
                width,
                height,
            } => write!(
                f,
                "platform {index} has non-positive size {width}x{height}"
            ),
            Self::InvalidLayout(msg) => write!(f, "invalid level layout: {msg}"),
        }
    }
}

impl std::error::Error for LevelError {}

/// Faults raised inside a tick. The frame driver reports them on screen and keeps
/// running.
#[derive(Clone, Debug, PartialEq)]
pub enum SimError {
    LevelNotLoaded,
    Level(LevelError),
    MissingBoss { minion: u32, boss: u32 },
    NonFiniteState { what: &'static str },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LevelNotLoaded => write!(f, "no level is loaded"),
            Self::Level(err) => write!(f, "level error: {err}"),
            Self::MissingBoss { minion, boss } => {
                write!(f, "minion {minion} references missing boss {boss}")
            }
            Self::NonFiniteState { what } => write!(f, "non-finite value in {what}"),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Level(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LevelError> for SimError {
    fn from(err: LevelError) -> Self {
        Self::Level(err)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputScriptError {
    UnknownKey(String),
    EmptySegment { index: usize },
    TooLong { frames: u64, max: u64 },
    Parse(String),
}

impl fmt::Display for InputScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKey(key) => write!(f, "unknown key name: {key}"),
            Self::EmptySegment { index } => write!(f, "segment {index} has zero frames"),
            Self::TooLong { frames, max } => {
                write!(f, "script runs {frames} frames, more than the {max} allowed")
            }
            Self::Parse(msg) => write!(f, "input script parse error: {msg}"),
        }
    }
}

impl std::error::Error for InputScriptError {}
