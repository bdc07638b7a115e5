//! Run modes selecting how a sequence steps through its range

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{normalize_name, SequinError};

/// Transition rule for the step-progression state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RunMode {
    #[default]
    Forward,
    Backward,
    Pendulum,
    PingPong,
    Random,
    RandomWalk,
    DrunkenWalk,
}

impl RunMode {
    pub const ALL: [RunMode; 7] = [
        Self::Forward,
        Self::Backward,
        Self::Pendulum,
        Self::PingPong,
        Self::Random,
        Self::RandomWalk,
        Self::DrunkenWalk,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Forward => "Forward",
            Self::Backward => "Backward",
            Self::Pendulum => "Pendulum",
            Self::PingPong => "Ping Pong",
            Self::Random => "Random",
            Self::RandomWalk => "Random Walk",
            Self::DrunkenWalk => "Drunken Walk",
        }
    }

    /// Modes whose next step depends on random draws rather than the tick count
    pub fn is_stochastic(&self) -> bool {
        matches!(self, Self::Random | Self::RandomWalk | Self::DrunkenWalk)
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RunMode {
    type Err = SequinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_name(s);
        Self::ALL
            .into_iter()
            .find(|mode| normalize_name(mode.name()) == wanted)
            .ok_or_else(|| SequinError::UnknownRunMode(s.to_string()))
    }
}
