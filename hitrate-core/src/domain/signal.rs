//! Signal — the per-bar verdict of the detection pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Directional intent of a flip or a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "UP"),
            Direction::Down => write!(f, "DOWN"),
        }
    }
}

/// Direction field of an emitted signal; `Neutral` accompanies `fires = false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalDirection {
    Up,
    Down,
    Neutral,
}

impl From<Direction> for SignalDirection {
    fn from(d: Direction) -> Self {
        match d {
            Direction::Up => SignalDirection::Up,
            Direction::Down => SignalDirection::Down,
        }
    }
}

impl SignalDirection {
    /// The trade direction this signal points at; `None` for `Neutral`.
    pub fn trade_direction(self) -> Option<Direction> {
        match self {
            SignalDirection::Up => Some(Direction::Up),
            SignalDirection::Down => Some(Direction::Down),
            SignalDirection::Neutral => None,
        }
    }
}

/// One evaluation verdict, emitted once per evaluated bar.
///
/// `fires = false` means no trade should be taken; the `reason` string
/// records why (no flip, which filter rejected, still warming up).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub bar_index: usize,
    pub direction: SignalDirection,
    /// Confidence score, 0–100.
    pub confidence: f64,
    pub reason: String,
    pub fires: bool,
}

impl Signal {
    /// Neutral non-firing signal.
    pub fn none(bar_index: usize, reason: impl Into<String>) -> Self {
        Self {
            bar_index,
            direction: SignalDirection::Neutral,
            confidence: 0.0,
            reason: reason.into(),
            fires: false,
        }
    }

    /// Firing signal in the given direction.
    pub fn fire(bar_index: usize, direction: Direction, confidence: f64, reason: impl Into<String>) -> Self {
        Self {
            bar_index,
            direction: direction.into(),
            confidence,
            reason: reason.into(),
            fires: true,
        }
    }
}
