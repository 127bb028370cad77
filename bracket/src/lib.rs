pub mod connector;
pub mod layout;
pub mod outcome;
pub mod plan;
pub mod tree;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use connector::{Connector, route};
pub use layout::{BracketLayout, LayoutParams};
pub use outcome::{Outcome, Pending, Rgba, RowTone, SlotHighlight, resolve};
pub use plan::{BracketPlan, SlotView};
pub use tree::{BracketTree, ShapeViolation};

// ---------------------------------------------------------------------------
// Domain types — one knockout bracket snapshot
// ---------------------------------------------------------------------------

/// Opaque team identifier. Names and crests are resolved outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub u32);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One fixture occupying a bracket slot.
///
/// Which previous-round fixture produced `home`/`away` is not stored: the link
/// between rounds is purely positional (see [`SlotId::feeders`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    #[serde(default)]
    pub home: Option<TeamId>, // None = bye / TBD
    #[serde(default)]
    pub away: Option<TeamId>,
    #[serde(default)]
    pub home_score: u32, // meaningful only when `played`
    #[serde(default)]
    pub away_score: u32,
    #[serde(default)]
    pub played: bool,
    #[serde(default)]
    pub extra_time: bool,
    #[serde(default)]
    pub penalties: Option<(u32, u32)>, // (home, away) shootout, never read by the resolver
    #[serde(default)]
    pub kickoff: Option<NaiveDateTime>,
}

impl Match {
    pub fn new(home: Option<TeamId>, away: Option<TeamId>) -> Self {
        Self { home, away, ..Self::default() }
    }

    /// A completed fixture with the given regular-time score.
    pub fn played(home: TeamId, away: TeamId, home_score: u32, away_score: u32) -> Self {
        Self {
            home: Some(home),
            away: Some(away),
            home_score,
            away_score,
            played: true,
            ..Self::default()
        }
    }

    /// `(home, away)` score, or `None` while the fixture is unplayed.
    pub fn score(&self) -> Option<(u32, u32)> {
        self.played.then_some((self.home_score, self.away_score))
    }
}

/// Stage name, derived from how many slots a round has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundKind {
    Final,
    Semifinal,
    Quarterfinal,
    /// Round of N teams (N = 2 × slots), e.g. `RoundOf(16)`.
    RoundOf(usize),
}

impl RoundKind {
    pub fn from_slot_count(slots: usize) -> Self {
        match slots {
            0 | 1 => RoundKind::Final,
            2 => RoundKind::Semifinal,
            4 => RoundKind::Quarterfinal,
            n => RoundKind::RoundOf(n * 2),
        }
    }

    pub fn label(&self) -> String {
        match self {
            RoundKind::Final => "Final".to_string(),
            RoundKind::Semifinal => "Semifinals".to_string(),
            RoundKind::Quarterfinal => "Quarterfinals".to_string(),
            RoundKind::RoundOf(n) => format!("Round of {n}"),
        }
    }

    pub fn short_label(&self) -> String {
        match self {
            RoundKind::Final => "F".to_string(),
            RoundKind::Semifinal => "SF".to_string(),
            RoundKind::Quarterfinal => "QF".to_string(),
            RoundKind::RoundOf(n) => format!("R{n}"),
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, RoundKind::Final)
    }
}

/// Position of a slot: round ordinal (0 = first round) and index within the round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId {
    pub round: usize,
    pub index: usize,
}

impl SlotId {
    pub const fn new(round: usize, index: usize) -> Self {
        Self { round, index }
    }

    /// The two previous-round slots feeding this one: `2k` and `2k + 1`.
    /// `None` for first-round slots.
    pub fn feeders(&self) -> Option<[SlotId; 2]> {
        let prev = self.round.checked_sub(1)?;
        Some([
            SlotId::new(prev, self.index * 2),
            SlotId::new(prev, self.index * 2 + 1),
        ])
    }

    /// The next-round slot this one feeds. Callers must not ask for the Final's parent.
    pub fn parent(&self) -> SlotId {
        SlotId::new(self.round + 1, self.index / 2)
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}#{}", self.round, self.index)
    }
}

/// Half of the bracket converging on the Final from one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Wing {
    Left,
    Right,
}

impl Wing {
    /// Wing of slot `index` in a round of `slots` slots. The Final (1 slot) has none.
    pub fn of(index: usize, slots: usize) -> Option<Wing> {
        if slots < 2 {
            return None;
        }
        if index < slots / 2 { Some(Wing::Left) } else { Some(Wing::Right) }
    }

    /// Horizontal direction pointing away from the Final: -1 on the left, +1 on the right.
    pub fn outward(&self) -> f64 {
        match self {
            Wing::Left => -1.0,
            Wing::Right => 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum BracketError {
    /// Round sizes do not halve down to a single Final.
    InvalidBracketShape(ShapeViolation),
    /// Box sizes or spacings that cannot produce a drawable layout.
    InvalidLayoutParams(String),
}

impl fmt::Display for BracketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketError::InvalidBracketShape(violation) => {
                write!(f, "Invalid bracket shape: {violation}")
            }
            BracketError::InvalidLayoutParams(msg) => write!(f, "Invalid layout parameters: {msg}"),
        }
    }
}

impl std::error::Error for BracketError {}

pub type BracketResult<T> = Result<T, BracketError>;
