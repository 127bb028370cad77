use crate::{BracketError, BracketResult, Match, RoundKind, SlotId, Wing};
use std::fmt;

/// Why a list of rounds cannot form a single-elimination tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeViolation {
    NoRounds,
    /// First round must hold a power of two, at least 2, slots.
    FirstRoundNotPowerOfTwo { len: usize },
    /// Round `round` is not exactly half of the round before it.
    NotHalved { round: usize, expected: usize, found: usize },
    /// The last round must be a single Final slot.
    LastRoundNotSingle { len: usize },
}

impl fmt::Display for ShapeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeViolation::NoRounds => write!(f, "bracket has no rounds"),
            ShapeViolation::FirstRoundNotPowerOfTwo { len } => {
                write!(f, "first round has {len} slots, expected a power of two >= 2")
            }
            ShapeViolation::NotHalved { round, expected, found } => {
                write!(f, "round {round} has {found} slots, expected {expected}")
            }
            ShapeViolation::LastRoundNotSingle { len } => {
                write!(f, "last round has {len} slots, expected a single final")
            }
        }
    }
}

/// Validated snapshot of a knockout bracket: rounds ordered first → Final,
/// each an ordered array of slots. Empty slots are TBD placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct BracketTree {
    rounds: Vec<Vec<Option<Match>>>,
}

impl BracketTree {
    /// Check the halving shape and take ownership of the rounds.
    ///
    /// Nothing is padded or merged: a wrong-shaped input is rejected as a whole.
    pub fn new(rounds: Vec<Vec<Option<Match>>>) -> BracketResult<Self> {
        check_shape(rounds.iter().map(Vec::len))
            .map_err(BracketError::InvalidBracketShape)?;
        Ok(Self { rounds })
    }

    /// An all-TBD bracket whose first round has `first_round` slots.
    pub fn empty(first_round: usize) -> BracketResult<Self> {
        let mut rounds = Vec::new();
        let mut len = first_round;
        loop {
            rounds.push(vec![None; len]);
            if len <= 1 {
                break;
            }
            len /= 2;
        }
        Self::new(rounds)
    }

    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    pub fn first_round_len(&self) -> usize {
        self.rounds[0].len()
    }

    /// Round ordinal of the Final.
    pub fn final_round(&self) -> usize {
        self.rounds.len() - 1
    }

    pub fn rounds(&self) -> &[Vec<Option<Match>>] {
        &self.rounds
    }

    pub fn round(&self, round: usize) -> Option<&[Option<Match>]> {
        self.rounds.get(round).map(Vec::as_slice)
    }

    pub fn round_kind(&self, round: usize) -> RoundKind {
        RoundKind::from_slot_count(self.rounds.get(round).map_or(0, Vec::len))
    }

    /// Fixture in a slot; `None` both for TBD slots and out-of-range ids.
    pub fn slot(&self, id: SlotId) -> Option<&Match> {
        self.rounds.get(id.round)?.get(id.index)?.as_ref()
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.rounds.get(id.round).is_some_and(|r| id.index < r.len())
    }

    pub fn wing(&self, id: SlotId) -> Option<Wing> {
        Wing::of(id.index, self.rounds.get(id.round)?.len())
    }

    /// Every slot id, round-major then by index.
    pub fn slot_ids(&self) -> impl Iterator<Item = SlotId> + '_ {
        self.rounds
            .iter()
            .enumerate()
            .flat_map(|(r, slots)| (0..slots.len()).map(move |i| SlotId::new(r, i)))
    }

    pub fn slot_count(&self) -> usize {
        self.rounds.iter().map(Vec::len).sum()
    }
}

fn check_shape(mut lens: impl Iterator<Item = usize>) -> Result<(), ShapeViolation> {
    let first = lens.next().ok_or(ShapeViolation::NoRounds)?;
    if first < 2 || !first.is_power_of_two() {
        return Err(ShapeViolation::FirstRoundNotPowerOfTwo { len: first });
    }

    let mut prev = first;
    for (offset, len) in lens.enumerate() {
        let expected = prev / 2;
        if len != expected || expected == 0 {
            return Err(ShapeViolation::NotHalved { round: offset + 1, expected, found: len });
        }
        prev = len;
    }

    if prev != 1 {
        return Err(ShapeViolation::LastRoundNotSingle { len: prev });
    }
    Ok(())
}
