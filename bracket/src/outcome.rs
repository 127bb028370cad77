use crate::Match;
use serde::{Deserialize, Serialize};

/// Advance classification of one slot, used only for highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    HomeAdvances,
    AwayAdvances,
    Undecided(Pending),
}

/// Why a slot has no advancing side yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pending {
    /// Empty slot, drawn as a TBD placeholder.
    Unscheduled,
    /// Fixture exists but has not been played.
    NotPlayed,
    /// Played and level on regular-time goals. Extra time and penalties are
    /// recorded on the match but not used to break the tie here.
    Draw,
}

/// Classify a slot's fixture. Never fails.
pub fn resolve(fixture: Option<&Match>) -> Outcome {
    let Some(m) = fixture else {
        return Outcome::Undecided(Pending::Unscheduled);
    };
    if !m.played {
        return Outcome::Undecided(Pending::NotPlayed);
    }
    match m.home_score.cmp(&m.away_score) {
        std::cmp::Ordering::Greater => Outcome::HomeAdvances,
        std::cmp::Ordering::Less => Outcome::AwayAdvances,
        std::cmp::Ordering::Equal => Outcome::Undecided(Pending::Draw),
    }
}

impl Outcome {
    pub fn is_decided(&self) -> bool {
        !matches!(self, Outcome::Undecided(_))
    }

    /// Played but level: stored by the match store, never silently resolved.
    pub fn is_unresolved_draw(&self) -> bool {
        matches!(self, Outcome::Undecided(Pending::Draw))
    }

    pub fn highlight(&self) -> SlotHighlight {
        match self {
            Outcome::HomeAdvances => SlotHighlight { home: RowTone::Winner, away: RowTone::Loser },
            Outcome::AwayAdvances => SlotHighlight { home: RowTone::Loser, away: RowTone::Winner },
            Outcome::Undecided(_) => SlotHighlight::default(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::HomeAdvances => "home advances",
            Outcome::AwayAdvances => "away advances",
            Outcome::Undecided(Pending::Unscheduled) => "TBD",
            Outcome::Undecided(Pending::NotPlayed) => "pending",
            Outcome::Undecided(Pending::Draw) => "draw unresolved",
        }
    }
}

/// Background tone of one sub-row (home or away) of a slot box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowTone {
    Winner,
    Loser,
    #[default]
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl RowTone {
    pub const WINNER_FILL: Rgba = Rgba::new(46, 204, 113, 180);
    pub const LOSER_FILL: Rgba = Rgba::new(231, 76, 60, 180);
    pub const NEUTRAL_FILL: Rgba = Rgba::new(255, 255, 255, 230);

    pub fn color(&self) -> Rgba {
        match self {
            RowTone::Winner => Self::WINNER_FILL,
            RowTone::Loser => Self::LOSER_FILL,
            RowTone::Neutral => Self::NEUTRAL_FILL,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotHighlight {
    pub home: RowTone,
    pub away: RowTone,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TeamId;

    fn played(home: u32, away: u32) -> Match {
        Match::played(TeamId(1), TeamId(2), home, away)
    }

    #[test]
    fn test_home_win_advances_home() {
        let outcome = resolve(Some(&played(2, 1)));
        assert_eq!(outcome, Outcome::HomeAdvances);
        assert_eq!(outcome.highlight(), SlotHighlight { home: RowTone::Winner, away: RowTone::Loser });
    }

    #[test]
    fn test_away_win_advances_away() {
        let outcome = resolve(Some(&played(1, 2)));
        assert_eq!(outcome, Outcome::AwayAdvances);
        assert_eq!(outcome.highlight(), SlotHighlight { home: RowTone::Loser, away: RowTone::Winner });
    }

    #[test]
    fn test_level_score_is_flagged_draw() {
        let outcome = resolve(Some(&played(1, 1)));
        assert_eq!(outcome, Outcome::Undecided(Pending::Draw));
        assert!(outcome.is_unresolved_draw());
        assert!(!outcome.is_decided());
        assert_eq!(outcome.highlight(), SlotHighlight::default());
    }

    #[test]
    fn test_penalties_do_not_break_the_tie() {
        let mut m = played(0, 0);
        m.extra_time = true;
        m.penalties = Some((5, 4));
        assert_eq!(resolve(Some(&m)), Outcome::Undecided(Pending::Draw));
    }

    #[test]
    fn test_unplayed_and_empty_are_undecided() {
        let mut m = played(3, 0);
        m.played = false;
        assert_eq!(resolve(Some(&m)), Outcome::Undecided(Pending::NotPlayed));
        assert_eq!(resolve(None), Outcome::Undecided(Pending::Unscheduled));
        assert_eq!(resolve(None).label(), "TBD");
    }

    #[test]
    fn test_tones_map_to_palette() {
        assert_eq!(RowTone::Winner.color(), Rgba::new(46, 204, 113, 180));
        assert_eq!(RowTone::Loser.color(), Rgba::new(231, 76, 60, 180));
        assert_eq!(RowTone::Neutral.color(), Rgba::new(255, 255, 255, 230));
    }
}
