use anyhow::{Context, bail, ensure};
use copa_bracket::{BracketTree, Match, TeamId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// First-round size used when a snapshot neither states nor implies one:
/// eight round-of-16 ties.
pub const DEFAULT_BRACKET_SIZE: usize = 8;

/// Largest first round a snapshot may ask for (a 512-team draw).
pub const MAX_BRACKET_SIZE: usize = 256;

// ---------------------------------------------------------------------------
// Snapshot file — teams plus every fixture entered so far
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub crest: Option<String>, // file name, resolved by whoever paints crests
}

impl Team {
    pub fn display_name(&self) -> &str {
        self.short_name.as_deref().unwrap_or(&self.name)
    }
}

/// One stored fixture. `stage` is the round ordinal (0 = first round);
/// `slot` pins the fixture to a bracket position, otherwise it takes the next
/// free position in kickoff order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub stage: usize,
    #[serde(default)]
    pub slot: Option<usize>,
    #[serde(flatten)]
    pub fixture: Match,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub teams: Vec<Team>,
    /// First-round slot count. Inferred from the fixtures when absent.
    #[serde(default)]
    pub bracket_size: Option<usize>,
    #[serde(default)]
    pub matches: Vec<MatchRecord>,
}

impl Snapshot {
    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        serde_json::from_str(content).context("invalid bracket snapshot json")
    }

    /// First-round size: explicit, else the smallest power of two that fits
    /// every stage's fixtures. Saturates at `usize::MAX` rather than
    /// overflowing; `to_tree` rejects anything above [`MAX_BRACKET_SIZE`].
    pub fn first_round_size(&self) -> usize {
        if let Some(size) = self.bracket_size {
            return size;
        }
        if self.matches.is_empty() {
            return DEFAULT_BRACKET_SIZE;
        }
        self.stage_counts()
            .into_iter()
            .map(|(stage, count)| {
                let in_stage = self
                    .matches
                    .iter()
                    .filter(|m| m.stage == stage)
                    .filter_map(|m| m.slot)
                    .map(|s| s.checked_add(1).unwrap_or(usize::MAX))
                    .max()
                    .unwrap_or(0)
                    .max(count);
                // Stage `s` holds `size >> s` slots, so scale back up by `s`.
                match in_stage.checked_next_power_of_two() {
                    Some(base) if stage <= base.leading_zeros() as usize => base << stage,
                    _ => usize::MAX,
                }
            })
            .max()
            .unwrap_or(DEFAULT_BRACKET_SIZE)
            .max(2)
    }

    /// Assemble the bracket tree: fixtures grouped by stage, pinned ones
    /// placed first, the rest filling free slots by kickoff, gaps left TBD.
    pub fn to_tree(&self) -> anyhow::Result<BracketTree> {
        let size = self.first_round_size();
        ensure!(
            size <= MAX_BRACKET_SIZE,
            "bracket needs {} first-round slots, the limit is {MAX_BRACKET_SIZE}",
            if size == usize::MAX { "too many".to_string() } else { size.to_string() }
        );
        let mut rounds = BracketTree::empty(size)
            .context("bracket size is not a power of two")?
            .rounds()
            .to_vec();

        for record in &self.matches {
            ensure!(
                record.stage < rounds.len(),
                "fixture for stage {} but the bracket only has {} rounds",
                record.stage,
                rounds.len()
            );
        }

        let mut pinned: Vec<&MatchRecord> = self.matches.iter().filter(|m| m.slot.is_some()).collect();
        pinned.sort_by_key(|m| (m.stage, m.slot));
        for record in pinned {
            let round = &mut rounds[record.stage];
            let index = record.slot.unwrap_or_default();
            let Some(slot) = round.get_mut(index) else {
                bail!("stage {} has no slot {index} (size {})", record.stage, round.len());
            };
            if slot.is_some() {
                bail!("stage {} slot {index} is assigned twice", record.stage);
            }
            *slot = Some(record.fixture.clone());
        }

        let mut loose: Vec<&MatchRecord> = self.matches.iter().filter(|m| m.slot.is_none()).collect();
        // Unscheduled fixtures go last, keeping file order among equals.
        loose.sort_by_key(|m| (m.stage, m.fixture.kickoff.is_none(), m.fixture.kickoff));
        for record in loose {
            let round = &mut rounds[record.stage];
            let Some(slot) = round.iter_mut().find(|s| s.is_none()) else {
                bail!("too many fixtures for stage {} (size {})", record.stage, round.len());
            };
            *slot = Some(record.fixture.clone());
        }

        Ok(BracketTree::new(rounds)?)
    }

    fn stage_counts(&self) -> BTreeMap<usize, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.matches {
            *counts.entry(record.stage).or_insert(0) += 1;
        }
        counts
    }
}

// ---------------------------------------------------------------------------
// Team lookup
// ---------------------------------------------------------------------------

/// Resolves team ids to what a renderer shows.
pub trait TeamDirectory {
    fn team(&self, id: TeamId) -> Option<&Team>;

    /// "TBD" for an empty side, "—" for an id with no team record.
    fn side_name(&self, side: Option<TeamId>) -> String {
        match side {
            None => "TBD".to_string(),
            Some(id) => self
                .team(id)
                .map(|t| t.display_name().to_string())
                .unwrap_or_else(|| "—".to_string()),
        }
    }
}

impl TeamDirectory for Snapshot {
    fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }
}
