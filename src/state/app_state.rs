use crate::app::MenuItem;
use crate::state::snapshot::Snapshot;
use chrono::Local;
use copa_bracket::{BracketTree, SlotId, Wing};

#[derive(Debug, Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub last_error: Option<String>,
    /// One-line feedback for the last user action (export path etc.).
    pub status_message: Option<String>,
    pub bracket: BracketState,
    pub results_scroll: u16,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// Bracket state
// ---------------------------------------------------------------------------

/// Latest snapshot plus the user's slot selection. The tree is replaced
/// wholesale on every reload, never patched.
#[derive(Debug, Default)]
pub struct BracketState {
    pub snapshot: Option<Snapshot>,
    pub tree: Option<BracketTree>,
    pub selected: SlotId,
    pub last_loaded_at: Option<String>,
}

impl BracketState {
    pub fn load(&mut self, snapshot: Snapshot, tree: BracketTree) {
        if !tree.contains(self.selected) {
            self.selected = SlotId::new(0, 0);
        }
        self.snapshot = Some(snapshot);
        self.tree = Some(tree);
        self.last_loaded_at = Some(Local::now().format("%H:%M:%S").to_string());
    }

    /// Move one round toward the Final, keeping the slot's lineage.
    pub fn navigate_round_inward(&mut self) {
        let Some(tree) = &self.tree else { return };
        if self.selected.round < tree.final_round() {
            self.selected = self.selected.parent();
        }
    }

    /// Move one round away from the Final, onto the upper feeder.
    pub fn navigate_round_outward(&mut self) {
        if let Some([upper, _]) = self.selected.feeders() {
            self.selected = upper;
        }
    }

    /// Move on screen to the left: outward on the left wing, inward on the right.
    pub fn navigate_left(&mut self) {
        match self.selected_wing() {
            Some(Wing::Right) => self.navigate_round_inward(),
            Some(Wing::Left) => self.navigate_round_outward(),
            None => {
                if let Some([left, _]) = self.selected.feeders() {
                    self.selected = left;
                }
            }
        }
    }

    pub fn navigate_right(&mut self) {
        match self.selected_wing() {
            Some(Wing::Left) => self.navigate_round_inward(),
            Some(Wing::Right) => self.navigate_round_outward(),
            None => {
                if let Some([_, right]) = self.selected.feeders() {
                    self.selected = right;
                }
            }
        }
    }

    pub fn navigate_slot_down(&mut self) {
        let max = self.slots_in_round().saturating_sub(1);
        if self.selected.index < max {
            self.selected.index += 1;
        }
    }

    pub fn navigate_slot_up(&mut self) {
        self.selected.index = self.selected.index.saturating_sub(1);
    }

    pub fn selected_wing(&self) -> Option<Wing> {
        self.tree.as_ref()?.wing(self.selected)
    }

    fn slots_in_round(&self) -> usize {
        self.tree
            .as_ref()
            .and_then(|t| t.round(self.selected.round))
            .map_or(0, <[_]>::len)
    }
}
