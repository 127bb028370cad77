use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use crate::state::export::{build_report, write_report};
use crate::state::snapshot::Snapshot;
use copa_bracket::BracketTree;
use log::{info, warn};
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Bracket,
    Results,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn with_settings(settings: AppSettings) -> Self {
        if let Some(level) = settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }
        Self { state: AppState::new(), settings }
    }

    // -----------------------------------------------------------------------
    // Loader response handlers — called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_snapshot_loaded(&mut self, snapshot: Snapshot, tree: BracketTree) {
        self.state.last_error = None;
        self.state.bracket.load(snapshot, tree);
    }

    /// A failed reload keeps the last good bracket on screen.
    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
        if self.state.active_tab == MenuItem::Results {
            self.state.results_scroll = 0;
        }
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    /// Status feedback lasts until the next key press.
    pub fn clear_status(&mut self) {
        self.state.status_message = None;
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Bracket navigation — delegated to BracketState
    // -----------------------------------------------------------------------

    pub fn bracket_left(&mut self) {
        self.state.bracket.navigate_left();
    }

    pub fn bracket_right(&mut self) {
        self.state.bracket.navigate_right();
    }

    pub fn bracket_slot_down(&mut self) {
        self.state.bracket.navigate_slot_down();
    }

    pub fn bracket_slot_up(&mut self) {
        self.state.bracket.navigate_slot_up();
    }

    pub fn results_scroll_down(&mut self) {
        self.state.results_scroll = self.state.results_scroll.saturating_add(1);
    }

    pub fn results_scroll_up(&mut self) {
        self.state.results_scroll = self.state.results_scroll.saturating_sub(1);
    }

    // -----------------------------------------------------------------------
    // Export
    // -----------------------------------------------------------------------

    /// Write the current results to `export_dir` and report the outcome on
    /// the status line.
    pub fn export_results(&mut self) -> Option<PathBuf> {
        let (Some(snapshot), Some(tree)) = (&self.state.bracket.snapshot, &self.state.bracket.tree)
        else {
            self.state.status_message = Some("Nothing to export yet".to_string());
            return None;
        };

        let report = build_report(&snapshot.name, tree, snapshot);
        match write_report(&report, &self.settings.export_dir) {
            Ok(path) => {
                info!("exported {} result rows to {}", report.rows.len(), path.display());
                self.state.status_message = Some(format!("Exported to {}", path.display()));
                Some(path)
            }
            Err(err) => {
                warn!("export failed: {err:#}");
                self.state.last_error = Some(format!("Export failed: {err:#}"));
                None
            }
        }
    }
}
