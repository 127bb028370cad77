use crate::state::loader::LoadingState;
use crate::state::snapshot::Snapshot;
use copa_bracket::BracketTree;
use crossterm::event::KeyEvent;

#[derive(Debug, Clone)]
pub enum LoadRequest {
    /// Re-read the snapshot file. Without `force`, an unchanged file is skipped.
    Reload { force: bool },
}

#[derive(Debug)]
pub enum LoadResponse {
    LoadingStateChanged { loading_state: LoadingState },
    SnapshotLoaded { snapshot: Snapshot, tree: BracketTree },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
