use crate::app::{App, MenuItem};
use crate::state::messages::LoadRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    load_requests: &mpsc::Sender<LoadRequest>,
) {
    let mut guard = app.lock().await;
    guard.clear_status();

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Bracket),
        (_, Char('2'), _) => guard.update_tab(MenuItem::Results),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),
        (MenuItem::Results, KeyCode::Esc, _) => guard.update_tab(MenuItem::Bracket),

        // Bracket navigation
        (MenuItem::Bracket, Char('h') | KeyCode::Left, _) => guard.bracket_left(),
        (MenuItem::Bracket, Char('l') | KeyCode::Right, _) => guard.bracket_right(),
        (MenuItem::Bracket, Char('j') | KeyCode::Down, _) => guard.bracket_slot_down(),
        (MenuItem::Bracket, Char('k') | KeyCode::Up, _) => guard.bracket_slot_up(),

        // Results scrolling
        (MenuItem::Results, Char('j') | KeyCode::Down, _) => guard.results_scroll_down(),
        (MenuItem::Results, Char('k') | KeyCode::Up, _) => guard.results_scroll_up(),

        // Global
        (_, Char('r'), _) => {
            drop(guard);
            let _ = load_requests.send(LoadRequest::Reload { force: true }).await;
        }
        (_, Char('e'), _) => {
            guard.export_results();
        }
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }
}
