mod app;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::app_settings::AppSettings;
use crate::state::loader::{LoadingState, SnapshotWorker};
use crate::state::messages::{LoadRequest, LoadResponse, UiEvent};
use crate::state::refresher::PeriodicRefresher;
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::{error, info};
use std::io::Stdout;
use std::path::PathBuf;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tui::{Terminal, backend::CrosstermBackend};

enum CliAction {
    Run(Option<PathBuf>),
    Exit,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let snapshot_override = match handle_cli_args() {
        CliAction::Run(path) => path,
        CliAction::Exit => return Ok(()),
    };

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    tui_logger::init_logger(log::LevelFilter::Info)?;
    tui_logger::set_default_level(log::LevelFilter::Info);

    let mut settings = AppSettings::load();
    if let Some(path) = snapshot_override {
        settings.snapshot_path = path;
    }
    let snapshot_path = settings.snapshot_path.clone();
    let refresh_interval = settings.refresh_interval;
    let app = Arc::new(Mutex::new(App::with_settings(settings)));
    info!("watching {} every {:?}", snapshot_path.display(), refresh_interval);

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (load_req_tx, load_req_rx) = mpsc::channel::<LoadRequest>(100);
    let (load_resp_tx, load_resp_rx) = mpsc::channel::<LoadResponse>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Snapshot loader thread
    let worker = SnapshotWorker::new(snapshot_path, load_req_rx, load_resp_tx);
    let loader_task = tokio::spawn(worker.run());

    // Periodic reload thread
    let periodic_updater = PeriodicRefresher::new(load_req_tx.clone(), refresh_interval);
    let periodic_task = tokio::spawn(periodic_updater.run());

    // Trigger bracket load on startup
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ui_event_rx, load_req_tx, load_resp_rx).await;

    input_handler.abort();
    loader_task.abort();
    periodic_task.abort();

    Ok(())
}

fn handle_cli_args() -> CliAction {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return CliAction::Run(None);
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            CliAction::Exit
        }
        "-V" | "--version" => {
            println!("copatui {}", env!("CARGO_PKG_VERSION"));
            CliAction::Exit
        }
        flag if flag.starts_with('-') => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
        path => CliAction::Run(Some(PathBuf::from(path))),
    }
}

fn usage_text() -> &'static str {
    "copatui - knockout bracket terminal viewer

Usage:
  copatui [SNAPSHOT.json]
  copatui --help
  copatui --version

Environment:
  COPA_BRACKET_JSON    Path to the bracket snapshot (default bracket.json)
  COPA_REFRESH_SECS    Seconds between checks for a changed snapshot (default 5)
  COPA_LOG_LEVEL       error | warn | info | debug | trace
  COPA_EXPORT_DIR      Where 'e' writes the results JSON (default .)"
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    load_requests: mpsc::Sender<LoadRequest>,
    mut load_responses: mpsc::Receiver<LoadResponse>,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw = handle_ui_event(ui_event, &app, &load_requests).await;
                if should_redraw && !loading.is_loading {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(response) = load_responses.recv() => {
                let should_redraw = handle_load_response(response, &app, &mut loading).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            else => break,
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    load_requests: &mpsc::Sender<LoadRequest>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            let _ = load_requests.send(LoadRequest::Reload { force: true }).await;
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, load_requests).await;
            true
        }
        UiEvent::Resize => true,
    }
}

async fn handle_load_response(
    response: LoadResponse,
    app: &Arc<Mutex<App>>,
    loading: &mut LoadingState,
) -> bool {
    match response {
        LoadResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
            return true;
        }
        LoadResponse::SnapshotLoaded { snapshot, tree } => {
            let mut guard = app.lock().await;
            guard.on_snapshot_loaded(snapshot, tree);
        }
        LoadResponse::Error { message } => {
            error!("Load error: {message}");
            let mut guard = app.lock().await;
            guard.on_error(message);
        }
    }
    !loading.is_loading
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

/// Best effort: also runs from the panic hook, where there is no one to report to.
pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
