use log::error;
use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Tabs};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::bracket::BracketView;
use crate::components::theme::{Palette, Theme, resolve};
use crate::state::loader::{ERROR_CHAR, LoadingState};
use crate::state::snapshot::TeamDirectory;
use crate::ui::layout::LayoutAreas;
use copa_bracket::{BracketPlan, Outcome, Pending, resolve as resolve_outcome};

static TABS: &[&str; 2] = &["Bracket", "Results"];

const HELP_TEXT: &str = "\
q / ctrl-c   quit
1 / 2        Bracket / Results
?            this help (Esc to close)
h / ←        move left across the bracket
l / →        move right across the bracket
j k / ↓ ↑    next / previous slot in the round
r            reload the snapshot now
e            export results as JSON
f            toggle full screen
\"            toggle the log pane";

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Bracket => draw_bracket(f, layout.main, app),
            MenuItem::Results => draw_results(f, layout.main, app),
            MenuItem::Help => draw_placeholder(f, layout.main, HELP_TEXT),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }
        draw_status(f, layout.status, app);
        draw_loading_spinner(f, f.area(), app, loading);
    });
    if let Err(e) = result {
        error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Bracket => 0,
        MenuItem::Results => 1,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

fn draw_bracket(f: &mut Frame, area: Rect, app: &App) {
    let bracket = &app.state.bracket;
    let (Some(snapshot), Some(tree)) = (&bracket.snapshot, &bracket.tree) else {
        let msg = format!("Loading bracket from {} ...", app.settings.snapshot_path.display());
        draw_placeholder(f, area, &msg);
        return;
    };

    let title = if snapshot.name.is_empty() {
        " Bracket ".to_string()
    } else {
        format!(" {} ", snapshot.name)
    };
    let block = default_border(Color::White).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let plan = match BracketPlan::build(tree, &app.settings.layout) {
        Ok(plan) => plan,
        Err(e) => {
            draw_placeholder(f, inner, &e.to_string());
            return;
        }
    };

    let [header, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    // Header: stage, champion, draws needing a decision.
    let mut spans = vec![Span::styled(
        format!(" {} ", tree.round_kind(0).label()),
        resolve(Palette::Primary, Theme::Dark),
    )];
    if let Some(champion) = plan.champion() {
        spans.push(Span::styled(
            format!("  Champion: {} ", snapshot.side_name(Some(champion))),
            resolve(Palette::Winner, Theme::Dark),
        ));
    }
    let draws = plan.unresolved_draws().count();
    if draws > 0 {
        spans.push(Span::styled(
            format!("  {draws} draw(s) unresolved "),
            resolve(Palette::Accent, Theme::Dark),
        ));
    }
    if let Some(at) = &bracket.last_loaded_at {
        spans.push(Span::styled(format!("  updated {at}"), resolve(Palette::Dim, Theme::Dark)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), header);

    f.render_widget(
        BracketView {
            plan: &plan,
            teams: snapshot,
            selected: Some(bracket.selected),
            theme: Theme::Dark,
        },
        body,
    );

    // Footer: details of the selected slot.
    let detail = match plan.slot(bracket.selected) {
        Some(slot) => {
            let stage = slot.kind.label();
            match slot.fixture {
                Some(m) => format!(
                    " {stage} #{}: {} vs {}  ({})",
                    slot.id.index + 1,
                    snapshot.side_name(m.home),
                    snapshot.side_name(m.away),
                    slot.outcome.label()
                ),
                None => format!(" {stage} #{}: TBD", slot.id.index + 1),
            }
        }
        None => String::new(),
    };
    f.render_widget(
        Paragraph::new(detail).style(resolve(Palette::Dim, Theme::Dark)),
        footer,
    );
}

fn draw_results(f: &mut Frame, area: Rect, app: &App) {
    let bracket = &app.state.bracket;
    let (Some(snapshot), Some(tree)) = (&bracket.snapshot, &bracket.tree) else {
        draw_placeholder(f, area, "No bracket loaded");
        return;
    };

    let block = default_border(Color::White).title(" Results ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines = Vec::new();
    for (round, fixtures) in tree.rounds().iter().enumerate() {
        if round > 0 {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            tree.round_kind(round).label(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for (index, fixture) in fixtures.iter().enumerate() {
            let outcome = resolve_outcome(fixture.as_ref());
            let Some(m) = fixture else {
                lines.push(Line::from(Span::styled(
                    format!("  {:>2}. TBD", index + 1),
                    resolve(Palette::Dim, Theme::Dark),
                )));
                continue;
            };
            let score = m
                .score()
                .map(|(h, a)| format!("{h} - {a}"))
                .unwrap_or_else(|| "  -  ".to_string());
            let style = match outcome {
                Outcome::Undecided(Pending::Draw) => resolve(Palette::Accent, Theme::Dark),
                Outcome::Undecided(_) => resolve(Palette::Dim, Theme::Dark),
                _ => Style::default(),
            };
            lines.push(Line::from(Span::styled(
                format!(
                    "  {:>2}. {:<22} {:^7} {:<22} {}",
                    index + 1,
                    snapshot.side_name(m.home),
                    score,
                    snapshot.side_name(m.away),
                    outcome.label()
                ),
                style,
            )));
        }
    }

    f.render_widget(Paragraph::new(lines).scroll((app.state.results_scroll, 0)), inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray))
        .style_debug(Style::default().fg(Color::DarkGray));
    f.render_widget(logs, area);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let line = if let Some(err) = &app.state.last_error {
        Span::styled(format!(" {err}"), Style::default().fg(Color::Red))
    } else if let Some(msg) = &app.state.status_message {
        Span::styled(format!(" {msg}"), Style::default().fg(Color::Gray))
    } else {
        return;
    };
    f.render_widget(Paragraph::new(Line::from(line)), area);
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        inner,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
