use copa_bracket::{BracketPlan, Match, Outcome, Pending, SlotId, SlotView};
use kurbo::Size;
use std::collections::HashMap;
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::Style;
use tui::widgets::Widget;

use crate::components::theme::{Palette, Theme, resolve, tone_style};
use crate::state::snapshot::TeamDirectory;

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

/// Rows per slot box: home line, status line, away line.
pub const BOX_ROWS: u16 = 3;

/// Below this the bracket is not drawn at all.
pub const MIN_AREA_WIDTH: u16 = 20;

// ---------------------------------------------------------------------------
// CellScale — layout units → terminal cells
// ---------------------------------------------------------------------------

/// Uniform-per-axis mapping from the plan's canvas onto a terminal area.
/// Rows and columns are truncated, so equal layout coordinates always land
/// on the same cell and connectors meet the boxes they were routed to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellScale {
    origin_x: u16,
    origin_y: u16,
    sx: f64,
    sy: f64,
}

impl CellScale {
    pub fn fit(canvas: Size, area: Rect) -> Self {
        let ratio = |cells: u16, units: f64| if units > 0.0 { f64::from(cells) / units } else { 0.0 };
        Self {
            origin_x: area.x,
            origin_y: area.y,
            sx: ratio(area.width, canvas.width),
            sy: ratio(area.height, canvas.height),
        }
    }

    pub fn col(&self, x: f64) -> u16 {
        self.origin_x.saturating_add((x * self.sx).max(0.0) as u16)
    }

    pub fn row(&self, y: f64) -> u16 {
        self.origin_y.saturating_add((y * self.sy).max(0.0) as u16)
    }
}

// ---------------------------------------------------------------------------
// Connector glyphs
// ---------------------------------------------------------------------------

const UP: u8 = 0b0001;
const DOWN: u8 = 0b0010;
const LEFT: u8 = 0b0100;
const RIGHT: u8 = 0b1000;

/// Box-drawing arms accumulated per cell, so crossing and touching
/// segments merge into one junction glyph.
#[derive(Debug, Default)]
pub struct GlyphGrid {
    arms: HashMap<(u16, u16), u8>,
}

impl GlyphGrid {
    /// Add an axis-aligned segment between two cells. Single-cell and
    /// diagonal segments add nothing.
    pub fn add_segment(&mut self, from: (u16, u16), to: (u16, u16)) {
        let (x0, y0) = from;
        let (x1, y1) = to;
        if y0 == y1 && x0 != x1 {
            let (lo, hi) = (x0.min(x1), x0.max(x1));
            for x in lo..=hi {
                let mut arms = 0;
                if x > lo {
                    arms |= LEFT;
                }
                if x < hi {
                    arms |= RIGHT;
                }
                *self.arms.entry((x, y0)).or_default() |= arms;
            }
        } else if x0 == x1 && y0 != y1 {
            let (lo, hi) = (y0.min(y1), y0.max(y1));
            for y in lo..=hi {
                let mut arms = 0;
                if y > lo {
                    arms |= UP;
                }
                if y < hi {
                    arms |= DOWN;
                }
                *self.arms.entry((x0, y)).or_default() |= arms;
            }
        }
    }

    pub fn glyph_at(&self, x: u16, y: u16) -> Option<char> {
        self.arms.get(&(x, y)).map(|&arms| glyph(arms))
    }

    fn paint(&self, area: Rect, style: Style, buf: &mut Buffer) {
        for (&(x, y), &arms) in &self.arms {
            if contains(area, x, y) {
                put_char(buf, x, y, glyph(arms), style);
            }
        }
    }
}

fn glyph(arms: u8) -> char {
    match arms {
        a if a == UP | DOWN | LEFT | RIGHT => '┼',
        a if a == UP | DOWN | RIGHT => '├',
        a if a == UP | DOWN | LEFT => '┤',
        a if a == LEFT | RIGHT | DOWN => '┬',
        a if a == LEFT | RIGHT | UP => '┴',
        a if a == DOWN | RIGHT => '┌',
        a if a == DOWN | LEFT => '┐',
        a if a == UP | RIGHT => '└',
        a if a == UP | LEFT => '┘',
        a if a & (UP | DOWN) != 0 && a & (LEFT | RIGHT) == 0 => '│',
        _ => '─',
    }
}

// ---------------------------------------------------------------------------
// BracketView widget
// ---------------------------------------------------------------------------

/// Renders a full two-wing bracket, scaled to fit the area.
pub struct BracketView<'a> {
    pub plan: &'a BracketPlan<'a>,
    pub teams: &'a dyn TeamDirectory,
    pub selected: Option<SlotId>,
    pub theme: Theme,
}

impl Widget for BracketView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < MIN_AREA_WIDTH || area.height < BOX_ROWS {
            return;
        }
        let scale = CellScale::fit(self.plan.canvas, area);

        // Pass 1: connectors, so boxes drawn afterwards cover the stub ends.
        let mut grid = GlyphGrid::default();
        for line in self.plan.segments() {
            grid.add_segment(
                (scale.col(line.p0.x), scale.row(line.p0.y)),
                (scale.col(line.p1.x), scale.row(line.p1.y)),
            );
        }
        grid.paint(area, resolve(Palette::Dim, self.theme), buf);

        // Pass 2: slot boxes.
        for slot in &self.plan.slots {
            let selected = self.selected == Some(slot.id);
            draw_slot(slot, self.teams, selected, &scale, area, self.theme, buf);
        }
    }
}

fn draw_slot(
    slot: &SlotView<'_>,
    teams: &dyn TeamDirectory,
    selected: bool,
    scale: &CellScale,
    area: Rect,
    theme: Theme,
    buf: &mut Buffer,
) {
    let x = scale.col(slot.rect.x0);
    let limit_x = area.x + area.width;
    if x >= limit_x {
        return;
    }
    let width = scale.col(slot.rect.x1).saturating_sub(x).max(1).min(limit_x - x) as usize;

    // Same row mapping as the connectors, so the status line carries the stubs.
    let center_row = scale.row(slot.rect.center().y).max(area.y + 1);
    let rows = [center_row - 1, center_row, center_row.saturating_add(1)];

    let selected_style = resolve(Palette::Selected, theme);
    let lines: [(String, Style); 3] = match slot.fixture {
        None => [
            (" ".repeat(width), resolve(Palette::Dim, theme)),
            (pad(" TBD", width), resolve(Palette::Dim, theme)),
            (" ".repeat(width), resolve(Palette::Dim, theme)),
        ],
        Some(fixture) => {
            let score = fixture.score();
            let home = format_team_line(&teams.side_name(fixture.home), score.map(|(h, _)| h), width);
            let away = format_team_line(&teams.side_name(fixture.away), score.map(|(_, a)| a), width);
            let status_style = match slot.outcome {
                Outcome::Undecided(Pending::Draw) => resolve(Palette::Accent, theme),
                Outcome::Undecided(_) => resolve(Palette::Primary, theme),
                _ => resolve(Palette::Dim, theme),
            };
            [
                (home, tone_style(slot.highlight.home, theme)),
                (format_status_line(fixture, slot.outcome, width), status_style),
                (away, tone_style(slot.highlight.away, theme)),
            ]
        }
    };

    for (row, (text, style)) in rows.into_iter().zip(lines) {
        if !contains(area, x, row) {
            continue;
        }
        let style = if selected && row != center_row { selected_style } else { style };
        buf.set_string(x, row, &text, style);
    }
}

/// Format a team line: `" name        score "`, exactly `width` characters.
pub fn format_team_line(name: &str, score: Option<u32>, width: usize) -> String {
    let score_str = match score {
        Some(s) => format!("{s:>2}"),
        None => "  ".to_string(),
    };
    // 1 leading space + name + 1 space + score(2) + 1 trailing space
    let name_w = width.saturating_sub(5);
    let name_trunc: String = name.chars().take(name_w).collect();
    pad(&format!(" {name_trunc:<name_w$} {score_str} "), width)
}

/// Format the center status line of a box.
pub fn format_status_line(fixture: &Match, outcome: Outcome, width: usize) -> String {
    let played = if fixture.extra_time { "AET" } else { "FT" };
    let pens = fixture
        .penalties
        .map(|(h, a)| format!(" pen {h}-{a}"))
        .unwrap_or_default();
    let raw = match outcome {
        Outcome::Undecided(Pending::Unscheduled) => " TBD".to_string(),
        Outcome::Undecided(Pending::NotPlayed) => fixture
            .kickoff
            .map(|k| format!(" {}", k.format("%d/%m %H:%M")))
            .unwrap_or_else(|| " vs".to_string()),
        Outcome::Undecided(Pending::Draw) => format!(" {played}{pens} level"),
        Outcome::HomeAdvances | Outcome::AwayAdvances => format!(" {played}{pens}"),
    };
    pad(&raw, width)
}

/// Left-align to exactly `width` characters, truncating if longer.
fn pad(text: &str, width: usize) -> String {
    let truncated: String = text.chars().take(width).collect();
    format!("{truncated:<width$}")
}

fn contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
}

fn put_char(buf: &mut Buffer, x: u16, y: u16, ch: char, style: Style) {
    if let Some(cell) = buf.cell_mut((x, y)) {
        cell.set_char(ch);
        cell.set_style(style);
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
