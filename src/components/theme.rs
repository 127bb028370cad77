use copa_bracket::{Rgba, RowTone};
use tui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Palette {
    Primary,
    Accent,
    Dim,
    Winner,
    Selected,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Theme {
    #[default]
    Dark,
}

impl Theme {
    fn background(self) -> Rgba {
        match self {
            Theme::Dark => Rgba::new(0, 0, 0, 255),
        }
    }
}

pub fn resolve(color: Palette, _theme: Theme) -> Style {
    match color {
        Palette::Primary => Style::default().fg(Color::Rgb(52, 152, 219)),
        Palette::Accent => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        Palette::Dim => Style::default().fg(Color::Indexed(240)),
        Palette::Winner => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        Palette::Selected => Style::default().fg(Color::White).add_modifier(Modifier::BOLD | Modifier::REVERSED),
    }
}

/// Row style for a highlight tone: translucent fill composited over the theme background.
/// Neutral rows keep the terminal's own background.
pub fn tone_style(tone: RowTone, theme: Theme) -> Style {
    match tone {
        RowTone::Neutral => Style::default().fg(Color::Gray),
        RowTone::Winner => Style::default()
            .bg(blend(tone.color(), theme.background()))
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
        RowTone::Loser => Style::default().bg(blend(tone.color(), theme.background())).fg(Color::White),
    }
}

/// Source-over compositing of `fg` onto an opaque `bg`.
pub fn blend(fg: Rgba, bg: Rgba) -> Color {
    let a = u16::from(fg.a);
    let mix = |f: u8, b: u8| ((u16::from(f) * a + u16::from(b) * (255 - a)) / 255) as u8;
    Color::Rgb(mix(fg.r, bg.r), mix(fg.g, bg.g), mix(fg.b, bg.b))
}
