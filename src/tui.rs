use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

use crate::fmt::money;

pub const HEADER_STYLE: Style = Style::new()
    .fg(Color::Yellow)
    .add_modifier(Modifier::BOLD);

pub const FOOTER_STYLE: Style = Style::new().fg(Color::DarkGray);

pub const AMOUNT_POS_STYLE: Style = Style::new().fg(Color::Rgb(80, 220, 100));
pub const AMOUNT_NEG_STYLE: Style = Style::new().fg(Color::Red);

/// Rotating bar colors, one per category.
pub const PALETTE: &[Color] = &[
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Green,
    Color::Blue,
    Color::LightRed,
    Color::LightCyan,
    Color::LightMagenta,
];

pub fn palette_color(idx: usize) -> Color {
    PALETTE[idx % PALETTE.len()]
}

/// Expense amounts render red, payments green.
pub fn money_span(amount: f64, currency: &str, is_expense: bool) -> Span<'static> {
    let style = if is_expense {
        AMOUNT_NEG_STYLE
    } else {
        AMOUNT_POS_STYLE
    };
    Span::styled(money(amount.abs(), currency), style)
}
