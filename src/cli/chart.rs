use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, LineGauge, Paragraph},
    DefaultTerminal, Frame,
};

use crate::cli::open_session;
use crate::error::Result;
use crate::fmt::amount;
use crate::models::Transaction;
use crate::reports::{expense_summary, payments_summary, CategoryTotal, PaymentsSummary};
use crate::settings::load_settings;
use crate::tui::{money_span, palette_color, FOOTER_STYLE, HEADER_STYLE};

pub fn run(file: &str) -> Result<()> {
    let currency = load_settings().currency;
    let session = open_session(file)?;
    let debits: Vec<Transaction> = session.debits().into_iter().cloned().collect();
    let credits: Vec<Transaction> = session.credits().into_iter().cloned().collect();

    let mut chart = ExpenseChart::new(
        file.to_string(),
        expense_summary(&debits),
        payments_summary(&credits),
        currency,
    );
    // ratatui::init also installs a panic hook that restores the terminal.
    let mut terminal = ratatui::init();
    let result = chart.run(&mut terminal);
    ratatui::restore();
    result
}

/// Bar heights are whole currency units; fractions only matter in labels.
fn bar_value(total: f64) -> u64 {
    if total.is_finite() && total > 0.0 {
        total.round() as u64
    } else {
        0
    }
}

struct ExpenseChart {
    title: String,
    items: Vec<CategoryTotal>,
    payments: PaymentsSummary,
    currency: String,
    selected: usize,
    done: bool,
}

impl ExpenseChart {
    fn new(
        title: String,
        items: Vec<CategoryTotal>,
        payments: PaymentsSummary,
        currency: String,
    ) -> Self {
        Self {
            title,
            items,
            payments,
            currency,
            selected: 0,
            done: false,
        }
    }

    fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        while !self.done {
            terminal.draw(|frame| self.draw(frame))?;
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.done = true
            }
            KeyCode::Char('q') | KeyCode::Esc => self.done = true,
            KeyCode::Right | KeyCode::Char('l') => self.select_next(),
            KeyCode::Left | KeyCode::Char('h') => self.select_prev(),
            _ => {}
        }
    }

    fn select_next(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + 1) % self.items.len();
        }
    }

    fn select_prev(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + self.items.len() - 1) % self.items.len();
        }
    }

    fn bars(&self) -> Vec<Bar<'static>> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let mut style = Style::default().fg(palette_color(i));
                if i == self.selected {
                    style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
                }
                Bar::default()
                    .value(bar_value(item.total))
                    .text_value(amount(item.total))
                    .label(Line::from(item.name.clone()))
                    .style(style)
            })
            .collect()
    }

    fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let share_rows = self.items.len().max(1) as u16 + 1;
        let [title_area, chart_area, share_area, payments_area, hints_area] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Fill(1),
                Constraint::Length(share_rows),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .areas(area);

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Expenses by Category", HEADER_STYLE),
                Span::styled(format!("  {}", self.title), FOOTER_STYLE),
            ])),
            title_area,
        );

        if self.items.is_empty() {
            frame.render_widget(Paragraph::new("No expenses."), chart_area);
        } else {
            let bars = self.bars();
            // Values only render when narrower than the bar.
            let bar_width = self
                .items
                .iter()
                .map(|i| i.name.chars().count().max(amount(i.total).len()) + 1)
                .max()
                .unwrap_or(8)
                .clamp(5, 16) as u16;
            let chart = BarChart::default()
                .block(Block::default().borders(Borders::BOTTOM))
                .bar_width(bar_width)
                .bar_gap(2)
                .data(BarGroup::default().bars(&bars));
            frame.render_widget(chart, chart_area);
        }

        // Share of total, one gauge per category
        let rows = vec![Constraint::Length(1); self.items.len() + 1];
        let share_rows_areas = Layout::vertical(rows).split(share_area);
        frame.render_widget(
            Paragraph::new(Span::styled("Share", Style::default().bold())),
            share_rows_areas[0],
        );
        for (i, item) in self.items.iter().enumerate() {
            let Some(row_area) = share_rows_areas.get(i + 1) else {
                break;
            };
            let [name_area, amount_area, gauge_area] = Layout::horizontal([
                Constraint::Length(20),
                Constraint::Length(18),
                Constraint::Fill(1),
            ])
            .areas(*row_area);
            let name_style = if i == self.selected {
                Style::default().fg(palette_color(i)).bold()
            } else {
                Style::default().fg(palette_color(i))
            };
            frame.render_widget(Paragraph::new(Span::styled(item.name.clone(), name_style)), name_area);
            frame.render_widget(
                Paragraph::new(money_span(item.total, &self.currency, true)),
                amount_area,
            );
            let gauge = LineGauge::default()
                .label(format!("{:>5.1}%", item.pct))
                .ratio((item.pct / 100.0).clamp(0.0, 1.0))
                .filled_style(Style::default().fg(palette_color(i)))
                .unfilled_style(FOOTER_STYLE);
            frame.render_widget(gauge, gauge_area);
        }

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Total Payments: ", Style::default().bold()),
                money_span(self.payments.total, &self.currency, false),
                Span::styled(format!("  ({} transactions)", self.payments.count), FOOTER_STYLE),
            ])),
            payments_area,
        );

        frame.render_widget(
            Paragraph::new(Span::styled("\u{2190}/\u{2192} select  q quit", FOOTER_STYLE)),
            hints_area,
        );
    }
}
