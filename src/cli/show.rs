use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::categorizer::summarize;
use crate::cli::open_session;
use crate::error::Result;
use crate::fmt::{date, money};
use crate::models::Transaction;
use crate::reports::{expense_summary, payments_summary, split_by_direction, CategoryTotal};
use crate::settings::load_settings;

pub fn run(file: &str) -> Result<()> {
    let currency = load_settings().currency;
    let session = open_session(file)?;
    let rows = session.transactions().unwrap_or_default();

    let result = summarize(rows);
    println!(
        "{} categorized, {} uncategorized\n",
        result.categorized, result.uncategorized
    );

    let (debits, credits) = split_by_direction(rows);

    println!("{}\n{}", "Your Expenses".bold(), transactions_table(&debits, &currency));
    println!(
        "\n{}\n{}",
        "Expense Summary".bold(),
        summary_table(&expense_summary(&debits), &currency)
    );

    let payments = payments_summary(&credits);
    println!("\n{}", "Payments Summary".bold());
    println!(
        "Total Payments: {} ({} transactions)",
        money(payments.total, &currency).green(),
        payments.count
    );
    if !credits.is_empty() {
        println!("{}", transactions_table(&credits, &currency));
    }
    Ok(())
}

pub(crate) fn transactions_table(rows: &[Transaction], currency: &str) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "Date", "Details", "Amount", "Category"]);
    for t in rows {
        table.add_row(vec![
            Cell::new(t.row),
            Cell::new(date(t.date)),
            Cell::new(&t.details),
            Cell::new(money(t.amount, currency)),
            Cell::new(&t.category),
        ]);
    }
    table
}

pub(crate) fn summary_table(items: &[CategoryTotal], currency: &str) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Category", "Amount", "%", "Count"]);
    for item in items {
        table.add_row(vec![
            Cell::new(&item.name),
            Cell::new(money(item.total, currency)),
            Cell::new(format!("{:.1}%", item.pct)),
            Cell::new(item.count),
        ]);
    }
    let total: f64 = items.iter().map(|i| i.total).sum();
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(money(total, currency)),
        Cell::new(""),
        Cell::new(""),
    ]);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Direction;
    use chrono::NaiveDate;

    #[test]
    fn test_transactions_table_formats_date_and_amount() {
        let rows = vec![Transaction {
            row: 3,
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            details: "Grocer".to_string(),
            amount: 1234.56,
            direction: Direction::Debit,
            category: "Food".to_string(),
        }];
        let rendered = transactions_table(&rows, "CAD").to_string();
        assert!(rendered.contains("05/03/2024"));
        assert!(rendered.contains("1,234.56 CAD"));
        assert!(rendered.contains("Food"));
    }

    #[test]
    fn test_summary_table_has_total_row() {
        let items = vec![
            CategoryTotal { name: "Rent".into(), total: 900.0, count: 1, pct: 90.0 },
            CategoryTotal { name: "Coffee".into(), total: 100.0, count: 4, pct: 10.0 },
        ];
        let rendered = summary_table(&items, "CAD").to_string();
        assert!(rendered.contains("1,000.00 CAD"));
        assert!(rendered.contains("90.0%"));
    }
}
