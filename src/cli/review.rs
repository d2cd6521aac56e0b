use colored::Colorize;
use dialoguer::{Input, Select};

use crate::cli::open_session;
use crate::cli::show::summary_table;
use crate::error::Result;
use crate::fmt::{date, money};
use crate::models::Transaction;
use crate::reports::expense_summary;
use crate::session::Session;
use crate::settings::load_settings;

const KEEP: &str = "(keep)";
const NEW_CATEGORY: &str = "+ new category";
const QUIT: &str = "(quit)";

enum Choice {
    Keep,
    Category(String),
    NewCategory,
    Quit,
}

/// Menu entries: keep first, then every category in store order.
fn menu_items(session: &Session) -> Vec<String> {
    let mut items = vec![KEEP.to_string()];
    items.extend(session.store().names().into_iter().map(str::to_string));
    items.push(NEW_CATEGORY.to_string());
    items.push(QUIT.to_string());
    items
}

fn resolve_choice(items: &[String], idx: usize) -> Choice {
    match items.get(idx).map(String::as_str) {
        None | Some(KEEP) => Choice::Keep,
        Some(NEW_CATEGORY) => Choice::NewCategory,
        Some(QUIT) => Choice::Quit,
        Some(name) => Choice::Category(name.to_string()),
    }
}

pub fn run(file: &str) -> Result<()> {
    let currency = load_settings().currency;
    let mut session = open_session(file)?;
    let debits: Vec<Transaction> = session.debits().into_iter().cloned().collect();

    if debits.is_empty() {
        println!("{}", "No expenses to review.".green());
        return Ok(());
    }
    println!("\n{} expenses to review\n", debits.len());

    let mut learned = 0usize;
    let mut changed = 0usize;
    'rows: for txn in &debits {
        println!("{}", "\u{2500}".repeat(60));
        println!("  Date:     {}", date(txn.date));
        println!("  Details:  {}", txn.details);
        println!("  Amount:   {}", money(txn.amount, &currency).red());
        let current = session
            .transactions()
            .and_then(|rows| rows.iter().find(|t| t.row == txn.row))
            .map(|t| t.category.clone())
            .unwrap_or_default();
        println!("  Category: {current}");
        println!();

        loop {
            let items = menu_items(&session);
            let idx = Select::new()
                .with_prompt("Category")
                .items(items.as_slice())
                .default(0)
                .interact_opt()
                .unwrap_or(None)
                .unwrap_or(items.len() - 1);

            match resolve_choice(&items, idx) {
                Choice::Keep => continue 'rows,
                Choice::Quit => {
                    println!("{}", "Review stopped.".yellow());
                    break 'rows;
                }
                Choice::NewCategory => {
                    let name: String = Input::new()
                        .with_prompt("New category name")
                        .allow_empty(true)
                        .interact_text()
                        .unwrap_or_default();
                    if session.on_category_added(&name)? {
                        println!("{}", format!("Added category {}", name.trim()).green());
                    } else if !name.trim().is_empty() {
                        println!("{}", "Category already exists.".yellow());
                    }
                }
                Choice::Category(name) => {
                    if name != current {
                        changed += 1;
                    }
                    if session.on_category_edited(txn.row, &name)? {
                        learned += 1;
                    }
                    println!("{}", format!("\u{2192} {name}").green());
                    println!();
                    continue 'rows;
                }
            }
        }
    }

    println!("\n{changed} changed, {learned} keywords learned");
    let debits: Vec<Transaction> = session.debits().into_iter().cloned().collect();
    println!(
        "\n{}\n{}",
        "Expense Summary".bold(),
        summary_table(&expense_summary(&debits), &currency)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UNCATEGORIZED;
    use crate::store::CategoryStore;

    #[test]
    fn test_menu_wraps_store_names() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CategoryStore::load(&dir.path().join("categories.json")).unwrap();
        store.add_category("Coffee").unwrap();
        let items = menu_items(&Session::new(store));
        assert_eq!(items, vec![KEEP, UNCATEGORIZED, "Coffee", NEW_CATEGORY, QUIT]);
    }

    #[test]
    fn test_resolve_choice() {
        let items: Vec<String> = [KEEP, "Coffee", NEW_CATEGORY, QUIT]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(matches!(resolve_choice(&items, 0), Choice::Keep));
        assert!(matches!(resolve_choice(&items, 1), Choice::Category(ref c) if c == "Coffee"));
        assert!(matches!(resolve_choice(&items, 2), Choice::NewCategory));
        assert!(matches!(resolve_choice(&items, 3), Choice::Quit));
        assert!(matches!(resolve_choice(&items, 9), Choice::Keep));
    }
}
