use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::open_store;
use crate::error::Result;
use crate::models::UNCATEGORIZED;
use crate::store::CategoryStore;

pub fn list() -> Result<()> {
    let store = open_store()?;
    println!("Categories ({})\n{}", store.len(), category_table(&store));
    Ok(())
}

pub fn add(name: &str) -> Result<()> {
    let mut store = open_store()?;
    if store.add_category(name)? {
        println!("Added category: {}", name.trim());
    } else if name.trim().is_empty() {
        println!("{}", "Name is required.".yellow());
    } else {
        println!("{}", format!("Category already exists: {}", name.trim()).yellow());
    }
    Ok(())
}

pub fn keyword(category: &str, keyword: &str) -> Result<()> {
    let mut store = open_store()?;
    if store.add_keyword(category, keyword)? {
        let count = store.keywords(category).map_or(0, |k| k.len());
        println!("Added keyword {:?} to {category} ({count} total)", keyword.trim());
    } else if category == UNCATEGORIZED {
        println!("{}", format!("{UNCATEGORIZED} cannot have keywords.").yellow());
    } else {
        println!("{}", "Keyword is blank or already present.".yellow());
    }
    Ok(())
}

pub(crate) fn category_table(store: &CategoryStore) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "Name", "Keywords"]);
    for (i, entry) in store.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&entry.name),
            Cell::new(entry.keywords.join(", ")),
        ]);
    }
    table
}
