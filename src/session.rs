use std::path::Path;

use crate::error::{FinsortError, Result};
use crate::importer::load_transactions;
use crate::models::Transaction;
use crate::store::CategoryStore;

/// One interactive session: the category store plus whatever statement is
/// currently loaded. Front ends drive it through the `on_*` handlers.
pub struct Session {
    store: CategoryStore,
    transactions: Option<Vec<Transaction>>,
}

impl Session {
    pub fn new(store: CategoryStore) -> Self {
        Self {
            store,
            transactions: None,
        }
    }

    pub fn store(&self) -> &CategoryStore {
        &self.store
    }

    /// `None` until a file loads successfully, and again after a failed load.
    pub fn transactions(&self) -> Option<&[Transaction]> {
        self.transactions.as_deref()
    }

    pub fn on_file_uploaded(&mut self, file_path: &Path) -> Result<&[Transaction]> {
        self.transactions = None;
        let rows = load_transactions(file_path, &self.store)?;
        Ok(self.transactions.insert(rows).as_slice())
    }

    pub fn on_category_added(&mut self, name: &str) -> Result<bool> {
        self.store.add_category(name)
    }

    /// Move row `row` into `new_category` and learn its details text as a
    /// keyword. Returns whether a new keyword was stored; an unchanged
    /// category learns nothing.
    pub fn on_category_edited(&mut self, row: usize, new_category: &str) -> Result<bool> {
        if !self.store.contains(new_category) {
            return Err(FinsortError::UnknownCategory(new_category.to_string()));
        }
        let txn = self
            .transactions
            .as_mut()
            .and_then(|rows| rows.iter_mut().find(|t| t.row == row))
            .ok_or(FinsortError::UnknownRow(row))?;
        if txn.category == new_category {
            return Ok(false);
        }
        txn.category = new_category.to_string();
        let details = txn.details.clone();
        let learned = self.store.add_keyword(new_category, &details)?;
        if learned {
            tracing::info!("Learned {details:?} for {new_category:?}");
        }
        Ok(learned)
    }

    pub fn debits(&self) -> Vec<&Transaction> {
        self.rows().filter(|t| t.is_debit()).collect()
    }

    pub fn credits(&self) -> Vec<&Transaction> {
        self.rows().filter(|t| t.is_credit()).collect()
    }

    fn rows(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().flatten()
    }
}
