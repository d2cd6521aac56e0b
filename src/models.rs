use chrono::NaiveDate;

/// The keyword-less sentinel every transaction starts in.
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Direction {
    Debit,
    Credit,
    /// Anything else the bank put in the column. Kept, but shown in neither
    /// the expenses nor the payments views.
    Other(String),
}

impl Direction {
    /// Exact match on the bank's `Debit/Credit` column.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Debit" => Self::Debit,
            "Credit" => Self::Credit,
            other => Self::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// 1-based position among the CSV data rows.
    pub row: usize,
    pub date: NaiveDate,
    pub details: String,
    pub amount: f64,
    pub direction: Direction,
    pub category: String,
}

impl Transaction {
    pub fn is_debit(&self) -> bool {
        self.direction == Direction::Debit
    }

    pub fn is_credit(&self) -> bool {
        self.direction == Direction::Credit
    }
}
