use std::collections::HashMap;

use crate::models::Transaction;

// ---------------------------------------------------------------------------
// Direction split
// ---------------------------------------------------------------------------

/// Debit and credit rows; rows with any other direction are in neither.
pub fn split_by_direction(rows: &[Transaction]) -> (Vec<Transaction>, Vec<Transaction>) {
    let debits = rows.iter().filter(|t| t.is_debit()).cloned().collect();
    let credits = rows.iter().filter(|t| t.is_credit()).cloned().collect();
    (debits, credits)
}

// ---------------------------------------------------------------------------
// Expense Summary
// ---------------------------------------------------------------------------

pub struct CategoryTotal {
    pub name: String,
    pub total: f64,
    pub count: usize,
    pub pct: f64,
}

/// Per-category totals over debit rows, largest first.
pub fn expense_summary(debits: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: HashMap<&str, (f64, usize)> = HashMap::new();
    for t in debits {
        let entry = totals.entry(t.category.as_str()).or_default();
        entry.0 += t.amount;
        entry.1 += 1;
    }

    let grand_total: f64 = totals.values().map(|(t, _)| t).sum();
    let mut items: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(name, (total, count))| CategoryTotal {
            name: name.to_string(),
            total,
            count,
            pct: if grand_total != 0.0 {
                total / grand_total * 100.0
            } else {
                0.0
            },
        })
        .collect();
    items.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.name.cmp(&b.name))
    });
    items
}

// ---------------------------------------------------------------------------
// Payments Summary
// ---------------------------------------------------------------------------

pub struct PaymentsSummary {
    pub total: f64,
    pub count: usize,
}

pub fn payments_summary(credits: &[Transaction]) -> PaymentsSummary {
    PaymentsSummary {
        total: credits.iter().map(|t| t.amount).sum(),
        count: credits.len(),
    }
}
