use crate::models::{Transaction, UNCATEGORIZED};
use crate::store::CategoryStore;

fn matches_any(details_lower: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| details_lower.contains(k.as_str()))
}

/// Assign a category to every row by case-insensitive substring match.
///
/// Categories are visited in store order and a later match overwrites an
/// earlier one, so when two categories both match a row the last one wins.
/// Blank keywords are skipped rather than matching everything.
pub fn categorize(mut rows: Vec<Transaction>, store: &CategoryStore) -> Vec<Transaction> {
    for row in &mut rows {
        row.category = UNCATEGORIZED.to_string();
    }

    let lowered_details: Vec<String> = rows.iter().map(|r| r.details.to_lowercase()).collect();

    for entry in store.iter() {
        if entry.name == UNCATEGORIZED || entry.keywords.is_empty() {
            continue;
        }
        let keywords: Vec<String> = entry
            .keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        for (row, details) in rows.iter_mut().zip(&lowered_details) {
            if matches_any(details, &keywords) {
                row.category = entry.name.clone();
            }
        }
    }
    rows
}

pub struct CategorizeResult {
    pub categorized: usize,
    pub uncategorized: usize,
}

pub fn summarize(rows: &[Transaction]) -> CategorizeResult {
    let uncategorized = rows.iter().filter(|r| r.category == UNCATEGORIZED).count();
    CategorizeResult {
        categorized: rows.len() - uncategorized,
        uncategorized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Direction;
    use chrono::NaiveDate;

    fn test_store() -> (tempfile::TempDir, CategoryStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = CategoryStore::load(&dir.path().join("categories.json")).unwrap();
        (dir, store)
    }

    fn add_rule(store: &mut CategoryStore, category: &str, keywords: &[&str]) {
        store.add_category(category).unwrap();
        for k in keywords {
            store.add_keyword(category, k).unwrap();
        }
    }

    fn txns(details: &[&str]) -> Vec<Transaction> {
        details
            .iter()
            .enumerate()
            .map(|(i, d)| Transaction {
                row: i + 1,
                date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                details: d.to_string(),
                amount: 10.0,
                direction: Direction::Debit,
                category: "stale".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_case_insensitive_substring() {
        let (_dir, mut store) = test_store();
        add_rule(&mut store, "Subscriptions", &["netflix"]);
        let rows = categorize(txns(&["NETFLIX.COM 123"]), &store);
        assert_eq!(rows[0].category, "Subscriptions");
    }

    #[test]
    fn test_uppercase_keyword_matches_lowercase_details() {
        let (_dir, mut store) = test_store();
        add_rule(&mut store, "Coffee", &["STARBUCKS"]);
        let rows = categorize(txns(&["starbucks #42"]), &store);
        assert_eq!(rows[0].category, "Coffee");
    }

    #[test]
    fn test_last_matching_category_wins() {
        let (_dir, mut store) = test_store();
        add_rule(&mut store, "A", &["coffee"]);
        add_rule(&mut store, "B", &["coffee"]);
        let rows = categorize(txns(&["Coffee Shop"]), &store);
        assert_eq!(rows[0].category, "B");
    }

    #[test]
    fn test_earlier_match_kept_when_later_category_misses() {
        let (_dir, mut store) = test_store();
        add_rule(&mut store, "Coffee", &["coffee"]);
        add_rule(&mut store, "Travel", &["airline"]);
        let rows = categorize(txns(&["Coffee Shop", "Airline Tickets", "Bookstore"]), &store);
        assert_eq!(rows[0].category, "Coffee");
        assert_eq!(rows[1].category, "Travel");
        assert_eq!(rows[2].category, UNCATEGORIZED);
    }

    #[test]
    fn test_unmatched_resets_to_uncategorized() {
        let (_dir, store) = test_store();
        let rows = categorize(txns(&["RANDOM VENDOR XYZ"]), &store);
        assert_eq!(rows[0].category, UNCATEGORIZED);
    }

    #[test]
    fn test_categories_without_keywords_are_skipped() {
        let (_dir, mut store) = test_store();
        add_rule(&mut store, "Coffee", &["coffee"]);
        add_rule(&mut store, "Empty", &[]);
        let rows = categorize(txns(&["coffee"]), &store);
        assert_eq!(rows[0].category, "Coffee");
    }

    #[test]
    fn test_every_category_is_sentinel_or_store_key() {
        let (_dir, mut store) = test_store();
        add_rule(&mut store, "Food", &["pizza", "sushi"]);
        add_rule(&mut store, "Fun", &["cinema", "pizza"]);
        let rows = categorize(
            txns(&["Pizza Hut", "Sushi Bar", "Cinema City", "Gas Station", ""]),
            &store,
        );
        for r in &rows {
            assert!(r.category == UNCATEGORIZED || store.contains(&r.category));
        }
        assert_eq!(rows[0].category, "Fun");
        assert_eq!(rows[1].category, "Food");
    }

    #[test]
    fn test_store_is_not_mutated() {
        let (_dir, mut store) = test_store();
        add_rule(&mut store, "Coffee", &["coffee"]);
        let before: Vec<_> = store.iter().cloned().collect();
        categorize(txns(&["Coffee Shop"]), &store);
        let after: Vec<_> = store.iter().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_summarize_counts() {
        let (_dir, mut store) = test_store();
        add_rule(&mut store, "Coffee", &["coffee"]);
        let rows = categorize(txns(&["coffee", "tea", "more coffee"]), &store);
        let result = summarize(&rows);
        assert_eq!(result.categorized, 2);
        assert_eq!(result.uncategorized, 1);
    }
}
