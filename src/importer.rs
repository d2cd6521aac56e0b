use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;

use crate::categorizer::categorize;
use crate::error::{FinsortError, Result};
use crate::models::{Direction, Transaction, UNCATEGORIZED};
use crate::store::CategoryStore;

/// Bank export date format, e.g. `05 Mar 2024`.
pub const DATE_FORMAT: &str = "%d %b %Y";

const COL_DATE: &str = "Date";
const COL_DETAILS: &str = "Details";
const COL_AMOUNT: &str = "Amount";
const COL_DIRECTION: &str = "Debit/Credit";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Strip thousands separators and parse. Unlike lenient bank parsers this
/// never defaults to zero: a bad amount aborts the load.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let s = raw.replace(',', "");
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

struct Columns {
    date: usize,
    details: usize,
    amount: usize,
    direction: usize,
}

impl Columns {
    fn locate(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or(FinsortError::MissingColumn(name))
        };
        Ok(Self {
            date: find(COL_DATE)?,
            details: find(COL_DETAILS)?,
            amount: find(COL_AMOUNT)?,
            direction: find(COL_DIRECTION)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Parse a bank CSV into uncategorized transactions. All-or-nothing: the
/// first bad row fails the whole parse.
pub fn parse_transactions<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let cols = Columns::locate(&headers)?;

    let mut rows = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let row = i + 1;
        let field = |idx: usize| record.get(idx).unwrap_or("");

        let amount_raw = field(cols.amount);
        let amount = parse_amount(amount_raw).ok_or_else(|| FinsortError::Parse {
            row,
            column: COL_AMOUNT,
            value: amount_raw.to_string(),
        })?;
        let date_raw = field(cols.date);
        let date = parse_date(date_raw).ok_or_else(|| FinsortError::Parse {
            row,
            column: COL_DATE,
            value: date_raw.to_string(),
        })?;
        let direction = Direction::parse(field(cols.direction));

        rows.push(Transaction {
            row,
            date,
            details: field(cols.details).to_string(),
            amount,
            direction,
            category: UNCATEGORIZED.to_string(),
        });
    }
    Ok(rows)
}

/// Parse and categorize a CSV from any reader.
pub fn load_from_reader<R: Read>(reader: R, store: &CategoryStore) -> Result<Vec<Transaction>> {
    let rows = parse_transactions(reader)?;
    Ok(categorize(rows, store))
}

pub fn load_transactions(file_path: &Path, store: &CategoryStore) -> Result<Vec<Transaction>> {
    let file = std::fs::File::open(file_path)?;
    let rows = load_from_reader(std::io::BufReader::new(file), store)?;
    tracing::info!("Loaded {} transactions from {}", rows.len(), file_path.display());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Date,Details,Amount,Debit/Credit\n";

    fn empty_store(dir: &Path) -> CategoryStore {
        CategoryStore::load(&dir.join("categories.json")).unwrap()
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,234.56"), Some(1234.56));
        assert_eq!(parse_amount("  -42.50  "), Some(-42.5));
        assert_eq!(parse_amount("4.50"), Some(4.5));
        assert_eq!(parse_amount("1,000,000"), Some(1_000_000.0));
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("$5.00"), None);
        assert_eq!(parse_amount("NaN"), None);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("05 Mar 2024"), NaiveDate::from_ymd_opt(2024, 3, 5));
        assert_eq!(parse_date("1 Jan 2024"), NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(parse_date("2024-03-05"), None);
        assert_eq!(parse_date("31 Feb 2024"), None);
    }

    #[test]
    fn test_parse_trims_headers_and_ignores_extra_columns() {
        let csv = " Date , Details ,Amount , Debit/Credit ,Balance\n\
                   05 Mar 2024,Grocer,\"1,234.56\",Debit,9.99\n";
        let rows = parse_transactions(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, 1234.56);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(rows[0].direction, Direction::Debit);
        assert_eq!(rows[0].category, UNCATEGORIZED);
        assert_eq!(rows[0].row, 1);
    }

    #[test]
    fn test_bad_amount_aborts_whole_load() {
        let csv = format!("{HEADER}01 Jan 2024,Good,1.00,Debit\n02 Jan 2024,Bad,abc,Debit\n");
        let err = parse_transactions(csv.as_bytes()).unwrap_err();
        match err {
            FinsortError::Parse { row, column, value } => {
                assert_eq!(row, 2);
                assert_eq!(column, "Amount");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_date_aborts_load() {
        let csv = format!("{HEADER}2024-03-05,Shop,1.00,Debit\n");
        let err = parse_transactions(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, FinsortError::Parse { column: "Date", .. }));
    }

    #[test]
    fn test_unknown_direction_row_still_loads() {
        let csv = format!(
            "{HEADER}01 Jan 2024,Starbucks,4.50,Debit\n02 Jan 2024,Savings move,100.00,Transfer\n"
        );
        let rows = parse_transactions(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].is_debit());
        assert_eq!(rows[1].direction, Direction::Other("Transfer".into()));
        assert!(!rows[1].is_debit());
        assert!(!rows[1].is_credit());
    }

    #[test]
    fn test_missing_column() {
        let csv = "Date,Description,Amount,Debit/Credit\n05 Mar 2024,Shop,1.00,Debit\n";
        let err = parse_transactions(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, FinsortError::MissingColumn("Details")));
    }

    #[test]
    fn test_header_only_yields_no_rows() {
        let rows = parse_transactions(HEADER.as_bytes()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_end_to_end_starbucks() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = empty_store(dir.path());
        store.add_category("Coffee").unwrap();
        store.add_keyword("Coffee", "starbucks").unwrap();

        let path = dir.path().join("stmt.csv");
        std::fs::write(&path, format!("{HEADER}01 Jan 2024,Starbucks,4.50,Debit\n")).unwrap();

        let rows = load_transactions(&path, &store).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, "Coffee");
        assert_eq!(rows[0].amount, 4.50);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = empty_store(dir.path());
        let err = load_transactions(&dir.path().join("nope.csv"), &store).unwrap_err();
        assert!(matches!(err, FinsortError::Io(_)));
    }
}
