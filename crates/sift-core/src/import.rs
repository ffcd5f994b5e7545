//! CSV import for the transaction ledger
//!
//! Parses a transaction export CSV into ledger records. Columns are located
//! by header name (case-insensitive): `date`, `merchant`, and `amount` are
//! required; `account` and `category` are optional. Amounts are signed,
//! negative = debit.
//!
//! Malformed rows are skipped and counted rather than failing the batch:
//! the caller reports the skip count to the user.

use std::io::Read;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::error::{Error, Result};
use crate::models::NewTransaction;

/// Outcome of parsing an import file
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub transactions: Vec<NewTransaction>,
    /// Rows rejected by validation (bad date/amount, future-dated)
    pub skipped: usize,
}

struct Columns {
    date: usize,
    merchant: usize,
    amount: usize,
    account: Option<usize>,
    category: Option<usize>,
}

fn locate_columns(headers: &StringRecord) -> Result<Columns> {
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };

    let date = find("date")
        .ok_or_else(|| Error::Validation("CSV is missing a 'date' column".into()))?;
    let merchant = find("merchant")
        .or_else(|| find("description"))
        .ok_or_else(|| Error::Validation("CSV is missing a 'merchant' column".into()))?;
    let amount = find("amount")
        .ok_or_else(|| Error::Validation("CSV is missing an 'amount' column".into()))?;

    Ok(Columns {
        date,
        merchant,
        amount,
        account: find("account").or_else(|| find("account name")),
        category: find("category"),
    })
}

/// Parse a transaction export CSV
///
/// `as_of` is the sync time; rows dated after it violate the ledger
/// invariant and are skipped.
pub fn parse_csv<R: Read>(reader: R, as_of: NaiveDate) -> Result<ImportResult> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let columns = locate_columns(&headers)?;

    let mut transactions = Vec::new();
    let mut skipped = 0usize;

    for (line, result) in rdr.records().enumerate() {
        let record = result?;

        let row = line + 2; // 1-based, after the header

        let Some(date_str) = record.get(columns.date) else {
            warn!(row, "skipping row with missing date");
            skipped += 1;
            continue;
        };
        let date = match parse_date(date_str) {
            Ok(d) => d,
            Err(e) => {
                warn!(row, error = %e, "skipping row with bad date");
                skipped += 1;
                continue;
            }
        };
        if date > as_of {
            warn!(row, %date, "skipping future-dated row");
            skipped += 1;
            continue;
        }

        let Some(amount_str) = record.get(columns.amount) else {
            warn!(row, "skipping row with missing amount");
            skipped += 1;
            continue;
        };
        let amount = match parse_amount(amount_str) {
            Ok(a) => a,
            Err(e) => {
                warn!(row, error = %e, "skipping row with bad amount");
                skipped += 1;
                continue;
            }
        };

        let merchant = record
            .get(columns.merchant)
            .unwrap_or_default()
            .trim()
            .to_string();
        if merchant.is_empty() {
            warn!(row, "skipping row with empty merchant");
            skipped += 1;
            continue;
        }

        let account_id = columns
            .account
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("default")
            .to_string();
        let category = columns
            .category
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);

        let import_hash = generate_hash(&date, &account_id, &merchant, amount);

        transactions.push(NewTransaction {
            account_id,
            date,
            merchant,
            amount,
            category,
            import_hash,
        });
    }

    Ok(ImportResult {
        transactions,
        skipped,
    })
}

/// Generate a unique hash for deduplication across repeated imports
fn generate_hash(date: &NaiveDate, account: &str, merchant: &str, amount: Decimal) -> String {
    let mut hasher = Sha256::new();
    hasher.update(date.to_string().as_bytes());
    hasher.update(account.as_bytes());
    hasher.update(merchant.as_bytes());
    hasher.update(amount.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    for fmt in ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(Error::Validation(format!("unparseable date: {}", s)))
}

fn parse_amount(s: &str) -> Result<Decimal> {
    let mut s = s.trim().replace(['$', ','], "");
    // Accounting style: (12.34) means -12.34
    let negated = s.starts_with('(') && s.ends_with(')');
    if negated {
        s = s[1..s.len() - 1].to_string();
    }
    let amount: Decimal = s
        .parse()
        .map_err(|_| Error::Validation(format!("unparseable amount: {}", s)))?;
    Ok(if negated { -amount } else { amount })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2024-03-05").unwrap(), date("2024-03-05"));
        assert_eq!(parse_date("03/05/2024").unwrap(), date("2024-03-05"));
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn test_parse_amount_formats() {
        assert_eq!(parse_amount("-15.49").unwrap(), dec!(-15.49));
        assert_eq!(parse_amount("$1,234.56").unwrap(), dec!(1234.56));
        assert_eq!(parse_amount("($12.34)").unwrap(), dec!(-12.34));
        assert!(parse_amount("n/a").is_err());
    }

    #[test]
    fn test_parse_csv() {
        let data = "\
date,account,merchant,amount,category
2024-01-05,checking,NETFLIX.COM*12345,-15.49,Entertainment
2024-01-07,checking,TRADER JOES #552,-83.12,Groceries
";
        let result = parse_csv(data.as_bytes(), date("2024-02-01")).unwrap();
        assert_eq!(result.transactions.len(), 2);
        assert_eq!(result.skipped, 0);

        let tx = &result.transactions[0];
        assert_eq!(tx.date, date("2024-01-05"));
        assert_eq!(tx.merchant, "NETFLIX.COM*12345");
        assert_eq!(tx.amount, dec!(-15.49));
        assert_eq!(tx.category.as_deref(), Some("Entertainment"));
        assert_eq!(tx.account_id, "checking");
        assert_eq!(tx.import_hash.len(), 64);
    }

    #[test]
    fn test_malformed_rows_skipped_not_fatal() {
        let data = "\
date,merchant,amount
2024-01-05,NETFLIX.COM,-15.49
not-a-date,SPOTIFY,-10.99
2024-01-09,HULU,not-a-number
2024-01-11,,-5.00
2024-01-12,VALID SHOP,-20.00
";
        let result = parse_csv(data.as_bytes(), date("2024-02-01")).unwrap();
        assert_eq!(result.transactions.len(), 2);
        assert_eq!(result.skipped, 3);
    }

    #[test]
    fn test_future_dated_rows_skipped() {
        let data = "\
date,merchant,amount
2024-01-05,NETFLIX.COM,-15.49
2024-06-01,NETFLIX.COM,-15.49
";
        let result = parse_csv(data.as_bytes(), date("2024-02-01")).unwrap();
        assert_eq!(result.transactions.len(), 1);
        assert_eq!(result.skipped, 1);
    }

    #[test]
    fn test_missing_required_column() {
        let data = "when,who,how much\n2024-01-05,X,-1\n";
        assert!(matches!(
            parse_csv(data.as_bytes(), date("2024-02-01")),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_hash_stable_and_distinct() {
        let h1 = generate_hash(&date("2024-01-05"), "checking", "NETFLIX", dec!(-15.49));
        let h2 = generate_hash(&date("2024-01-05"), "checking", "NETFLIX", dec!(-15.49));
        let h3 = generate_hash(&date("2024-01-06"), "checking", "NETFLIX", dec!(-15.49));
        assert_eq!(h1, h2);
        assert_ne!(h1, h3);
    }
}
