//! CSV import command

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use sift_core::{import, Database};

use super::{parse_date_arg, today};

pub fn cmd_import(db: &Database, file: &Path, as_of: Option<&str>) -> Result<()> {
    let as_of = match as_of {
        Some(s) => parse_date_arg(s)?,
        None => today(),
    };

    let reader = File::open(file)
        .with_context(|| format!("Cannot open import file: {}", file.display()))?;
    let result = import::parse_csv(reader, as_of)?;

    let outcome = db.insert_transactions(&result.transactions)?;

    println!(
        "✅ Imported {} transactions from {}",
        outcome.inserted,
        file.display()
    );
    if outcome.duplicates > 0 {
        println!("   {} duplicates skipped (already imported)", outcome.duplicates);
    }
    if result.skipped > 0 {
        println!(
            "   ⚠️  {} malformed or future-dated rows skipped (run with -v for details)",
            result.skipped
        );
    }
    println!("   Ledger now holds {} transactions", db.count_transactions()?);
    println!("   Next: sift detect");

    Ok(())
}
