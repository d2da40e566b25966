//! Parser for normalized rate sheets.
//!
//! The import collaborator exports each cleaned workbook as one
//! tab-separated file with a header row:
//!
//! `Company<TAB>State<TAB>RTO_Code<TAB>...<TAB>Final_Payout<TAB>Conditions<TAB>Rank`
//!
//! Tab separation is deliberate: predicate cells legitimately contain
//! commas ("TN,KL", "Except Bolero,Scorpio").
//!
//! Rust concepts you'll learn here:
//! - String parsing and splitting
//! - Error handling with `?` operator
//! - Converting between types (parsing strings to numbers and dates)
//! - Working with file I/O
//! - Data-parallel parsing with rayon

use crate::error::{RateStoreError, Result};
use crate::types::*;
use chrono::NaiveDate;
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Columns with a dedicated typed field on [`RateRow`].
/// Anything else in the header lands in the extras map.
const DEDICATED_COLUMNS: [&str; 21] = [
    "Company",
    "State",
    "RTO_Code",
    "Vehicle_Category",
    "Vehicle_Type",
    "Make",
    "Model",
    "Fuel_Type",
    "CC_Slab",
    "Watt_Slab",
    "Business_Type",
    "Policy_Type",
    "Vehicle_Age_Min",
    "Vehicle_Age_Max",
    "GVW_Min",
    "GVW_Max",
    "Date_from",
    "Date_till",
    "Final_Payout",
    "Conditions",
    "Rank",
];

/// Result of parsing one sheet.
///
/// A row that fails to parse is counted here, never surfaced as an
/// error: one corrupt row must not take the whole snapshot down, and a
/// rejected row can never produce a false-positive payout.
#[derive(Debug)]
pub struct ParsedSheet {
    pub rows: Vec<RateRow>,
    pub skipped: usize,
}

/// Parse a tab-separated rate sheet into rate rows.
///
/// Rows are numbered in file order; that order is the ranking tie-break,
/// so it is preserved even though lines are parsed in parallel.
pub fn parse_rates(path: &Path) -> Result<ParsedSheet> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            RateStoreError::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            RateStoreError::IoError(e)
        }
    })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let mut lines = content.lines();
    let header_line = lines.next().ok_or_else(|| {
        RateStoreError::ValidationError(format!("{file_name} is empty"))
    })?;
    let header = parse_header(header_line)?;

    // Parse data lines in parallel; collect preserves line order.
    let parsed: Vec<(usize, Result<Option<RateRow>>)> = lines
        .enumerate()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|(idx, line)| {
            // Header is line 1, so data starts at line 2
            let line_no = idx + 2;
            (line_no, parse_line(&file_name, &header, line, line_no))
        })
        .collect();

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for (line_no, result) in parsed {
        match result {
            Ok(Some(mut row)) => {
                row.row_id = rows.len() as RowId;
                rows.push(row);
            }
            Ok(None) => {} // blank line
            Err(e) => {
                warn!("Skipping row at {}:{}: {}", file_name, line_no, e);
                skipped += 1;
            }
        }
    }

    Ok(ParsedSheet { rows, skipped })
}

/// Map header column names to their cell positions
fn parse_header(line: &str) -> Result<HashMap<String, usize>> {
    let mut header = HashMap::new();
    for (idx, name) in line.split('\t').enumerate() {
        header.insert(name.trim().to_string(), idx);
    }
    for required in ["Company", "Final_Payout"] {
        if !header.contains_key(required) {
            return Err(RateStoreError::MissingColumn {
                name: required.to_string(),
            });
        }
    }
    Ok(header)
}

/// Parse one data line into a RateRow.
///
/// Returns `Ok(None)` for blank lines and `Err` for rows the loader
/// must reject (missing mandatory cells, unparsable numbers or dates).
fn parse_line(
    file: &str,
    header: &HashMap<String, usize>,
    line: &str,
    line_no: usize,
) -> Result<Option<RateRow>> {
    if line.trim().is_empty() {
        return Ok(None);
    }
    let cells: Vec<&str> = line.split('\t').collect();

    let cell = |name: &str| -> String {
        header
            .get(name)
            .and_then(|&i| cells.get(i))
            .map(|c| clean_cell(c))
            .unwrap_or_default()
    };

    let company = cell("Company");
    if company.is_empty() {
        return Err(RateStoreError::ParseError {
            file: file.to_string(),
            line: line_no,
            reason: "Missing Company".to_string(),
        });
    }

    let payout_cell = cell("Final_Payout");
    if payout_cell.is_empty() {
        return Err(RateStoreError::ParseError {
            file: file.to_string(),
            line: line_no,
            reason: "Missing Final_Payout".to_string(),
        });
    }
    let payout = parse_payout(&payout_cell).ok_or_else(|| RateStoreError::InvalidValue {
        field: "Final_Payout".to_string(),
        value: payout_cell.clone(),
    })?;

    // Extras: every header column without a dedicated field
    let mut extras = BTreeMap::new();
    for (name, &idx) in header {
        if DEDICATED_COLUMNS.contains(&name.as_str()) {
            continue;
        }
        if let Some(value) = cells.get(idx) {
            let cleaned = clean_cell(value);
            if !cleaned.is_empty() {
                extras.insert(name.clone(), cleaned);
            }
        }
    }

    let row = RateRow {
        row_id: 0, // assigned by the caller once the row is accepted
        company,
        state: cell("State"),
        vehicle_category: cell("Vehicle_Category"),
        vehicle_type: cell("Vehicle_Type"),
        make: cell("Make"),
        model: cell("Model"),
        fuel_type: cell("Fuel_Type"),
        cc_slab: cell("CC_Slab"),
        watt_slab: cell("Watt_Slab"),
        business_type: cell("Business_Type"),
        policy_type: cell("Policy_Type"),
        rto: parse_rto_rule(&cell("RTO_Code")),
        age_min: parse_int_cell(&cell("Vehicle_Age_Min"), "Vehicle_Age_Min")?,
        age_max: parse_int_cell(&cell("Vehicle_Age_Max"), "Vehicle_Age_Max")?,
        gvw_min: parse_float_cell(&cell("GVW_Min"), "GVW_Min")?,
        gvw_max: parse_float_cell(&cell("GVW_Max"), "GVW_Max")?,
        date_from: parse_date_cell(&cell("Date_from"), "Date_from")?,
        date_till: parse_date_cell(&cell("Date_till"), "Date_till")?,
        payout,
        condition: cell("Conditions"),
        rank_override: parse_int_cell(&cell("Rank"), "Rank")?,
        extras,
    };

    Ok(Some(row))
}

/// Normalize a raw cell: trim and collapse the importer's null spellings
/// ("nan", "null", "none") to an empty string
fn clean_cell(raw: &str) -> String {
    let t = raw.trim();
    if t.is_empty() || matches!(t.to_lowercase().as_str(), "nan" | "null" | "none") {
        String::new()
    } else {
        t.to_string()
    }
}

/// Parse a payout cell, scaling fraction-style values.
///
/// Some source workbooks carry 0.3381 where others carry 33.81; anything
/// in (0, 1) is treated as a fraction and scaled to a percentage.
fn parse_payout(cell: &str) -> Option<f64> {
    let n: f64 = cell.parse().ok()?;
    if n <= 0.0 {
        return None;
    }
    Some(if n < 1.0 { n * 100.0 } else { n })
}

fn parse_int_cell(cell: &str, field: &str) -> Result<Option<u32>> {
    if cell.is_empty() {
        return Ok(None);
    }
    // Importers sometimes deliver integers as "5.0"
    let n: f64 = cell.parse().map_err(|_| RateStoreError::InvalidValue {
        field: field.to_string(),
        value: cell.to_string(),
    })?;
    if n < 0.0 {
        return Err(RateStoreError::InvalidValue {
            field: field.to_string(),
            value: cell.to_string(),
        });
    }
    Ok(Some(n.round() as u32))
}

fn parse_float_cell(cell: &str, field: &str) -> Result<Option<f64>> {
    if cell.is_empty() {
        return Ok(None);
    }
    let n: f64 = cell.parse().map_err(|_| RateStoreError::InvalidValue {
        field: field.to_string(),
        value: cell.to_string(),
    })?;
    Ok(Some(n))
}

/// Parse a date cell, accepting plain ISO dates and the importer's
/// timestamp form ("2026-01-15T00:00:00")
fn parse_date_cell(cell: &str, field: &str) -> Result<Option<NaiveDate>> {
    if cell.is_empty() {
        return Ok(None);
    }
    let date_part = if cell.len() > 10 { &cell[..10] } else { cell };
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| RateStoreError::InvalidValue {
            field: field.to_string(),
            value: cell.to_string(),
        })
}

/// Decompose an RTO_Code cell into its rule form
///
/// Example: ""              -> applies to all
///          "Except 01,02"  -> applies to all but 01 and 02
///          "TN-01, 02"     -> applies to 01 and 02 only
pub fn parse_rto_rule(cell: &str) -> RtoRule {
    let t = cell.trim();
    if t.is_empty() || t.eq_ignore_ascii_case("all") {
        return RtoRule::applies_to_all();
    }
    let low = t.to_lowercase();
    if let Some(rest) = low
        .starts_with("except ")
        .then(|| &t[7..])
        .or_else(|| low.starts_with("declined ").then(|| &t[9..]))
    {
        return RtoRule {
            applies_all: true,
            included: Vec::new(),
            excluded: split_rto_tokens(rest),
        };
    }
    RtoRule {
        applies_all: false,
        included: split_rto_tokens(t),
        excluded: Vec::new(),
    }
}

/// Split a comma list of RTO codes, normalizing and deduplicating
fn split_rto_tokens(cell: &str) -> Vec<String> {
    let mut out = Vec::new();
    for token in cell.split(',') {
        if let Some(code) = normalize_rto_token(token) {
            if !out.contains(&code) {
                out.push(code);
            }
        }
    }
    out
}

/// Normalize one raw RTO token to its canonical dropdown code
///
/// Example: "TN-01" -> Some("01")
///          "7"     -> Some("07")
///          "15m"   -> Some("15M")
pub fn normalize_rto_token(token: &str) -> Option<String> {
    let mut t = token.trim().to_uppercase();
    if t.is_empty() {
        return None;
    }
    // Remove an optional state prefix: "TN-01", "TN 01", "AP-31"
    if let Some(pos) = t.find(['-', ' ']) {
        if t[..pos].chars().all(|c| c.is_ascii_alphabetic()) && pos <= 3 {
            t = t[pos + 1..].trim().to_string();
        }
    }
    t.retain(|c| !c.is_whitespace());
    if t.is_empty() {
        return None;
    }
    if t.chars().all(|c| c.is_ascii_digit()) {
        return Some(format!("{:02}", t.parse::<u32>().ok()?));
    }
    if t.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Some(t);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_rto_token() {
        assert_eq!(normalize_rto_token("TN-01"), Some("01".to_string()));
        assert_eq!(normalize_rto_token("7"), Some("07".to_string()));
        assert_eq!(normalize_rto_token("15m"), Some("15M".to_string()));
        assert_eq!(normalize_rto_token("  "), None);
    }

    #[test]
    fn test_parse_rto_rule() {
        assert!(parse_rto_rule("").is_unrestricted());
        assert!(parse_rto_rule("All").is_unrestricted());

        let except = parse_rto_rule("Except 01,02");
        assert!(except.applies_all);
        assert_eq!(except.excluded, vec!["01", "02"]);

        let include = parse_rto_rule("TN-01, 02, 03");
        assert!(!include.applies_all);
        assert_eq!(include.included, vec!["01", "02", "03"]);
    }

    #[test]
    fn test_parse_payout_scales_fractions() {
        assert_eq!(parse_payout("0.3381"), Some(33.81));
        assert_eq!(parse_payout("55"), Some(55.0));
        assert_eq!(parse_payout("0"), None);
        assert_eq!(parse_payout("abc"), None);
    }

    #[test]
    fn test_parse_date_cell() {
        assert_eq!(
            parse_date_cell("2024-01-01", "Date_from").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        assert_eq!(
            parse_date_cell("2026-01-15T00:00:00", "Date_till").unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 15)
        );
        assert!(parse_date_cell("15/01/2026", "Date_from").is_err());
        assert_eq!(parse_date_cell("", "Date_from").unwrap(), None);
    }

    #[test]
    fn test_clean_cell() {
        assert_eq!(clean_cell("  TN  "), "TN");
        assert_eq!(clean_cell("nan"), "");
        assert_eq!(clean_cell("NULL"), "");
    }

    #[test]
    fn test_parse_rates_file_skips_bad_rows() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "Company\tState\tVehicle_Age_Min\tFinal_Payout\tConditions\tSeating_Capacity"
        )
        .unwrap();
        writeln!(file, "Shriram\tTN\t1\t40\t\t").unwrap();
        writeln!(file, "Royal Sundaram\tTN,KL\t\t0.425\tWith NCB\t4+1").unwrap();
        // Unparsable age: the row is skipped, not fatal
        writeln!(file, "Zuno\tTN\tnot-a-number\t50\t\t").unwrap();
        // Missing payout: skipped too
        writeln!(file, "Acko\tTN\t2\t\t\t").unwrap();

        let parsed = parse_rates(file.path()).unwrap();
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.skipped, 2);

        let first = &parsed.rows[0];
        assert_eq!(first.row_id, 0);
        assert_eq!(first.company, "Shriram");
        assert_eq!(first.age_min, Some(1));
        assert_eq!(first.payout, 40.0);

        // Fraction payouts are scaled; unknown columns land in extras
        let second = &parsed.rows[1];
        assert_eq!(second.row_id, 1);
        assert_eq!(second.payout, 42.5);
        assert_eq!(second.condition, "With NCB");
        assert_eq!(second.attr("Seating_Capacity"), Some("4+1"));
    }

    #[test]
    fn test_parse_rates_rejects_missing_header_column() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Company\tState").unwrap();
        writeln!(file, "Shriram\tTN").unwrap();

        assert!(matches!(
            parse_rates(file.path()),
            Err(RateStoreError::MissingColumn { .. })
        ));
    }
}
