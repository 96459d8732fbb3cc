//! Conversions between [`Program`] and the worksheet's positional rows.
//!
//! Column order is a public contract of the backing table, not an
//! implementation detail: existing spreadsheets were written with exactly
//! this layout, and the header row must stay in lockstep with
//! [`program_to_row`]. Changing the order here requires migrating every
//! sheet.

use gradtrack_core::Program;
use serde_json::Value;

/// The authoritative column order, used when a worksheet is created from
/// scratch. Legacy sheets may lack the last-added columns ("Currency",
/// "Is Favorite"); the store patches those in on read.
pub const HEADERS: [&str; 24] = [
  "School Name",
  "Program Title",
  "URL",
  "Location",
  "Contact Email",
  "Fit Score",
  "Calculated Rank",
  "Pros",
  "Cons",
  "Curriculum Focus",
  "Application Deadline",
  "Tuition Cost",
  "Currency",
  "Application Fee",
  "Funding/Scholarships",
  "Duration",
  "GRE/GMAT Required",
  "Letters of Rec Qty",
  "English Test",
  "SOP/Essay Done",
  "Status",
  "Portal Login",
  "Decision Date",
  "Is Favorite",
];

/// The anchor column "Currency" is inserted after on legacy sheets.
pub const TUITION_COST_HEADER: &str = "Tuition Cost";
pub const CURRENCY_HEADER: &str = "Currency";
pub const FAVORITE_HEADER: &str = "Is Favorite";

/// A program as a fixed-order row, one cell per [`HEADERS`] entry.
pub fn program_to_row(program: &Program) -> Vec<String> {
  vec![
    program.school_name.clone(),
    program.program_title.clone(),
    program.url.clone(),
    program.location.clone(),
    program.contact_email.clone(),
    program.fit_score.to_string(),
    program.calculated_rank.map(format_number).unwrap_or_default(),
    program.pros.clone(),
    program.cons.clone(),
    program.curriculum_focus.clone(),
    program.application_deadline.clone(),
    format_number(program.tuition_cost),
    program.currency.clone(),
    format_number(program.application_fee),
    program.funding_scholarships.clone(),
    program.duration.clone(),
    program.gre_gmat_required.clone(),
    program.letters_of_rec_qty.to_string(),
    program.english_test.clone(),
    format_bool(program.sop_essay_done),
    program.status.clone(),
    program.portal_login.clone(),
    program.decision_date.clone().unwrap_or_default(),
    format_bool(program.is_favorite),
  ]
}

/// The deadline as the ranking function wants it: `None` when the cell is
/// empty.
pub fn deadline_of(program: &Program) -> Option<&str> {
  (!program.application_deadline.is_empty())
    .then_some(program.application_deadline.as_str())
}

/// Whole numbers without a trailing `.0`, matching what the sheet displays.
fn format_number(n: f64) -> String {
  if n.fract() == 0.0 && n.abs() < 1e15 {
    format!("{}", n as i64)
  } else {
    n.to_string()
  }
}

fn format_bool(b: bool) -> String {
  if b { "TRUE".to_string() } else { "FALSE".to_string() }
}

/// A cell as it appears in a listing record: numeric-looking cells become
/// numbers, TRUE/FALSE become booleans, everything else stays a string.
pub fn cell_to_value(cell: &str) -> Value {
  if cell.is_empty() {
    return Value::String(String::new());
  }
  if let Ok(n) = cell.parse::<i64>() {
    return Value::from(n);
  }
  if let Ok(f) = cell.parse::<f64>()
    && f.is_finite()
  {
    return Value::from(f);
  }
  match cell {
    "TRUE" => Value::Bool(true),
    "FALSE" => Value::Bool(false),
    other => Value::String(other.to_string()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::tests::sample_program;

  #[test]
  fn row_stays_in_lockstep_with_headers() {
    let program = sample_program();
    assert_eq!(program_to_row(&program).len(), HEADERS.len());
  }

  #[test]
  fn booleans_and_numbers_are_sheet_shaped() {
    let row = program_to_row(&sample_program());
    assert_eq!(row[5], "8"); // fit score
    assert_eq!(row[11], "42000"); // tuition, no trailing .0
    assert_eq!(row[19], "TRUE"); // sop done
    assert_eq!(row[23], "FALSE"); // favorite
  }

  #[test]
  fn cells_coerce_to_typed_json() {
    assert_eq!(cell_to_value("3"), Value::from(3));
    assert_eq!(cell_to_value("86.4"), Value::from(86.4));
    assert_eq!(cell_to_value("TRUE"), Value::Bool(true));
    assert_eq!(cell_to_value("2026-01-15"), Value::from("2026-01-15"));
    assert_eq!(cell_to_value(""), Value::from(""));
  }
}
