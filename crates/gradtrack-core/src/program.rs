//! `Program` — a graduate-program application entry.
//!
//! The backing sheet has no primary-key column; the pair
//! `(school_name, program_title)` is the de facto unique key. If duplicates
//! exist, the first match wins.

use serde::{Deserialize, Serialize};

/// One tracked application. Field names are the JSON contract with clients
/// and the positional row contract with the sheet (see the store crates).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
  // Identity
  pub school_name:   String,
  pub program_title: String,
  pub url:           String,
  pub location:      String,
  pub contact_email: String,

  // Fit & ranking
  /// Subjective fit, 1–10.
  pub fit_score:        u8,
  /// Derived by [`crate::rank`]; any client-supplied value is overwritten
  /// on create and update.
  #[serde(default)]
  pub calculated_rank:  Option<f64>,
  pub pros:             String,
  pub cons:             String,
  pub curriculum_focus: String,

  // Logistics & cost
  /// `YYYY-MM-DD`, or empty when no deadline is known.
  pub application_deadline: String,
  pub tuition_cost:         f64,
  pub currency:             String,
  pub application_fee:      f64,
  pub funding_scholarships: String,
  pub duration:             String,

  // Requirements checklist
  /// Yes / No / Optional.
  pub gre_gmat_required:  String,
  pub letters_of_rec_qty: u32,
  pub english_test:       String,
  pub sop_essay_done:     bool,

  // Status
  pub status:        String,
  pub portal_login:  String,
  pub decision_date: Option<String>,
  #[serde(default)]
  pub is_favorite:   bool,
}

/// The composite key a record is located by on update and delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramKey {
  pub school_name:   String,
  pub program_title: String,
}
