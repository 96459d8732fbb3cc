//! The ranking formula.
//!
//! `100 · (0.6·fit + 0.3·cost + 0.1·temporal)`, rounded to two decimals.
//! The constants and rounding are load-bearing: stored ranks must stay
//! comparable with scores computed by earlier deployments, so do not touch
//! them without re-ranking every sheet.

use chrono::{Local, NaiveDate};

/// Tuition at or above this ceiling contributes zero to the cost term.
const COST_CEILING: f64 = 100_000.0;

/// Days out at which the deadline urgency decays to zero.
const URGENCY_HORIZON_DAYS: i64 = 180;

/// Rank with `today` fixed, for deterministic callers and tests.
///
/// `deadline` is a `YYYY-MM-DD` string. A missing deadline contributes 0.0
/// to the temporal term; an unparseable one contributes 0.5 — the parse
/// failure is swallowed, never surfaced.
pub fn rank_at(
  fit_score: u8,
  tuition_cost: f64,
  deadline: Option<&str>,
  today: NaiveDate,
) -> f64 {
  let fit_norm = f64::from(fit_score) / 10.0;

  // Lower cost is better. The cost is compared as a raw number regardless
  // of the currency field.
  let cost_norm = ((COST_CEILING - tuition_cost) / COST_CEILING).max(0.0);

  let temporal_factor = match deadline {
    None => 0.0,
    Some(s) => match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
      Err(_) => 0.5,
      Ok(date) => {
        let days_left = (date - today).num_days();
        if days_left <= 0 {
          // Due today, or already passed: maximally urgent.
          1.0
        } else {
          ((URGENCY_HORIZON_DAYS - days_left) as f64
            / URGENCY_HORIZON_DAYS as f64)
            .max(0.0)
        }
      }
    },
  };

  let score =
    (fit_norm * 0.6 + cost_norm * 0.3 + temporal_factor * 0.1) * 100.0;
  (score * 100.0).round() / 100.0
}

/// Rank against the current local date.
pub fn calculate_rank(
  fit_score: u8,
  tuition_cost: f64,
  deadline: Option<&str>,
) -> f64 {
  rank_at(fit_score, tuition_cost, deadline, Local::now().date_naive())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
  }

  #[test]
  fn best_fit_free_tuition_no_deadline() {
    // fit 1.0, cost 1.0, temporal 0.0
    assert_eq!(rank_at(10, 0.0, None, today()), 90.0);
  }

  #[test]
  fn worst_fit_at_cost_ceiling() {
    // fit 0.1, cost 0.0, temporal 0.0
    assert_eq!(rank_at(1, 100_000.0, None, today()), 6.0);
  }

  #[test]
  fn tuition_above_ceiling_clamps_to_zero() {
    assert_eq!(
      rank_at(10, 250_000.0, None, today()),
      rank_at(10, 100_000.0, None, today()),
    );
  }

  #[test]
  fn deadline_today_is_maximally_urgent() {
    // temporal 1.0 on top of fit 1.0, cost 1.0
    assert_eq!(rank_at(10, 0.0, Some("2025-06-01"), today()), 100.0);
  }

  #[test]
  fn passed_deadline_is_maximally_urgent() {
    assert_eq!(
      rank_at(10, 0.0, Some("2024-01-01"), today()),
      rank_at(10, 0.0, Some("2025-06-01"), today()),
    );
  }

  #[test]
  fn deadline_ninety_days_out_decays_linearly() {
    // temporal = (180 - 90) / 180 = 0.5
    assert_eq!(rank_at(10, 0.0, Some("2025-08-30"), today()), 95.0);
  }

  #[test]
  fn deadline_beyond_horizon_contributes_nothing() {
    assert_eq!(
      rank_at(10, 0.0, Some("2026-06-01"), today()),
      rank_at(10, 0.0, None, today()),
    );
  }

  #[test]
  fn malformed_deadline_falls_back_to_half_urgency() {
    // temporal 0.5, not an error
    assert_eq!(rank_at(10, 0.0, Some("next spring"), today()), 95.0);
  }

  #[test]
  fn score_stays_within_bounds() {
    let deadlines =
      [None, Some("2025-06-01"), Some("2099-01-01"), Some("garbage")];
    for fit in 1..=10 {
      for cost in [0.0, 42_500.0, 100_000.0, 1_000_000.0] {
        for deadline in deadlines {
          let score = rank_at(fit, cost, deadline, today());
          assert!((0.0..=100.0).contains(&score), "rank {score} out of range");
        }
      }
    }
  }

  #[test]
  fn rounds_to_two_decimals() {
    // fit 7 → 0.42, cost (100000-63000)/100000 = 0.37 → 0.111
    let score = rank_at(7, 63_000.0, None, today());
    assert_eq!(score, 53.1);
    assert_eq!((score * 100.0).round() / 100.0, score);
  }
}
