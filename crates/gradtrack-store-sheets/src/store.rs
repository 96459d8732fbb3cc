//! [`SheetsStore`] — the worksheet implementation of [`ProgramStore`].

use gradtrack_core::{
  Program, ProgramKey, calculate_rank,
  store::{ProgramStore, Record},
};

use crate::{
  Result,
  client::SheetsApi,
  encode::{
    CURRENCY_HEADER, FAVORITE_HEADER, TUITION_COST_HEADER, cell_to_value,
    deadline_of, program_to_row,
  },
};

/// A program store backed by one worksheet.
///
/// Every operation re-fetches fresh state — there is no in-process cache of
/// table contents, and the sheet offers no locking, so concurrent writers
/// race (last write wins).
pub struct SheetsStore<C> {
  client: C,
}

impl<C: SheetsApi> SheetsStore<C> {
  pub fn new(client: C) -> Self {
    Self { client }
  }

  /// 1-based row index of the first row whose first two columns match
  /// `key`, or `None`. The header row never matches.
  async fn find_row(&self, key: &ProgramKey) -> Result<Option<usize>> {
    let values = self.client.get_all_values().await?;
    for (i, row) in values.iter().enumerate().skip(1) {
      if row.len() >= 2
        && row[0] == key.school_name
        && row[1] == key.program_title
      {
        return Ok(Some(i + 1));
      }
    }
    Ok(None)
  }

  /// Bring the header row of an older sheet up to the current layout:
  /// append "Is Favorite" if absent, and slot "Currency" in right after
  /// "Tuition Cost" (or append it when that anchor is gone too). Returns
  /// whether anything was written; once patched, subsequent calls are
  /// no-ops.
  async fn heal_header(&self, headers: &[String]) -> Result<bool> {
    let mut headers = headers.to_vec();
    let mut patched = false;

    if !headers.iter().any(|h| h == FAVORITE_HEADER) {
      tracing::info!("header missing {FAVORITE_HEADER:?} column, appending");
      self
        .client
        .update_cell(1, headers.len() + 1, FAVORITE_HEADER.to_string())
        .await?;
      headers.push(FAVORITE_HEADER.to_string());
      patched = true;
    }

    if !headers.iter().any(|h| h == CURRENCY_HEADER) {
      tracing::info!("header missing {CURRENCY_HEADER:?} column, inserting");
      match headers.iter().position(|h| h == TUITION_COST_HEADER) {
        Some(idx) => {
          // idx is 0-based; the new column goes immediately after, so its
          // 1-based index is idx + 2.
          self
            .client
            .insert_column(idx + 2, CURRENCY_HEADER.to_string())
            .await?;
        }
        None => {
          self
            .client
            .update_cell(1, headers.len() + 1, CURRENCY_HEADER.to_string())
            .await?;
        }
      }
      patched = true;
    }

    Ok(patched)
  }

  fn with_rank(mut program: Program) -> Program {
    program.calculated_rank = Some(calculate_rank(
      program.fit_score,
      program.tuition_cost,
      deadline_of(&program),
    ));
    program
  }
}

impl<C: SheetsApi> ProgramStore for SheetsStore<C> {
  type Error = crate::Error;

  async fn list(&self) -> Result<Vec<Record>> {
    let mut values = self.client.get_all_values().await?;
    let Some(headers) = values.first() else {
      return Ok(Vec::new());
    };

    // Self-heal older sheets before reading; a patch shifts columns, so
    // re-fetch afterwards.
    if self.heal_header(headers).await? {
      values = self.client.get_all_values().await?;
    }

    let headers = values.first().cloned().unwrap_or_default();
    let records = values
      .get(1..)
      .unwrap_or_default()
      .iter()
      .map(|row| {
        headers
          .iter()
          .enumerate()
          .map(|(i, header)| {
            let cell = row.get(i).map(String::as_str).unwrap_or("");
            (header.clone(), cell_to_value(cell))
          })
          .collect::<Record>()
      })
      .collect();
    Ok(records)
  }

  async fn create(&self, program: Program) -> Result<Program> {
    let program = Self::with_rank(program);
    self.client.append_row(program_to_row(&program)).await?;
    Ok(program)
  }

  async fn update(
    &self,
    key: ProgramKey,
    program: Program,
  ) -> Result<Option<Program>> {
    let Some(row_idx) = self.find_row(&key).await? else {
      tracing::debug!(
        school = %key.school_name,
        title = %key.program_title,
        "update target not found",
      );
      return Ok(None);
    };

    let program = Self::with_rank(program);
    self
      .client
      .update_row(row_idx, program_to_row(&program))
      .await?;
    Ok(Some(program))
  }

  async fn delete(&self, key: ProgramKey) -> Result<bool> {
    let Some(row_idx) = self.find_row(&key).await? else {
      return Ok(false);
    };
    self.client.delete_row(row_idx).await?;
    Ok(true)
  }
}
