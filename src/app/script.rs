use crate::core::row_model::RowModel;
use crate::domain::model::RowId;
use crate::utils::error::Result;
use chrono::NaiveDate;
use serde::Deserialize;

/// A recorded editing session, replayed through the row model operations.
///
/// ```toml
/// [[rows]]
/// start = "2024-01-01"
/// end = "2024-01-11"
/// exclude = ["2024-01-05"]
/// lead_count = "45"
/// ```
///
/// Dates are quoted ISO-8601 strings. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditScript {
    #[serde(default)]
    pub rows: Vec<ScriptRow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScriptRow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    #[serde(default)]
    pub exclude: Vec<NaiveDate>,
    pub lead_count: Option<String>,
}

impl EditScript {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Adds one row per entry, then applies start, end, each exclusion and the
    /// lead count in that order. Returns the ids of the new rows.
    pub fn replay(&self, model: &mut RowModel) -> Result<Vec<RowId>> {
        let mut ids = Vec::with_capacity(self.rows.len());

        for entry in &self.rows {
            let id = model.add_row();
            if let Some(start) = entry.start {
                model.set_start_date(id, Some(start))?;
            }
            if let Some(end) = entry.end {
                model.set_end_date(id, Some(end))?;
            }
            for date in &entry.exclude {
                model.exclude_date(id, *date)?;
            }
            if let Some(lead_count) = &entry.lead_count {
                model.set_lead_count(id, lead_count.clone())?;
            }
            ids.push(id);
        }

        tracing::debug!("Replayed {} script rows", ids.len());
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::FixedClock;
    use crate::domain::model::{DateLocale, RecomputePolicy};
    use crate::utils::error::DrrError;
    use std::sync::Arc;

    fn model() -> RowModel {
        RowModel::new(
            DateLocale::EnUs,
            RecomputePolicy::WholeTable,
            Arc::new(FixedClock::new(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap())),
        )
    }

    #[test]
    fn test_replay_builds_rows_in_order() {
        let script = EditScript::from_toml_str(
            r#"
[[rows]]
start = "2024-01-01"
end = "2024-01-11"
exclude = ["2024-01-05", "2024-01-05"]
lead_count = "45"

[[rows]]
lead_count = "abc"

[[rows]]
"#,
        )
        .unwrap();

        let mut m = model();
        let ids = script.replay(&mut m).unwrap();
        assert_eq!(ids, vec![1, 2, 3]);

        let first = m.derived(1).unwrap();
        assert_eq!(first.day_count, 9);
        assert_eq!(first.expected_drr, "5.00");
        assert_eq!(m.get(2).unwrap().lead_count, "abc");
        assert_eq!(m.derived(3).unwrap().month, "");
    }

    #[test]
    fn test_bad_date_is_a_script_error() {
        let result = EditScript::from_toml_str(
            r#"
[[rows]]
start = "January first"
"#,
        );
        assert!(matches!(result, Err(DrrError::ScriptError(_))));
    }
}
