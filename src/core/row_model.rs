use crate::core::derive;
use crate::domain::model::{
    DateLocale, Derived, RecomputePolicy, Row, RowId, RowRecord, RowView, MAX_ROW_ID,
};
use crate::domain::ports::Clock;
use crate::utils::error::{DrrError, Result};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Ordered, add-only table of rows keyed by id.
///
/// Inputs are stored; month, day count and DRR are projected from them on read,
/// so they can never go stale. The only recompute side effect is the
/// `last_updated` stamp, applied after every mutation according to the
/// [`RecomputePolicy`].
pub struct RowModel {
    rows: BTreeMap<RowId, Row>,
    next_id: RowId,
    locale: DateLocale,
    policy: RecomputePolicy,
    clock: Arc<dyn Clock>,
}

impl RowModel {
    pub fn new(locale: DateLocale, policy: RecomputePolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
            locale,
            policy,
            clock,
        }
    }

    /// Rebuilds a table from a saved payload. Ids, inputs and stamps are kept as
    /// given; derived columns in the payload are ignored and re-derived on read.
    pub fn from_records(
        records: Vec<RowRecord>,
        locale: DateLocale,
        policy: RecomputePolicy,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let mut model = Self::new(locale, policy, clock);

        for record in records {
            if record.id > MAX_ROW_ID {
                return Err(DrrError::LoadError {
                    message: format!("row id {} is above {}", record.id, MAX_ROW_ID),
                });
            }
            if model.rows.contains_key(&record.id) {
                return Err(DrrError::LoadError {
                    message: format!("duplicate row id {}", record.id),
                });
            }

            let excluded_dates = record
                .dates_excluded
                .iter()
                .map(|text| {
                    locale.parse_date(text).ok_or_else(|| DrrError::LoadError {
                        message: format!(
                            "row {}: excluded date '{}' is not a {} date",
                            record.id, text, locale
                        ),
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            let last_updated = if record.last_updated.trim().is_empty() {
                None
            } else {
                Some(locale.parse_date(&record.last_updated).ok_or_else(|| {
                    DrrError::LoadError {
                        message: format!(
                            "row {}: last updated '{}' is not a {} date",
                            record.id, record.last_updated, locale
                        ),
                    }
                })?)
            };

            model.rows.insert(
                record.id,
                Row {
                    id: record.id,
                    start_date: record.start_date,
                    end_date: record.end_date,
                    excluded_dates,
                    lead_count: record.lead_count,
                    last_updated,
                },
            );
            model.next_id = model.next_id.max(record.id + 1);
        }

        tracing::debug!("Loaded {} rows, next id {}", model.rows.len(), model.next_id);
        Ok(model)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: RowId) -> Option<&Row> {
        self.rows.get(&id)
    }

    /// Rows in creation order.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.values()
    }

    pub fn add_row(&mut self) -> RowId {
        let id = self.next_id;
        self.next_id += 1;
        self.rows.insert(id, Row::new(id));
        tracing::debug!("Added row {}", id);
        self.recompute_after(id);
        id
    }

    pub fn set_start_date(&mut self, id: RowId, date: Option<NaiveDate>) -> Result<()> {
        self.row_mut(id)?.start_date = date;
        tracing::debug!("Row {}: start date set to {:?}", id, date);
        self.recompute_after(id);
        Ok(())
    }

    pub fn set_end_date(&mut self, id: RowId, date: Option<NaiveDate>) -> Result<()> {
        self.row_mut(id)?.end_date = date;
        tracing::debug!("Row {}: end date set to {:?}", id, date);
        self.recompute_after(id);
        Ok(())
    }

    /// Appends an excluded date. Duplicates and dates outside the span are accepted.
    pub fn exclude_date(&mut self, id: RowId, date: NaiveDate) -> Result<()> {
        self.row_mut(id)?.excluded_dates.push(date);
        tracing::debug!("Row {}: excluded {}", id, date);
        self.recompute_after(id);
        Ok(())
    }

    pub fn set_lead_count(&mut self, id: RowId, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        tracing::debug!("Row {}: lead count set to {:?}", id, text);
        self.row_mut(id)?.lead_count = text;
        self.recompute_after(id);
        Ok(())
    }

    pub fn derived(&self, id: RowId) -> Option<Derived> {
        self.get(id).map(|row| derive::recompute(row, self.locale))
    }

    pub fn views(&self) -> Vec<RowView<'_>> {
        self.rows().map(|row| self.project(row)).collect()
    }

    /// The save payload: every row with its derived columns filled in.
    pub fn to_records(&self) -> Vec<RowRecord> {
        self.views()
            .into_iter()
            .map(|view| RowRecord {
                action: String::new(),
                id: view.row.id,
                start_date: view.row.start_date,
                end_date: view.row.end_date,
                month: view.derived.month,
                dates_excluded: view
                    .row
                    .excluded_dates
                    .iter()
                    .map(|d| self.locale.format_date(*d))
                    .collect(),
                number_of_days: view.derived.day_count,
                lead_count: view.row.lead_count.clone(),
                expected_drr: view.derived.expected_drr,
                last_updated: view
                    .row
                    .last_updated
                    .map(|d| self.locale.format_date(d))
                    .unwrap_or_default(),
            })
            .collect()
    }

    fn project<'a>(&self, row: &'a Row) -> RowView<'a> {
        RowView {
            row,
            derived: derive::recompute(row, self.locale),
        }
    }

    fn row_mut(&mut self, id: RowId) -> Result<&mut Row> {
        self.rows.get_mut(&id).ok_or(DrrError::UnknownRow { id })
    }

    fn recompute_after(&mut self, id: RowId) {
        let today = self.clock.today();
        match self.policy {
            RecomputePolicy::WholeTable => {
                for row in self.rows.values_mut() {
                    row.last_updated = Some(today);
                }
            }
            RecomputePolicy::PerRow => {
                if let Some(row) = self.rows.get_mut(&id) {
                    row.last_updated = Some(today);
                }
            }
        }
    }
}
