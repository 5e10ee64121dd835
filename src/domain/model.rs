use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type RowId = u64;

/// Largest id accepted from a payload: 2^53 - 1, the biggest integer a JSON
/// number holds exactly in a JavaScript consumer. Keeps the id counter far from
/// `u64` overflow.
pub const MAX_ROW_ID: RowId = (1 << 53) - 1;

/// Locale used for the normalized date strings (excluded dates, last-updated stamp).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum DateLocale {
    /// `1/5/2024`
    #[default]
    EnUs,
    /// `05/01/2024`
    EnGb,
    /// `2024-01-05`
    Iso,
}

impl DateLocale {
    fn display_format(self) -> &'static str {
        match self {
            DateLocale::EnUs => "%-m/%-d/%Y",
            DateLocale::EnGb => "%d/%m/%Y",
            DateLocale::Iso => "%Y-%m-%d",
        }
    }

    fn parse_format(self) -> &'static str {
        match self {
            DateLocale::EnUs => "%m/%d/%Y",
            DateLocale::EnGb => "%d/%m/%Y",
            DateLocale::Iso => "%Y-%m-%d",
        }
    }

    pub fn format_date(self, date: NaiveDate) -> String {
        date.format(self.display_format()).to_string()
    }

    pub fn parse_date(self, text: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(text.trim(), self.parse_format()).ok()
    }
}

/// Which rows get a fresh `last_updated` stamp after a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum RecomputePolicy {
    #[default]
    WholeTable,
    PerRow,
}

/// User-entered inputs of one tracked date range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: RowId,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Kept in insertion order, duplicates included; counting dedupes.
    pub excluded_dates: Vec<NaiveDate>,
    pub lead_count: String,
    pub last_updated: Option<NaiveDate>,
}

impl Row {
    pub fn new(id: RowId) -> Self {
        Self {
            id,
            start_date: None,
            end_date: None,
            excluded_dates: Vec::new(),
            lead_count: String::new(),
            last_updated: None,
        }
    }
}

/// Values computed from a row's inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Derived {
    pub month: String,
    pub day_count: i64,
    pub expected_drr: String,
}

/// A row together with its derived fields, as shown in the table.
#[derive(Debug, Clone, PartialEq)]
pub struct RowView<'a> {
    pub row: &'a Row,
    pub derived: Derived,
}

/// Save payload entry. Keys match the table column headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowRecord {
    #[serde(rename = "Action", default)]
    pub action: String,
    #[serde(rename = "ID")]
    pub id: RowId,
    #[serde(rename = "StartDate")]
    pub start_date: Option<NaiveDate>,
    #[serde(rename = "EndDate")]
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "Month", default)]
    pub month: String,
    #[serde(rename = "Dates Excluded", default)]
    pub dates_excluded: Vec<String>,
    #[serde(rename = "Number of Days", default)]
    pub number_of_days: i64,
    #[serde(rename = "Lead Count", default)]
    pub lead_count: String,
    #[serde(rename = "Expected DRR", default)]
    pub expected_drr: String,
    #[serde(rename = "Last Updated", default)]
    pub last_updated: String,
}

impl RowRecord {
    /// Column headers in wire order.
    pub const COLUMNS: [&'static str; 10] = [
        "Action",
        "ID",
        "StartDate",
        "EndDate",
        "Month",
        "Dates Excluded",
        "Number of Days",
        "Lead Count",
        "Expected DRR",
        "Last Updated",
    ];
}

impl fmt::Display for DateLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DateLocale::EnUs => "en-us",
            DateLocale::EnGb => "en-gb",
            DateLocale::Iso => "iso",
        };
        f.write_str(name)
    }
}
