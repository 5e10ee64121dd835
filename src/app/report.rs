use crate::domain::model::RowRecord;
use crate::utils::error::{DrrError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Tsv,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
        };
        f.write_str(name)
    }
}

pub fn render(records: &[RowRecord], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Csv => render_delimited(records, b','),
        OutputFormat::Tsv => render_delimited(records, b'\t'),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
    }
}

fn render_delimited(records: &[RowRecord], delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(RowRecord::COLUMNS)?;
    for record in records {
        writer.write_record(table_cells(record))?;
    }

    let data = writer
        .into_inner()
        .map_err(|e| DrrError::IoError(e.into_error()))?;
    String::from_utf8(data)
        .map_err(|e| DrrError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Cell text as the table shows it.
fn table_cells(record: &RowRecord) -> [String; 10] {
    let date_cell = |d: Option<chrono::NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();
    [
        record.action.clone(),
        record.id.to_string(),
        date_cell(record.start_date),
        date_cell(record.end_date),
        record.month.clone(),
        record.dates_excluded.join(", "),
        record.number_of_days.to_string(),
        record.lead_count.clone(),
        record.expected_drr.clone(),
        record.last_updated.clone(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> RowRecord {
        RowRecord {
            action: String::new(),
            id: 1,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 11),
            month: "January 2024".to_string(),
            dates_excluded: vec!["1/5/2024".to_string(), "1/6/2024".to_string()],
            number_of_days: 8,
            lead_count: "40".to_string(),
            expected_drr: "5.00".to_string(),
            last_updated: "2/1/2024".to_string(),
        }
    }

    #[test]
    fn test_csv_has_header_and_quoted_exclusions() {
        let out = render(&[sample()], OutputFormat::Csv).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "Action,ID,StartDate,EndDate,Month,Dates Excluded,Number of Days,Lead Count,Expected DRR,Last Updated"
        );
        assert_eq!(
            lines[1],
            ",1,2024-01-01,2024-01-11,January 2024,\"1/5/2024, 1/6/2024\",8,40,5.00,2/1/2024"
        );
    }

    #[test]
    fn test_tsv_uses_tabs() {
        let out = render(&[sample()], OutputFormat::Tsv).unwrap();
        let header = out.lines().next().unwrap();
        assert_eq!(header.split('\t').count(), 10);
    }

    #[test]
    fn test_empty_table_renders_header_only() {
        let out = render(&[], OutputFormat::Csv).unwrap();
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn test_json_is_the_save_payload() {
        let out = render(&[sample()], OutputFormat::Json).unwrap();
        let parsed: Vec<RowRecord> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, vec![sample()]);
    }
}
