use crate::app::script::EditScript;
use crate::core::row_model::RowModel;
use crate::domain::model::RowRecord;
use crate::domain::ports::{Clock, ConfigProvider, RowGateway, Storage};
use crate::utils::error::{DrrError, Result, SaveError};
use std::sync::Arc;

/// Where the table comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    /// TOML edit script replayed into an empty table.
    Script(String),
    /// JSON array previously produced by a save.
    Payload(String),
}

pub async fn load_model<S: Storage, C: ConfigProvider>(
    storage: &S,
    source: &TableSource,
    config: &C,
    clock: Arc<dyn Clock>,
) -> Result<RowModel> {
    match source {
        TableSource::Script(path) => {
            tracing::info!("Replaying edit script {}", path);
            let bytes = storage.read_file(path).await?;
            let text = String::from_utf8(bytes).map_err(|e| DrrError::LoadError {
                message: format!("{} is not UTF-8: {}", path, e),
            })?;
            let script = EditScript::from_toml_str(&text)?;

            let mut model = RowModel::new(config.locale(), config.recompute_policy(), clock);
            script.replay(&mut model)?;
            Ok(model)
        }
        TableSource::Payload(path) => {
            tracing::info!("Loading saved payload {}", path);
            let bytes = storage.read_file(path).await?;
            let records: Vec<RowRecord> = serde_json::from_slice(&bytes)?;
            RowModel::from_records(records, config.locale(), config.recompute_policy(), clock)
        }
    }
}

/// The in-memory table plus the gateway it is saved through.
pub struct Session<G: RowGateway> {
    model: RowModel,
    gateway: G,
}

impl<G: RowGateway> Session<G> {
    pub fn new(model: RowModel, gateway: G) -> Self {
        Self { model, gateway }
    }

    /// Sends the whole table once. The outcome is logged here; a failure is
    /// returned for the caller to inspect but is not retried.
    pub async fn save(&self) -> std::result::Result<usize, SaveError> {
        let records = self.model.to_records();

        match self.gateway.save(&records).await {
            Ok(()) => {
                tracing::info!("Data saved successfully! ({} rows)", records.len());
                Ok(records.len())
            }
            Err(e) => {
                tracing::error!("Error saving data: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::FixedClock;
    use crate::config::Settings;
    use crate::domain::model::{DateLocale, RecomputePolicy};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    struct MockStorage {
        files: HashMap<String, Vec<u8>>,
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            self.files.get(path).cloned().ok_or_else(|| {
                DrrError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, _path: &str, _data: &[u8]) -> Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingGateway {
        saved: Mutex<Vec<Vec<RowRecord>>>,
        reject: bool,
    }

    #[async_trait]
    impl RowGateway for RecordingGateway {
        async fn save(&self, rows: &[RowRecord]) -> std::result::Result<(), SaveError> {
            self.saved.lock().await.push(rows.to_vec());
            if self.reject {
                Err(SaveError::Status {
                    status: 503,
                    body: "busy".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock::new(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()))
    }

    fn model() -> RowModel {
        let mut model = RowModel::new(DateLocale::EnUs, RecomputePolicy::WholeTable, clock());
        let id = model.add_row();
        model.set_lead_count(id, "12").unwrap();
        model
    }

    #[tokio::test]
    async fn test_save_sends_full_table_once() {
        let session = Session::new(model(), RecordingGateway::default());
        let sent = session.save().await.unwrap();
        assert_eq!(sent, 1);

        let saved = session.gateway.saved.lock().await;
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0][0].lead_count, "12");
    }

    #[tokio::test]
    async fn test_failed_save_is_reported_not_retried() {
        let gateway = RecordingGateway {
            reject: true,
            ..Default::default()
        };
        let session = Session::new(model(), gateway);

        let err = session.save().await.unwrap_err();
        assert!(matches!(err, SaveError::Status { status: 503, .. }));
        assert_eq!(session.gateway.saved.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_load_model_from_script_and_payload() {
        let script = r#"
[[rows]]
start = "2024-01-01"
end = "2024-01-11"
exclude = ["2024-01-05"]
lead_count = "45"
"#;
        let mut files = HashMap::new();
        files.insert("rows.toml".to_string(), script.as_bytes().to_vec());
        let storage = MockStorage { files };
        let settings = Settings::default();

        let from_script = load_model(
            &storage,
            &TableSource::Script("rows.toml".to_string()),
            &settings,
            clock(),
        )
        .await
        .unwrap();
        assert_eq!(from_script.derived(1).unwrap().expected_drr, "5.00");

        let payload = serde_json::to_vec(&from_script.to_records()).unwrap();
        let mut files = HashMap::new();
        files.insert("rows.json".to_string(), payload);
        let storage = MockStorage { files };

        let from_payload = load_model(
            &storage,
            &TableSource::Payload("rows.json".to_string()),
            &settings,
            clock(),
        )
        .await
        .unwrap();
        assert_eq!(from_payload.to_records(), from_script.to_records());
    }

    #[tokio::test]
    async fn test_missing_source_file_is_io_error() {
        let storage = MockStorage {
            files: HashMap::new(),
        };
        let result = load_model(
            &storage,
            &TableSource::Payload("missing.json".to_string()),
            &Settings::default(),
            clock(),
        )
        .await;
        assert!(matches!(result, Err(DrrError::IoError(_))));
    }
}
