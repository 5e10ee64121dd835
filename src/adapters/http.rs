use crate::domain::model::RowRecord;
use crate::domain::ports::{ConfigProvider, RowGateway};
use crate::utils::error::{Result, SaveError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:3001/your-api-endpoint";

/// Posts the whole table as one JSON array.
pub struct HttpGateway {
    endpoint: String,
    client: Client,
}

impl HttpGateway {
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(SaveError::Transport)?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.endpoint(), config.timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RowGateway for HttpGateway {
    async fn save(&self, rows: &[RowRecord]) -> std::result::Result<(), SaveError> {
        tracing::debug!("POST {} rows to {}", rows.len(), self.endpoint);

        // .json() sets Content-Type: application/json
        let response = self.client.post(&self.endpoint).json(rows).send().await?;
        let status = response.status();
        tracing::debug!("Save response status: {}", status);

        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(SaveError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}
