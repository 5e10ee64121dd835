use crate::domain::model::{DateLocale, RecomputePolicy, RowRecord};
use crate::utils::error::{Result, SaveError};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn timeout(&self) -> Option<Duration>;
    fn locale(&self) -> DateLocale;
    fn recompute_policy(&self) -> RecomputePolicy;
}

/// Source of "today" for the last-updated stamp.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Remote sink for the whole table.
#[async_trait]
pub trait RowGateway: Send + Sync {
    async fn save(&self, rows: &[RowRecord]) -> std::result::Result<(), SaveError>;
}
