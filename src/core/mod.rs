pub mod derive;
pub mod row_model;

pub use crate::domain::model::{DateLocale, Derived, RecomputePolicy, Row, RowId, RowRecord, RowView};
pub use crate::domain::ports::{Clock, ConfigProvider, RowGateway, Storage};
pub use crate::utils::error::Result;
