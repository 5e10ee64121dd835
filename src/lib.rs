pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{
    clock::{FixedClock, SystemClock},
    http::HttpGateway,
    storage::LocalStorage,
};
pub use app::{
    report::OutputFormat,
    script::EditScript,
    session::{load_model, Session, TableSource},
};
pub use config::{toml_config::TomlConfig, Settings};
pub use core::row_model::RowModel;
pub use domain::model::{DateLocale, RecomputePolicy, RowId, RowRecord};
pub use utils::error::{DrrError, Result, SaveError};
