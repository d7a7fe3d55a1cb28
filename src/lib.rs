pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::toml_config::TomlConfig;

pub use app::datasets::{ConvertOptions, YelpDataset, YelpFiles};
pub use crate::core::{engine::ConversionEngine, id_map::IdentifierMap, projection::Projection};
pub use domain::model::{ConversionSummary, ConvertTarget, ItemTable, TimeZoneMode};
pub use domain::ports::{ConfigProvider, DatasetConverter, DatasetLayout};
pub use utils::error::{ConvertError, Result};
