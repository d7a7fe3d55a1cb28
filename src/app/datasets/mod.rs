pub mod yelp;

use crate::domain::model::TimeZoneMode;
use crate::domain::ports::ConfigProvider;

pub use yelp::{YelpDataset, YelpFiles};

/// 各資料集共用的轉換選項
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    pub time_zone: TimeZoneMode,
    pub reuse_index: bool,
    pub show_progress: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            time_zone: TimeZoneMode::Local,
            reuse_index: false,
            show_progress: true,
        }
    }
}

impl ConvertOptions {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            time_zone: config.time_zone(),
            reuse_index: config.reuse_index(),
            show_progress: config.show_progress(),
        }
    }
}
