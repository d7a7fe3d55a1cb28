pub mod engine;
pub mod id_map;
pub mod jsonl;
pub mod pipeline;
pub mod projection;
pub mod transform;
pub mod writer;

pub use crate::domain::model::{ConversionSummary, ConvertTarget, FieldSpec, Record};
pub use crate::domain::ports::{ConfigProvider, DatasetConverter, DatasetLayout};
pub use crate::utils::error::Result;
