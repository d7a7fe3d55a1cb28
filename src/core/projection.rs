use crate::core::transform::cell_value;
use crate::domain::model::{FieldSpec, Record};
use crate::utils::error::{ConvertError, Result};

/// 來源欄位定義（取值用）與標頭欄位定義（輸出用）的配對
///
/// 兩者必須有相同的索引與型別，只允許名稱不同。
#[derive(Debug, Clone)]
pub struct Projection {
    source: FieldSpec,
    header: FieldSpec,
}

impl Projection {
    pub fn new(spec: FieldSpec) -> Self {
        Self {
            header: spec.clone(),
            source: spec,
        }
    }

    pub fn renamed(source: FieldSpec, header: FieldSpec) -> Result<Self> {
        if source.len() != header.len() {
            return Err(ConvertError::ConfigError {
                message: format!(
                    "source spec has {} columns but header spec has {}",
                    source.len(),
                    header.len()
                ),
            });
        }

        for (src, head) in source.fields().iter().zip(header.fields()) {
            if src.index != head.index || src.field_type != head.field_type {
                return Err(ConvertError::ConfigError {
                    message: format!(
                        "column {} ({}) does not line up with header column {} ({})",
                        src.index,
                        src.header(),
                        head.index,
                        head.header()
                    ),
                });
            }
        }

        Ok(Self { source, header })
    }

    pub fn source(&self) -> &FieldSpec {
        &self.source
    }

    pub fn header(&self) -> &FieldSpec {
        &self.header
    }

    pub fn header_row(&self) -> Vec<String> {
        self.header.headers()
    }

    pub fn width(&self) -> usize {
        self.source.len()
    }

    /// 依來源欄位取值並轉成字串；缺少任何欄位即失敗
    pub fn project(&self, record: &Record, file: &str, line: usize) -> Result<Vec<String>> {
        self.source
            .names()
            .map(|key| record.require(key, file, line).map(cell_value))
            .collect()
    }
}
