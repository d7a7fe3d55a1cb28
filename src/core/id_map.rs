use crate::core::writer::TsvWriter;
use crate::utils::error::{ConvertError, Result};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// 原始字串識別碼到正整數的對應，依首次出現順序由 1 開始配發
#[derive(Debug, Clone)]
pub struct IdentifierMap {
    ids: HashMap<String, u64>,
    order: Vec<String>,
    next_id: u64,
}

impl Default for IdentifierMap {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentifierMap {
    pub fn new() -> Self {
        Self {
            ids: HashMap::new(),
            order: Vec::new(),
            next_id: 1,
        }
    }

    /// 已配發過的識別碼回傳原本的整數，否則配發下一個
    pub fn get_or_assign(&mut self, key: &str) -> u64 {
        if let Some(id) = self.ids.get(key) {
            return *id;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.ids.insert(key.to_string(), id);
        self.order.push(key.to_string());
        id
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        self.ids.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// 依插入順序列出
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.order
            .iter()
            .map(move |key| (key.as_str(), self.ids[key.as_str()]))
    }

    /// 寫出 `original_id\tinteger_id`，不含標頭
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let mut writer = TsvWriter::create(path)?;
        for (key, id) in self.iter() {
            writer.write_row([key.to_string(), id.to_string()])?;
        }
        let rows = writer.finish()?;
        tracing::debug!("💾 Wrote {} identifiers to {}", rows, path.display());
        Ok(())
    }

    /// 從先前寫出的對照檔載入；新識別碼從最大值加一繼續配發
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_path(path)?;

        let mut map = Self::new();
        let mut seen_ids = HashSet::new();
        for (idx, row) in reader.records().enumerate() {
            let row = row?;
            let line = idx + 1;
            if row.len() != 2 {
                return Err(ConvertError::InvalidValue {
                    field: format!("{}:{}", path.display(), line),
                    value: row.iter().collect::<Vec<_>>().join("\t"),
                    reason: "expected original_id and integer_id".to_string(),
                });
            }

            let key = &row[0];
            let id: u64 = row[1].parse().map_err(|e| ConvertError::InvalidValue {
                field: format!("{}:{}", path.display(), line),
                value: row[1].to_string(),
                reason: format!("invalid integer id: {}", e),
            })?;
            if id == 0 {
                return Err(ConvertError::InvalidValue {
                    field: format!("{}:{}", path.display(), line),
                    value: row[1].to_string(),
                    reason: "integer ids start at 1".to_string(),
                });
            }
            if map.ids.contains_key(key) {
                return Err(ConvertError::InvalidValue {
                    field: format!("{}:{}", path.display(), line),
                    value: key.to_string(),
                    reason: "duplicate identifier".to_string(),
                });
            }

            if !seen_ids.insert(id) {
                return Err(ConvertError::InvalidValue {
                    field: format!("{}:{}", path.display(), line),
                    value: row[1].to_string(),
                    reason: "duplicate integer id".to_string(),
                });
            }
            let next = id.checked_add(1).ok_or_else(|| ConvertError::InvalidValue {
                field: format!("{}:{}", path.display(), line),
                value: row[1].to_string(),
                reason: "integer id too large".to_string(),
            })?;

            map.ids.insert(key.to_string(), id);
            map.order.push(key.to_string());
            map.next_id = map.next_id.max(next);
        }

        Ok(map)
    }
}
