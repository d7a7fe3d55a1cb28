use crate::utils::error::{ConvertError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// 一行 JSON 解析出的記錄，只在處理該行期間存在
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    pub data: Map<String, Value>,
}

impl Record {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// 取出必要欄位，缺少時回報檔名與行號
    pub fn require(&self, key: &str, file: &str, line: usize) -> Result<&Value> {
        self.data.get(key).ok_or_else(|| ConvertError::MissingField {
            file: file.to_string(),
            field: key.to_string(),
            line,
        })
    }

    pub fn insert(&mut self, key: &str, value: Value) {
        self.data.insert(key.to_string(), value);
    }
}

impl From<Map<String, Value>> for Record {
    fn from(data: Map<String, Value>) -> Self {
        Self { data }
    }
}

/// Atomic file 欄位的語意型別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Token,
    TokenSeq,
    Float,
    FloatSeq,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Token => "token",
            FieldType::TokenSeq => "token_seq",
            FieldType::Float => "float",
            FieldType::FloatSeq => "float_seq",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "token" => Ok(FieldType::Token),
            "token_seq" => Ok(FieldType::TokenSeq),
            "float" => Ok(FieldType::Float),
            "float_seq" => Ok(FieldType::FloatSeq),
            other => Err(ConvertError::FieldSpecError {
                spec: other.to_string(),
                reason: "unknown field type".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub index: usize,
    pub name: String,
    pub field_type: FieldType,
}

impl FieldDef {
    /// 解析 `name:type` 形式的欄位定義
    pub fn parse(index: usize, spec: &str) -> Result<Self> {
        let (name, field_type) = spec.split_once(':').ok_or_else(|| ConvertError::FieldSpecError {
            spec: spec.to_string(),
            reason: "expected name:type".to_string(),
        })?;

        if name.is_empty() {
            return Err(ConvertError::FieldSpecError {
                spec: spec.to_string(),
                reason: "field name is empty".to_string(),
            });
        }

        let field_type = field_type.parse().map_err(|_| ConvertError::FieldSpecError {
            spec: spec.to_string(),
            reason: format!("unknown field type '{}'", field_type),
        })?;

        Ok(Self {
            index,
            name: name.to_string(),
            field_type,
        })
    }

    pub fn header(&self) -> String {
        format!("{}:{}", self.name, self.field_type)
    }
}

/// 欄位索引到 `name:type` 的有序對應；索引可以不連續，缺號代表略過的來源欄位
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    fields: Vec<FieldDef>,
}

impl FieldSpec {
    pub fn new(entries: &[(usize, &str)]) -> Result<Self> {
        let mut fields = entries
            .iter()
            .map(|(index, spec)| FieldDef::parse(*index, spec))
            .collect::<Result<Vec<_>>>()?;
        fields.sort_by_key(|f| f.index);

        if let Some(pair) = fields.windows(2).find(|w| w[0].index == w[1].index) {
            return Err(ConvertError::FieldSpecError {
                spec: pair[1].header(),
                reason: format!("duplicate column index {}", pair[1].index),
            });
        }

        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn headers(&self) -> Vec<String> {
        self.fields.iter().map(FieldDef::header).collect()
    }
}

/// 轉換輸出目標
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ConvertTarget {
    Inter,
    User,
    Item,
}

impl ConvertTarget {
    pub const ALL: [ConvertTarget; 3] = [ConvertTarget::Inter, ConvertTarget::User, ConvertTarget::Item];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConvertTarget::Inter => "inter",
            ConvertTarget::User => "user",
            ConvertTarget::Item => "item",
        }
    }
}

impl fmt::Display for ConvertTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConvertTarget {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "inter" => Ok(ConvertTarget::Inter),
            "user" => Ok(ConvertTarget::User),
            "item" => Ok(ConvertTarget::Item),
            other => Err(ConvertError::InvalidConfigValueError {
                field: "targets".to_string(),
                value: other.to_string(),
                reason: "expected one of inter, user, item".to_string(),
            }),
        }
    }
}

/// 日期字串的時區解讀方式；`Local` 依主機時區，結果會隨機器而異
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum TimeZoneMode {
    #[default]
    Local,
    Utc,
}

impl fmt::Display for TimeZoneMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeZoneMode::Local => f.write_str("local"),
            TimeZoneMode::Utc => f.write_str("utc"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSummary {
    pub target: ConvertTarget,
    pub output_file: PathBuf,
    pub rows_written: usize,
}

/// 商家檔載入後的記憶體表格，欄位為所有記錄鍵的聯集（依首次出現順序）
#[derive(Debug, Clone, Default)]
pub struct ItemTable {
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
}

impl ItemTable {
    pub fn push(&mut self, record: Record) {
        for key in record.data.keys() {
            if !self.columns.iter().any(|c| c == key) {
                self.columns.push(key.clone());
            }
        }
        self.rows.push(record);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        self.rows.get(row)?.get(column)
    }

    pub fn column<'a>(&'a self, column: &'a str) -> impl Iterator<Item = Option<&'a Value>> + 'a {
        self.rows.iter().map(move |r| r.get(column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_spec_sorted_with_gaps() {
        let spec = FieldSpec::new(&[(8, "date:float"), (0, "review_id:token"), (3, "stars:float")]).unwrap();
        let indices: Vec<usize> = spec.fields().iter().map(|f| f.index).collect();
        assert_eq!(indices, vec![0, 3, 8]);
        assert_eq!(spec.names().collect::<Vec<_>>(), vec!["review_id", "stars", "date"]);
        assert_eq!(spec.headers(), vec!["review_id:token", "stars:float", "date:float"]);
    }

    #[test]
    fn test_field_spec_rejects_bad_entries() {
        assert!(FieldSpec::new(&[(0, "review_id")]).is_err());
        assert!(FieldSpec::new(&[(0, "review_id:string")]).is_err());
        assert!(FieldSpec::new(&[(0, ":token")]).is_err());
        assert!(FieldSpec::new(&[(0, "a:token"), (0, "b:float")]).is_err());
    }

    #[test]
    fn test_field_type_round_trip() {
        for ty in [FieldType::Token, FieldType::TokenSeq, FieldType::Float, FieldType::FloatSeq] {
            assert_eq!(ty.as_str().parse::<FieldType>().unwrap(), ty);
        }
    }

    #[test]
    fn test_convert_target_parse() {
        assert_eq!("inter".parse::<ConvertTarget>().unwrap(), ConvertTarget::Inter);
        assert_eq!(" item ".parse::<ConvertTarget>().unwrap(), ConvertTarget::Item);
        assert!("business".parse::<ConvertTarget>().is_err());
    }

    #[test]
    fn test_record_require_reports_location() {
        let record: Record = serde_json::from_value(json!({"user_id": "u1"})).unwrap();
        assert_eq!(record.require("user_id", "user.json", 1).unwrap(), &json!("u1"));

        let err = record.require("name", "user.json", 7).unwrap_err();
        assert!(matches!(err, ConvertError::MissingField { line: 7, .. }));
    }

    #[test]
    fn test_item_table_column_union() {
        let mut table = ItemTable::default();
        table.push(serde_json::from_value(json!({"business_id": "b1", "stars": 4.5})).unwrap());
        table.push(serde_json::from_value(json!({"business_id": "b2", "categories": "Food"})).unwrap());

        assert_eq!(table.columns, vec!["business_id", "stars", "categories"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1, "categories"), Some(&json!("Food")));
        assert!(table.get(0, "categories").is_none());
        assert_eq!(table.column("stars").filter(Option::is_some).count(), 1);
    }
}
