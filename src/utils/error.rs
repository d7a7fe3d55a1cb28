use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Malformed JSON at {file}:{line}: {source}")]
    JsonParse {
        file: String,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid date for '{field}' at line {line}: '{value}' ({source})")]
    DateFormat {
        field: String,
        value: String,
        line: usize,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Missing field '{field}' at {file}:{line}")]
    MissingField {
        file: String,
        field: String,
        line: usize,
    },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid field spec '{spec}': {reason}")]
    FieldSpecError { spec: String, reason: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid configuration value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ConvertError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ConvertError::JsonParse { .. }
            | ConvertError::DateFormat { .. }
            | ConvertError::MissingField { .. } => ErrorCategory::Input,
            ConvertError::InvalidValue { .. } => ErrorCategory::Data,
            ConvertError::FieldSpecError { .. }
            | ConvertError::ConfigError { .. }
            | ConvertError::ConfigValidationError { .. }
            | ConvertError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ConvertError::IoError(_) | ConvertError::CsvError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ConvertError::JsonParse { file, line, .. } => format!(
                "檢查 {} 第 {} 行是否為完整的 JSON 物件；輸出檔可能已被截斷，請刪除後重新轉換",
                file, line
            ),
            ConvertError::DateFormat { field, .. } => format!(
                "欄位 '{}' 必須符合 YYYY-MM-DD HH:MM:SS 格式",
                field
            ),
            ConvertError::MissingField { field, .. } => format!(
                "輸入記錄缺少 '{}'，請確認資料集版本與欄位設定一致",
                field
            ),
            ConvertError::InvalidValue { field, .. } => {
                format!("檢查輸入資料中 '{}' 欄位的型別", field)
            }
            ConvertError::FieldSpecError { .. } => {
                "欄位定義必須為 name:type，type 為 token、token_seq、float 或 float_seq".to_string()
            }
            ConvertError::ConfigError { .. }
            | ConvertError::ConfigValidationError { .. }
            | ConvertError::InvalidConfigValueError { .. } => {
                "檢查命令列參數或 TOML 設定檔".to_string()
            }
            ConvertError::IoError(_) | ConvertError::CsvError(_) => {
                "確認輸入檔案存在且輸出目錄可寫入".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("輸入資料格式錯誤: {}", self),
            ErrorCategory::Data => format!("資料內容錯誤: {}", self),
            ErrorCategory::Configuration => format!("設定錯誤: {}", self),
            ErrorCategory::System => format!("系統錯誤: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
