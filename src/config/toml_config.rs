use crate::app::datasets::YelpFiles;
use crate::domain::model::{ConvertTarget, TimeZoneMode};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ConvertError, Result};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub convert: ConvertConfig,
    pub files: Option<FilesConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    #[serde(default = "default_dataset_name")]
    pub name: String,
    pub input_path: String,
    #[serde(default = "default_output_path")]
    pub output_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    pub targets: Vec<ConvertTarget>,
    pub time_zone: TimeZoneMode,
    pub reuse_index: bool,
    pub show_progress: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            targets: ConvertTarget::ALL.to_vec(),
            time_zone: TimeZoneMode::Local,
            reuse_index: false,
            show_progress: true,
        }
    }
}

/// 覆寫原始輸入檔名
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilesConfig {
    pub inter: Option<String>,
    pub item: Option<String>,
    pub user: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_format: Option<LogFormat>,
}

fn default_dataset_name() -> String {
    "yelp".to_string()
}

fn default_output_path() -> String {
    "./output".to_string()
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ConvertError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ConvertError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${YELP_DATA_DIR})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConvertError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    /// 合併預設檔名與 `[files]` 覆寫
    pub fn yelp_files(&self) -> YelpFiles {
        let mut files = YelpFiles::default();
        if let Some(overrides) = &self.files {
            if let Some(inter) = &overrides.inter {
                files.inter = inter.clone();
            }
            if let Some(item) = &overrides.item {
                files.item = item.clone();
            }
            if let Some(user) = &overrides.user {
                files.user = user.clone();
            }
        }
        files
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_format(&self) -> LogFormat {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_format)
            .unwrap_or_default()
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.dataset.input_path
    }

    fn output_path(&self) -> &str {
        &self.dataset.output_path
    }

    fn dataset_name(&self) -> &str {
        &self.dataset.name
    }

    fn targets(&self) -> &[ConvertTarget] {
        &self.convert.targets
    }

    fn time_zone(&self) -> TimeZoneMode {
        self.convert.time_zone
    }

    fn reuse_index(&self) -> bool {
        self.convert.reuse_index
    }

    fn show_progress(&self) -> bool {
        self.convert.show_progress
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_existing_dir("dataset.input_path", &self.dataset.input_path)?;
        validation::validate_path("dataset.output_path", &self.dataset.output_path)?;
        validation::validate_dataset_name("dataset.name", &self.dataset.name)?;
        validation::validate_non_empty_list("convert.targets", &self.convert.targets)?;

        let files = self.yelp_files();
        for (field, name) in [
            ("files.inter", &files.inter),
            ("files.item", &files.item),
            ("files.user", &files.user),
        ] {
            validation::validate_non_empty_string(field, name)?;
        }

        Ok(())
    }
}
