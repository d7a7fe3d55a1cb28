pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::model::{ConvertTarget, TimeZoneMode};
#[cfg(feature = "cli")]
use crate::domain::ports::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "rec-convert")]
#[command(about = "Convert the Yelp dataset into tab-separated atomic files")]
pub struct CliConfig {
    /// Directory holding the raw JSON Lines files
    #[arg(long)]
    pub input_path: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value = "yelp")]
    pub dataset_name: String,

    #[arg(long, value_enum, value_delimiter = ',', default_values_t = ConvertTarget::ALL)]
    pub targets: Vec<ConvertTarget>,

    /// How `YYYY-MM-DD HH:MM:SS` dates are interpreted
    #[arg(long, value_enum, default_value_t = TimeZoneMode::Local)]
    pub time_zone: TimeZoneMode,

    /// Seed identifier maps from existing user2index / item2index files
    #[arg(long)]
    pub reuse_index: bool,

    #[arg(long, help = "Disable the progress bar")]
    pub no_progress: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log process CPU and memory after each stage")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input_path
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn dataset_name(&self) -> &str {
        &self.dataset_name
    }

    fn targets(&self) -> &[ConvertTarget] {
        &self.targets
    }

    fn time_zone(&self) -> TimeZoneMode {
        self.time_zone
    }

    fn reuse_index(&self) -> bool {
        self.reuse_index
    }

    fn show_progress(&self) -> bool {
        !self.no_progress
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_existing_dir("input_path", &self.input_path)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_dataset_name("dataset_name", &self.dataset_name)?;
        validation::validate_non_empty_list("targets", &self.targets)?;
        Ok(())
    }
}
