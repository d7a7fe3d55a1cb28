use crate::domain::model::{ConversionSummary, ConvertTarget, ItemTable, TimeZoneMode};
use crate::utils::error::Result;
use std::path::PathBuf;

pub trait ConfigProvider {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn dataset_name(&self) -> &str;
    fn targets(&self) -> &[ConvertTarget];
    fn time_zone(&self) -> TimeZoneMode;
    fn reuse_index(&self) -> bool;
    fn show_progress(&self) -> bool;
}

/// 資料集路徑：輸入目錄、輸出目錄與資料集名稱
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLayout {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub dataset_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFiles {
    pub inter: PathBuf,
    pub item: PathBuf,
    pub user: PathBuf,
}

impl DatasetLayout {
    pub fn new(
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        dataset_name: impl Into<String>,
    ) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            dataset_name: dataset_name.into(),
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self::new(config.input_path(), config.output_path(), config.dataset_name())
    }

    pub fn input_file(&self, file_name: &str) -> PathBuf {
        self.input_path.join(file_name)
    }

    /// `<output>/<dataset>.inter`、`.item`、`.user`
    pub fn get_output_files(&self) -> OutputFiles {
        let file = |suffix: &str| {
            self.output_path
                .join(format!("{}.{}", self.dataset_name, suffix))
        };
        OutputFiles {
            inter: file("inter"),
            item: file("item"),
            user: file("user"),
        }
    }

    pub fn user2index_file(&self) -> PathBuf {
        self.output_path
            .join(format!("{}user2index", self.dataset_name))
    }

    pub fn item2index_file(&self) -> PathBuf {
        self.output_path
            .join(format!("{}item2index", self.dataset_name))
    }
}

/// 單一資料集的轉換器介面
pub trait DatasetConverter {
    fn dataset_name(&self) -> &str;
    fn layout(&self) -> &DatasetLayout;
    fn convert_inter(&self) -> Result<ConversionSummary>;
    fn convert_user(&self) -> Result<ConversionSummary>;
    fn convert_item(&self) -> Result<ConversionSummary>;
    fn load_item_data(&self) -> Result<ItemTable>;

    fn convert(&self, target: ConvertTarget) -> Result<ConversionSummary> {
        match target {
            ConvertTarget::Inter => self.convert_inter(),
            ConvertTarget::User => self.convert_user(),
            ConvertTarget::Item => self.convert_item(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_output_files_follow_dataset_name() {
        let layout = DatasetLayout::new("/data/raw", "/data/out", "yelp");
        let files = layout.get_output_files();

        assert_eq!(files.inter, Path::new("/data/out/yelp.inter"));
        assert_eq!(files.item, Path::new("/data/out/yelp.item"));
        assert_eq!(files.user, Path::new("/data/out/yelp.user"));
        assert_eq!(layout.user2index_file(), Path::new("/data/out/yelpuser2index"));
        assert_eq!(layout.item2index_file(), Path::new("/data/out/yelpitem2index"));
        assert_eq!(
            layout.input_file("review.json"),
            Path::new("/data/raw/review.json")
        );
    }
}
