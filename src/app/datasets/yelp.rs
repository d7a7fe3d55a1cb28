use crate::app::datasets::ConvertOptions;
use crate::core::id_map::IdentifierMap;
use crate::core::jsonl::JsonLinesReader;
use crate::core::pipeline::convert_file;
use crate::core::projection::Projection;
use crate::core::transform::{identifier_key, parse_timestamp, Behavior};
use crate::domain::model::{
    ConversionSummary, ConvertTarget, FieldSpec, ItemTable, Record, TimeZoneMode,
};
use crate::domain::ports::{ConfigProvider, DatasetConverter, DatasetLayout, OutputFiles};
use crate::utils::error::{ConvertError, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::{Path, PathBuf};

pub const DATASET_NAME: &str = "yelp";

const INTER_FIELDS: &[(usize, &str)] = &[
    (0, "review_id:token"),
    (1, "user_id:token"),
    (2, "business_id:token"),
    (3, "stars:float"),
    (4, "useful:float"),
    (5, "funny:float"),
    (6, "cool:float"),
    (8, "date:float"),
];

// 來源鍵；index 11 不輸出
const ITEM_SOURCE_FIELDS: &[(usize, &str)] = &[
    (0, "business_id:token"),
    (1, "name:token_seq"),
    (2, "address:token_seq"),
    (3, "city:token_seq"),
    (4, "state:token"),
    (5, "postal_code:token"),
    (6, "latitude:float"),
    (7, "longitude:float"),
    (8, "stars:float"),
    (9, "review_count:float"),
    (10, "is_open:float"),
    (12, "categories:token_seq"),
];

const ITEM_FIELDS: &[(usize, &str)] = &[
    (0, "business_id:token"),
    (1, "item_name:token_seq"),
    (2, "address:token_seq"),
    (3, "city:token_seq"),
    (4, "state:token"),
    (5, "postal_code:token"),
    (6, "latitude:float"),
    (7, "longitude:float"),
    (8, "item_stars:float"),
    (9, "item_review_count:float"),
    (10, "is_open:float"),
    (12, "categories:token_seq"),
];

// 來源鍵；index 8 不輸出
const USER_FIELDS: &[(usize, &str)] = &[
    (0, "user_id:token"),
    (1, "name:token"),
    (2, "review_count:float"),
    (3, "yelping_since:float"),
    (4, "useful:float"),
    (5, "funny:float"),
    (6, "cool:float"),
    (7, "elite:token"),
    (9, "fans:float"),
    (10, "average_stars:float"),
    (11, "compliment_hot:float"),
    (12, "compliment_more:float"),
    (13, "compliment_profile:float"),
    (14, "compliment_cute:float"),
    (15, "compliment_list:float"),
    (16, "compliment_note:float"),
    (17, "compliment_plain:float"),
    (18, "compliment_cool:float"),
    (19, "compliment_funny:float"),
    (20, "compliment_writer:float"),
    (21, "compliment_photos:float"),
];

// 標頭使用較易辨識的名稱，欄位順序與 USER_FIELDS 相同
const USER_HEAD_FIELDS: &[(usize, &str)] = &[
    (0, "user_id:token"),
    (1, "user_name:token"),
    (2, "user_review_count:float"),
    (3, "yelping_since:float"),
    (4, "user_useful:float"),
    (5, "user_funny:float"),
    (6, "user_cool:float"),
    (7, "elite:token"),
    (9, "fans:float"),
    (10, "average_stars:float"),
    (11, "compliment_hot:float"),
    (12, "compliment_more:float"),
    (13, "compliment_profile:float"),
    (14, "compliment_cute:float"),
    (15, "compliment_list:float"),
    (16, "compliment_note:float"),
    (17, "compliment_plain:float"),
    (18, "compliment_cool:float"),
    (19, "compliment_funny:float"),
    (20, "compliment_writer:float"),
    (21, "compliment_photos:float"),
];

/// Yelp 原始檔名，可由設定檔覆寫
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YelpFiles {
    pub inter: String,
    pub item: String,
    pub user: String,
}

impl Default for YelpFiles {
    fn default() -> Self {
        Self {
            inter: "yelp_academic_dataset_review.json".to_string(),
            item: "yelp_academic_dataset_business.json".to_string(),
            user: "yelp_academic_dataset_user.json".to_string(),
        }
    }
}

/// Yelp academic dataset 轉換器
pub struct YelpDataset {
    layout: DatasetLayout,
    options: ConvertOptions,
    inter_file: PathBuf,
    item_file: PathBuf,
    user_file: PathBuf,
    output_files: OutputFiles,
    user2index_file: PathBuf,
    item2index_file: PathBuf,
    inter_projection: Projection,
    item_projection: Projection,
    user_projection: Projection,
}

impl YelpDataset {
    pub fn new(layout: DatasetLayout, options: ConvertOptions) -> Result<Self> {
        Self::with_files(layout, options, YelpFiles::default())
    }

    pub fn with_files(layout: DatasetLayout, options: ConvertOptions, files: YelpFiles) -> Result<Self> {
        let inter_projection = Projection::new(FieldSpec::new(INTER_FIELDS)?);
        let item_projection = Projection::renamed(
            FieldSpec::new(ITEM_SOURCE_FIELDS)?,
            FieldSpec::new(ITEM_FIELDS)?,
        )?;
        let user_projection = Projection::renamed(
            FieldSpec::new(USER_FIELDS)?,
            FieldSpec::new(USER_HEAD_FIELDS)?,
        )?;

        Ok(Self {
            inter_file: layout.input_file(&files.inter),
            item_file: layout.input_file(&files.item),
            user_file: layout.input_file(&files.user),
            output_files: layout.get_output_files(),
            user2index_file: layout.user2index_file(),
            item2index_file: layout.item2index_file(),
            inter_projection,
            item_projection,
            user_projection,
            layout,
            options,
        })
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Self::new(DatasetLayout::from_config(config), ConvertOptions::from_config(config))
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    pub fn output_files(&self) -> &OutputFiles {
        &self.output_files
    }

    pub fn input_file(&self, target: ConvertTarget) -> &Path {
        match target {
            ConvertTarget::Inter => &self.inter_file,
            ConvertTarget::Item => &self.item_file,
            ConvertTarget::User => &self.user_file,
        }
    }

    pub fn projection(&self, target: ConvertTarget) -> &Projection {
        match target {
            ConvertTarget::Inter => &self.inter_projection,
            ConvertTarget::Item => &self.item_projection,
            ConvertTarget::User => &self.user_projection,
        }
    }

    pub fn user2index_file(&self) -> &Path {
        &self.user2index_file
    }

    pub fn item2index_file(&self) -> &Path {
        &self.item2index_file
    }

    fn initial_map(&self, path: &Path) -> Result<IdentifierMap> {
        if !self.options.reuse_index {
            return Ok(IdentifierMap::new());
        }

        if path.exists() {
            let map = IdentifierMap::load_from(path)?;
            tracing::info!("♻️ Reusing {} identifiers from {}", map.len(), path.display());
            Ok(map)
        } else {
            tracing::warn!("⚠️ {} not found, starting a fresh index", path.display());
            Ok(IdentifierMap::new())
        }
    }
}

fn convert_timestamp(
    record: &mut Record,
    field: &str,
    time_zone: TimeZoneMode,
    file: &str,
    line: usize,
) -> Result<()> {
    let value = record.require(field, file, line)?;
    let text = value.as_str().ok_or_else(|| ConvertError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: format!("expected a date string at {}:{}", file, line),
    })?;
    let epoch = parse_timestamp(text, time_zone).map_err(|source| ConvertError::DateFormat {
        field: field.to_string(),
        value: text.to_string(),
        line,
        source,
    })?;

    record.insert(field, json!(epoch));
    Ok(())
}

fn bucket_stars(record: &mut Record, file: &str, line: usize) -> Result<()> {
    let value = record.require("stars", file, line)?;
    let stars = value.as_f64().ok_or_else(|| ConvertError::InvalidValue {
        field: "stars".to_string(),
        value: value.to_string(),
        reason: format!("expected a number at {}:{}", file, line),
    })?;

    record.insert("stars", json!(Behavior::from_stars(stars).code()));
    Ok(())
}

fn map_identifier(
    record: &mut Record,
    field: &str,
    map: &mut IdentifierMap,
    file: &str,
    line: usize,
) -> Result<()> {
    let key = identifier_key(record.require(field, file, line)?);
    // 對照檔以 tab 分隔，含分隔字元的識別碼無法原樣寫回
    if key.contains(['\t', '\n', '\r']) {
        return Err(ConvertError::InvalidValue {
            field: field.to_string(),
            value: key,
            reason: format!("identifier contains a tab or line break at {}:{}", file, line),
        });
    }
    let id = map.get_or_assign(&key);
    record.insert(field, json!(id));
    Ok(())
}

impl DatasetConverter for YelpDataset {
    fn dataset_name(&self) -> &str {
        &self.layout.dataset_name
    }

    fn layout(&self) -> &DatasetLayout {
        &self.layout
    }

    fn convert_inter(&self) -> Result<ConversionSummary> {
        let time_zone = self.options.time_zone;
        let mut user_map = self.initial_map(&self.user2index_file)?;
        let mut item_map = self.initial_map(&self.item2index_file)?;

        let rows = convert_file(
            &self.inter_file,
            &self.output_files.inter,
            &self.inter_projection,
            self.options.show_progress,
            |record, line, file| {
                convert_timestamp(record, "date", time_zone, file, line)?;
                bucket_stars(record, file, line)?;
                map_identifier(record, "user_id", &mut user_map, file, line)?;
                map_identifier(record, "business_id", &mut item_map, file, line)?;
                Ok(())
            },
        )?;

        user_map.write_to(&self.user2index_file)?;
        item_map.write_to(&self.item2index_file)?;
        tracing::info!(
            "🗂️ Indexed {} users and {} items",
            user_map.len(),
            item_map.len()
        );

        Ok(ConversionSummary {
            target: ConvertTarget::Inter,
            output_file: self.output_files.inter.clone(),
            rows_written: rows,
        })
    }

    fn convert_user(&self) -> Result<ConversionSummary> {
        let time_zone = self.options.time_zone;
        let rows = convert_file(
            &self.user_file,
            &self.output_files.user,
            &self.user_projection,
            self.options.show_progress,
            |record, line, file| convert_timestamp(record, "yelping_since", time_zone, file, line),
        )?;

        Ok(ConversionSummary {
            target: ConvertTarget::User,
            output_file: self.output_files.user.clone(),
            rows_written: rows,
        })
    }

    fn convert_item(&self) -> Result<ConversionSummary> {
        let rows = convert_file(
            &self.item_file,
            &self.output_files.item,
            &self.item_projection,
            self.options.show_progress,
            |_, _, _| Ok(()),
        )?;

        Ok(ConversionSummary {
            target: ConvertTarget::Item,
            output_file: self.output_files.item.clone(),
            rows_written: rows,
        })
    }

    fn load_item_data(&self) -> Result<ItemTable> {
        let mut table = ItemTable::default();
        for item in JsonLinesReader::open(&self.item_file)? {
            let (_, record) = item?;
            table.push(record);
        }

        tracing::debug!(
            "📥 Loaded {} items with {} columns",
            table.len(),
            table.columns.len()
        );
        Ok(table)
    }
}
