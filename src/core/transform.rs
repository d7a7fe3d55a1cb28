use crate::domain::model::TimeZoneMode;
use chrono::{Local, LocalResult, NaiveDateTime, Offset, ParseResult, TimeDelta, TimeZone};
use serde_json::Value;

/// 評論與使用者檔共用的日期格式
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 將 `YYYY-MM-DD HH:MM:SS` 轉為 Unix epoch 秒數
pub fn parse_timestamp(value: &str, time_zone: TimeZoneMode) -> ParseResult<i64> {
    let naive = NaiveDateTime::parse_from_str(value, DATE_FORMAT)?;
    Ok(match time_zone {
        TimeZoneMode::Utc => naive.and_utc().timestamp(),
        TimeZoneMode::Local => local_timestamp(naive),
    })
}

fn local_timestamp(naive: NaiveDateTime) -> i64 {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.timestamp(),
        LocalResult::Ambiguous(earliest, _) => earliest.timestamp(),
        // 夏令時間跳過的時刻：沿用跳躍前的偏移量
        LocalResult::None => {
            let before = naive - TimeDelta::hours(1);
            let offset = Local
                .offset_from_local_datetime(&before)
                .earliest()
                .map(|o| o.fix().local_minus_utc())
                .unwrap_or(0);
            naive.and_utc().timestamp() - i64::from(offset)
        }
    }
}

/// 評分的三分類：不喜歡、中立、喜歡
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Dislike = 0,
    Neutral = 1,
    Like = 2,
}

impl Behavior {
    pub fn from_stars(stars: f64) -> Self {
        if stars <= 2.0 {
            Behavior::Dislike
        } else if stars >= 4.0 {
            Behavior::Like
        } else {
            Behavior::Neutral
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

/// JSON 值轉為輸出欄位字串；欄位內的 tab 與換行會換成空白以保持欄數
pub fn cell_value(value: &Value) -> String {
    let raw = match value {
        Value::Null => return String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    sanitize_cell(raw)
}

pub fn sanitize_cell(raw: String) -> String {
    if raw.contains(['\t', '\n', '\r']) {
        raw.replace(['\t', '\n', '\r'], " ")
    } else {
        raw
    }
}

/// 識別碼欄位的鍵值：字串原樣使用，其他型別取 JSON 表示
pub fn identifier_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
