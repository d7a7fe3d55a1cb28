use crate::core::jsonl::JsonLinesReader;
use crate::core::projection::Projection;
use crate::core::writer::TsvWriter;
use crate::domain::model::Record;
use crate::utils::error::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

const PROGRESS_TEMPLATE: &str =
    "{msg} [{elapsed_precise}] {bar:40.cyan/blue} {pos:>9}/{len:9} ({eta})";

fn progress_bar(total: u64, label: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let progress = ProgressBar::new(total);
    let style = ProgressStyle::with_template(PROGRESS_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress.set_style(style);
    progress.set_message(label.to_string());
    progress
}

/// 單一 JSON Lines 檔到 atomic file 的轉換
///
/// 1. 計算總行數（進度顯示用）
/// 2. 寫出標頭
/// 3. 每行：解析、`transform`、依投影取值、寫出
///
/// 任何錯誤都會中止整個檔案，已寫出的部分不會清除。
pub fn convert_file<F>(
    input: &Path,
    output: &Path,
    projection: &Projection,
    show_progress: bool,
    mut transform: F,
) -> Result<usize>
where
    F: FnMut(&mut Record, usize, &str) -> Result<()>,
{
    let mut reader = JsonLinesReader::open(input)?;
    let total = reader.count_lines()?;
    let file_name = reader.file_name().to_string();
    tracing::debug!("📥 {}: {} lines to convert", file_name, total);

    let mut writer = TsvWriter::create(output)?;
    writer.write_header(&projection.header_row())?;

    let progress = progress_bar(total, &file_name, show_progress);
    for item in reader {
        let (line, mut record) = item?;
        transform(&mut record, line, &file_name)?;
        let row = projection.project(&record, &file_name, line)?;
        writer.write_row(row)?;
        progress.inc(1);
    }
    progress.finish_and_clear();

    let rows = writer.finish()?;
    tracing::debug!("📤 {}: {} rows written to {}", file_name, rows, output.display());
    Ok(rows)
}
