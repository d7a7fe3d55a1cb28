use crate::core::transform::sanitize_cell;
use crate::utils::error::Result;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Tab 分隔輸出，不加引號；每列欄數必須與第一列相同
pub struct TsvWriter<W: Write> {
    inner: csv::Writer<W>,
    rows: usize,
}

impl TsvWriter<File> {
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(Self::from_writer(file))
    }
}

impl<W: Write> TsvWriter<W> {
    pub fn from_writer(writer: W) -> Self {
        let inner = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(csv::QuoteStyle::Never)
            .has_headers(false)
            .from_writer(writer);
        Self { inner, rows: 0 }
    }

    pub fn write_header(&mut self, header: &[String]) -> Result<()> {
        self.inner.write_record(header)?;
        Ok(())
    }

    pub fn write_row<I, S>(&mut self, row: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner
            .write_record(row.into_iter().map(|cell| sanitize_cell(cell.into())))?;
        self.rows += 1;
        Ok(())
    }

    /// 寫入緩衝區並回傳資料列數（不含標頭）
    pub fn finish(mut self) -> Result<usize> {
        self.inner.flush()?;
        Ok(self.rows)
    }
}
