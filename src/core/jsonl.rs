use crate::domain::model::Record;
use crate::utils::error::{ConvertError, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

/// 逐行讀取 JSON Lines 檔案，每行一筆記錄
pub struct JsonLinesReader {
    file_name: String,
    reader: BufReader<File>,
    line: usize,
    buffer: String,
}

impl JsonLinesReader {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            ConvertError::IoError(io::Error::new(
                e.kind(),
                format!("{}: {}", path.display(), e),
            ))
        })?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            file_name,
            reader: BufReader::new(file),
            line: 0,
            buffer: String::new(),
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// 先數行數再倒回檔頭，只用於進度顯示
    pub fn count_lines(&mut self) -> Result<u64> {
        let mut count = 0u64;
        let mut bytes = Vec::new();
        loop {
            bytes.clear();
            if self.reader.read_until(b'\n', &mut bytes)? == 0 {
                break;
            }
            count += 1;
        }

        self.reader.seek(SeekFrom::Start(0))?;
        self.line = 0;
        Ok(count)
    }

    fn read_next(&mut self) -> Result<Option<(usize, Record)>> {
        self.buffer.clear();
        if self.reader.read_line(&mut self.buffer)? == 0 {
            return Ok(None);
        }
        self.line += 1;

        let text = self.buffer.trim_end_matches(['\n', '\r']);
        let record = serde_json::from_str::<Record>(text).map_err(|source| ConvertError::JsonParse {
            file: self.file_name.clone(),
            line: self.line,
            source,
        })?;

        Ok(Some((self.line, record)))
    }
}

impl Iterator for JsonLinesReader {
    type Item = Result<(usize, Record)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_next().transpose()
    }
}
