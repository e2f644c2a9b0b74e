// ============================================================
// TABULAR ROW READER
// ============================================================
// Read CSV text or files into rows of typed scalar cells

use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use encoding_rs::WINDOWS_1252;
use tracing::{debug, warn};

use crate::application::use_cases::data_analysis::type_inference::{
    parse_boolean, parse_date_time, parse_number,
};
use crate::domain::analysis::{ScalarValue, TabularRow};
use crate::domain::error::{AppError, Result};

const DELIMITER_CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];
const DETECTION_SAMPLE_LINES: usize = 10;

/// CSV reader producing `TabularRow`s keyed by header name
pub struct TabularRowReader {
    delimiter: u8,
    trim: bool,
    /// Convert cell text to numbers, booleans and date/times
    normalize_scalars: bool,
}

impl Default for TabularRowReader {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: true,
            normalize_scalars: true,
        }
    }
}

impl TabularRowReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// With normalization off every non-empty cell stays a string
    pub fn with_normalize_scalars(mut self, normalize: bool) -> Self {
        self.normalize_scalars = normalize;
        self
    }

    pub fn parse_file(&self, path: &Path) -> Result<Vec<TabularRow>> {
        let content = read_decoded(path)?;
        self.parse_content(&content)
    }

    pub fn parse_content(&self, content: &str) -> Result<Vec<TabularRow>> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(if self.trim { Trim::All } else { Trim::None })
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .clone();

        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;
            rows.push(self.parse_row(&headers, &record));
        }

        debug!(
            rows = rows.len(),
            columns = headers.len(),
            delimiter = %(self.delimiter as char).escape_default(),
            "Parsed CSV content"
        );
        Ok(rows)
    }

    fn parse_row(&self, headers: &StringRecord, record: &StringRecord) -> TabularRow {
        headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                let value = match record.get(idx) {
                    Some(text) => self.cell_value(text),
                    None => ScalarValue::Null,
                };
                (header.to_string(), value)
            })
            .collect()
    }

    fn cell_value(&self, text: &str) -> ScalarValue {
        if text.trim().is_empty() {
            return ScalarValue::Null;
        }
        if !self.normalize_scalars {
            return ScalarValue::String(text.to_string());
        }
        normalize_scalar(text)
    }

    /// Detect the delimiter from the first lines, then parse the whole file
    pub fn parse_file_auto_detect(path: &Path) -> Result<Vec<TabularRow>> {
        let content = read_decoded(path)?;
        let delimiter = Self::detect_delimiter(&content);
        Self::default()
            .with_delimiter(delimiter)
            .parse_content(&content)
    }

    /// Pick among comma, semicolon, tab and pipe by how often and how
    /// consistently each appears per line
    pub fn detect_delimiter(content: &str) -> u8 {
        let sample_lines: Vec<&str> = content.lines().take(DETECTION_SAMPLE_LINES).collect();
        if sample_lines.is_empty() {
            return b',';
        }

        let mut best_delimiter = b',';
        let mut best_score = 0.0f32;

        for &delimiter in &DELIMITER_CANDIDATES {
            let counts: Vec<usize> = sample_lines
                .iter()
                .map(|line| line.bytes().filter(|&b| b == delimiter).count())
                .collect();

            let avg = counts.iter().sum::<usize>() as f32 / counts.len() as f32;
            let variance = counts
                .iter()
                .map(|&x| (x as f32 - avg).powi(2))
                .sum::<f32>()
                / counts.len() as f32;

            let score = avg / (1.0 + variance.sqrt());
            if score > best_score {
                best_score = score;
                best_delimiter = delimiter;
            }
        }

        best_delimiter
    }
}

/// Most specific scalar for a non-empty cell: number, boolean, date/time, text
fn normalize_scalar(text: &str) -> ScalarValue {
    if let Some(n) = parse_number(text) {
        return ScalarValue::Number(n);
    }
    if let Some(b) = parse_boolean(text) {
        return ScalarValue::Bool(b);
    }
    if let Some(dt) = parse_date_time(text) {
        return ScalarValue::DateTime(dt);
    }
    ScalarValue::String(text.to_string())
}

/// UTF-8 when valid, otherwise Windows-1252
fn read_decoded(path: &Path) -> Result<String> {
    let bytes = fs::read(path)
        .map_err(|e| AppError::IoError(format!("Failed to read {}: {}", path.display(), e)))?;

    match String::from_utf8(bytes) {
        Ok(content) => Ok(content),
        Err(err) => {
            warn!(path = %path.display(), "File is not valid UTF-8, decoding as Windows-1252");
            let (decoded, _, _) = WINDOWS_1252.decode(err.as_bytes());
            Ok(decoded.into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("{}_{}", uuid::Uuid::new_v4(), name))
    }

    #[test]
    fn test_parse_simple_csv() {
        let content = "name,age,city\nAlice,30,NYC\nBob,25,LA";
        let rows = TabularRowReader::new().parse_content(content).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].columns().collect::<Vec<_>>(), vec!["name", "age", "city"]);
        assert_eq!(rows[0].get("name"), Some(&ScalarValue::from("Alice")));
        assert_eq!(rows[0].get("age"), Some(&ScalarValue::Number(30.0)));
    }

    #[test]
    fn test_normalization() {
        let content = "n,flag,when,label,blank\n\"1,250.5\",TRUE,2024-03-01,x1,\n";
        let rows = TabularRowReader::new().parse_content(content).unwrap();
        let row = &rows[0];

        assert_eq!(row.get("n"), Some(&ScalarValue::Number(1250.5)));
        assert_eq!(row.get("flag"), Some(&ScalarValue::Bool(true)));
        assert!(matches!(row.get("when"), Some(ScalarValue::DateTime(_))));
        assert_eq!(row.get("label"), Some(&ScalarValue::from("x1")));
        assert_eq!(row.get("blank"), Some(&ScalarValue::Null));
    }

    #[test]
    fn test_normalization_off_keeps_strings() {
        let rows = TabularRowReader::new()
            .with_normalize_scalars(false)
            .parse_content("a,b\n1,\n")
            .unwrap();
        assert_eq!(rows[0].get("a"), Some(&ScalarValue::from("1")));
        assert_eq!(rows[0].get("b"), Some(&ScalarValue::Null));
    }

    #[test]
    fn test_short_and_long_rows() {
        let rows = TabularRowReader::new()
            .parse_content("a,b,c\n1\n1,2,3,4\n")
            .unwrap();
        assert_eq!(rows[0].get("b"), Some(&ScalarValue::Null));
        assert_eq!(rows[0].get("c"), Some(&ScalarValue::Null));
        assert_eq!(rows[1].len(), 3);
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(TabularRowReader::detect_delimiter("a,b,c\nd,e,f"), b',');
        assert_eq!(TabularRowReader::detect_delimiter("a;b;c\nd;e;f"), b';');
        assert_eq!(TabularRowReader::detect_delimiter("a\tb\nc\td"), b'\t');
        assert_eq!(TabularRowReader::detect_delimiter(""), b',');
    }

    #[test]
    fn test_auto_detect_file() {
        let path = temp_path("semicolon.csv");
        fs::write(&path, "region;sales\nEast;10\nWest;20\n").unwrap();

        let rows = TabularRowReader::parse_file_auto_detect(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("sales"), Some(&ScalarValue::Number(20.0)));
    }

    #[test]
    fn test_windows_1252_fallback() {
        let path = temp_path("latin.csv");
        let mut file = fs::File::create(&path).unwrap();
        // "café" with 0xE9 for é
        file.write_all(b"name\ncaf\xe9\n").unwrap();
        drop(file);

        let rows = TabularRowReader::new().parse_file(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(rows[0].get("name"), Some(&ScalarValue::from("café")));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = TabularRowReader::new()
            .parse_file(Path::new("/definitely/not/here.csv"))
            .unwrap_err();
        assert!(matches!(err, AppError::IoError(_)));
    }
}
