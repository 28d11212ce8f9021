//! LibSVM format loader
//!
//! Reads `label index:value index:value ...` lines into a column-major
//! matrix plus a ±1 label vector:
//!
//! ```text
//! +1 1:0.5 3:1.2 7:0.8
//! 0 2:0.3 5:2.1
//! ```
//!
//! Indices are 1-based. Labels of exactly +1/-1 are kept, any other positive
//! label becomes +1 and zero or negative labels become -1, so 0/1 encoded
//! files load directly.

use crate::core::{CdnError, Result, SparseMatrixView, SparseVector};
use crate::data::CscMatrix;
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Design matrix and labels loaded from a LibSVM file
#[derive(Debug, Clone)]
pub struct LibSvmData {
    pub x: CscMatrix,
    pub y: Vec<f64>,
}

impl LibSvmData {
    /// Load from a file, sizing the matrix to the largest index seen
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load from a file with at least `n_features` columns
    ///
    /// Use this for test files so their width matches the training matrix.
    pub fn from_file_with_features<P: AsRef<Path>>(path: P, n_features: usize) -> Result<Self> {
        let file = File::open(path)?;
        Self::parse(BufReader::new(file), Some(n_features))
    }

    /// Load from any buffered reader
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        Self::parse(reader, None)
    }

    fn parse<R: BufRead>(reader: R, n_features: Option<usize>) -> Result<Self> {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        let mut width = 0;

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (label, row) = Self::parse_line(line).map_err(|e| {
                CdnError::Parse(format!("line {}: {}", line_num + 1, e))
            })?;
            if let Some(max) = row.max_index() {
                width = width.max(max + 1);
            }
            labels.push(label);
            rows.push(row);
        }

        let n_cols = match n_features {
            Some(n) if n < width => {
                return Err(CdnError::DimensionMismatch {
                    expected: n,
                    actual: width,
                })
            }
            Some(n) => n,
            None => width,
        };

        let x = CscMatrix::from_rows(&rows, n_cols)?;
        debug!(
            "loaded {} instances x {} features ({} nonzeros)",
            x.n_rows(),
            x.n_cols(),
            x.nnz()
        );

        Ok(Self { x, y: labels })
    }

    /// Parse a single line into its label and sparse row
    fn parse_line(line: &str) -> Result<(f64, SparseVector)> {
        let mut parts = line.split_whitespace();

        let label_str = parts
            .next()
            .ok_or_else(|| CdnError::Parse("empty line".to_string()))?;
        let raw_label = label_str
            .parse::<f64>()
            .map_err(|_| CdnError::Parse(format!("invalid label: {label_str}")))?;
        let label = if raw_label > 0.0 { 1.0 } else { -1.0 };

        let mut indices = Vec::new();
        let mut values = Vec::new();

        for feature_str in parts {
            let (index_str, value_str) = feature_str.split_once(':').ok_or_else(|| {
                CdnError::Parse(format!("invalid feature format: {feature_str}"))
            })?;

            let index = index_str
                .parse::<usize>()
                .map_err(|_| CdnError::Parse(format!("invalid feature index: {index_str}")))?;
            let value = value_str
                .parse::<f64>()
                .map_err(|_| CdnError::Parse(format!("invalid feature value: {value_str}")))?;

            if index == 0 {
                return Err(CdnError::Parse(
                    "feature indices are 1-based, got 0".to_string(),
                ));
            }

            indices.push(index - 1);
            values.push(value);
        }

        Ok((label, SparseVector::new(indices, values)?))
    }

    pub fn n_instances(&self) -> usize {
        self.y.len()
    }

    pub fn n_features(&self) -> usize {
        self.x.n_cols()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_line_basic() {
        let (label, row) = LibSvmData::parse_line("+1 1:0.5 3:1.2").unwrap();

        assert_eq!(label, 1.0);
        assert_eq!(row.indices, vec![0, 2]);
        assert_eq!(row.values, vec![0.5, 1.2]);
    }

    #[test]
    fn test_parse_line_label_mapping() {
        assert_eq!(LibSvmData::parse_line("-1 1:1").unwrap().0, -1.0);
        assert_eq!(LibSvmData::parse_line("0 1:1").unwrap().0, -1.0);
        assert_eq!(LibSvmData::parse_line("2 1:1").unwrap().0, 1.0);
        assert_eq!(LibSvmData::parse_line("-3").unwrap().0, -1.0);
    }

    #[test]
    fn test_parse_line_invalid_format() {
        assert!(LibSvmData::parse_line("+1 1").is_err());
        assert!(LibSvmData::parse_line("+1 abc:1.0").is_err());
        assert!(LibSvmData::parse_line("+1 1:abc").is_err());
        assert!(LibSvmData::parse_line("+1 0:1.0").is_err());
        assert!(LibSvmData::parse_line("yes 1:1.0").is_err());
        // Repeated feature on one line
        assert!(LibSvmData::parse_line("+1 2:1.0 2:3.0").is_err());
    }

    #[test]
    fn test_from_reader_builds_columns() {
        let data = "# header comment\n+1 1:0.5 3:1.2\n\n0 2:0.3 3:2.1\n";
        let loaded = LibSvmData::from_reader(Cursor::new(data)).unwrap();

        assert_eq!(loaded.n_instances(), 2);
        assert_eq!(loaded.n_features(), 3);
        assert_eq!(loaded.y, vec![1.0, -1.0]);

        let col2: Vec<_> = loaded.x.column(2).unwrap().iter().collect();
        assert_eq!(col2, vec![(0, 1.2), (1, 2.1)]);
        assert_eq!(loaded.x.column(1).unwrap().rows(), &[1]);
    }

    #[test]
    fn test_parse_error_reports_line() {
        let data = "+1 1:0.5\n+1 1:oops\n";
        match LibSvmData::from_reader(Cursor::new(data)) {
            Err(CdnError::Parse(msg)) => assert!(msg.starts_with("line 2")),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_explicit_feature_count() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(temp_file, "+1 1:1.0").expect("Failed to write");
        writeln!(temp_file, "-1 2:1.0").expect("Failed to write");
        temp_file.flush().expect("Failed to flush");

        let wide = LibSvmData::from_file_with_features(temp_file.path(), 5).unwrap();
        assert_eq!(wide.n_features(), 5);

        let narrow = LibSvmData::from_file_with_features(temp_file.path(), 1);
        assert!(matches!(
            narrow,
            Err(CdnError::DimensionMismatch {
                expected: 1,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_from_file_io_error() {
        let result = LibSvmData::from_file("/non/existent/file.libsvm");
        assert!(matches!(result, Err(CdnError::Io(_))));
    }
}
