//! Well file discovery
//!
//! Lists candidate CSV files in a data directory with a cheap record-count
//! estimate taken from a sample of the file rather than a full scan.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Result;

/// Bytes sampled after the header line when estimating record counts.
const SAMPLE_BYTES: u64 = 100 * 1024;

/// A candidate input file.
#[derive(Debug, Clone, Serialize)]
pub struct WellFile {
    pub path: PathBuf,
    /// File stem, used as the well name
    pub name: String,
    pub size_bytes: u64,
    pub estimated_records: u64,
}

impl WellFile {
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / (1024.0 * 1024.0)
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

/// All `*.csv` files in `dir`, sorted by file name.
///
/// A directory that does not exist holds no wells.
pub fn list_wells(dir: impl AsRef<Path>) -> Result<Vec<WellFile>> {
    let entries = match fs::read_dir(dir.as_ref()) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_csv(path))
        .collect();
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    paths
        .into_iter()
        .map(|path| -> Result<WellFile> {
            let size_bytes = fs::metadata(&path)?.len();
            let estimated_records = estimate_records(&path)?;
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();

            Ok(WellFile {
                path,
                name,
                size_bytes,
                estimated_records,
            })
        })
        .collect()
}

/// First well in `dir` by file name, if any.
pub fn first_well(dir: impl AsRef<Path>) -> Result<Option<PathBuf>> {
    Ok(list_wells(dir)?.into_iter().next().map(|w| w.path))
}

/// Estimate data rows by extrapolating the newline density of a sample.
///
/// `file_size / sample_bytes * sample_lines`, truncated; 0 if nothing
/// follows the header.
pub fn estimate_records(path: impl AsRef<Path>) -> Result<u64> {
    let file = File::open(path.as_ref())?;
    let file_size = file.metadata()?.len();
    let mut reader = BufReader::new(file);

    let mut header = Vec::new();
    reader.read_until(b'\n', &mut header)?;

    let mut sample = Vec::new();
    reader.take(SAMPLE_BYTES).read_to_end(&mut sample)?;

    if sample.is_empty() {
        return Ok(0);
    }

    let lines = sample.iter().filter(|b| **b == b'\n').count() as f64;
    Ok((file_size as f64 / sample.len() as f64 * lines) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_list_sorted_csv_only() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "F-9A.csv", "h\n1\n");
        write_file(dir.path(), "F-12.CSV", "h\n1\n");
        write_file(dir.path(), "notes.txt", "ignore me");
        fs::create_dir(dir.path().join("sub.csv")).unwrap();

        let wells = list_wells(dir.path()).unwrap();
        let names: Vec<&str> = wells.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["F-12", "F-9A"]);
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("no-such-dir");

        assert!(list_wells(&missing).unwrap().is_empty());
        assert_eq!(first_well(&missing).unwrap(), None);
    }

    #[test]
    fn test_file_as_dir_is_error() {
        let temp = tempdir().unwrap();
        let file = write_file(temp.path(), "a.csv", "h\n");
        assert!(list_wells(&file).is_err());
    }

    #[test]
    fn test_first_well() {
        let dir = tempdir().unwrap();
        assert!(first_well(dir.path()).unwrap().is_none());

        write_file(dir.path(), "b.csv", "h\n");
        write_file(dir.path(), "a.csv", "h\n");
        let first = first_well(dir.path()).unwrap().unwrap();
        assert!(first.ends_with("a.csv"));
    }

    #[test]
    fn test_estimate_small_file() {
        let dir = tempdir().unwrap();
        // header (7 bytes) + 3 rows of 4 bytes
        let path = write_file(dir.path(), "w.csv", "header\n1,2\n3,4\n5,6\n");

        // 19 / 12 * 3 = 4.75 -> 4
        assert_eq!(estimate_records(&path).unwrap(), 4);
    }

    #[test]
    fn test_estimate_header_only() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "w.csv", "header\n");
        assert_eq!(estimate_records(&path).unwrap(), 0);
    }

    #[test]
    fn test_size_mb() {
        let well = WellFile {
            path: PathBuf::from("x.csv"),
            name: "x".to_string(),
            size_bytes: 3 * 1024 * 1024,
            estimated_records: 0,
        };
        assert!((well.size_mb() - 3.0).abs() < 1e-9);
    }
}
