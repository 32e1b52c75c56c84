//! Shared RON file helpers.

use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::DataLoadError;

/// Read and parse a single RON file.
pub fn read_ron<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    if !path.exists() {
        return Err(DataLoadError::FileNotFound(path.display().to_string()));
    }

    let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
        path: path.display().to_string(),
        details: e.to_string(),
    })?;

    parse_ron(&contents, path)
}

/// Parse RON text; `path` is only used for error messages.
pub fn parse_ron<T: DeserializeOwned>(contents: &str, path: &Path) -> Result<T, DataLoadError> {
    ron::from_str(contents).map_err(|e| DataLoadError::ParseError {
        path: path.display().to_string(),
        details: e.to_string(),
    })
}

/// List the `.ron` files of a directory as `(file stem, path)`, sorted by stem.
pub fn ron_files_in(dir: &Path) -> Result<Vec<(String, PathBuf)>, DataLoadError> {
    if !dir.exists() {
        return Err(DataLoadError::FileNotFound(dir.display().to_string()));
    }

    let entries = fs::read_dir(dir).map_err(|e| DataLoadError::ReadError {
        path: dir.display().to_string(),
        details: e.to_string(),
    })?;

    let mut files: Vec<(String, PathBuf)> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "ron"))
        .map(|path| {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("unknown")
                .to_string();
            (stem, path)
        })
        .collect();

    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        speed: f32,
    }

    #[test]
    fn parse_error_names_the_file() {
        let err = parse_ron::<Sample>("(speed: )", Path::new("data/sample.ron")).unwrap_err();
        assert!(matches!(err, DataLoadError::ParseError { ref path, .. } if path == "data/sample.ron"));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = read_ron::<Sample>(Path::new("does/not/exist.ron")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound(_)));
    }

    #[test]
    fn parses_valid_ron() {
        let sample: Sample = parse_ron("(speed: 2.5)", Path::new("x.ron")).unwrap();
        assert_eq!(sample, Sample { speed: 2.5 });
    }
}
