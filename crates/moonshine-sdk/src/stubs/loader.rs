//! Load user stub overrides from a directory.

use std::path::Path;

use tera::Tera;

use crate::error::{BuilderError, BuilderResult};

/// Load every `*.tera` file in `stub_dir`, registered by file name
/// (`Model.php.tera`).
pub(crate) fn load_stubs_from_dir(stub_dir: &Path) -> BuilderResult<Tera> {
    if !stub_dir.is_dir() {
        return Err(BuilderError::FileNotFound(stub_dir.to_path_buf()));
    }

    let glob_pattern = stub_dir.join("*.tera").to_string_lossy().to_string();
    Tera::new(&glob_pattern).map_err(|e| BuilderError::Template {
        stub: stub_dir.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_stubs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Model.php.tera"), "class {{ class }} {}").unwrap();
        fs::write(dir.path().join("README.md"), "# notes").unwrap();

        let tera = load_stubs_from_dir(dir.path()).unwrap();
        let names: Vec<_> = tera.get_template_names().collect();
        assert_eq!(names, ["Model.php.tera"]);
    }

    #[test]
    fn test_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_stubs_from_dir(&dir.path().join("stubs")).unwrap_err();
        assert!(matches!(err, BuilderError::FileNotFound(_)));
    }
}
