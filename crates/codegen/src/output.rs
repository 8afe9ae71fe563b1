//! Atomic sketch writer

use std::fs;
use std::io::Write;
use std::path::Path;

use contracts::ContractError;
use tempfile::NamedTempFile;
use tracing::{info, instrument};

/// Replace the file at `path` with `contents`.
///
/// The data goes to a temporary file in the destination directory which is
/// then renamed over the target, so the previous sketch survives any
/// failure. Missing parent directories are created.
///
/// # Errors
/// `GenerationIo` naming `path` for any filesystem failure
#[instrument(name = "codegen_write_sketch", skip(contents), fields(path = %path.display(), bytes = contents.len()))]
pub fn write_sketch(path: &Path, contents: &str) -> Result<(), ContractError> {
    let io_err = |e| ContractError::generation_io(path, e);

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(io_err)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(contents.as_bytes()).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;

    info!("sketch written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_creates_parent_and_writes() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("src").join("src.ino");
        write_sketch(&path, "void setup() {}\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "void setup() {}\n");
    }

    #[test]
    fn test_overwrites_wholesale_without_leftovers() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("src.ino");
        fs::write(&path, "old contents that are longer").unwrap();

        write_sketch(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");

        let entries = fs::read_dir(tmp.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_failure_reports_path_and_keeps_previous() {
        let tmp = TempDir::new().unwrap();
        // destination is a directory: persist cannot replace it
        let path = tmp.path().join("src.ino");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        match write_sketch(&path, "new") {
            Err(ContractError::GenerationIo { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected GenerationIo, got {other:?}"),
        }
        assert_eq!(fs::read_to_string(path.join("keep")).unwrap(), "x");
    }
}
