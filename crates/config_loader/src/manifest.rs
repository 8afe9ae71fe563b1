//! Module-type manifest discovery
//!
//! Every module directory under the library directory carries one
//! `module.json` describing a [`ModuleType`]. Discovery is recursive and
//! sorted by file name so the resulting catalog order does not depend on the
//! filesystem. Symlinked directories are not descended into.

use std::fs;
use std::path::{Path, PathBuf};

use contracts::{ContractError, ModuleType, MANIFEST_FILE_NAME};
use tracing::{debug, info, instrument};

use crate::validator::validate_module_type;

/// Discover and parse every manifest below `library_dir`.
///
/// A missing directory yields an empty catalog. A manifest that cannot be
/// read or parsed aborts discovery: a partial catalog could silently drop
/// types that instances rely on.
#[instrument(name = "manifest_discover", fields(library_dir = %library_dir.display()))]
pub fn discover_manifests(library_dir: &Path) -> Result<Vec<ModuleType>, ContractError> {
    if !library_dir.exists() {
        debug!("library directory does not exist, no manifests discovered");
        return Ok(Vec::new());
    }
    if !library_dir.is_dir() {
        return Err(ContractError::config_validation(
            "sketch.library_dir",
            format!("'{}' is not a directory", library_dir.display()),
        ));
    }

    let mut paths = Vec::new();
    collect_manifest_paths(library_dir, &mut paths)?;

    let types = paths
        .iter()
        .map(|path| load_manifest(path))
        .collect::<Result<Vec<_>, _>>()?;

    info!(count = types.len(), "module type manifests discovered");
    Ok(types)
}

/// Parse a single manifest file
pub fn load_manifest(path: &Path) -> Result<ModuleType, ContractError> {
    let content = fs::read_to_string(path).map_err(|e| ContractError::ManifestParse {
        path: path.to_path_buf(),
        message: format!("cannot read manifest: {e}"),
        source: Some(Box::new(e)),
    })?;

    let module_type: ModuleType =
        serde_json::from_str(&content).map_err(|e| ContractError::ManifestParse {
            path: path.to_path_buf(),
            message: format!("JSON parse error: {e}"),
            source: Some(Box::new(e)),
        })?;

    validate_module_type(&module_type, &module_type.id)
        .map_err(|e| ContractError::manifest_parse(path, e.to_string()))?;

    debug!(path = %path.display(), type_id = %module_type.id, "manifest loaded");
    Ok(module_type)
}

fn collect_manifest_paths(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), ContractError> {
    let read_error = |e: std::io::Error| ContractError::ManifestParse {
        path: dir.to_path_buf(),
        message: format!("cannot read directory: {e}"),
        source: Some(Box::new(e)),
    };

    let mut entries = fs::read_dir(dir)
        .map_err(read_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_error)?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') {
            continue;
        }
        let file_type = entry.file_type().map_err(read_error)?;
        if file_type.is_dir() {
            collect_manifest_paths(&path, out)?;
        } else if file_type.is_symlink() && path.is_dir() {
            debug!(path = %path.display(), "skipping symlinked directory");
        } else if name == MANIFEST_FILE_NAME {
            out.push(path);
        }
    }
    Ok(())
}
