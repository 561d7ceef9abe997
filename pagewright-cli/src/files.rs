//! File I/O for passes: reading inputs, backups, and writing results.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pagewright_common::console;
use pagewright_ids::IdentifierMap;

/// Read a whole text file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Read a JSON object of old identifier to new identifier.
pub fn read_identifier_map(path: &Path) -> Result<IdentifierMap> {
    let text = read_text(path)?;
    serde_json::from_str(&text)
        .with_context(|| format!("{} is not a valid identifier map", path.display()))
}

/// Read a JSON array of identifiers.
pub fn read_identifier_set(path: &Path) -> Result<BTreeSet<String>> {
    let text = read_text(path)?;
    serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON array of identifiers", path.display()))
}

/// `<file>.pre-<pass>`
fn backup_path(path: &Path, pass: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".pre-{pass}"));
    PathBuf::from(name)
}

/// Copy `path` aside before `pass` overwrites it.
///
/// An existing backup is kept, so re-running a pass never replaces the
/// original copy with an already-edited one.
pub fn backup(path: &Path, pass: &str) -> Result<()> {
    let target = backup_path(path, pass);
    if target.exists() {
        console::detail(&format!("backup {} already exists, kept", target.display()));
        return Ok(());
    }
    let _ = fs::copy(path, &target).with_context(|| {
        format!(
            "failed to back up {} to {}",
            path.display(),
            target.display()
        )
    })?;
    console::detail(&format!("backup written to {}", target.display()));
    Ok(())
}

/// Write `contents` to `path`.
pub fn write_text(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_path() {
        assert_eq!(
            backup_path(Path::new("site/index.html"), "remove"),
            PathBuf::from("site/index.html.pre-remove")
        );
    }
}
