use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub const PAGE_FILE: &str = "index.html";

/// Write `html` to `<output_dir>/<slug>/index.html`, replacing any existing page.
pub fn write_page(output_dir: &Path, slug: &str, html: &str) -> Result<PathBuf> {
    let dir = output_dir.join(slug);
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;

    let path = dir.join(PAGE_FILE);
    fs::write(&path, html).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_slug_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_page(tmp.path(), "kaffe-lund", "<p>hej</p>").unwrap();
        assert_eq!(path, tmp.path().join("kaffe-lund").join("index.html"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "<p>hej</p>");
    }

    #[test]
    fn overwrites_existing_page() {
        let tmp = tempfile::tempdir().unwrap();
        write_page(tmp.path(), "kaffe-lund", "first version, longer").unwrap();
        let path = write_page(tmp.path(), "kaffe-lund", "second").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "second");
    }

    #[test]
    fn unwritable_target_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        // A file where the output directory should be.
        let blocker = tmp.path().join("out");
        fs::write(&blocker, "").unwrap();
        let err = write_page(&blocker, "kaffe-lund", "x").unwrap_err();
        assert!(format!("{:#}", err).contains("kaffe-lund"));
    }
}
