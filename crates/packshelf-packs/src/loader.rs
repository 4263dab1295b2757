//! Pack loader: scans a registry root and builds a [`PackIndex`].
//!
//! The registry root holds one directory per pack kind (`skills/`,
//! `contexts/`, `prompts/`), each containing one subdirectory per pack.
//! Scanning is sequential and deterministic: kinds in [`PackKind::ALL`]
//! order, pack directories in ascending file-name order.

use std::path::{Path, PathBuf};

use crate::error::{PackError, Result};
use crate::index::{PackIndex, WarningKind};
use crate::parser::parse_pack_toml;
use crate::types::{METADATA_FILE, Pack, PackKind};

/// Scan `root` and index every valid pack found under it.
///
/// Only failures to access `root` itself (or one of its category
/// directories) are errors. Broken packs become
/// [`WarningKind::InvalidMetadata`] warnings and name clashes become
/// [`WarningKind::DuplicateName`] warnings on the returned index.
pub fn build_index(root: &Path) -> Result<PackIndex> {
    let meta = std::fs::metadata(root).map_err(|source| PackError::RootUnavailable {
        path: root.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(PackError::RootNotDirectory {
            path: root.to_path_buf(),
        });
    }

    let mut index = PackIndex::new(root);

    for kind in PackKind::ALL {
        let category = root.join(kind.category_dir());
        if !category.is_dir() {
            tracing::debug!(path = %category.display(), "category directory absent");
            continue;
        }

        for dir in pack_dirs(&category)? {
            if !dir.join(METADATA_FILE).is_file() {
                tracing::warn!(path = %dir.display(), "pack directory has no {METADATA_FILE}");
                index.warn(
                    WarningKind::InvalidMetadata,
                    dir,
                    format!("missing {METADATA_FILE}"),
                );
                continue;
            }

            match load_pack_from_dir(&dir, kind) {
                Ok(pack) => {
                    tracing::debug!(name = %pack.name, kind = %pack.kind, "loaded pack");
                    index.insert(pack);
                }
                Err(e) => {
                    tracing::warn!(path = %dir.display(), error = %e, "failed to load pack");
                    let message = match e {
                        PackError::InvalidMetadata { reason, .. } => reason,
                        other => other.to_string(),
                    };
                    index.warn(WarningKind::InvalidMetadata, dir, message);
                }
            }
        }
    }

    tracing::info!(
        count = index.len(),
        warnings = index.warnings().len(),
        root = %root.display(),
        "packs indexed"
    );
    Ok(index)
}

/// Immediate subdirectories of a category directory, sorted by name.
///
/// Hidden directories (leading `.`) are not packs; the manager stages
/// installs in them.
fn pack_dirs(category: &Path) -> Result<Vec<PathBuf>> {
    let unavailable = |source| PackError::RootUnavailable {
        path: category.to_path_buf(),
        source,
    };

    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(category).map_err(unavailable)? {
        let entry = entry.map_err(unavailable)?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Load a single pack from its directory.
///
/// `expected` is the kind implied by the category directory the pack was
/// found in; a `type` field disagreeing with it is invalid metadata.
pub fn load_pack_from_dir(dir: &Path, expected: PackKind) -> Result<Pack> {
    let metadata_path = dir.join(METADATA_FILE);
    let text = std::fs::read_to_string(&metadata_path).map_err(|e| {
        PackError::invalid(&metadata_path, format!("cannot read {METADATA_FILE}: {e}"))
    })?;

    let mut pack = parse_pack_toml(&text, &metadata_path)?;

    if pack.kind != expected {
        return Err(PackError::invalid(
            &metadata_path,
            format!(
                "type `{}` does not belong in `{}/`",
                pack.kind,
                expected.category_dir()
            ),
        ));
    }

    if dir.file_name().is_some_and(|n| n != pack.name.as_str()) {
        tracing::warn!(
            name = %pack.name,
            dir = %dir.display(),
            "pack directory is not named after the pack"
        );
    }

    let content_path = pack.content_path();
    match std::fs::read_to_string(&content_path) {
        Ok(body) => pack.content = body,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(
                name = %pack.name,
                file = %content_path.display(),
                "content document missing"
            );
        }
        Err(e) => {
            return Err(PackError::invalid(
                &content_path,
                format!("cannot read {}: {e}", pack.kind.content_file()),
            ));
        }
    }

    Ok(pack)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn write_pack(root: &Path, kind: PackKind, dir: &str, name: &str) -> PathBuf {
        let pack_dir = root.join(kind.category_dir()).join(dir);
        std::fs::create_dir_all(&pack_dir).unwrap();
        std::fs::write(
            pack_dir.join(METADATA_FILE),
            format!(
                "name = \"{name}\"\nversion = \"1.0.0\"\ntype = \"{kind}\"\n\
                 description = \"{name} pack\"\nauthor = \"octo\"\ntags = []\nlicense = \"MIT\"\n"
            ),
        )
        .unwrap();
        std::fs::write(pack_dir.join(kind.content_file()), format!("# {name}\n")).unwrap();
        pack_dir
    }

    #[test]
    fn missing_root_is_an_error() {
        let result = build_index(Path::new("/nonexistent/packshelf/root"));
        assert!(matches!(result, Err(PackError::RootUnavailable { .. })));
    }

    #[test]
    fn root_that_is_a_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("not-a-dir");
        std::fs::write(&file, "x").unwrap();
        assert!(matches!(
            build_index(&file),
            Err(PackError::RootNotDirectory { .. })
        ));
    }

    #[test]
    fn empty_root_gives_empty_index() {
        let tmp = tempfile::tempdir().unwrap();
        let index = build_index(tmp.path()).unwrap();
        assert!(index.is_empty());
        assert!(index.warnings().is_empty());
    }

    #[test]
    fn loads_content_document() {
        let tmp = tempfile::tempdir().unwrap();
        write_pack(tmp.path(), PackKind::Context, "rust-style", "rust-style");

        let index = build_index(tmp.path()).unwrap();
        let pack = index.get("rust-style").unwrap();
        assert_eq!(pack.kind, PackKind::Context);
        assert_eq!(pack.content, "# rust-style\n");
    }

    #[test]
    fn missing_content_still_indexes() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = write_pack(tmp.path(), PackKind::Skill, "bare", "bare");
        std::fs::remove_file(dir.join("SKILL.md")).unwrap();

        let index = build_index(tmp.path()).unwrap();
        assert!(index.get("bare").unwrap().content.is_empty());
        assert!(index.warnings().is_empty());
    }

    #[test]
    fn kind_mismatch_is_invalid() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = write_pack(tmp.path(), PackKind::Prompt, "misfiled", "misfiled");
        let moved = tmp.path().join("skills").join("misfiled");
        std::fs::create_dir_all(moved.parent().unwrap()).unwrap();
        std::fs::rename(&dir, &moved).unwrap();

        let index = build_index(tmp.path()).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.warnings().len(), 1);
        assert_eq!(index.warnings()[0].kind, WarningKind::InvalidMetadata);
        assert_eq!(index.warnings()[0].path, moved);
    }

    #[test]
    fn dir_without_metadata_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        write_pack(tmp.path(), PackKind::Skill, "real", "real");
        let orphan = tmp.path().join("skills").join("orphan");
        std::fs::create_dir_all(&orphan).unwrap();
        std::fs::write(orphan.join("SKILL.md"), "# orphan\n").unwrap();

        let index = build_index(tmp.path()).unwrap();
        assert_eq!(index.len(), 1);
        assert!(!index.contains("orphan"));
        assert_eq!(index.warnings().len(), 1);
        assert_eq!(index.warnings()[0].kind, WarningKind::InvalidMetadata);
        assert_eq!(index.warnings()[0].path, orphan);
        assert!(index.warnings()[0].message.contains("missing pack.toml"));
    }

    #[test]
    fn stray_files_and_hidden_dirs_are_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        write_pack(tmp.path(), PackKind::Skill, "real", "real");
        std::fs::write(tmp.path().join("skills").join("README.md"), "notes").unwrap();
        std::fs::create_dir_all(tmp.path().join("skills").join(".staging")).unwrap();

        let index = build_index(tmp.path()).unwrap();
        assert_eq!(index.len(), 1);
        assert!(index.warnings().is_empty());
    }
}
