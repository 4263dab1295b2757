//! Pack manager: install, remove, list installed, and scaffold packs.
//!
//! Installing copies a pack directory out of the registry into a consumer
//! directory that uses the same `<category>/<name>/` layout, so an install
//! target can itself be scanned with [`build_index`].

use std::path::{Path, PathBuf};

use crate::error::{PackError, Result};
use crate::index::PackIndex;
use crate::loader::build_index;
use crate::parser::validate_name;
use crate::search::{SearchHit, SearchOptions, search_with};
use crate::types::{InstallReceipt, METADATA_FILE, Pack, PackKind, RECEIPT_FILE};

/// Owns the index of one registry and installs packs out of it.
#[derive(Debug)]
pub struct PackManager {
    index: PackIndex,
}

impl PackManager {
    /// Scan `root` and wrap the resulting index.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            index: build_index(root.as_ref())?,
        })
    }

    /// Wrap an already built index.
    pub fn from_index(index: PackIndex) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &PackIndex {
        &self.index
    }

    pub fn root(&self) -> &Path {
        self.index.root()
    }

    pub fn get(&self, name: &str) -> Option<&Pack> {
        self.index.get(name)
    }

    pub fn search(&self, query: &str, options: &SearchOptions) -> Vec<SearchHit> {
        search_with(&self.index, query, options)
    }

    /// Copy the pack `name` into `target/<category>/<name>/`.
    ///
    /// Fails with [`PackError::AlreadyInstalled`] if the destination exists,
    /// unless `force` is set, in which case it is replaced. A destination
    /// inside the pack's own directory is refused with
    /// [`PackError::TargetInsideSource`]. Returns the destination directory.
    ///
    /// The copy and receipt are staged in a hidden sibling directory and
    /// renamed into place, so a failed install leaves any previous copy
    /// intact.
    pub fn install(&self, name: &str, target: &Path, force: bool) -> Result<PathBuf> {
        let pack = self
            .index
            .get(name)
            .ok_or_else(|| PackError::NotFound(name.to_owned()))?;

        let category = target.join(pack.kind.category_dir());
        let dest = category.join(&pack.name);
        let exists = dest.exists();
        if exists && !force {
            return Err(PackError::AlreadyInstalled {
                name: pack.name.clone(),
                path: dest,
            });
        }
        if resolved(&dest).starts_with(resolved(&pack.path)) {
            return Err(PackError::TargetInsideSource {
                name: pack.name.clone(),
                path: dest,
            });
        }

        tracing::info!(name = %pack.name, version = %pack.version, "installing pack");
        std::fs::create_dir_all(&category)?;
        let staging = stage_dir(&category)?;
        copy_dir(&pack.path, staging.path())?;

        let receipt = InstallReceipt {
            name: pack.name.clone(),
            version: pack.version.clone(),
            kind: pack.kind,
            source: pack.path.clone(),
            installed_at: chrono::Utc::now().to_rfc3339(),
        };
        std::fs::write(
            staging.path().join(RECEIPT_FILE),
            serde_json::to_string_pretty(&receipt)?,
        )?;

        if exists {
            tracing::info!(name = %pack.name, path = %dest.display(), "replacing installed pack");
            // The old copy moves into a second staging dir and is deleted
            // when it drops, after the new copy is in place.
            let previous = stage_dir(&category)?;
            let parked = previous.path().join(&pack.name);
            std::fs::rename(&dest, &parked)?;
            if let Err(e) = std::fs::rename(staging.path(), &dest) {
                std::fs::rename(&parked, &dest)?;
                return Err(e.into());
            }
        } else {
            std::fs::rename(staging.path(), &dest)?;
        }

        tracing::info!(name = %pack.name, path = %dest.display(), "pack installed");
        Ok(dest)
    }

    /// Index the packs installed under `target`.
    ///
    /// A target that does not exist yet has nothing installed.
    pub fn installed(target: &Path) -> Result<PackIndex> {
        if !target.exists() {
            tracing::debug!(path = %target.display(), "install target does not exist");
            return Ok(PackIndex::new(target));
        }
        build_index(target)
    }

    /// Delete the installed pack `name` from `target`.
    ///
    /// Only directories carrying an install receipt are removed; a pack that
    /// was not put there by [`PackManager::install`] is refused with
    /// [`PackError::NotInstalled`].
    pub fn remove_installed(target: &Path, name: &str) -> Result<PathBuf> {
        let installed = Self::installed(target)?;
        let pack = installed
            .get(name)
            .ok_or_else(|| PackError::NotFound(name.to_owned()))?;

        if Self::receipt(&pack.path)?.is_none() {
            return Err(PackError::NotInstalled {
                name: name.to_owned(),
                path: pack.path.clone(),
            });
        }

        std::fs::remove_dir_all(&pack.path)?;
        tracing::info!(name = %name, path = %pack.path.display(), "pack removed");
        Ok(pack.path.clone())
    }

    /// Read the receipt of an installed pack directory, if it has one.
    pub fn receipt(pack_dir: &Path) -> Result<Option<InstallReceipt>> {
        let path = pack_dir.join(RECEIPT_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&text)?))
    }
}

/// Hidden scratch directory inside `parent`, removed on drop.
fn stage_dir(parent: &Path) -> Result<tempfile::TempDir> {
    Ok(tempfile::Builder::new()
        .prefix(".packshelf-")
        .tempdir_in(parent)?)
}

/// Canonical form of `path`, resolving the longest existing prefix so that
/// paths which do not exist yet can still be compared.
fn resolved(path: &Path) -> PathBuf {
    let mut existing = path;
    let mut tail = Vec::new();
    loop {
        let lookup = if existing.as_os_str().is_empty() {
            Path::new(".")
        } else {
            existing
        };
        if let Ok(mut full) = lookup.canonicalize() {
            full.extend(tail.iter().rev());
            return full;
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                tail.push(name.to_owned());
                existing = parent;
            }
            _ => return path.to_path_buf(),
        }
    }
}

/// Recursively copy regular files from `src` into `dest`.
///
/// Receipts from an earlier install are not carried along.
fn copy_dir(src: &Path, dest: &Path) -> Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;
        let target = dest.join(entry.file_name());

        if file_type.is_dir() {
            std::fs::create_dir_all(&target)?;
            copy_dir(&path, &target)?;
        } else if file_type.is_file() {
            if entry.file_name() == RECEIPT_FILE {
                continue;
            }
            std::fs::copy(&path, &target)?;
        } else {
            tracing::debug!(path = %path.display(), "skipping non-regular file");
        }
    }
    Ok(())
}

/// On-disk shape of `pack.toml`, in the order keys are written.
#[derive(Debug, serde::Serialize)]
struct MetadataFile<'a> {
    name: &'a str,
    version: &'a str,
    #[serde(rename = "type")]
    kind: PackKind,
    description: String,
    author: &'a str,
    tags: Vec<String>,
    license: &'a str,
}

/// Create a new pack skeleton under `root/<category>/<name>/`.
///
/// Writes a `pack.toml` with placeholder description, version `0.1.0` and
/// an MIT license, plus a content document stub. Returns the new directory.
pub fn scaffold(root: &Path, kind: PackKind, name: &str, author: &str) -> Result<PathBuf> {
    validate_name(name).map_err(|reason| PackError::InvalidName {
        name: name.to_owned(),
        reason,
    })?;

    let dir = root.join(kind.category_dir()).join(name);
    if dir.exists() {
        return Err(PackError::AlreadyExists { path: dir });
    }

    let metadata = MetadataFile {
        name,
        version: "0.1.0",
        kind,
        description: format!("Describe what the {name} {kind} is for."),
        author,
        tags: Vec::new(),
        license: "MIT",
    };
    let toml_text = toml::to_string(&metadata).map_err(|e| {
        PackError::invalid(dir.join(METADATA_FILE), format!("cannot serialize metadata: {e}"))
    })?;

    std::fs::create_dir_all(&dir)?;
    std::fs::write(dir.join(METADATA_FILE), toml_text)?;
    std::fs::write(dir.join(kind.content_file()), content_template(kind, name))?;

    tracing::info!(name = %name, kind = %kind, path = %dir.display(), "pack scaffolded");
    Ok(dir)
}

fn content_template(kind: PackKind, name: &str) -> String {
    let body = match kind {
        PackKind::Skill => "## When to use\n\n## Steps\n\n1. \n",
        PackKind::Context => "## Background\n\n## Conventions\n\n",
        PackKind::Prompt => "## Prompt\n\n",
    };
    format!("# {name}\n\n{body}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
