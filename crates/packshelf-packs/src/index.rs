//! The in-memory pack index and the warnings collected while building it.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::types::{Pack, PackKind};

/// Kind of problem found with a single pack during a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WarningKind {
    /// Metadata missing, unparseable or failing validation; pack skipped.
    InvalidMetadata,
    /// Another pack already claimed the name; this one was skipped.
    DuplicateName,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMetadata => f.write_str("InvalidMetadata"),
            Self::DuplicateName => f.write_str("DuplicateName"),
        }
    }
}

/// A non-fatal problem recorded during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexWarning {
    pub kind: WarningKind,
    /// Pack directory the warning is about.
    pub path: PathBuf,
    pub message: String,
}

impl fmt::Display for IndexWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.kind, self.path.display(), self.message)
    }
}

/// Mapping from pack name to pack, plus the warnings from the scan that
/// produced it.
///
/// Iteration is always in ascending name order.
#[derive(Debug, Clone, Default)]
pub struct PackIndex {
    root: PathBuf,
    packs: BTreeMap<String, Pack>,
    warnings: Vec<IndexWarning>,
}

impl PackIndex {
    /// Create an empty index for `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            packs: BTreeMap::new(),
            warnings: Vec::new(),
        }
    }

    /// Insert a pack unless its name is taken.
    ///
    /// First insert wins: a later pack with the same name is dropped and a
    /// [`WarningKind::DuplicateName`] warning is recorded instead.
    /// Returns `true` if the pack was added.
    pub fn insert(&mut self, pack: Pack) -> bool {
        if let Some(existing) = self.packs.get(&pack.name) {
            tracing::warn!(
                name = %pack.name,
                kept = %existing.path.display(),
                skipped = %pack.path.display(),
                "duplicate pack name"
            );
            let message = format!(
                "pack name `{}` already used by `{}`; keeping the first one",
                pack.name,
                existing.path.display()
            );
            self.warnings.push(IndexWarning {
                kind: WarningKind::DuplicateName,
                path: pack.path,
                message,
            });
            return false;
        }
        self.packs.insert(pack.name.clone(), pack);
        true
    }

    pub(crate) fn warn(&mut self, kind: WarningKind, path: PathBuf, message: String) {
        self.warnings.push(IndexWarning {
            kind,
            path,
            message,
        });
    }

    /// Directory this index was built from.
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    pub fn get(&self, name: &str) -> Option<&Pack> {
        self.packs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.packs.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.packs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packs.is_empty()
    }

    /// All packs in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Pack> {
        self.packs.values()
    }

    /// Packs of one kind, in name order.
    pub fn of_kind(&self, kind: PackKind) -> impl Iterator<Item = &Pack> {
        self.packs.values().filter(move |p| p.kind == kind)
    }

    /// All warnings, in the order they were found.
    pub fn warnings(&self) -> &[IndexWarning] {
        &self.warnings
    }

    pub fn warnings_of(&self, kind: WarningKind) -> impl Iterator<Item = &IndexWarning> {
        self.warnings.iter().filter(move |w| w.kind == kind)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn pack(name: &str, kind: PackKind, dir: &str) -> Pack {
        Pack {
            name: name.into(),
            version: "1.0.0".into(),
            kind,
            description: format!("{name} description"),
            author: "octo".into(),
            tags: Vec::new(),
            license: "MIT".into(),
            content: String::new(),
            path: PathBuf::from(dir),
        }
    }

    #[test]
    fn first_insert_wins() {
        let mut index = PackIndex::new(".");
        assert!(index.insert(pack("review", PackKind::Skill, "skills/review")));
        assert!(!index.insert(pack("review", PackKind::Prompt, "prompts/review")));

        assert_eq!(index.len(), 1);
        assert_eq!(index.get("review").unwrap().kind, PackKind::Skill);

        let dupes: Vec<_> = index.warnings_of(WarningKind::DuplicateName).collect();
        assert_eq!(dupes.len(), 1);
        assert_eq!(dupes[0].path, PathBuf::from("prompts/review"));
        assert!(dupes[0].message.contains("skills/review"));
    }

    #[test]
    fn iteration_is_name_ordered() {
        let mut index = PackIndex::new(".");
        index.insert(pack("zeta", PackKind::Prompt, "prompts/zeta"));
        index.insert(pack("alpha", PackKind::Context, "contexts/alpha"));
        index.insert(pack("mid", PackKind::Skill, "skills/mid"));

        let names: Vec<_> = index.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);

        let skills: Vec<_> = index.of_kind(PackKind::Skill).map(|p| p.name.as_str()).collect();
        assert_eq!(skills, vec!["mid"]);
    }

    #[test]
    fn warning_display() {
        let w = IndexWarning {
            kind: WarningKind::InvalidMetadata,
            path: PathBuf::from("skills/bad"),
            message: "missing required field `name`".into(),
        };
        assert_eq!(
            w.to_string(),
            "InvalidMetadata: skills/bad: missing required field `name`"
        );
    }
}
