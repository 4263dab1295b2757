//! Pack type definitions.
//!
//! A pack is a directory under one of the category directories (`skills/`,
//! `contexts/`, `prompts/`) holding a `pack.toml` metadata file and a single
//! markdown document whose file name depends on the pack type.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Name of the metadata file every pack directory must contain.
pub const METADATA_FILE: &str = "pack.toml";

/// Name of the receipt written next to an installed pack.
pub const RECEIPT_FILE: &str = ".packshelf.json";

/// The three kinds of pack the registry tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackKind {
    /// Step-by-step instructions for performing a task.
    Skill,
    /// Background knowledge to load before working.
    Context,
    /// A ready-made prompt.
    Prompt,
}

impl PackKind {
    /// All kinds, in registry scan order.
    pub const ALL: [PackKind; 3] = [Self::Skill, Self::Context, Self::Prompt];

    /// Category directory holding packs of this kind.
    pub fn category_dir(&self) -> &'static str {
        match self {
            Self::Skill => "skills",
            Self::Context => "contexts",
            Self::Prompt => "prompts",
        }
    }

    /// File name of the instructional document that accompanies the metadata.
    pub fn content_file(&self) -> &'static str {
        match self {
            Self::Skill => "SKILL.md",
            Self::Context => "CONTEXT.md",
            Self::Prompt => "PROMPT.md",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skill => "skill",
            Self::Context => "context",
            Self::Prompt => "prompt",
        }
    }
}

impl fmt::Display for PackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "skill" | "skills" => Ok(Self::Skill),
            "context" | "contexts" => Ok(Self::Context),
            "prompt" | "prompts" => Ok(Self::Prompt),
            other => Err(format!(
                "unknown pack type `{other}` (expected skill, context or prompt)"
            )),
        }
    }
}

/// A fully parsed and validated pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pack {
    /// Unique pack name (e.g. `commit-message`).
    pub name: String,

    /// Semantic version string (e.g. `1.2.0`).
    pub version: String,

    /// Which kind of pack this is.
    #[serde(rename = "type")]
    pub kind: PackKind,

    /// Short human-readable description.
    pub description: String,

    /// Author name or handle.
    pub author: String,

    /// Tags used by search, deduplicated in declaration order.
    pub tags: Vec<String>,

    /// Free-form license identifier (e.g. `MIT`).
    pub license: String,

    /// Body of the pack's markdown document; empty if the file is absent.
    #[serde(skip)]
    pub content: String,

    /// Directory the pack was loaded from.
    #[serde(skip)]
    pub path: PathBuf,
}

impl Pack {
    /// Path of the metadata file inside the pack directory.
    pub fn metadata_path(&self) -> PathBuf {
        self.path.join(METADATA_FILE)
    }

    /// Path of the content document inside the pack directory.
    pub fn content_path(&self) -> PathBuf {
        self.path.join(self.kind.content_file())
    }

    /// Whether any tag equals `tag`, ignoring case.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    pub fn summary(&self) -> PackSummary {
        PackSummary {
            name: self.name.clone(),
            version: self.version.clone(),
            kind: self.kind,
            description: self.description.clone(),
            author: self.author.clone(),
            tags: self.tags.clone(),
        }
    }
}

/// Compact view of a pack, as returned by listing and search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackSummary {
    pub name: String,
    pub version: String,
    #[serde(rename = "type")]
    pub kind: PackKind,
    pub description: String,
    pub author: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Receipt written into the destination directory on install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallReceipt {
    pub name: String,
    pub version: String,
    #[serde(rename = "type")]
    pub kind: PackKind,
    /// Registry directory the pack was copied from.
    pub source: PathBuf,
    /// RFC 3339 timestamp of the install.
    pub installed_at: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
