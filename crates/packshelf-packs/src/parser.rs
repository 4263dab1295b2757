//! `pack.toml` parser.
//!
//! ```text
//! name = "commit-message"
//! version = "1.0.0"
//! type = "prompt"
//! description = "Write conventional commit messages from a staged diff."
//! author = "octo"
//! tags = ["git", "commits"]
//! license = "MIT"
//! ```
//!
//! Every key is required. Unknown keys are ignored.

use std::path::Path;

use crate::error::{PackError, Result};
use crate::types::{Pack, PackKind};

const MAX_NAME_LEN: usize = 64;

/// Raw metadata as it appears on disk, before validation.
#[derive(Debug, serde::Deserialize)]
struct RawMetadata {
    name: Option<String>,
    version: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    description: Option<String>,
    author: Option<String>,
    tags: Option<Vec<String>>,
    license: Option<String>,
}

/// Parse and validate the text of a `pack.toml` file.
///
/// `source_path` is used for error reporting and becomes the pack's directory
/// when it names a file. The returned pack has empty content; the loader
/// fills it in.
pub fn parse_pack_toml(content: &str, source_path: &Path) -> Result<Pack> {
    let raw: RawMetadata = toml::from_str(content)
        .map_err(|e| PackError::invalid(source_path, format!("TOML parse error: {e}")))?;

    let name = required(raw.name, "name", source_path)?;
    validate_name(&name).map_err(|reason| PackError::invalid(source_path, reason))?;

    let version = required(raw.version, "version", source_path)?;
    if !is_semver(&version) {
        return Err(PackError::invalid(
            source_path,
            format!("`version` is not a semantic version: `{version}`"),
        ));
    }

    let kind: PackKind = required(raw.kind, "type", source_path)?
        .parse()
        .map_err(|reason: String| PackError::invalid(source_path, reason))?;

    let description = required(raw.description, "description", source_path)?;
    let author = required(raw.author, "author", source_path)?;
    let license = required(raw.license, "license", source_path)?;

    let tags = raw.tags.ok_or_else(|| missing("tags", source_path))?;
    let mut unique: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_owned();
        if tag.is_empty() {
            return Err(PackError::invalid(source_path, "`tags` contains an empty tag"));
        }
        if !unique.contains(&tag) {
            unique.push(tag);
        }
    }

    let dir = if source_path.file_name().is_some_and(|n| n == crate::METADATA_FILE) {
        source_path.parent().unwrap_or(source_path)
    } else {
        source_path
    };

    Ok(Pack {
        name,
        version,
        kind,
        description,
        author,
        tags: unique,
        license,
        content: String::new(),
        path: dir.to_path_buf(),
    })
}

fn missing(field: &str, path: &Path) -> PackError {
    PackError::invalid(path, format!("missing required field `{field}`"))
}

/// Require a string field to be present and non-blank.
fn required(value: Option<String>, field: &str, path: &Path) -> Result<String> {
    let value = value.ok_or_else(|| missing(field, path))?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PackError::invalid(path, format!("`{field}` must not be empty")));
    }
    Ok(trimmed.to_owned())
}

/// Check a pack name: lowercase ASCII letters, digits and inner hyphens.
pub fn validate_name(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("name must not be empty".into());
    }
    if name.len() > MAX_NAME_LEN {
        return Err(format!("name exceeds {MAX_NAME_LEN} characters"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err("name must be lowercase letters, digits and hyphens only".into());
    }
    if name.starts_with('-') || name.ends_with('-') {
        return Err("name must not start or end with a hyphen".into());
    }
    Ok(())
}

/// `MAJOR.MINOR.PATCH` with optional `-prerelease` and `+build` suffixes.
fn is_semver(version: &str) -> bool {
    let (rest, build) = match version.split_once('+') {
        Some((rest, build)) => (rest, Some(build)),
        None => (version, None),
    };
    let (core, pre) = match rest.split_once('-') {
        Some((core, pre)) => (core, Some(pre)),
        None => (rest, None),
    };

    let numeric = |part: &str| {
        !part.is_empty()
            && part.chars().all(|c| c.is_ascii_digit())
            && (part == "0" || !part.starts_with('0'))
    };
    let dotted = |s: &str| {
        s.split('.')
            .all(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'))
    };

    let parts: Vec<&str> = core.split('.').collect();
    parts.len() == 3
        && parts.iter().all(|&p| numeric(p))
        && pre.is_none_or(dotted)
        && build.is_none_or(dotted)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
