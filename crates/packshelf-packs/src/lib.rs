//! Pack registry for packshelf.
//!
//! A registry is a directory tree of natural-language packs:
//!
//! ```text
//! skills/<name>/pack.toml + SKILL.md
//! contexts/<name>/pack.toml + CONTEXT.md
//! prompts/<name>/pack.toml + PROMPT.md
//! ```
//!
//! This crate provides:
//!
//! - **Metadata parser**: validates `pack.toml` (name, version, type,
//!   description, author, tags, license).
//!
//! - **Index builder**: scans a registry root into a [`PackIndex`]. Broken
//!   packs and duplicate names are collected as [`IndexWarning`]s; only an
//!   unreadable root fails the scan.
//!
//! - **Search**: ranked, case-insensitive lookup over the index.
//!
//! - **Pack manager**: install packs into a consumer directory, remove
//!   them, and scaffold new ones.
//!
//! # Example
//!
//! ```rust,no_run
//! use packshelf_packs::{PackManager, SearchOptions};
//!
//! let manager = PackManager::open(".").unwrap();
//! for warning in manager.index().warnings() {
//!     eprintln!("{warning}");
//! }
//!
//! for hit in manager.search("git", &SearchOptions::default()) {
//!     println!("{} {}", hit.pack.name, hit.pack.version);
//! }
//! ```

pub mod error;
pub mod index;
pub mod loader;
pub mod manager;
pub mod parser;
pub mod search;
pub mod types;

pub use error::{PackError, Result};
pub use index::{IndexWarning, PackIndex, WarningKind};
pub use loader::{build_index, load_pack_from_dir};
pub use manager::{PackManager, scaffold};
pub use parser::{parse_pack_toml, validate_name};
pub use search::{MatchKind, SearchHit, SearchOptions, search, search_with};
pub use types::{InstallReceipt, METADATA_FILE, Pack, PackKind, PackSummary, RECEIPT_FILE};
