//! CLI argument definitions for packshelf.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use packshelf_packs::PackKind;

/// packshelf -- browse, search and install skill, context and prompt packs.
#[derive(Parser)]
#[command(
    name = "packshelf",
    version,
    about = "packshelf -- browse, search and install instruction packs",
    long_about = "Indexes a registry of skill, context and prompt packs (folders with a \
                  pack.toml and a markdown document) and lets you search, inspect, \
                  validate and install them."
)]
pub struct Cli {
    /// Registry root containing skills/, contexts/ and prompts/.
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Config file (defaults to ./packshelf.toml when present).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(long, short, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every pack in the registry.
    List {
        /// Only show packs of this type (skill, context, prompt).
        #[arg(long = "type", short = 't')]
        kind: Option<PackKind>,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Search packs by name, description or tag.
    Search {
        /// Search query; omit to match everything.
        query: Option<String>,
        /// Only show packs of this type.
        #[arg(long = "type", short = 't')]
        kind: Option<PackKind>,
        /// Only show packs carrying this tag.
        #[arg(long)]
        tag: Option<String>,
        /// Maximum number of results.
        #[arg(long, short)]
        limit: Option<usize>,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Show details of a pack.
    Info {
        /// Pack name.
        name: String,
        /// Also print the pack's markdown document.
        #[arg(long, short)]
        content: bool,
    },

    /// Check every pack and report problems. Exits with status 1 on warnings.
    Validate,

    /// Copy a pack into the install target.
    Install {
        /// Pack name.
        name: String,
        /// Directory to install into.
        #[arg(long, value_name = "DIR")]
        target: Option<PathBuf>,
        /// Replace an existing installation.
        #[arg(long, short)]
        force: bool,
    },

    /// Remove an installed pack from the install target.
    Remove {
        /// Pack name.
        name: String,
        /// Directory the pack was installed into.
        #[arg(long, value_name = "DIR")]
        target: Option<PathBuf>,
    },

    /// List packs in the install target.
    Installed {
        /// Directory to inspect.
        #[arg(long, value_name = "DIR")]
        target: Option<PathBuf>,
    },

    /// Scaffold a new pack in the registry.
    New {
        /// Pack type (skill, context, prompt).
        kind: PackKind,
        /// Pack name (lowercase letters, digits, hyphens).
        name: String,
        /// Author recorded in pack.toml (defaults to $USER).
        #[arg(long)]
        author: Option<String>,
    },
}

impl Commands {
    /// The `--target` flag of the install-side subcommands, if given.
    pub fn target(&self) -> Option<PathBuf> {
        match self {
            Self::Install { target, .. }
            | Self::Remove { target, .. }
            | Self::Installed { target } => target.clone(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_search_with_filters() {
        let cli = Cli::try_parse_from([
            "packshelf", "--root", "reg", "search", "git", "--type", "prompt", "--tag", "pr",
            "-l", "3",
        ])
        .unwrap();
        assert_eq!(cli.root, Some(PathBuf::from("reg")));
        match cli.command {
            Commands::Search {
                query,
                kind,
                tag,
                limit,
                json,
            } => {
                assert_eq!(query.as_deref(), Some("git"));
                assert_eq!(kind, Some(PackKind::Prompt));
                assert_eq!(tag.as_deref(), Some("pr"));
                assert_eq!(limit, Some(3));
                assert!(!json);
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn search_query_is_optional() {
        let cli = Cli::try_parse_from(["packshelf", "search"]).unwrap();
        assert!(matches!(cli.command, Commands::Search { query: None, .. }));
    }

    #[test]
    fn rejects_unknown_type() {
        assert!(Cli::try_parse_from(["packshelf", "new", "recipe", "x"]).is_err());
    }

    #[test]
    fn verbose_counts() {
        let cli = Cli::try_parse_from(["packshelf", "-vv", "validate"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn target_flag_is_exposed_per_command() {
        let cli = Cli::try_parse_from(["packshelf", "remove", "triage", "--target", "vendor"])
            .unwrap();
        assert_eq!(cli.command.target(), Some(PathBuf::from("vendor")));

        let cli = Cli::try_parse_from(["packshelf", "installed"]).unwrap();
        assert_eq!(cli.command.target(), None);

        let cli = Cli::try_parse_from(["packshelf", "list"]).unwrap();
        assert_eq!(cli.command.target(), None);
    }
}
