//! CLI entry point for packshelf.
//!
//! This binary provides the `packshelf` command with subcommands for
//! listing, searching, inspecting, validating, scaffolding and installing
//! packs from a registry directory.

mod cli;
mod config;
mod helpers;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use packshelf_packs::{PackError, PackKind, PackManager, SearchOptions};

use crate::cli::{Cli, Commands};
use crate::config::{FileConfig, Settings};
use crate::helpers::{
    default_author, init_tracing, level_for, render_hits, render_info, render_table,
    render_warnings,
};

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(level_for(cli.verbose));

    let settings = FileConfig::discover(cli.config.as_deref())?.resolve(
        cli.root,
        cli.command.target(),
        |key| std::env::var(key).ok(),
    );
    tracing::debug!(
        root = %settings.root.display(),
        target = %settings.target.display(),
        "settings resolved"
    );

    match cli.command {
        Commands::List { kind, json } => cmd_list(&settings, kind, json),
        Commands::Search {
            query,
            kind,
            tag,
            limit,
            json,
        } => cmd_search(&settings, query.as_deref().unwrap_or(""), kind, tag, limit, json),
        Commands::Info { name, content } => cmd_info(&settings, &name, content),
        Commands::Validate => cmd_validate(&settings),
        Commands::Install { name, force, .. } => cmd_install(&settings, &name, force),
        Commands::Remove { name, .. } => cmd_remove(&settings, &name),
        Commands::Installed { .. } => cmd_installed(&settings),
        Commands::New { kind, name, author } => cmd_new(&settings, kind, &name, author),
    }
}

fn open_registry(settings: &Settings) -> Result<PackManager> {
    PackManager::open(&settings.root)
        .with_context(|| format!("failed to index registry at {}", settings.root.display()))
}

// ---------------------------------------------------------------------------
// Subcommands: list / search / info
// ---------------------------------------------------------------------------

fn cmd_list(settings: &Settings, kind: Option<PackKind>, json: bool) -> Result<ExitCode> {
    let manager = open_registry(settings)?;
    let summaries: Vec<_> = manager
        .index()
        .iter()
        .filter(|p| kind.is_none_or(|k| p.kind == k))
        .map(|p| p.summary())
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        print!("{}", render_table(&summaries));
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_search(
    settings: &Settings,
    query: &str,
    kind: Option<PackKind>,
    tag: Option<String>,
    limit: Option<usize>,
    json: bool,
) -> Result<ExitCode> {
    let manager = open_registry(settings)?;
    let options = SearchOptions {
        kind,
        tag,
        limit: limit.or(settings.search_limit),
    };
    let hits = manager.search(query, &options);
    tracing::info!(query = %query, hits = hits.len(), "search complete");

    if json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
    } else {
        print!("{}", render_hits(&hits));
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_info(settings: &Settings, name: &str, content: bool) -> Result<ExitCode> {
    let manager = open_registry(settings)?;
    let pack = manager
        .get(name)
        .ok_or_else(|| PackError::NotFound(name.to_owned()))?;
    print!("{}", render_info(pack, content));
    Ok(ExitCode::SUCCESS)
}

// ---------------------------------------------------------------------------
// Subcommand: validate
// ---------------------------------------------------------------------------

fn cmd_validate(settings: &Settings) -> Result<ExitCode> {
    let manager = open_registry(settings)?;
    let index = manager.index();
    let warnings = index.warnings();

    if warnings.is_empty() {
        println!("  [+] {} packs OK", index.len());
        return Ok(ExitCode::SUCCESS);
    }

    print!("{}", render_warnings(warnings));
    println!(
        "  {} packs OK, {} problem(s) found",
        index.len(),
        warnings.len()
    );
    Ok(ExitCode::FAILURE)
}

// ---------------------------------------------------------------------------
// Subcommands: install / remove / installed
// ---------------------------------------------------------------------------

fn cmd_install(settings: &Settings, name: &str, force: bool) -> Result<ExitCode> {
    let manager = open_registry(settings)?;
    let dest = manager
        .install(name, &settings.target, force)
        .with_context(|| format!("failed to install `{name}`"))?;
    println!("  [+] Installed {name} to {}", dest.display());
    Ok(ExitCode::SUCCESS)
}

fn cmd_remove(settings: &Settings, name: &str) -> Result<ExitCode> {
    let removed = PackManager::remove_installed(&settings.target, name)
        .with_context(|| format!("failed to remove `{name}`"))?;
    println!("  [-] Removed {name} from {}", removed.display());
    Ok(ExitCode::SUCCESS)
}

fn cmd_installed(settings: &Settings) -> Result<ExitCode> {
    let installed = PackManager::installed(&settings.target).with_context(|| {
        format!("failed to read install target {}", settings.target.display())
    })?;
    let summaries: Vec<_> = installed.iter().map(|p| p.summary()).collect();
    print!("{}", render_table(&summaries));
    Ok(ExitCode::SUCCESS)
}

// ---------------------------------------------------------------------------
// Subcommand: new
// ---------------------------------------------------------------------------

fn cmd_new(
    settings: &Settings,
    kind: PackKind,
    name: &str,
    author: Option<String>,
) -> Result<ExitCode> {
    let author = author.unwrap_or_else(default_author);
    let dir = packshelf_packs::scaffold(&settings.root, kind, name, &author)
        .with_context(|| format!("failed to create {kind} `{name}`"))?;
    println!("  [+] Created {}", dir.display());
    println!("      Edit {} and the document next to it.", packshelf_packs::METADATA_FILE);
    Ok(ExitCode::SUCCESS)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    fn settings_for(root: &Path) -> Settings {
        Settings {
            root: root.to_path_buf(),
            target: root.join("installed"),
            search_limit: None,
        }
    }

    #[test]
    fn validate_clean_registry_succeeds() {
        let tmp = tempfile::tempdir().unwrap();
        packshelf_packs::scaffold(tmp.path(), PackKind::Prompt, "release-notes", "octo").unwrap();
        assert_eq!(cmd_validate(&settings_for(tmp.path())).unwrap(), ExitCode::SUCCESS);
    }

    #[test]
    fn validate_with_warnings_fails() {
        let tmp = tempfile::tempdir().unwrap();
        packshelf_packs::scaffold(tmp.path(), PackKind::Prompt, "release-notes", "octo").unwrap();
        std::fs::create_dir_all(tmp.path().join("skills").join("orphan")).unwrap();
        assert_eq!(cmd_validate(&settings_for(tmp.path())).unwrap(), ExitCode::FAILURE);
    }

    #[test]
    fn validate_missing_root_is_an_error() {
        let settings = settings_for(&PathBuf::from("/nonexistent/packshelf/root"));
        assert!(cmd_validate(&settings).is_err());
    }

    #[test]
    fn install_and_remove_use_resolved_target() {
        let tmp = tempfile::tempdir().unwrap();
        packshelf_packs::scaffold(tmp.path(), PackKind::Skill, "triage", "octo").unwrap();
        let settings = settings_for(tmp.path());

        cmd_install(&settings, "triage", false).unwrap();
        assert!(settings.target.join("skills/triage/.packshelf.json").exists());

        cmd_remove(&settings, "triage").unwrap();
        assert!(!settings.target.join("skills/triage").exists());
        assert!(cmd_remove(&settings, "triage").is_err());
    }

    #[test]
    fn remove_never_touches_registry_packs() {
        let tmp = tempfile::tempdir().unwrap();
        packshelf_packs::scaffold(tmp.path(), PackKind::Skill, "triage", "octo").unwrap();
        let settings = Settings {
            target: tmp.path().to_path_buf(),
            ..settings_for(tmp.path())
        };
        assert!(cmd_remove(&settings, "triage").is_err());
        assert!(tmp.path().join("skills/triage/pack.toml").exists());
    }
}
