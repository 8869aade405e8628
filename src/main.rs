//! canopy CLI - inspect and edit a covered trie snapshot
//!
//! Every command loads the snapshot named by `--store`, applies one
//! operation and, for mutating commands, writes the new version back.
//! Output is JSON on stdout; log lines go to stderr under `RUST_LOG`.

use anyhow::{bail, Context};
use canopy::store::is_snapshot;
use canopy::{
    diff_tries, from_json, parse_query, read_snapshot, write_snapshot, CoveredTrie, Diff,
    DiffEntry, UniqueGroup,
};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

type Store = CoveredTrie<String, String>;

#[derive(Parser)]
#[command(name = "canopy")]
#[command(about = "A persistent compressed prefix trie with covered lookup")]
#[command(version)]
struct Cli {
    /// Path to the snapshot file
    #[arg(short, long, default_value = "trie.canopy")]
    store: PathBuf,

    /// Output format (json or text)
    #[arg(short, long, default_value = "json")]
    format: OutputFormat,

    /// Separator between path segments
    #[arg(long, default_value = "/")]
    separator: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty snapshot
    Init {
        /// Replace an existing snapshot
        #[arg(long)]
        force: bool,
    },

    // === Value Commands ===
    /// Store a value at a path
    Set { path: String, value: String },

    /// Show the value stored at exactly a path
    Get { path: String },

    /// Remove the value at a path
    Delete { path: String },

    /// List stored paths and values
    List {
        /// Only paths at or below this one
        #[arg(short, long)]
        under: Option<String>,
    },

    // === Cover Commands ===
    /// Show the value governing a path
    Cover { path: String },

    /// Set the root cover
    SetCover { value: String },

    /// Remove the root cover
    ClearCover,

    // === Whole-Trie Commands ===
    /// Merge another snapshot in; its values win
    Merge { other: PathBuf },

    /// Show changes from this snapshot to another
    Diff {
        other: PathBuf,

        /// Only changes at or below this path
        #[arg(short, long)]
        under: Option<String>,
    },

    /// Print the snapshot as JSON
    Export,

    /// Replace the snapshot with a JSON export
    Import { file: PathBuf },

    /// Parse a set query such as `{a{b,c},d}`
    Parse { query: String },

    /// Show snapshot status
    Status,
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        tracing::debug!(error = ?err, "command failed");
        let _ = output(
            cli.format,
            &json!({
                "status": "error",
                "message": format!("{:#}", err)
            }),
        );
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let path_of = |raw: &str| split_path(raw, &cli.separator);

    match &cli.command {
        Commands::Init { force } => {
            if cli.store.exists() && !force {
                bail!(
                    "{} already exists (use --force to replace it)",
                    cli.store.display()
                );
            }
            save(&cli.store, &Store::default())?;
            output(
                cli.format,
                &json!({
                    "status": "ok",
                    "message": format!("Created snapshot at {}", cli.store.display())
                }),
            )?;
        }

        Commands::Set { path, value } => {
            let keys = non_empty(path_of(path))?;
            let store = load(&cli.store)?.setting(&keys, value.clone());
            save(&cli.store, &store)?;
            output(
                cli.format,
                &json!({
                    "status": "ok",
                    "path": keys,
                    "hash": store.content_hash()?.to_hex()
                }),
            )?;
        }

        Commands::Get { path } => {
            let keys = path_of(path);
            let store = load(&cli.store)?;
            match store.trie().get(&keys) {
                Some(value) => output(cli.format, &json!({ "path": keys, "value": value }))?,
                None => bail!("No value at {}", path),
            }
        }

        Commands::Delete { path } => {
            let keys = non_empty(path_of(path))?;
            let before = load(&cli.store)?;
            if !before.trie().contains(&keys) {
                bail!("No value at {}", path);
            }
            let store = before.deleting(&keys);
            save(&cli.store, &store)?;
            output(cli.format, &json!({ "status": "ok", "path": keys }))?;
        }

        Commands::List { under } => {
            let store = load(&cli.store)?;
            let prefix = under.as_deref().map(path_of).unwrap_or_default();
            let items: Vec<_> = store
                .trie()
                .including(&prefix)
                .elements()
                .into_iter()
                .filter(|(key, _)| key.starts_with(&prefix))
                .map(|(key, value)| json!({ "path": key, "value": value }))
                .collect();
            output(
                cli.format,
                &json!({
                    "count": items.len(),
                    "entries": items
                }),
            )?;
        }

        Commands::Cover { path } => {
            let keys = path_of(path);
            let store = load(&cli.store)?;
            output(
                cli.format,
                &json!({
                    "path": keys,
                    "cover": store.cover_at(&keys)
                }),
            )?;
        }

        Commands::SetCover { value } => {
            let store = load(&cli.store)?.setting_cover(value.clone());
            save(&cli.store, &store)?;
            output(cli.format, &json!({ "status": "ok", "cover": value }))?;
        }

        Commands::ClearCover => {
            let store = load(&cli.store)?.clearing_cover();
            save(&cli.store, &store)?;
            output(cli.format, &json!({ "status": "ok", "cover": null }))?;
        }

        Commands::Merge { other } => {
            let theirs = load(other)?;
            let store = load(&cli.store)?.overwrite(&theirs);
            save(&cli.store, &store)?;
            output(
                cli.format,
                &json!({
                    "status": "ok",
                    "entries": store.trie().len(),
                    "hash": store.content_hash()?.to_hex()
                }),
            )?;
        }

        Commands::Diff { other, under } => {
            let ours = load(&cli.store)?;
            let theirs = load(other)?;
            let mut diff = diff_tries(ours.trie(), theirs.trie());
            if let Some(under) = under {
                let prefix = path_of(under);
                diff = Diff::new(diff.changes_under(&prefix).cloned().collect());
            }
            let entries: Vec<_> = diff
                .entries
                .iter()
                .map(|e| match e {
                    DiffEntry::Added { key, value } => {
                        json!({ "type": "added", "path": key, "value": value })
                    }
                    DiffEntry::Removed { key, value } => {
                        json!({ "type": "removed", "path": key, "value": value })
                    }
                    DiffEntry::Modified { key, old, new } => json!({
                        "type": "modified",
                        "path": key,
                        "old": old,
                        "new": new
                    }),
                })
                .collect();
            output(
                cli.format,
                &json!({
                    "from": ours.content_hash()?.to_hex(),
                    "to": theirs.content_hash()?.to_hex(),
                    "cover_changed": ours.cover() != theirs.cover(),
                    "added": diff.added_count(),
                    "removed": diff.removed_count(),
                    "modified": diff.modified_count(),
                    "entries": entries
                }),
            )?;
        }

        Commands::Export => {
            let store = load(&cli.store)?;
            output(cli.format, &serde_json::to_value(&store)?)?;
        }

        Commands::Import { file } => {
            let text = fs::read_to_string(file)
                .with_context(|| format!("reading {}", file.display()))?;
            let store: Store = from_json(&text)
                .with_context(|| format!("decoding {}", file.display()))?;
            save(&cli.store, &store)?;
            output(
                cli.format,
                &json!({
                    "status": "ok",
                    "entries": store.trie().len(),
                    "hash": store.content_hash()?.to_hex()
                }),
            )?;
        }

        Commands::Parse { query } => {
            let set = parse_query(query)?;
            output(
                cli.format,
                &json!({
                    "count": set.len(),
                    "members": set.to_array(),
                    "trie": serde_json::to_value(&set)?
                }),
            )?;
        }

        Commands::Status => {
            if !is_snapshot(&cli.store) {
                bail!("{} is not a canopy snapshot", cli.store.display());
            }
            let store = load(&cli.store)?;
            let size = fs::metadata(&cli.store)?.len();
            output(
                cli.format,
                &json!({
                    "store": cli.store.display().to_string(),
                    "entries": store.trie().len(),
                    "has_cover": store.cover().is_some(),
                    "hash": store.content_hash()?.to_hex(),
                    "bytes": size
                }),
            )?;
        }
    }

    Ok(())
}

/// Split `raw` on `separator`, dropping empty segments
fn split_path(raw: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        return raw.chars().map(String::from).collect();
    }
    raw.split(separator)
        .filter(|segment| !segment.is_empty())
        .map(String::from)
        .collect()
}

fn non_empty(keys: Vec<String>) -> anyhow::Result<Vec<String>> {
    if keys.is_empty() {
        bail!("path must name at least one segment");
    }
    Ok(keys)
}

fn load(path: &Path) -> anyhow::Result<Store> {
    read_snapshot(path).with_context(|| format!("opening {}", path.display()))
}

fn save(path: &Path, store: &Store) -> anyhow::Result<()> {
    write_snapshot(path, store).with_context(|| format!("writing {}", path.display()))
}

fn output(format: OutputFormat, value: &serde_json::Value) -> anyhow::Result<()> {
    let text = match format {
        OutputFormat::Json => serde_json::to_string(value)?,
        OutputFormat::Text => serde_json::to_string_pretty(value)?,
    };
    println!("{}", text);
    Ok(())
}

