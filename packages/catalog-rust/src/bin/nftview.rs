//! nftview - browse NFT collection tables from the command line.
//!
//! Loads the site data directory, renders one page of a collection table
//! and prints the query string that reproduces it. Presets persist to a
//! JSON file when `--presets` is given and last for the process otherwise.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use nftview_catalog::render::{render_detail, render_entries, render_table};
use nftview_catalog::{Catalog, CatalogConfig, FileStore, MemoryStore};
use nftview_core::filter::{RangeFilter, SortDirection};
use nftview_core::preset::PresetStore;
use nftview_core::query::QuerySync;
use nftview_core::storage::{KeyValueStore, Namespaced};
use nftview_core::view::TableView;

type Presets = PresetStore<Namespaced<Arc<dyn KeyValueStore>>>;

/// Browse NFT collection tables.
#[derive(Parser)]
#[command(name = "nftview", about = "Browse NFT collection tables", version)]
struct Cli {
    /// Data directory holding info.json and one directory per collection.
    #[arg(long, env = "NFTVIEW_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// JSON file for saved presets. Without it presets last for this run only.
    #[arg(long, env = "NFTVIEW_PRESETS", value_name = "FILE")]
    presets: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset (e.g. "debug", "nftview_core=trace").
    #[arg(long, env = "NFTVIEW_LOG", default_value = "info")]
    log: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List collections and aggregates.
    Collections,
    /// Render one page of a collection table.
    Table {
        collection: String,
        #[command(flatten)]
        state: StateArgs,
    },
    /// Show every field of one token.
    Show { collection: String, identifier: String },
    /// Manage saved presets.
    Presets {
        #[command(subcommand)]
        action: PresetAction,
    },
}

#[derive(Subcommand)]
enum PresetAction {
    /// List presets, most recent first.
    List,
    /// Save the state described by the flags as a preset.
    Save {
        name: String,
        collection: String,
        #[command(flatten)]
        state: StateArgs,
    },
    /// Delete one preset.
    Delete { name: String },
    /// Delete every preset.
    Clear,
}

/// View state, applied in order: preset, query, then the individual flags.
#[derive(Args)]
struct StateArgs {
    /// Start from a saved preset.
    #[arg(long)]
    preset: Option<String>,
    /// Query string or full URL, as printed by a previous run.
    #[arg(long)]
    query: Option<String>,
    /// Column search, `column=text`. Repeatable.
    #[arg(long, value_name = "COL=TEXT")]
    search: Vec<String>,
    /// Accepted filter value, `column=value`. Repeatable.
    #[arg(long, value_name = "COL=VALUE")]
    filter: Vec<String>,
    /// Numeric range, `column=min..max`; either side may be empty. Repeatable.
    #[arg(long, value_name = "COL=MIN..MAX")]
    range: Vec<String>,
    /// Sort key, `column:asc` or `column:desc`, in priority order. Repeatable.
    #[arg(long, value_name = "COL:DIR")]
    sort: Vec<String>,
    /// Visible columns, comma separated.
    #[arg(long, value_delimiter = ',')]
    columns: Option<Vec<String>>,
    #[arg(long)]
    rows: Option<usize>,
    #[arg(long)]
    page: Option<usize>,
}

fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn open_presets(cli: &Cli, config: &CatalogConfig) -> Presets {
    let backend: Arc<dyn KeyValueStore> = match &cli.presets {
        Some(path) => Arc::new(FileStore::new(path)),
        None => {
            warn!("no --presets file given, presets will not persist");
            Arc::new(MemoryStore::new())
        }
    };
    PresetStore::new(Namespaced::new(backend, &config.namespace))
}

fn split_pair<'a>(arg: &'a str, sep: char, flag: &str) -> Result<(&'a str, &'a str)> {
    arg.split_once(sep)
        .with_context(|| format!("--{flag} expects `column{sep}value`, got {arg:?}"))
}

/// Applies `state` to `view`. Flags after the preset and query go through
/// the regular mutators and so reach any registered observer.
fn apply_state(view: &mut TableView, presets: &Presets, state: &StateArgs) -> Result<()> {
    if let Some(name) = &state.preset {
        presets
            .load_into(name, view)
            .with_context(|| format!("loading preset {name:?}"))?;
    }
    if let Some(query) = &state.query {
        view.apply_query(query);
    }
    for arg in &state.search {
        let (column, text) = split_pair(arg, '=', "search")?;
        view.set_search(column, text);
    }
    for arg in &state.filter {
        let (column, value) = split_pair(arg, '=', "filter")?;
        view.add_filter_value(column, value);
    }
    for arg in &state.range {
        let (column, bounds) = split_pair(arg, '=', "range")?;
        let (min, max) = bounds
            .split_once("..")
            .with_context(|| format!("--range expects `column=min..max`, got {arg:?}"))?;
        view.set_range(column, RangeFilter::new(min, max));
    }
    for arg in &state.sort {
        let (column, dir) = split_pair(arg, ':', "sort")?;
        let Some(direction) = SortDirection::parse(dir) else {
            bail!("--sort direction must be asc or desc, got {dir:?}");
        };
        view.set_sort(column, direction, None);
    }
    if let Some(columns) = &state.columns {
        view.set_visible_columns(columns);
    }
    if let Some(rows) = state.rows {
        view.set_rows_per_page(rows);
    }
    if let Some(page) = state.page {
        view.set_page(page);
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let config = CatalogConfig::with_data_dir(&cli.data_dir);
    let catalog = Catalog::load(&config)
        .with_context(|| format!("loading data from {}", cli.data_dir.display()))?;
    let presets = open_presets(cli, &config);

    match &cli.command {
        Command::Collections => print!("{}", render_entries(&catalog.entries())),
        Command::Table { collection, state } => {
            let mut view = catalog.open_view(collection)?;
            let sync = Arc::new(QuerySync::for_view(&view));
            view.add_observer(sync.clone());
            apply_state(&mut view, &presets, state)?;

            println!("{}", render_table(&view));
            let query = sync.current();
            if !query.is_empty() {
                println!("?{query}");
            }
        }
        Command::Show {
            collection,
            identifier,
        } => print!("{}", render_detail(&catalog.token(collection, identifier)?)),
        Command::Presets { action } => match action {
            PresetAction::List => {
                for preset in presets.list()? {
                    println!(
                        "{}  (saved {}, {} columns, {} per page)",
                        preset.name,
                        preset.timestamp,
                        preset.visible_columns.len(),
                        preset.rows_per_page
                    );
                }
            }
            PresetAction::Save {
                name,
                collection,
                state,
            } => {
                let mut view = catalog.open_view(collection)?;
                apply_state(&mut view, &presets, state)?;
                let preset = presets.save(name, &view)?;
                info!(name = %preset.name, "preset saved");
            }
            PresetAction::Delete { name } => {
                if !presets.delete(name)? {
                    bail!("no preset named {name:?}");
                }
            }
            PresetAction::Clear => presets.clear()?,
        },
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log);
    run(&cli)
}
