//! # CLI Layer
//!
//! This module is **one possible UI client** for recordz. It is not the
//! application itself.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Installs the `tracing` subscriber
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Naked Execution
//!
//! Running `recordz` with no subcommand lists the active collection.
//!
//! ## Data Directory
//!
//! `RECORDZ_DATA_DIR` wins; otherwise the OS data directory for recordz
//! (e.g. `~/.local/share/recordz` on Linux).

mod print;
mod styles;

use crate::args::{Cli, Commands, QueryArgs};
use chrono::Local;
use clap::Parser;
use directories::ProjectDirs;
use print::{
    print_collections, print_full_records, print_messages, print_records, print_summary,
};
use recordz::api::{ConfigAction, RecordzApi, RecordzPaths, ResetMode, ThemeAction};
use recordz::config::RecordzConfig;
use recordz::error::{RecordzError, Result};
use recordz::query::{FieldFilter, QuerySpec, SortSpec};
use recordz::schema::parse_date;
use recordz::store::fs::FsBackend;
use std::path::PathBuf;
use styles::Palette;
use tracing_subscriber::EnvFilter;

const DATA_DIR_ENV: &str = "RECORDZ_DATA_DIR";
const LOG_ENV: &str = "RECORDZ_LOG";

struct AppContext {
    api: RecordzApi<FsBackend>,
    palette: Palette,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Create { fields }) => handle_create(&mut ctx, fields),
        Some(Commands::Update { id, fields }) => handle_update(&mut ctx, id, fields),
        Some(Commands::Delete { ids }) => handle_delete(&mut ctx, ids),
        Some(Commands::List { query }) => handle_list(&ctx, query),
        Some(Commands::View { ids }) => handle_view(&ctx, ids),
        Some(Commands::Stats {
            query,
            date,
            today,
            json,
        }) => handle_stats(&ctx, query, date, today, json),
        Some(Commands::Export { query, dir }) => handle_export(&ctx, query, dir),
        Some(Commands::Import { path }) => handle_import(&mut ctx, path),
        Some(Commands::Template { dir }) => handle_template(&ctx, dir),
        Some(Commands::Reset { reseed }) => handle_reset(&mut ctx, reseed),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        Some(Commands::Theme { value }) => handle_theme(&mut ctx, value),
        Some(Commands::Collections) => handle_collections(&ctx),
        None => handle_list(&ctx, QueryArgs::default()),
    }
}

/// Diagnostics go to stderr. `RECORDZ_LOG` takes an `EnvFilter` directive;
/// `-v` forces debug.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("recordz=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn data_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "recordz", "recordz")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| RecordzError::Config("Could not determine data directory".to_string()))
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = data_dir()?;
    let working_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let config = RecordzConfig::load_or_default(&data_dir);
    let collection = cli
        .collection
        .clone()
        .unwrap_or(config.default_collection);
    tracing::debug!(data_dir = %data_dir.display(), %collection, "starting");

    let paths = RecordzPaths {
        data_dir: data_dir.clone(),
        working_dir,
    };
    let mut api = RecordzApi::new(FsBackend::new(data_dir), paths, &collection)?;
    let palette = Palette::for_theme(api.current_theme());
    Ok(AppContext { api, palette })
}

fn build_query(args: QueryArgs) -> Result<QuerySpec> {
    let mut spec = QuerySpec::new();
    if let Some(search) = args.search {
        spec = spec.search(search);
    }
    for raw in &args.filters {
        spec.filters.push(raw.parse::<FieldFilter>()?);
    }
    if let Some(sort) = args.sort {
        spec.sort = sort.parse::<SortSpec>()?;
    }
    Ok(spec)
}

fn handle_create(ctx: &mut AppContext, fields: Vec<String>) -> Result<()> {
    let result = ctx.api.create_record(&fields)?;
    print_messages(&ctx.palette, &result.messages);
    Ok(())
}

fn handle_update(ctx: &mut AppContext, id: String, fields: Vec<String>) -> Result<()> {
    let result = ctx.api.update_record(&id, &fields)?;
    print_messages(&ctx.palette, &result.messages);
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, ids: Vec<String>) -> Result<()> {
    let result = ctx.api.delete_records(&ids)?;
    print_messages(&ctx.palette, &result.messages);
    Ok(())
}

fn handle_list(ctx: &AppContext, query: QueryArgs) -> Result<()> {
    let spec = build_query(query)?;
    let result = ctx.api.list_records(&spec)?;
    print_records(&ctx.palette, ctx.api.schema(), &result.listed_records);
    print_messages(&ctx.palette, &result.messages);
    Ok(())
}

fn handle_view(ctx: &AppContext, ids: Vec<String>) -> Result<()> {
    let result = ctx.api.view_records(&ids)?;
    print_full_records(&ctx.palette, ctx.api.schema(), &result.listed_records);
    print_messages(&ctx.palette, &result.messages);
    Ok(())
}

fn handle_stats(
    ctx: &AppContext,
    query: QueryArgs,
    date: Option<String>,
    today: bool,
    json: bool,
) -> Result<()> {
    let spec = build_query(query)?;
    let date = match (date, today) {
        (Some(raw), _) => Some(
            parse_date(&raw)
                .ok_or_else(|| RecordzError::Api(format!("Invalid date (YYYY-MM-DD): {}", raw)))?,
        ),
        (None, true) => Some(Local::now().date_naive()),
        (None, false) => None,
    };

    let result = ctx.api.stats(&spec, date)?;
    if let Some(summary) = &result.summary {
        if json {
            println!("{}", serde_json::to_string_pretty(summary)?);
        } else {
            print_summary(&ctx.palette, summary);
        }
    }
    print_messages(&ctx.palette, &result.messages);
    Ok(())
}

fn handle_export(ctx: &AppContext, query: QueryArgs, dir: Option<PathBuf>) -> Result<()> {
    let spec = build_query(query)?;
    let result = ctx.api.export_records(&spec, dir)?;
    print_messages(&ctx.palette, &result.messages);
    Ok(())
}

fn handle_import(ctx: &mut AppContext, path: PathBuf) -> Result<()> {
    let result = ctx.api.import_records(&path)?;
    print_messages(&ctx.palette, &result.messages);
    Ok(())
}

fn handle_template(ctx: &AppContext, dir: Option<PathBuf>) -> Result<()> {
    let result = ctx.api.write_template(dir)?;
    print_messages(&ctx.palette, &result.messages);
    Ok(())
}

fn handle_reset(ctx: &mut AppContext, reseed: bool) -> Result<()> {
    let mode = if reseed {
        ResetMode::Reseed
    } else {
        ResetMode::Clear
    };
    let result = ctx.api.reset(mode)?;
    print_messages(&ctx.palette, &result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let show_all = key.is_none();
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };

    let result = ctx.api.config(action)?;
    if show_all {
        if let Some(config) = &result.config {
            for (key, value) in config.entries() {
                println!("{} = {}", key, value);
            }
        }
    }
    print_messages(&ctx.palette, &result.messages);
    Ok(())
}

fn handle_theme(ctx: &mut AppContext, value: Option<String>) -> Result<()> {
    let action = match value.as_deref() {
        None => ThemeAction::Show,
        Some(v) if v.eq_ignore_ascii_case("toggle") => ThemeAction::Toggle,
        Some(v) => ThemeAction::Set(v.parse().map_err(RecordzError::Api)?),
    };
    let result = ctx.api.theme(action)?;
    print_messages(&ctx.palette, &result.messages);
    Ok(())
}

fn handle_collections(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.collections()?;
    print_collections(&ctx.palette, &result.collections);
    print_messages(&ctx.palette, &result.messages);
    Ok(())
}
