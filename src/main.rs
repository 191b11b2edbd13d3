mod analyzer;
mod cli;
mod config;
mod db;
mod export;
mod journal;
mod patterns;
mod refine;

use crate::analyzer::insight;
use crate::cli::prompt::{confirm_reset, read_dream};
use crate::cli::{Cli, Commands, ConfigCommands, DemoCommands};
use crate::config::Config;
use crate::db::Database;
use crate::journal::model::{Category, Entry, EntryInput, EntryPatch, Tag};
use crate::journal::{DAY_KEYS_SLOT, ENTRIES_SLOT, Journal};
use crate::refine::{Tone, improve_dream_text};
use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local, Utc};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Add {
            title,
            content,
            tags,
            refine,
            tone,
        } => handle_add(title, content, tags, refine.then_some(tone)),
        Commands::List { search, category } => handle_list(search, category),
        Commands::View { id } => handle_view(&id),
        Commands::Update {
            id,
            title,
            content,
            category,
            tags,
        } => handle_update(
            &id,
            EntryPatch {
                title,
                content,
                original_content: None,
                category,
                tags,
            },
        ),
        Commands::Delete { id } => handle_delete(&id),
        Commands::Interpret { id } => handle_interpret(id.as_deref()),
        Commands::Stats { save } => handle_stats(save),
        Commands::Export { id } => handle_export(id.as_deref()),
        Commands::Reset { yes } => handle_reset(yes),
        Commands::Demo { command } => handle_demo_command(command),
        Commands::Config { command } => handle_config_command(command),
        Commands::Status => handle_status(),
    }
}

/// `refine` is `Some` when the text should be rewritten; the inner tone overrides the configured one.
fn handle_add(
    title: Option<String>,
    content: Option<String>,
    tags: Vec<Tag>,
    refine: Option<Option<Tone>>,
) -> Result<()> {
    let config = load_or_default_config()?;
    let limits = config.input_limits();
    let (title, raw) = read_dream(title, content, limits)?;

    let input = match refine {
        Some(tone) => {
            let tone = tone.unwrap_or(config.refine_tone);
            EntryInput {
                title,
                content: improve_dream_text(&raw, tone, &mut rand::thread_rng()),
                original_content: Some(raw),
                tags: Some(tags),
            }
        }
        None => EntryInput {
            title,
            content: raw,
            original_content: None,
            tags: Some(tags),
        },
    };
    input.validate(limits)?;

    let mut journal = open_journal(&config)?;
    let entry = journal.create(input)?;
    info!(id = %entry.id, category = %entry.category, "dream recorded");

    println!("Dream recorded: {} ({})", entry.id, entry.category);
    if entry.original_content.is_some() {
        println!("{}", entry.content);
    }

    Ok(())
}

fn handle_list(search: Option<String>, category: Option<Category>) -> Result<()> {
    let config = load_or_default_config()?;
    let journal = open_journal(&config)?;

    let entries = match (search.as_deref(), category) {
        (Some(query), Some(category)) => journal
            .search(query)
            .into_iter()
            .filter(|entry| entry.category == category)
            .collect(),
        (Some(query), None) => journal.search(query),
        (None, Some(category)) => journal.in_category(category),
        (None, None) => journal.entries().iter().collect::<Vec<_>>(),
    };

    if entries.is_empty() {
        println!("No dreams found.");
        return Ok(());
    }

    entries.iter().for_each(|entry| println!("{}", list_line(entry)));
    Ok(())
}

fn handle_view(id: &str) -> Result<()> {
    let config = load_or_default_config()?;
    let journal = open_journal(&config)?;
    let entry = journal
        .get(id)
        .with_context(|| format!("Dream not found: {id}"))?;

    println!("{}", entry.title);
    println!(
        "- recorded: {}",
        entry.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
    );
    println!("- category: {}", entry.category);
    println!("- tags: {}", format_tags(entry.tag_list()));
    if entry.synthetic() {
        println!("- demo entry");
    }
    println!("\n{}", entry.content);
    if let Some(original) = &entry.original_content {
        println!("\nOriginal notes:\n{original}");
    }

    Ok(())
}

fn handle_update(id: &str, patch: EntryPatch) -> Result<()> {
    if patch.is_empty() {
        bail!("Nothing to update. Pass --title, --content, --category or --tags.");
    }

    let config = load_or_default_config()?;
    let mut journal = open_journal(&config)?;

    let current = journal
        .get(id)
        .with_context(|| format!("Dream not found: {id}"))?;
    EntryInput {
        title: patch.title.clone().unwrap_or_else(|| current.title.clone()),
        content: patch
            .content
            .clone()
            .unwrap_or_else(|| current.content.clone()),
        ..EntryInput::default()
    }
    .validate(config.input_limits())?;

    let patch = EntryPatch {
        title: patch.title.map(|title| title.trim().to_string()),
        ..patch
    };

    match journal.update(id, patch)? {
        Some(entry) => {
            println!("Dream updated: {}", list_line(&entry));
            Ok(())
        }
        None => bail!("Dream not found: {id}"),
    }
}

fn handle_delete(id: &str) -> Result<()> {
    let config = load_or_default_config()?;
    let mut journal = open_journal(&config)?;

    if !journal.delete(id)? {
        bail!("Dream not found: {id}");
    }

    println!("Dream deleted: {id}");
    Ok(())
}

fn handle_interpret(id: Option<&str>) -> Result<()> {
    let config = load_or_default_config()?;
    let journal = open_journal(&config)?;
    let entry = select_entry(&journal, id)?;

    let reading = insight::interpret(&entry.content, &mut rand::thread_rng());

    println!("{}", entry.title);
    println!("- emotion: {}", reading.emotion);
    println!(
        "- symbols: {}",
        if reading.keywords.is_empty() {
            "none".to_string()
        } else {
            reading.keywords.join(", ")
        }
    );
    println!("\n{}", reading.interpretation);

    Ok(())
}

fn handle_stats(save: bool) -> Result<()> {
    let config = load_or_default_config()?;
    let journal = open_journal(&config)?;
    let today = Utc::now().date_naive();
    let mut rng = rand::thread_rng();

    if save {
        let (summary, saved) =
            analyzer::generate_and_store_summary(&config, &journal, today, &mut rng)?;
        println!("{}", analyzer::report::render_markdown(&summary));
        println!("Reflections saved:");
        println!("- Markdown: {}", saved.markdown_path.display());
        println!("- JSON: {}", saved.json_path.display());
    } else {
        let summary = analyzer::summarize(&journal, today, &mut rng);
        println!("{}", analyzer::report::render_markdown(&summary));
    }

    Ok(())
}

fn handle_export(id: Option<&str>) -> Result<()> {
    let config = load_or_default_config()?;
    let journal = open_journal(&config)?;
    let entry = select_entry(&journal, id)?;

    let exported = export::export_entry(entry, &config.export_dir)?;
    println!("Dream card exported:");
    println!("- Markdown: {}", exported.markdown_path.display());
    println!("- JSON: {}", exported.json_path.display());

    Ok(())
}

fn handle_reset(yes: bool) -> Result<()> {
    let config = load_or_default_config()?;
    let mut journal = open_journal(&config)?;

    if !yes && !confirm_reset(journal.entries().len())? {
        println!("Reset cancelled");
        return Ok(());
    }

    journal.clear_all()?;
    info!("journal reset");
    println!("All dreams erased");

    Ok(())
}

fn handle_demo_command(command: DemoCommands) -> Result<()> {
    let config = load_or_default_config()?;
    let mut journal = open_journal(&config)?;

    match command {
        DemoCommands::Generate { count } => {
            let count = count.unwrap_or(config.demo_count);
            let created = journal.generate_synthetic(count, &mut rand::thread_rng(), Utc::now())?;

            println!("Demo dreams added: {}", created.len());
            created
                .iter()
                .for_each(|entry| println!("{}", list_line(entry)));
            Ok(())
        }
        DemoCommands::Clear => {
            let removed = journal.clear_synthetic()?;
            println!("Demo dreams removed: {removed}");
            Ok(())
        }
    }
}

fn handle_config_command(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Set { key, value } => {
            let mut config = load_or_default_config()?;
            config.set_value(&key, &value)?;
            config.ensure_bootstrap_files()?;
            config.save()?;

            println!("Config saved: {key} = {value}");
            Ok(())
        }
        ConfigCommands::Get { key } => {
            let config = load_or_default_config()?;
            let value = config
                .get_value(&key)
                .with_context(|| format!("Unsupported config key: {key}"))?;

            println!("{value}");
            Ok(())
        }
    }
}

fn handle_status() -> Result<()> {
    let config = load_or_default_config()?;
    let database = Database::open(&config.db_path)?;
    let dreams_written = database.slot_updated_at(ENTRIES_SLOT)?;
    let days_written = database.slot_updated_at(DAY_KEYS_SLOT)?;
    let journal = Journal::load(database);

    println!("DreamTome status");
    println!("- config: {}", Config::config_path().display());
    println!("- db_path: {}", config.db_path.display());
    println!("- export_dir: {}", config.export_dir.display());
    println!("- dreams: {}", journal.entries().len());
    println!(
        "- demo_dreams: {}",
        journal.entries().iter().filter(|entry| entry.synthetic()).count()
    );
    println!("- dream_days: {}", journal.day_keys().len());
    println!("- dreams_saved_at: {}", format_slot_time(dreams_written));
    println!("- days_saved_at: {}", format_slot_time(days_written));

    Ok(())
}

fn open_journal(config: &Config) -> Result<Journal<Database>> {
    Ok(Journal::load(Database::open(&config.db_path)?))
}

/// The dream with `id`, or the most recent one.
fn select_entry<'a>(journal: &'a Journal<Database>, id: Option<&str>) -> Result<&'a Entry> {
    match id {
        Some(id) => journal
            .get(id)
            .with_context(|| format!("Dream not found: {id}")),
        None => journal
            .last()
            .context("No dreams recorded yet. Add one with `dreamtome add`."),
    }
}

fn list_line(entry: &Entry) -> String {
    format!(
        "{}  {}  [{}]  {}{}{}",
        entry.id,
        entry.created_at.with_timezone(&Local).format("%Y-%m-%d"),
        entry.category,
        entry.title,
        if entry.tag_list().is_empty() {
            String::new()
        } else {
            format!("  ({})", format_tags(entry.tag_list()))
        },
        if entry.synthetic() { "  *demo*" } else { "" }
    )
}

fn format_tags(tags: &[Tag]) -> String {
    if tags.is_empty() {
        return "none".to_string();
    }

    tags.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_slot_time(timestamp: Option<i64>) -> String {
    timestamp
        .and_then(|seconds| DateTime::<Utc>::from_timestamp(seconds, 0))
        .map(|written| {
            written
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| "never".to_string())
}

fn load_or_default_config() -> Result<Config> {
    if Config::config_path().exists() {
        return Config::load();
    }

    let config = Config::default();
    config.ensure_bootstrap_files()?;
    config.save()?;
    Ok(config)
}
