use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _};
use colored::Colorize;
use fsentry::{FsEntry, List, StoreConfig};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref(), cli.root.clone(), cli.pretty)?;
    debug!(root = %config.root.display(), pretty = config.pretty, "store configured");
    let store = FsEntry::with_config(config);
    let format = cli.format;

    match cli.command {
        Command::Init => {
            store.init()?;
            done(format, &format!("Initialized store in {}", store.root().display().to_string().bold()))
        }
        Command::Drop(args) => cmd_drop(&store, format, args),
        Command::List(args) => {
            let segments: Vec<&str> = args.path.iter().map(String::as_str).collect();
            print_list(format, &store.list(&segments)?)
        }
        Command::Folder { action } => cmd_folder(&store, format, action),
        Command::Entry { action } => cmd_entry(&store, format, action),
        Command::Binary { action } => cmd_binary(&store, format, action),
    }
}

/// Settings from an optional TOML file, with command-line flags on top.
pub fn load_config(file: Option<&Path>, root: Option<PathBuf>, pretty: bool) -> anyhow::Result<StoreConfig> {
    let mut config = match file {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => StoreConfig::default(),
    };
    if let Some(root) = root {
        config.root = root;
    }
    if pretty {
        config.pretty = true;
    }
    Ok(config)
}

/// A JSON payload argument. Absent means `null`.
pub fn parse_payload(raw: Option<&str>) -> anyhow::Result<Value> {
    match raw {
        None => Ok(Value::Null),
        Some(raw) => serde_json::from_str(raw).context("payload is not valid JSON"),
    }
}

fn cmd_drop(store: &FsEntry, format: OutputFormat, args: DropArgs) -> anyhow::Result<()> {
    if !args.yes {
        bail!(
            "refusing to delete {} without --yes",
            store.root().display()
        );
    }
    store.drop_root()?;
    done(format, &format!("Dropped store {}", store.root().display()))
}

fn cmd_folder(store: &FsEntry, format: OutputFormat, action: FolderAction) -> anyhow::Result<()> {
    match action {
        FolderAction::Create { name, data, at } => {
            let data = parse_payload(data.as_deref())?;
            let info = store.create_folder(&at.segments(), &name, &data)?;
            print_object(format, "Created folder", &info)
        }
        FolderAction::Get { name, at } => {
            let info = store.get_folder(&at.segments(), &name)?;
            print_object(format, "Folder", &info)
        }
        FolderAction::Move { old, new, at } => {
            let info = store.move_folder(&at.segments(), &old, &new)?;
            print_object(format, "Moved folder", &info)
        }
        FolderAction::RenameKeepTime { old, new, at } => {
            let info = store.move_folder_without_timestamp(&at.segments(), &old, &new)?;
            print_object(format, "Renamed folder", &info)
        }
        FolderAction::Update { name, data, at } => {
            let data = parse_payload(Some(data.as_str()))?;
            let info = store.update_folder(&at.segments(), &name, &data)?;
            print_object(format, "Updated folder", &info)
        }
        FolderAction::Remove { name, at } => {
            store.remove_folder(&at.segments(), &name)?;
            done(format, &format!("Removed folder {}", name.yellow()))
        }
        FolderAction::Duplicate { src, dst, at } => {
            let info = store.duplicate_folder(&at.segments(), &src, &dst)?;
            print_object(format, "Duplicated folder", &info)
        }
    }
}

fn cmd_entry(store: &FsEntry, format: OutputFormat, action: EntryAction) -> anyhow::Result<()> {
    match action {
        EntryAction::Create { name, data, at } => {
            let data = parse_payload(data.as_deref())?;
            let entry = store.create_entry(&at.segments(), &name, &data)?;
            print_object(format, "Created entry", &entry)
        }
        EntryAction::Get { name, at } => {
            let entry = store.get_entry(&at.segments(), &name)?;
            print_object(format, "Entry", &entry)
        }
        EntryAction::Move { old, new, keep_time, at } => {
            let entry = if keep_time {
                store.move_entry_without_timestamp(&at.segments(), &old, &new)?
            } else {
                store.move_entry(&at.segments(), &old, &new)?
            };
            print_object(format, "Moved entry", &entry)
        }
        EntryAction::Update { name, data, at } => {
            let data = parse_payload(Some(data.as_str()))?;
            let entry = store.update_entry(&at.segments(), &name, &data)?;
            print_object(format, "Updated entry", &entry)
        }
        EntryAction::Remove { name, at } => {
            store.remove_entry(&at.segments(), &name)?;
            done(format, &format!("Removed entry {}", name.yellow()))
        }
        EntryAction::Duplicate { src, dst, at } => {
            let entry = store.duplicate_entry(&at.segments(), &src, &dst)?;
            print_object(format, "Duplicated entry", &entry)
        }
    }
}

fn cmd_binary(store: &FsEntry, format: OutputFormat, action: BinaryAction) -> anyhow::Result<()> {
    match action {
        BinaryAction::Create { name, file, at } => {
            let data = read_input(file.as_deref())?;
            store.create_binary(&at.segments(), &name, &data)?;
            done(format, &format!("Created binary {} ({} bytes)", name.yellow(), data.len()))
        }
        BinaryAction::Get { name, out, at } => {
            let data = store.get_binary(&at.segments(), &name)?;
            match out {
                Some(path) => std::fs::write(&path, &data)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => std::io::stdout().write_all(&data)?,
            }
            Ok(())
        }
        BinaryAction::Move { old, new, at } => {
            store.move_binary(&at.segments(), &old, &new)?;
            done(format, &format!("Moved binary {} → {}", old.yellow(), new.yellow()))
        }
        BinaryAction::Update { name, file, at } => {
            let data = read_input(file.as_deref())?;
            store.update_binary(&at.segments(), &name, &data)?;
            done(format, &format!("Updated binary {} ({} bytes)", name.yellow(), data.len()))
        }
        BinaryAction::Remove { name, at } => {
            store.remove_binary(&at.segments(), &name)?;
            done(format, &format!("Removed binary {}", name.yellow()))
        }
        BinaryAction::Duplicate { src, dst, at } => {
            store.duplicate_binary(&at.segments(), &src, &dst)?;
            done(format, &format!("Duplicated binary {} → {}", src.yellow(), dst.yellow()))
        }
    }
}

fn read_input(file: Option<&Path>) -> anyhow::Result<Vec<u8>> {
    match file {
        Some(path) => std::fs::read(path).with_context(|| format!("reading {}", path.display())),
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf).context("reading stdin")?;
            Ok(buf)
        }
    }
}

// ---- Output ----

fn done(format: OutputFormat, message: &str) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => println!("{} {}", "✓".green().bold(), message),
        OutputFormat::Json => println!("{}", serde_json::json!({ "ok": true })),
    }
    Ok(())
}

/// Print a folder or entry. Both share the same JSON shape.
fn print_object<T: Serialize>(format: OutputFormat, headline: &str, object: &T) -> anyhow::Result<()> {
    let value = serde_json::to_value(object)?;
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let field = |key: &str| match &value[key] {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    };
    println!("{} {} {}", headline.bold(), field("name").yellow(), format!("({})", field("id")).dimmed());
    println!("  Created: {}", field("createdAt"));
    println!("  Updated: {}", field("updatedAt"));
    println!("  Data:    {}", value["data"].to_string().cyan());
    Ok(())
}

fn print_list(format: OutputFormat, list: &List) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(list)?);
        return Ok(());
    }
    if list.is_empty() {
        println!("Empty.");
        return Ok(());
    }
    for folder in &list.folders {
        println!("  {} {}/", "folder".blue(), folder.bold());
    }
    for entry in &list.entries {
        println!("  {} {}", "entry ".green(), entry);
    }
    for broken in &list.corrupted_folders {
        println!("  {} {}/", "broken".red(), broken);
    }
    Ok(())
}
