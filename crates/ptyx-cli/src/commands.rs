use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use tracing::{info, warn};

use ptyx_cli::session::{Session, SettingEntry, default_settings_path, rewrite_paths};
use ptyx_params::{LoadSummary, PathPrefixChange};

use crate::cli::{DefaultsArgs, RewritePathsArgs, ShowArgs};

pub fn run_defaults(args: &DefaultsArgs) -> Result<()> {
    let session = Session::new()?;
    match &args.output {
        Some(path) => {
            session.save(path, None)?;
            println!("Wrote default settings to {}", path.display());
        }
        None => print!("{}", session.render()?),
    }
    Ok(())
}

pub fn run_show(args: &ShowArgs, settings: Option<&PathBuf>) -> Result<()> {
    let path = args
        .file
        .clone()
        .or_else(|| settings.cloned())
        .or_else(default_settings_path)
        .ok_or_else(|| anyhow!("no settings file given and no default location available"))?;

    let session = Session::new()?;
    let summary = session.load(&path)?;
    report_skipped(&summary);

    let entries = session.entries();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries).context("serialize settings")?);
    } else {
        println!("Settings: {}", path.display());
        println!("{}", entry_table(&entries));
    }
    Ok(())
}

pub fn run_rewrite_paths(args: &RewritePathsArgs) -> Result<()> {
    let change = PathPrefixChange::new(args.find.clone(), args.replace.clone());
    if !args.input.exists() {
        return Err(anyhow!("{} does not exist", args.input.display()));
    }

    let summary = rewrite_paths(&args.input, &args.output, &change)?;
    report_skipped(&summary);
    info!(
        input = %args.input.display(),
        output = %args.output.display(),
        "rewrote path prefixes"
    );
    println!(
        "Wrote {} with {} moved to {}",
        args.output.display(),
        change.find.display(),
        change.replace.display()
    );
    Ok(())
}

fn report_skipped(summary: &LoadSummary) {
    for section in &summary.unknown_sections {
        warn!(section = %section, "unknown settings section skipped");
    }
    for (section, key) in &summary.unknown_keys {
        warn!(section = %section, key = %key, "unknown settings key skipped");
    }
    for (section, key) in &summary.rejected {
        warn!(section = %section, key = %key, "settings value kept at default");
    }
}

fn entry_table(entries: &[SettingEntry]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    table.set_header(
        ["Section", "Key", "Kind", "Value"]
            .into_iter()
            .map(|title| Cell::new(title).add_attribute(Attribute::Bold)),
    );
    for entry in entries {
        table.add_row(vec![
            entry.section.as_str(),
            entry.key.as_str(),
            entry.kind,
            entry.value.as_str(),
        ]);
    }
    table
}
