mod cli;

use std::fs;
use std::io::Write;

use anyhow::{Context, Result, bail};
use clap::Parser;
use env_logger::Env;
use fgc_store::{
    ConfigManager, FileStorage, Preset, PresetEdit, PresetStore,
    default_config_path,
};

use crate::cli::{Cli, Command};

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    let path = cli.config.unwrap_or_else(default_config_path);
    log::debug!("using config at {}", path.display());
    let manager = ConfigManager::new(FileStorage::new(&path));
    let mut store = PresetStore::load(manager);

    run(&mut store, cli.command)
}

fn run(store: &mut PresetStore, command: Command) -> Result<()> {
    match command {
        Command::List => {
            let mut out = std::io::stdout().lock();
            for preset in store.pinned_presets() {
                print_preset(&mut out, store, preset)?;
            }
            for preset in store.unpinned_presets() {
                print_preset(&mut out, store, preset)?;
            }
        },
        Command::Create { name } => {
            let id = store.create_preset(&name)?;
            println!("{id}");
        },
        Command::Delete { id } => store.delete_preset(id)?,
        Command::DeleteAt { indices } => store.delete_presets(&indices)?,
        Command::Move { to, indices } => store.move_presets(&indices, to)?,
        Command::Pin { id } => store.pin(id),
        Command::Unpin { id } => store.unpin(id),
        Command::Lock { id } => store.lock(id),
        Command::Unlock { id } => store.unlock(id),
        Command::Edit {
            id,
            name,
            speed,
            colors,
            highlights,
        } => {
            let edit = PresetEdit {
                name,
                colors,
                highlights,
                speed,
            };
            if edit.is_empty() {
                bail!("nothing to edit");
            }
            store.update_preset(id, edit)?;
        },
        Command::Randomize { id, count } => store.randomize_colors(id, count)?,
        Command::Import { files } => {
            store.batch(|store| -> Result<()> {
                for file in &files {
                    let id = store.import_preset_from(file).with_context(
                        || format!("failed to import {}", file.display()),
                    )?;
                    println!("{id}");
                }
                Ok(())
            })?;
        },
        Command::Export { id, dir } => {
            let path = store.export_preset_to(id, &dir)?;
            println!("{}", path.display());
        },
        Command::ExportConfig { out } => {
            let payload = store.export_config()?;
            match out {
                Some(path) => fs::write(&path, payload).with_context(|| {
                    format!("failed to write {}", path.display())
                })?,
                None => std::io::stdout().write_all(&payload)?,
            }
        },
        Command::Apply { file, yes } => {
            if !yes {
                bail!(
                    "applying {} replaces every preset in {}; rerun with --yes",
                    file.display(),
                    store.manager().location()
                );
            }
            let data = fs::read(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            store.apply_config_bytes(&data)?;
            log::info!(
                "applied {} ({} preset(s))",
                file.display(),
                store.presets().len()
            );
        },
    }

    Ok(())
}

fn print_preset(
    out: &mut impl Write,
    store: &PresetStore,
    preset: &Preset,
) -> Result<()> {
    let mut flags = String::new();
    if store.is_pinned(preset.id) {
        flags.push('P');
    }
    if preset.locked {
        flags.push('L');
    }
    let colors: Vec<String> =
        preset.colors.iter().map(ToString::to_string).collect();

    writeln!(
        out,
        "{:<2} {} {:<24} speed={:.2} [{}]",
        flags,
        preset.id,
        preset.name,
        preset.speed,
        colors.join(", ")
    )?;
    Ok(())
}
