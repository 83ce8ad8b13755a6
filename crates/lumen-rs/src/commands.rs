//! Command handlers for the `lumen` binary.

use crate::render;
use crate::{Command, SettingsCommand};
use anyhow::{Context, bail};
use chrono::Local;
use log::{debug, info};
use lumen_rs::{
    build_generator, build_orchestrator, download_file_name, export_file_name, open_store,
};
use lumen_rs_config::LumenConfig;
use lumen_rs_core::{GenerationAttempt, ImageGenerator, styles};
use lumen_rs_protocol::{GenerationRecord, GenerationStatus, Settings, SettingsPatch};
use lumen_rs_server::AppState;
use lumen_rs_store::{GenerationStore, ImportSummary, RecordQuery};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Dispatch a parsed command.
pub async fn run(command: Command, config: LumenConfig) -> anyhow::Result<()> {
    let store = open_store(&config).context("failed to open store")?;
    match command {
        Command::Generate {
            prompt,
            style,
            system_prompt,
        } => {
            let attempt = GenerationAttempt {
                prompt,
                style,
                system_prompt,
            };
            generate(&config, store, attempt).await
        }
        Command::Retry { id } => retry(&config, store, &id).await,
        Command::History {
            search,
            style,
            status,
            sort,
            limit,
            stats,
        } => {
            if stats {
                println!("{}", render::stats_summary(&store.stats()));
                return Ok(());
            }
            let query = RecordQuery {
                search,
                style,
                status,
                sort,
                limit,
            };
            let records = store.query(&query);
            if records.is_empty() {
                println!("no generations found");
            }
            for record in &records {
                println!("{}", render::record_line(record));
            }
            Ok(())
        }
        Command::Show { id } => {
            let record = find(&store, &id)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        Command::Download { id, output } => {
            let path = download(&store, &reqwest::Client::new(), &id, output).await?;
            println!("saved {}", path.display());
            Ok(())
        }
        Command::Delete { id } => {
            if store.delete(&id).context("failed to delete record")? {
                println!("deleted {id}");
            } else {
                println!("no record with id {id}");
            }
            Ok(())
        }
        Command::Clear => {
            store.clear().context("failed to clear history")?;
            println!("history cleared");
            Ok(())
        }
        Command::Export { output } => {
            let path = output.unwrap_or_else(|| export_file_name(Local::now().date_naive()).into());
            export(&store, &path)?;
            println!("exported to {}", path.display());
            Ok(())
        }
        Command::Import { file } => {
            let summary = import(&store, &file)?;
            match summary.records {
                Some(count) => println!("imported {count} records"),
                None => println!("no records in snapshot"),
            }
            if summary.settings_merged {
                println!("settings merged");
            }
            Ok(())
        }
        Command::Settings { action } => {
            let settings = match action {
                SettingsCommand::Show => store.settings(),
                SettingsCommand::Set {
                    system_prompt,
                    default_style,
                    max_images,
                } => update_settings(
                    &store,
                    SettingsPatch {
                        system_prompt,
                        default_style,
                        max_images,
                    },
                )?,
            };
            println!("{}", render::settings_summary(&settings));
            Ok(())
        }
        Command::Styles => {
            for preset in styles::list_all() {
                println!("{}", render::style_line(preset));
            }
            Ok(())
        }
        Command::Serve { host, port } => {
            let mut server = config.server.clone();
            if let Some(host) = host {
                server.host = host;
            }
            if let Some(port) = port {
                server.port = port;
            }
            let state = AppState::new(Arc::new(build_generator(&config)))
                .with_max_prompt_chars(config.generation.max_prompt_chars);
            lumen_rs_server::serve(&server, state)
                .await
                .context("server failed")
        }
        Command::Ping => {
            let generator = build_generator(&config);
            if generator.test_connection().await {
                println!("connected to {}", generator.endpoint());
                Ok(())
            } else {
                bail!("could not reach {}", generator.endpoint())
            }
        }
    }
}

async fn generate(
    config: &LumenConfig,
    store: GenerationStore,
    attempt: GenerationAttempt,
) -> anyhow::Result<()> {
    let orchestrator = build_orchestrator(config, Arc::new(build_generator(config)), store);
    let pending = orchestrator.submit(attempt)?;
    println!("{}\n", render::record_detail(pending.record()));
    let record = orchestrator.resolve(pending).await;
    report(&record)
}

async fn retry(config: &LumenConfig, store: GenerationStore, id: &str) -> anyhow::Result<()> {
    let orchestrator = build_orchestrator(config, Arc::new(build_generator(config)), store);
    let record = orchestrator.retry(id).await?;
    report(&record)
}

/// Print the terminal record; failed generations exit non-zero.
fn report(record: &GenerationRecord) -> anyhow::Result<()> {
    println!("{}", render::record_detail(record));
    if record.status == GenerationStatus::Error {
        bail!(
            "generation failed: {}",
            record.error.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(())
}

fn find(store: &GenerationStore, id: &str) -> anyhow::Result<GenerationRecord> {
    store
        .get_by_id(id)
        .with_context(|| format!("no record with id {id}"))
}

/// Fetch a completed record's image and write it to `output`, or to
/// `ai-generated-<id>.jpg` when no path is given.
async fn download(
    store: &GenerationStore,
    client: &reqwest::Client,
    id: &str,
    output: Option<PathBuf>,
) -> anyhow::Result<PathBuf> {
    let record = find(store, id)?;
    let url = match (record.status, record.url.as_deref()) {
        (GenerationStatus::Completed, Some(url)) => url,
        (status, _) => bail!("record {id} is {status}; only completed images can be downloaded"),
    };
    let bytes = client
        .get(url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .with_context(|| format!("failed to fetch {url}"))?
        .bytes()
        .await
        .with_context(|| format!("failed to read image body from {url}"))?;
    let path = output.unwrap_or_else(|| download_file_name(id).into());
    std::fs::write(&path, &bytes)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(
        "downloaded image (id={id}, bytes={}, path={})",
        bytes.len(),
        path.display()
    );
    Ok(path)
}

fn export(store: &GenerationStore, path: &Path) -> anyhow::Result<()> {
    let snapshot = store.export_snapshot().context("failed to export snapshot")?;
    std::fs::write(path, snapshot)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("exported snapshot (path={})", path.display());
    Ok(())
}

fn import(store: &GenerationStore, path: &Path) -> anyhow::Result<ImportSummary> {
    let blob = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    store
        .import_snapshot(&blob)
        .context("import failed; existing history left unchanged")
}

/// Merge a settings patch after checking the style id resolves.
fn update_settings(store: &GenerationStore, patch: SettingsPatch) -> anyhow::Result<Settings> {
    if let Some(style) = patch.default_style.as_deref()
        && styles::lookup(style).is_none()
    {
        bail!("unknown style '{style}' (run `lumen styles` for the list)");
    }
    if patch.is_empty() {
        bail!("nothing to update; pass at least one setting");
    }
    debug!("updating settings");
    store.save_settings(patch).context("failed to save settings")
}
