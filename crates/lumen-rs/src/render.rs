//! Plain-text rendering for terminal output.

use chrono::{DateTime, Utc};
use lumen_rs_core::StylePreset;
use lumen_rs_protocol::{GenerationRecord, Settings};
use lumen_rs_store::RecordStats;

const PROMPT_PREVIEW_CHARS: usize = 60;

/// One-line summary used by `history`.
pub fn record_line(record: &GenerationRecord) -> String {
    format!(
        "{:<28} {:<10} {:<14} {}",
        record.id,
        record.status,
        record.style.as_deref().unwrap_or("-"),
        preview(&record.prompt, PROMPT_PREVIEW_CHARS)
    )
}

/// Multi-line view used while generating.
pub fn record_detail(record: &GenerationRecord) -> String {
    let mut lines = vec![
        format!("id:      {}", record.id),
        format!("status:  {}", record.status),
        format!("style:   {}", record.style.as_deref().unwrap_or("-")),
        format!("created: {}", format_timestamp(record.timestamp)),
        format!("prompt:  {}", record.prompt),
    ];
    if let Some(url) = &record.url {
        lines.push(format!("url:     {url}"));
    }
    if let Some(error) = &record.error {
        lines.push(format!("error:   {error}"));
    }
    lines.join("\n")
}

pub fn style_line(preset: &StylePreset) -> String {
    format!("{:<16} {:<18} {}", preset.id, preset.name, preset.description)
}

pub fn settings_summary(settings: &Settings) -> String {
    format!(
        "default style: {}\nmax images:    {}\nsystem prompt: {}",
        settings.default_style, settings.max_images, settings.system_prompt
    )
}

pub fn stats_summary(stats: &RecordStats) -> String {
    let mut lines = vec![
        format!("total:      {}", stats.total),
        format!("completed:  {}", stats.completed),
        format!("error:      {}", stats.failed),
        format!("generating: {}", stats.generating),
    ];
    for (style, count) in &stats.by_style {
        lines.push(format!("  {style:<14} {count}"));
    }
    lines.join("\n")
}

/// RFC 3339 rendering of epoch milliseconds; raw number if out of range.
fn format_timestamp(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|time| time.to_rfc3339())
        .unwrap_or_else(|| millis.to_string())
}

fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{cut}...")
}
