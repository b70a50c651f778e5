//! Transcript persistence and exports.
//!
//! Saved transcripts live under the platform data directory and back the
//! Transcripts tab; exports write to caller-chosen paths.

use crate::model::Transcript;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

fn data_dir() -> Result<PathBuf> {
    let base = dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .context("no data directory available")?;
    Ok(base.join("replpad").join("transcripts"))
}

/// Filename stem shared by auto-saves and exports. Deterministic so delete
/// can find a loaded transcript again; ids are truncated by character, since
/// transcripts read back from disk may carry arbitrary session ids.
pub fn transcript_stem(t: &Transcript) -> String {
    let short_id: String = t.session_id.chars().take(8).collect();
    format!(
        "replpad-{}-{}",
        t.started_utc.replace(':', "-").replace('T', "_"),
        short_id
    )
}

fn transcript_filename(t: &Transcript) -> String {
    format!("{}.json", transcript_stem(t))
}

/// Save a transcript to the default location, creating directories as needed.
pub fn save_transcript(t: &Transcript) -> Result<PathBuf> {
    let dir = data_dir()?;
    save_transcript_in(&dir, t)
}

pub fn save_transcript_in(dir: &Path, t: &Transcript) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let path = dir.join(transcript_filename(t));
    export_json(&path, t)?;
    Ok(path)
}

/// Load up to `limit` transcripts, most recent first.
pub fn load_recent(limit: usize) -> Result<Vec<Transcript>> {
    let dir = data_dir()?;
    load_recent_in(&dir, limit)
}

pub fn load_recent_in(dir: &Path, limit: usize) -> Result<Vec<Transcript>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut transcripts: Vec<Transcript> = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        // Skip unreadable or foreign files instead of failing the whole load.
        if let Ok(bytes) = fs::read(&path) {
            if let Ok(t) = serde_json::from_slice::<Transcript>(&bytes) {
                transcripts.push(t);
            }
        }
    }
    transcripts.sort_by(|a, b| b.started_utc.cmp(&a.started_utc));
    transcripts.truncate(limit);
    Ok(transcripts)
}

pub fn delete_transcript(t: &Transcript) -> Result<()> {
    let dir = data_dir()?;
    delete_transcript_in(&dir, t)
}

pub fn delete_transcript_in(dir: &Path, t: &Transcript) -> Result<()> {
    let path = dir.join(transcript_filename(t));
    fs::remove_file(&path).with_context(|| format!("delete {}", path.display()))
}

pub fn export_json(path: &Path, t: &Transcript) -> Result<()> {
    let json = serde_json::to_string_pretty(t).context("serialize transcript")?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))
}

/// Plain-text export: prompt-prefixed sources with their rendered outputs.
pub fn export_text(path: &Path, t: &Transcript) -> Result<()> {
    let mut out = String::new();
    out.push_str(&format!(
        "# replpad session {} ({}), evaluator: {}\n",
        t.session_id, t.started_utc, t.evaluator
    ));
    if let Some(comments) = t.comments.as_deref() {
        if !comments.trim().is_empty() {
            out.push_str(&format!("# {}\n", comments));
        }
    }
    for e in &t.entries {
        out.push_str(&format!("> {}\n{}\n", e.source, e.rendered));
    }
    fs::write(path, out).with_context(|| format!("write {}", path.display()))
}
