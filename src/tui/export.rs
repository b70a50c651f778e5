use crate::model::Transcript;
use anyhow::{Context, Result};
use std::sync::mpsc as std_mpsc;
use std::sync::OnceLock;
use std::time::Duration;

use super::state::UiState;

// Channel into the clipboard thread, created on first copy.
static CLIPBOARD_SENDER: OnceLock<std_mpsc::Sender<String>> = OnceLock::new();

/// Save the transcript to the default auto-save location and show the path.
pub fn save_and_show_path(t: &Transcript, state: &mut UiState) {
    match crate::storage::save_transcript(t) {
        Ok(path) => {
            if path.exists() {
                state.info = format!("Saved: {}", path.display());
            } else {
                state.info = format!("Saved (verifying): {}", path.display());
            }
        }
        Err(e) => {
            state.info = format!("Save failed: {e:#}");
        }
    }
}

/// Export JSON next to the current directory.
/// Returns the absolute path of the exported file.
pub fn export_transcript_json(t: &Transcript) -> Result<std::path::PathBuf> {
    let current_dir = std::env::current_dir().context("get current directory")?;
    let path = current_dir.join(format!("{}.json", crate::storage::transcript_stem(t)));
    crate::storage::export_json(&path, t)?;
    Ok(path)
}

/// Export plain text next to the current directory.
/// Returns the absolute path of the exported file.
pub fn export_transcript_text(t: &Transcript) -> Result<std::path::PathBuf> {
    let current_dir = std::env::current_dir().context("get current directory")?;
    let path = current_dir.join(format!("{}.txt", crate::storage::transcript_stem(t)));
    crate::storage::export_text(&path, t)?;
    Ok(path)
}

fn clipboard_sender() -> &'static std_mpsc::Sender<String> {
    CLIPBOARD_SENDER.get_or_init(|| {
        let (tx, rx) = std_mpsc::channel::<String>();
        std::thread::spawn(move || {
            for text in rx {
                let Ok(mut clipboard) = arboard::Clipboard::new() else {
                    continue;
                };
                if clipboard.set_text(&text).is_ok() {
                    // On X11 the selection dies with the Clipboard instance,
                    // so hold it long enough for the paste target to fetch.
                    std::thread::sleep(Duration::from_secs(2));
                }
            }
        });
        tx
    })
}

/// Queue text for the clipboard thread; returns without waiting on it.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    clipboard_sender()
        .send(text.to_string())
        .map_err(|_| anyhow::anyhow!("clipboard thread is gone"))
}
