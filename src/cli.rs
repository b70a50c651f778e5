use crate::controller::ReplSession;
use crate::engine;
use crate::model::ReplConfig;
use anyhow::{Context, Result};
use clap::Parser;
use rand::RngCore;
use std::io::BufRead;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "replpad",
    version,
    about = "Terminal REPL pad backed by an external evaluator command"
)]
pub struct Cli {
    /// Script file: evaluate its contents as one source, print the result, exit (no TUI)
    pub script: Option<std::path::PathBuf>,

    /// Shell command used as the evaluation engine; it reads the source on
    /// stdin and writes rendered output on stdout (default: echo)
    #[arg(long)]
    pub eval: Option<String>,

    /// Evaluate stdin line by line and print each result (no TUI)
    #[arg(long)]
    pub pipe: bool,

    /// Like --pipe, but print the whole session transcript as JSON at the end
    #[arg(long)]
    pub json: bool,

    /// Export the session transcript as JSON on exit
    #[arg(long)]
    pub export_json: Option<std::path::PathBuf>,

    /// Export the session transcript as plain text on exit
    #[arg(long)]
    pub export_text: Option<std::path::PathBuf>,

    /// Use --auto-save true or --auto-save false to override
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub auto_save: bool,

    /// Attach custom comments to this session's transcript
    #[arg(long)]
    pub comments: Option<String>,
}

pub fn run(args: Cli) -> Result<()> {
    if args.script.is_some() && (args.pipe || args.json) {
        return Err(anyhow::anyhow!(
            "--pipe/--json cannot be combined with a script file"
        ));
    }

    if args.script.is_some() {
        return run_script(args);
    }

    if args.pipe || args.json {
        return run_pipe(args);
    }

    #[cfg(feature = "tui")]
    {
        crate::tui::run(args)
    }
    #[cfg(not(feature = "tui"))]
    {
        // Fallback when built without TUI support.
        run_pipe(args)
    }
}

/// Generate a random id for this session's transcript.
fn gen_session_id() -> String {
    let mut b = [0u8; 8];
    rand::thread_rng().fill_bytes(&mut b);
    u64::from_le_bytes(b).to_string()
}

/// Build a `ReplConfig` from CLI arguments.
pub fn build_config(args: &Cli) -> ReplConfig {
    ReplConfig {
        session_id: gen_session_id(),
        eval_command: args.eval.clone(),
        comments: args.comments.clone(),
    }
}

/// Evaluate one script file as a single source and print the rendered output.
fn run_script(args: Cli) -> Result<()> {
    let path = args.script.as_deref().context("script path missing")?;
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("read script {}", path.display()))?;

    let cfg = build_config(&args);
    let mut session = ReplSession::new(engine::evaluator_from_config(&cfg));
    if let Some(entry) = session.commit_source(source)? {
        println!("{}", entry.rendered);
    }
    finish_session(&args, &cfg, &session)
}

/// Evaluate stdin line by line through the same guarded pipeline.
fn run_pipe(args: Cli) -> Result<()> {
    let cfg = build_config(&args);
    let mut session = ReplSession::new(engine::evaluator_from_config(&cfg));

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("read stdin")?;
        // Blank lines fall through the empty guard and print nothing.
        if let Some(entry) = session.commit_source(line)? {
            if !args.json {
                println!("{}", entry.rendered);
            }
        }
    }

    if args.json {
        let transcript = session.transcript(&cfg);
        println!("{}", serde_json::to_string_pretty(&transcript)?);
    }
    finish_session(&args, &cfg, &session)
}

/// Shared exit path for all modes: exports and optional auto-save.
pub(crate) fn finish_session(args: &Cli, cfg: &ReplConfig, session: &ReplSession) -> Result<()> {
    let transcript = session.transcript(cfg);
    if let Some(p) = args.export_json.as_deref() {
        crate::storage::export_json(p, &transcript)?;
    }
    if let Some(p) = args.export_text.as_deref() {
        crate::storage::export_text(p, &transcript)?;
    }
    if args.auto_save && !transcript.entries.is_empty() {
        let p = crate::storage::save_transcript(&transcript)
            .context("failed to save transcript")?;
        eprintln!("Saved: {}", p.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_config_carries_eval_command_and_comments() {
        let args = Cli::parse_from([
            "replpad",
            "--eval",
            "bc -l",
            "--comments",
            "math session",
        ]);
        let cfg = build_config(&args);
        assert_eq!(cfg.eval_command.as_deref(), Some("bc -l"));
        assert_eq!(cfg.comments.as_deref(), Some("math session"));
        assert!(!cfg.session_id.is_empty());
    }

    #[test]
    fn session_ids_are_distinct() {
        assert_ne!(gen_session_id(), gen_session_id());
    }

    #[test]
    fn script_and_pipe_are_mutually_exclusive() {
        let args = Cli::parse_from(["replpad", "--pipe", "script.txt"]);
        assert!(run(args).is_err());
    }
}
