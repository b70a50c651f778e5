mod command;

pub use command::CommandEvaluator;

use crate::model::{Markup, ReplConfig};
use anyhow::Result;

/// External evaluation engine: synchronous, opaque, trusted.
///
/// Whatever `run` returns is rendered as-is, including text that describes an
/// evaluation error. A returned `Err` is an engine fault (the process could
/// not be run at all); the caller appends nothing for that activation.
pub trait Evaluator {
    fn run(&self, source: &str) -> Result<Markup>;

    /// Short human-readable description for the status line and transcripts.
    fn describe(&self) -> String;
}

/// Fallback engine used when no `--eval` command is configured: echoes the
/// source back, so the pad is usable out of the box.
pub struct EchoEvaluator;

impl Evaluator for EchoEvaluator {
    fn run(&self, source: &str) -> Result<Markup> {
        Ok(Markup::trusted(source))
    }

    fn describe(&self) -> String {
        "echo".into()
    }
}

/// Resolve the configured evaluator once, at startup.
pub fn evaluator_from_config(cfg: &ReplConfig) -> Box<dyn Evaluator> {
    match cfg.eval_command.as_deref() {
        Some(cmd) => Box::new(CommandEvaluator::new(cmd)),
        None => Box::new(EchoEvaluator),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_returns_source_verbatim() {
        let out = EchoEvaluator.run("print 1;").unwrap();
        assert_eq!(out.as_str(), "print 1;");
    }

    #[test]
    fn config_without_command_falls_back_to_echo() {
        let cfg = ReplConfig {
            session_id: "s".into(),
            eval_command: None,
            comments: None,
        };
        assert_eq!(evaluator_from_config(&cfg).describe(), "echo");
    }

    #[test]
    fn config_with_command_describes_it() {
        let cfg = ReplConfig {
            session_id: "s".into(),
            eval_command: Some("bc -l".into()),
            comments: None,
        };
        assert_eq!(evaluator_from_config(&cfg).describe(), "bc -l");
    }
}
