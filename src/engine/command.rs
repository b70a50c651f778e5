//! Subprocess bridge to an external evaluation command.
//!
//! The command receives the source on stdin and is expected to write its
//! rendered output to stdout. Exit status is not interpreted: engines report
//! their own evaluation errors as output text, on whichever stream they like.

use super::Evaluator;
use crate::model::Markup;
use anyhow::{Context, Result};
use std::io::Write;
use std::process::{Command, Stdio};

pub struct CommandEvaluator {
    command: String,
}

impl CommandEvaluator {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    #[cfg(not(windows))]
    fn shell(&self) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(&self.command);
        cmd
    }

    #[cfg(windows)]
    fn shell(&self) -> Command {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(&self.command);
        cmd
    }
}

impl Evaluator for CommandEvaluator {
    fn run(&self, source: &str) -> Result<Markup> {
        let mut child = self
            .shell()
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("spawn evaluator command: {}", self.command))?;

        // Feed stdin from its own thread. A child that echoes while it reads
        // can fill both pipe buffers, so the write must not block the read
        // side; dropping the handle at the end of the thread delivers EOF.
        let mut stdin = child
            .stdin
            .take()
            .context("evaluator stdin unavailable")?;
        let payload = source.as_bytes().to_vec();
        let writer = std::thread::spawn(move || {
            // A child may exit without draining stdin; the broken pipe that
            // produces is not an evaluation failure.
            let _ = stdin.write_all(&payload);
        });

        let output = child
            .wait_with_output()
            .context("wait for evaluator command")?;
        let _ = writer.join();

        // Prefer stdout; fall back to stderr so engines that print errors
        // there still produce a visible result.
        let bytes = if output.stdout.is_empty() && !output.stderr.is_empty() {
            output.stderr
        } else {
            output.stdout
        };
        let mut text = String::from_utf8_lossy(&bytes).into_owned();
        while text.ends_with('\n') || text.ends_with('\r') {
            text.pop();
        }
        Ok(Markup::trusted(text))
    }

    fn describe(&self) -> String {
        self.command.clone()
    }
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;

    #[test]
    fn pipes_source_through_command() {
        let eval = CommandEvaluator::new("cat");
        let out = eval.run("1+1").unwrap();
        assert_eq!(out.as_str(), "1+1");
    }

    #[test]
    fn large_source_round_trips_without_blocking() {
        // Well past the combined kernel pipe buffers.
        let source = "x".repeat(1 << 20);
        let out = CommandEvaluator::new("cat").run(&source).unwrap();
        assert_eq!(out.as_str(), source);
    }

    #[test]
    fn command_that_never_reads_stdin_still_completes() {
        let eval = CommandEvaluator::new("echo done");
        let out = eval.run(&"y".repeat(1 << 20)).unwrap();
        assert_eq!(out.as_str(), "done");
    }

    #[test]
    fn trailing_newline_is_stripped() {
        let eval = CommandEvaluator::new("cat; echo");
        let out = eval.run("x").unwrap();
        assert_eq!(out.as_str(), "x");
    }

    #[test]
    fn stderr_is_used_when_stdout_is_empty() {
        let eval = CommandEvaluator::new("cat >&2");
        let out = eval.run("oops").unwrap();
        assert_eq!(out.as_str(), "oops");
    }

    #[test]
    fn stdout_wins_when_both_streams_have_output() {
        let eval = CommandEvaluator::new("echo result; echo noise >&2");
        let out = eval.run("ignored").unwrap();
        assert_eq!(out.as_str(), "result");
    }
}
