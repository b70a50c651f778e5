use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplConfig {
    pub session_id: String,
    /// Shell command used as the evaluation engine; None falls back to echo.
    #[serde(default)]
    pub eval_command: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
}

/// Pre-rendered evaluator output, inserted into the transcript verbatim.
///
/// The evaluator is trusted to produce well-formed display text; nothing in
/// this crate escapes or filters it. Keeping the type distinct from a plain
/// `String` makes that trust boundary explicit at the `Evaluator` seam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Markup(String);

impl Markup {
    pub fn trusted(rendered: impl Into<String>) -> Self {
        Self(rendered.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Markup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One evaluated submission: created once, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub source: String,
    pub rendered: Markup,
    #[serde(default)]
    pub timestamp_utc: String,
}

impl ResultEntry {
    pub fn new(source: impl Into<String>, rendered: Markup) -> Self {
        Self {
            source: source.into(),
            rendered,
            timestamp_utc: now_rfc3339(),
        }
    }
}

/// A whole session's worth of entries, as persisted and exported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub session_id: String,
    #[serde(default)]
    pub started_utc: String,
    /// Human-readable description of the evaluator the session ran against.
    pub evaluator: String,
    #[serde(default)]
    pub comments: Option<String>,
    pub entries: Vec<ResultEntry>,
}

impl Transcript {
    pub fn new(cfg: &ReplConfig, evaluator: String) -> Self {
        Self {
            session_id: cfg.session_id.clone(),
            started_utc: now_rfc3339(),
            evaluator,
            comments: cfg.comments.clone(),
            entries: Vec::new(),
        }
    }
}

pub fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "now".into())
}
