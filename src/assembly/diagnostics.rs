use std::fmt;

/// Pipeline stage a diagnostic was raised in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Config,
    Parse,
    Validate,
    Text,
    Visual,
    Effect,
    Material,
    Finalize,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Parse => "parse",
            Self::Validate => "validate",
            Self::Text => "text",
            Self::Visual => "visual",
            Self::Effect => "effect",
            Self::Material => "material",
            Self::Finalize => "finalize",
        }
    }
}

/// A non-fatal problem: something was skipped or fell back to a default.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Diagnostic {
    pub stage: Stage,
    /// What the problem is about (manifest path, object name, effect name).
    pub subject: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.stage.as_str(), self.subject, self.message)
    }
}

/// Collected warnings of one run, in the order they were raised.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and log it.
    pub fn warn(&mut self, stage: Stage, subject: impl Into<String>, message: impl fmt::Display) {
        let d = Diagnostic {
            stage,
            subject: subject.into(),
            message: message.to_string(),
        };
        tracing::warn!(stage = d.stage.as_str(), subject = %d.subject, "{}", d.message);
        self.entries.push(d);
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn in_stage(&self, stage: Stage) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.stage == stage)
    }

    pub fn append(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assembly/diagnostics.rs"]
mod tests;
