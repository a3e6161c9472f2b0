//! Usage records and their line-oriented text form.
//!
//! The ledger's interchange format is fixed and shared with the toolbox's
//! other front-ends, so the header tokens and layout here are load-bearing:
//!
//! ```text
//! Fonction appelée : tone_map
//! Paramètres :
//!   contrast_scaling: 0.8
//!   detail_amplification: 1.2
//! ----------------------------------------
//! ```
//!
//! A record starts with `Fonction appelée : <name>` or
//! `Classe utilisée : <name>`, carries two-space-indented `key: value`
//! parameter lines, and ends with a 40-dash separator. Readers must
//! tolerate extra or missing fields and must not assume keys are unique
//! across the file.

use std::fmt::Write as _;

/// Header line for a function-call record.
pub const FUNCTION_HEADER: &str = "Fonction appelée :";

/// Header line for a class-usage record.
pub const CLASS_HEADER: &str = "Classe utilisée :";

/// Parameter-section marker line.
pub const PARAMS_HEADER: &str = "Paramètres :";

/// Record separator: exactly 40 dashes.
pub const SEPARATOR: &str = "----------------------------------------";

/// Whether a record logs a function call or a class/operator construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Logged from an operation (`Fonction appelée :`).
    Function,
    /// Logged from an operator construction (`Classe utilisée :`).
    Class,
}

impl RecordKind {
    fn header(self) -> &'static str {
        match self {
            Self::Function => FUNCTION_HEADER,
            Self::Class => CLASS_HEADER,
        }
    }
}

/// One usage record: kind, name, and ordered key/value parameters.
///
/// Parameters keep insertion order and allow duplicate keys; the text
/// format has no way to express more structure than that.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageRecord {
    /// Record kind (function call vs class usage).
    pub kind: RecordKind,
    /// Function or operator name.
    pub name: String,
    /// Ordered `key: value` parameters.
    pub params: Vec<(String, String)>,
}

impl UsageRecord {
    /// Creates a function-call record.
    pub fn function(name: impl Into<String>) -> Self {
        Self {
            kind: RecordKind::Function,
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Creates a class-usage record.
    pub fn class(name: impl Into<String>) -> Self {
        Self {
            kind: RecordKind::Class,
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Appends one parameter, formatting the value with `Display`.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Appends a shape-list parameter, e.g. `[(8, 8), (8, 8)]`.
    pub fn shapes(self, key: impl Into<String>, shapes: &[(usize, usize)]) -> Self {
        let mut out = String::from("[");
        for (i, (w, h)) in shapes.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "({w}, {h})");
        }
        out.push(']');
        self.param(key, out)
    }

    /// Renders the record in the ledger text format, separator included.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} {}", self.kind.header(), self.name);
        let _ = writeln!(out, "{PARAMS_HEADER}");
        for (key, value) in &self.params {
            let _ = writeln!(out, "  {key}: {value}");
        }
        let _ = writeln!(out, "{SEPARATOR}");
        out
    }
}

/// Parses all usage records out of ledger text.
///
/// Unknown lines between records are skipped; a record is closed by the
/// dash separator or by the next header. Malformed parameter lines are
/// dropped rather than failing the whole parse.
pub fn parse_records(text: &str) -> Vec<UsageRecord> {
    let mut records = Vec::new();
    let mut current: Option<UsageRecord> = None;

    for line in text.lines() {
        let trimmed = line.trim_end();
        if let Some(name) = trimmed.strip_prefix(FUNCTION_HEADER) {
            if let Some(done) = current.take() {
                records.push(done);
            }
            current = Some(UsageRecord::function(name.trim()));
        } else if let Some(name) = trimmed.strip_prefix(CLASS_HEADER) {
            if let Some(done) = current.take() {
                records.push(done);
            }
            current = Some(UsageRecord::class(name.trim()));
        } else if trimmed.chars().all(|c| c == '-') && trimmed.len() >= 10 {
            if let Some(done) = current.take() {
                records.push(done);
            }
        } else if trimmed.trim() == PARAMS_HEADER {
            // section marker, nothing to record
        } else if let Some(rec) = current.as_mut() {
            if let Some((key, value)) = trimmed.split_once(':') {
                rec.params.push((key.trim().to_string(), value.trim().to_string()));
            }
        }
    }
    if let Some(done) = current {
        records.push(done);
    }
    records
}
