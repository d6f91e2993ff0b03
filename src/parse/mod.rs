mod catalog;
mod judgments;

use std::fmt;

use serde::Serialize;

pub use catalog::parse_query_catalog;
pub use judgments::parse_judgments;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed<T> {
    pub value: T,
    pub diagnostics: Vec<LineDiagnostic>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineDiagnostic {
    /// 1-based.
    pub line_number: usize,
    pub line: String,
    pub reason: DiagnosticReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticReason {
    MissingSeparator,
    EmptyField,
    NonNumericId,
    TooFewFields { found: usize },
}

impl fmt::Display for DiagnosticReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSeparator => f.write_str("no tab or space between id and text"),
            Self::EmptyField => f.write_str("id or text is empty"),
            Self::NonNumericId => f.write_str("query id is not all digits"),
            Self::TooFewFields { found } => write!(f, "expected at least 5 fields, found {found}"),
        }
    }
}

impl fmt::Display for LineDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} ({:?})", self.line_number, self.reason, self.line)
    }
}
