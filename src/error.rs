use thiserror::Error;

use crate::parse::LineDiagnostic;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailureKind {
    NotFound,
    PermissionDenied,
    InvalidName,
    Io,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to fetch {name}: {reason}")]
pub struct FetchFailure {
    pub name: String,
    pub kind: FetchFailureKind,
    pub reason: String,
}

impl FetchFailure {
    pub fn hint(&self) -> Option<String> {
        match self.kind {
            FetchFailureKind::NotFound => Some(format!(
                "{} is not in the data directory; pass --data-dir pointing at the folder that holds the dataset files",
                self.name
            )),
            FetchFailureKind::PermissionDenied => {
                Some(format!("{} exists but is not readable by this user", self.name))
            }
            FetchFailureKind::InvalidName => {
                Some("dataset names are plain file stems such as `tv19`".to_string())
            }
            FetchFailureKind::Io => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Fetch(#[from] FetchFailure),

    #[error("no queries found in dataset {dataset}")]
    EmptyCatalog { dataset: String },

    #[error("no dataset is loaded")]
    NoDataset,

    #[error("query {query_id} is not in the loaded catalog")]
    UnknownQuery { query_id: String },

    #[error("query id must be all digits: {query_id:?}")]
    InvalidQueryId { query_id: String },

    #[error("{file} has {} malformed line(s); first: {}", .diagnostics.len(), first_diagnostic(.diagnostics))]
    MalformedInput {
        file: String,
        diagnostics: Vec<LineDiagnostic>,
    },

    #[error("no results are loaded")]
    NoResults,
}

impl SessionError {
    pub fn is_no_usable_queries(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::EmptyCatalog { .. })
    }

    pub fn hint(&self) -> Option<String> {
        match self {
            Self::Fetch(failure) => failure.hint(),
            Self::EmptyCatalog { .. } => {
                Some("query lines look like `<digits><TAB or space><text>`".to_string())
            }
            Self::NoDataset => Some("select a dataset first".to_string()),
            Self::UnknownQuery { .. } => Some("list the catalog to see valid ids".to_string()),
            Self::MalformedInput { .. } => {
                Some("rerun with --parse-mode lenient to skip malformed lines".to_string())
            }
            Self::InvalidQueryId { .. } | Self::NoResults => None,
        }
    }
}

fn first_diagnostic(diagnostics: &[LineDiagnostic]) -> String {
    diagnostics
        .first()
        .map(ToString::to_string)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(kind: FetchFailureKind) -> FetchFailure {
        FetchFailure {
            name: "tv19.tsv".to_string(),
            kind,
            reason: "boom".to_string(),
        }
    }

    #[test]
    fn fetch_and_empty_catalog_share_failure_class() {
        assert!(SessionError::from(failure(FetchFailureKind::Io)).is_no_usable_queries());
        assert!(
            SessionError::EmptyCatalog {
                dataset: "tv19".to_string()
            }
            .is_no_usable_queries()
        );
        assert!(!SessionError::NoResults.is_no_usable_queries());
    }

    #[test]
    fn local_file_failures_carry_hints() {
        let hint = failure(FetchFailureKind::NotFound)
            .hint()
            .expect("not-found should carry a hint");
        assert!(hint.contains("--data-dir"), "unexpected hint: {hint}");
        assert!(failure(FetchFailureKind::Io).hint().is_none());
    }

    #[test]
    fn fetch_failure_message_names_the_file() {
        let message = SessionError::from(failure(FetchFailureKind::Io)).to_string();
        assert_eq!(message, "failed to fetch tv19.tsv: boom");
    }
}
