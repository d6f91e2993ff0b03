use tracing::debug;

use super::{DiagnosticReason, LineDiagnostic, Parsed};
use crate::model::{JudgmentRecord, QueryId};

const REQUIRED_FIELDS: usize = 5;

/// Keeps the rows whose first field is exactly `"1" + target`, in file order.
pub fn parse_judgments(text: &str, target: &QueryId) -> Parsed<Vec<JudgmentRecord>> {
    let prefixed = target.prefixed();
    let mut records = Vec::new();
    let mut diagnostics = Vec::new();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let tokens = line.split_whitespace().take(REQUIRED_FIELDS).collect::<Vec<&str>>();
        if tokens.len() < REQUIRED_FIELDS {
            let reason = DiagnosticReason::TooFewFields {
                found: tokens.len(),
            };
            debug!(line_number = index + 1, reason = %reason, "skipping judgment line");
            diagnostics.push(LineDiagnostic {
                line_number: index + 1,
                line: line.to_string(),
                reason,
            });
            continue;
        }

        if tokens[0] != prefixed {
            continue;
        }

        records.push(JudgmentRecord {
            query_id: tokens[0].to_string(),
            junk: tokens[1].to_string(),
            shot_id: tokens[2].to_string(),
            stratum: tokens[3].to_string(),
            judgement: tokens[4].to_string(),
        });
    }

    Parsed {
        value: records,
        diagnostics,
    }
}
