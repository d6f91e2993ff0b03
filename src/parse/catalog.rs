use tracing::debug;

use super::{DiagnosticReason, LineDiagnostic, Parsed};
use crate::model::{QueryCatalog, QueryId};

pub fn parse_query_catalog(text: &str) -> Parsed<QueryCatalog> {
    let mut catalog = QueryCatalog::default();
    let mut diagnostics = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match parse_query_line(trimmed) {
            Ok((query_id, query_text)) => catalog.insert(query_id, query_text),
            Err(reason) => {
                debug!(line_number = index + 1, reason = %reason, "skipping query line");
                diagnostics.push(LineDiagnostic {
                    line_number: index + 1,
                    line: line.to_string(),
                    reason,
                });
            }
        }
    }

    Parsed {
        value: catalog,
        diagnostics,
    }
}

fn parse_query_line(trimmed: &str) -> Result<(QueryId, String), DiagnosticReason> {
    let (raw_id, raw_text) = trimmed
        .split_once('\t')
        .or_else(|| trimmed.split_once(' '))
        .ok_or(DiagnosticReason::MissingSeparator)?;

    let raw_id = raw_id.trim();
    let raw_text = raw_text.trim();
    if raw_id.is_empty() || raw_text.is_empty() {
        return Err(DiagnosticReason::EmptyField);
    }

    let query_id = QueryId::parse(raw_id).ok_or(DiagnosticReason::NonNumericId)?;
    Ok((query_id, raw_text.to_string()))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn pairs(catalog: &QueryCatalog) -> Vec<(String, String)> {
        catalog
            .iter()
            .map(|entry| (entry.query_id.to_string(), entry.query_text.clone()))
            .collect()
    }

    #[test]
    fn mixed_separators_and_comments_build_catalog() {
        let parsed = parse_query_catalog("5\tcats\n# note\n7 dogs and cats\n");
        assert_eq!(
            pairs(&parsed.value),
            vec![
                ("5".to_string(), "cats".to_string()),
                ("7".to_string(), "dogs and cats".to_string()),
            ]
        );
        assert!(parsed.diagnostics.is_empty());
    }

    #[test]
    fn tab_separator_keeps_rest_of_line_as_text() {
        let parsed = parse_query_catalog("12\tred car\twith driver\n");
        assert_eq!(
            pairs(&parsed.value),
            vec![("12".to_string(), "red car\twith driver".to_string())]
        );
    }

    #[test]
    fn indented_comment_and_blank_lines_are_ignored_silently() {
        let parsed = parse_query_catalog("\n   \n   # indented comment\r\n3\tboat\r\n");
        assert_eq!(pairs(&parsed.value), vec![("3".to_string(), "boat".to_string())]);
        assert!(parsed.diagnostics.is_empty());
    }

    #[test]
    fn malformed_lines_are_dropped_with_diagnostics() {
        let parsed = parse_query_catalog("abc\tnot numeric\nlonely\n9 ok\nq9 nope\n");
        assert_eq!(pairs(&parsed.value), vec![("9".to_string(), "ok".to_string())]);

        let reasons = parsed
            .diagnostics
            .iter()
            .map(|diagnostic| (diagnostic.line_number, diagnostic.reason))
            .collect::<Vec<_>>();
        assert_eq!(
            reasons,
            vec![
                (1, DiagnosticReason::NonNumericId),
                (2, DiagnosticReason::MissingSeparator),
                (4, DiagnosticReason::NonNumericId),
            ]
        );
    }

    #[test]
    fn repeated_id_takes_last_text() {
        let parsed = parse_query_catalog("4 first\n5 other\n4\tsecond\n");
        assert_eq!(
            pairs(&parsed.value),
            vec![
                ("4".to_string(), "second".to_string()),
                ("5".to_string(), "other".to_string()),
            ]
        );
    }

    #[test]
    fn empty_input_yields_empty_catalog() {
        let parsed = parse_query_catalog("");
        assert!(parsed.value.is_empty());
        assert!(parsed.diagnostics.is_empty());
    }

    proptest! {
        #[test]
        fn tab_and_space_lines_parse_identically(
            id in "[0-9]{1,6}",
            words in proptest::collection::vec("[a-z]{1,8}", 1..5),
        ) {
            let text = words.join(" ");
            let tabbed = parse_query_catalog(&format!("{id}\t{text}"));
            let spaced = parse_query_catalog(&format!("{id} {text}"));
            prop_assert_eq!(pairs(&tabbed.value), pairs(&spaced.value));
            prop_assert_eq!(pairs(&tabbed.value), vec![(id, text)]);
        }

        #[test]
        fn stored_ids_are_always_all_digits(input in "[ -~\t\n]{0,200}") {
            let parsed = parse_query_catalog(&input);
            for entry in parsed.value.iter() {
                prop_assert!(crate::model::is_all_digits(entry.query_id.as_str()));
                prop_assert!(!entry.query_text.is_empty());
            }
        }
    }
}
