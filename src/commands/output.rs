use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use qrels_browser::filter::{KnownLabels, LabelCount};
use qrels_browser::model::{JudgmentRecord, QueryCatalog, QueryEntry};
use qrels_browser::session::{LoadedDataset, LoadedResults};

const TABLE_HEADER: &str = "query_id\tjunk\tshot_id\tstratum\tjudgement";

#[derive(Debug, Serialize)]
pub(super) struct CatalogResponse<'a> {
    dataset: &'a str,
    loaded_at: &'a str,
    source_sha256: &'a str,
    query_count: usize,
    queries: Vec<&'a QueryEntry>,
}

impl<'a> CatalogResponse<'a> {
    pub(super) fn new(dataset: &'a LoadedDataset) -> Self {
        Self {
            dataset: &dataset.name,
            loaded_at: &dataset.loaded_at,
            source_sha256: &dataset.source_sha256,
            query_count: dataset.catalog.len(),
            queries: dataset.catalog.iter().collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct ResultsResponse<'a> {
    dataset: &'a str,
    query_id: &'a str,
    query_text: &'a str,
    loaded_at: &'a str,
    source_sha256: &'a str,
    filtered_count: usize,
    total_count: usize,
    labels: KnownLabels,
    selected_judgements: Vec<&'a str>,
    selected_strata: Vec<&'a str>,
    records: &'a [JudgmentRecord],
}

impl<'a> ResultsResponse<'a> {
    pub(super) fn new(dataset: &'a str, results: &'a LoadedResults) -> Self {
        let mut selected_judgements = results
            .criteria
            .judgements
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>();
        selected_judgements.sort_unstable();
        let mut selected_strata = results
            .criteria
            .strata
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>();
        selected_strata.sort_unstable();

        Self {
            dataset,
            query_id: results.query_id.as_str(),
            query_text: &results.query_text,
            loaded_at: &results.loaded_at,
            source_sha256: &results.source_sha256,
            filtered_count: results.filtered.len(),
            total_count: results.all.len(),
            labels: results.known_labels(),
            selected_judgements,
            selected_strata,
            records: &results.filtered,
        }
    }
}

pub(super) fn write_catalog<W: Write>(output: &mut W, catalog: &QueryCatalog) -> Result<()> {
    for entry in catalog.iter() {
        writeln!(output, "{}: {}", entry.query_id, entry.query_text)?;
    }
    Ok(())
}

pub(super) fn write_results<W: Write>(output: &mut W, results: &LoadedResults) -> Result<()> {
    writeln!(output, "Query {}: {}", results.query_id, results.query_text)?;
    writeln!(output, "{}", result_count_line(results.filtered.len(), results.all.len()))?;
    write_judgment_table(output, &results.filtered)
}

pub(super) fn result_count_line(filtered: usize, total: usize) -> String {
    format!("Showing {filtered} of {total} results")
}

pub(super) fn write_judgment_table<W: Write>(
    output: &mut W,
    records: &[JudgmentRecord],
) -> Result<()> {
    if records.is_empty() {
        writeln!(output, "No results match the current filters")?;
        return Ok(());
    }

    writeln!(output, "{TABLE_HEADER}")?;
    for record in records {
        writeln!(
            output,
            "{}\t{}\t{}\t{}\t{}",
            record.query_id, record.junk, record.shot_id, record.stratum, record.judgement
        )?;
    }
    Ok(())
}

pub(super) fn write_labels<W: Write>(output: &mut W, labels: &KnownLabels) -> Result<()> {
    write_label_group(output, "judgements", &labels.judgements)?;
    write_label_group(output, "strata", &labels.strata)
}

fn write_label_group<W: Write>(output: &mut W, title: &str, labels: &[LabelCount]) -> Result<()> {
    writeln!(output, "{title}:")?;
    if labels.is_empty() {
        writeln!(output, "\t(none)")?;
    }
    for label in labels {
        writeln!(output, "\t{}\t{}", label.label, label.count)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(shot: &str) -> JudgmentRecord {
        JudgmentRecord {
            query_id: "15".to_string(),
            junk: "0".to_string(),
            shot_id: shot.to_string(),
            stratum: "s1".to_string(),
            judgement: "rel".to_string(),
        }
    }

    fn render(records: &[JudgmentRecord]) -> String {
        let mut buffer = Vec::new();
        write_judgment_table(&mut buffer, records).expect("table should render");
        String::from_utf8(buffer).expect("table is utf-8")
    }

    #[test]
    fn table_lists_five_columns_per_record() {
        let text = render(&[record("shotA"), record("shotB")]);
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], TABLE_HEADER);
        assert_eq!(lines[1], "15\t0\tshotA\ts1\trel");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn empty_table_renders_placeholder() {
        assert_eq!(render(&[]), "No results match the current filters\n");
    }

    #[test]
    fn count_line_matches_display_format() {
        assert_eq!(result_count_line(0, 0), "Showing 0 of 0 results");
        assert_eq!(result_count_line(2, 7), "Showing 2 of 7 results");
    }
}
