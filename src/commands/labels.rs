use std::io::{self, Write};

use anyhow::{Context, Result};
use serde::Serialize;

use qrels_browser::filter::KnownLabels;
use qrels_browser::util::write_json_stdout;

use super::output::write_labels;
use crate::cli::LabelsArgs;

#[derive(Debug, Serialize)]
struct LabelsResponse<'a> {
    dataset: &'a str,
    query_id: &'a str,
    total_count: usize,
    labels: KnownLabels,
}

pub fn run(args: LabelsArgs) -> Result<()> {
    let session = super::open_query(&args.data, &args.query)?;
    let results = session
        .results()
        .context("results missing after successful load")?;
    let labels = results.known_labels();

    if args.json {
        return write_json_stdout(&LabelsResponse {
            dataset: &args.data.dataset,
            query_id: results.query_id.as_str(),
            total_count: results.all.len(),
            labels,
        });
    }

    let mut output = io::BufWriter::new(io::stdout().lock());
    write_labels(&mut output, &labels)?;
    output.flush()?;
    Ok(())
}
