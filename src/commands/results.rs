use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::info;

use qrels_browser::util::write_json_stdout;

use super::output::{ResultsResponse, write_results};
use crate::cli::ResultsArgs;

pub fn run(args: ResultsArgs) -> Result<()> {
    let mut session = super::open_query(&args.data, &args.query)?;
    session.set_criteria(args.criteria.selection());

    let results = session
        .results()
        .context("results missing after successful load")?;

    if args.json {
        write_json_stdout(&ResultsResponse::new(&args.data.dataset, results))?;
    } else {
        let mut output = io::BufWriter::new(io::stdout().lock());
        write_results(&mut output, results)?;
        output.flush()?;
    }

    info!(
        query_id = %results.query_id,
        filtered = results.filtered.len(),
        total = results.all.len(),
        "results listed"
    );
    Ok(())
}
