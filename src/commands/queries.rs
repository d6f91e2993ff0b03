use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::info;

use qrels_browser::util::write_json_stdout;

use super::output::{CatalogResponse, write_catalog};
use crate::cli::QueriesArgs;

pub fn run(args: QueriesArgs) -> Result<()> {
    let (_, session) = super::open_dataset(&args.data)?;
    let dataset = session
        .dataset()
        .context("dataset missing after successful load")?;

    if args.json {
        write_json_stdout(&CatalogResponse::new(dataset))?;
    } else {
        let mut output = io::BufWriter::new(io::stdout().lock());
        write_catalog(&mut output, &dataset.catalog)?;
        output.flush()?;
    }

    info!(
        dataset = %dataset.name,
        query_count = dataset.catalog.len(),
        "queries listed"
    );
    Ok(())
}
