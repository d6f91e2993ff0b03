pub mod browse;
pub mod labels;
mod output;
pub mod queries;
pub mod results;

use anyhow::{Context, Result};
use tracing::{info, warn};

use qrels_browser::error::SessionError;
use qrels_browser::session::Session;
use qrels_browser::source::DirectorySource;

use crate::cli::DataArgs;

fn open_dataset(data: &DataArgs) -> Result<(DirectorySource, Session)> {
    let source = DirectorySource::new(&data.data_dir)?;
    let mut session = Session::new(data.session_config());

    info!(
        data_dir = %data.data_dir.display(),
        dataset = %data.dataset,
        parse_mode = data.parse_mode.as_str(),
        "loading dataset"
    );
    session
        .load_dataset(&source, &data.dataset)
        .map_err(log_hint)
        .with_context(|| format!("no usable queries in dataset {}", data.dataset))?;

    Ok((source, session))
}

fn open_query(data: &DataArgs, query_id: &str) -> Result<Session> {
    let (source, mut session) = open_dataset(data)?;
    session
        .select_query(&source, query_id)
        .map_err(log_hint)
        .with_context(|| format!("failed to load results for query {query_id}"))?;
    Ok(session)
}

fn log_hint(err: SessionError) -> SessionError {
    if let Some(hint) = err.hint() {
        warn!(hint = %hint, "operator hint");
    }
    err
}
