use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use tracing::info;

use qrels_browser::error::SessionError;
use qrels_browser::filter::{FilterOutcome, LabelSelection};
use qrels_browser::session::{LoadApplied, Session, SessionConfig};
use qrels_browser::source::{DirectorySource, TextSource};

use super::output::{
    result_count_line, write_catalog, write_judgment_table, write_labels, write_results,
};
use crate::cli::{BrowseArgs, ParseMode};

const HELP: &str = "\
commands:
  dataset <name>          load <name>.tsv as the query catalog
  list                    list loaded queries
  query <id>              load judgments for a query
  clear                   deselect the current query
  judgements <a,b|*|->    accept these judgement labels (* = all, - = none)
  strata <a,b|*|->        accept these stratum labels (* = all, - = none)
  show                    print the filtered judgments
  labels                  print labels present for the current query
  status                  print session state as json
  help                    print this text
  quit                    leave";

#[derive(Debug, Clone, PartialEq, Eq)]
enum BrowseCommand {
    Dataset(String),
    List,
    Query(String),
    Clear,
    Judgements(LabelSelection),
    Strata(LabelSelection),
    Show,
    Labels,
    Status,
    Help,
    Quit,
}

pub fn run(args: BrowseArgs) -> Result<()> {
    let source = DirectorySource::new(&args.data_dir)?;
    let mut session = Session::new(SessionConfig {
        strict: args.parse_mode == ParseMode::Strict,
    });

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut output = stdout.lock();

    if let Some(dataset) = args.dataset.as_deref() {
        execute(
            &mut session,
            &source,
            BrowseCommand::Dataset(dataset.to_string()),
            &mut output,
        )?;
    }

    drive(&mut session, &source, stdin.lock(), &mut output)
}

fn drive<R: BufRead, W: Write>(
    session: &mut Session,
    source: &dyn TextSource,
    input: R,
    output: &mut W,
) -> Result<()> {
    for line in input.lines() {
        let line = line.context("failed to read command")?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match parse_command(trimmed) {
            Ok(BrowseCommand::Quit) => break,
            Ok(command) => execute(session, source, command, output)?,
            Err(message) => writeln!(output, "error: {message}")?,
        }
        output.flush()?;
    }

    info!(generation = session.generation(), "browse session ended");
    Ok(())
}

fn parse_command(line: &str) -> Result<BrowseCommand, String> {
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let argument = |name: &str| {
        if rest.is_empty() {
            Err(format!("{verb} needs a {name}"))
        } else {
            Ok(rest.to_string())
        }
    };

    match verb.to_ascii_lowercase().as_str() {
        "dataset" => argument("dataset name").map(BrowseCommand::Dataset),
        "list" => Ok(BrowseCommand::List),
        "query" => argument("query id").map(BrowseCommand::Query),
        "clear" => Ok(BrowseCommand::Clear),
        "judgements" | "judgments" => argument("label list")
            .map(|labels| BrowseCommand::Judgements(parse_labels(&labels))),
        "strata" => {
            argument("label list").map(|labels| BrowseCommand::Strata(parse_labels(&labels)))
        }
        "show" => Ok(BrowseCommand::Show),
        "labels" => Ok(BrowseCommand::Labels),
        "status" => Ok(BrowseCommand::Status),
        "help" | "?" => Ok(BrowseCommand::Help),
        "quit" | "exit" => Ok(BrowseCommand::Quit),
        other => Err(format!("unknown command `{other}`; try `help`")),
    }
}

fn parse_labels(raw: &str) -> LabelSelection {
    match raw {
        "*" => LabelSelection::All,
        "-" => LabelSelection::only(Vec::<String>::new()),
        _ => LabelSelection::only(
            raw.split(',')
                .map(str::trim)
                .filter(|label| !label.is_empty()),
        ),
    }
}

fn execute<W: Write>(
    session: &mut Session,
    source: &dyn TextSource,
    command: BrowseCommand,
    output: &mut W,
) -> Result<()> {
    session.clear_error();
    match command {
        BrowseCommand::Dataset(name) => match session.load_dataset(source, &name) {
            Ok(LoadApplied::Applied) => {
                let count = session.catalog().map(|catalog| catalog.len()).unwrap_or(0);
                writeln!(output, "loaded {count} queries from {name}")?;
            }
            Ok(LoadApplied::Stale) => {}
            Err(err) => write_error(output, &err)?,
        },
        BrowseCommand::List => match session.catalog() {
            Some(catalog) => write_catalog(output, catalog)?,
            None => write_error(output, &SessionError::NoDataset)?,
        },
        BrowseCommand::Query(query_id) => match session.select_query(source, &query_id) {
            Ok(LoadApplied::Applied) => {
                if let Some(results) = session.results() {
                    write_results(output, results)?;
                }
            }
            Ok(LoadApplied::Stale) => {}
            Err(err) => write_error(output, &err)?,
        },
        BrowseCommand::Clear => {
            session.clear_query();
            writeln!(output, "query cleared")?;
        }
        BrowseCommand::Judgements(selection) => {
            let outcome = session.set_judgements(selection);
            write_outcome(output, outcome)?;
        }
        BrowseCommand::Strata(selection) => {
            let outcome = session.set_strata(selection);
            write_outcome(output, outcome)?;
        }
        BrowseCommand::Show => match session.results() {
            Some(results) => write_results(output, results)?,
            None => write_error(output, &SessionError::NoResults)?,
        },
        BrowseCommand::Labels => match session.results() {
            Some(results) => write_labels(output, &results.known_labels())?,
            None => write_error(output, &SessionError::NoResults)?,
        },
        BrowseCommand::Status => {
            let status = serde_json::to_string(&session.status())
                .context("failed to serialize session status")?;
            writeln!(output, "{status}")?;
        }
        BrowseCommand::Help => writeln!(output, "{HELP}")?,
        BrowseCommand::Quit => {}
    }
    Ok(())
}

fn write_outcome<W: Write>(
    output: &mut W,
    outcome: Option<FilterOutcome>,
) -> Result<()> {
    match outcome {
        Some(outcome) => {
            writeln!(
                output,
                "{}",
                result_count_line(outcome.filtered_count, outcome.total_count)
            )?;
            write_judgment_table(output, &outcome.records)
        }
        None => {
            writeln!(output, "criteria stored; select a query to apply them")?;
            Ok(())
        }
    }
}

fn write_error<W: Write>(output: &mut W, err: &SessionError) -> Result<()> {
    writeln!(output, "error: {err}")?;
    if let Some(hint) = err.hint() {
        writeln!(output, "hint: {hint}")?;
    }
    Ok(())
}
