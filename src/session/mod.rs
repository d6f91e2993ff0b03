use serde::Serialize;
use tracing::{info, warn};

use crate::error::{FetchFailure, SessionError};
use crate::filter::{
    self, CriteriaSelection, FilterCriteria, FilterOutcome, KnownLabels, LabelSelection,
};
use crate::model::{JudgmentRecord, QueryCatalog, QueryId};
use crate::parse::{self, LineDiagnostic};
use crate::source::{self, TextSource};
use crate::util::{now_utc_string, sha256_text};


#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionConfig {
    pub strict: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    NoDataset,
    QueriesLoading,
    QueriesLoaded,
    ResultsLoading,
    ResultsLoaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadApplied {
    Applied,
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogTicket {
    generation: u64,
    dataset: String,
}

impl CatalogTicket {
    pub fn file_name(&self) -> String {
        source::query_file_name(&self.dataset)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsTicket {
    generation: u64,
    dataset: String,
    query_id: QueryId,
}

impl ResultsTicket {
    pub fn file_name(&self) -> String {
        source::judgment_file_name(&self.dataset)
    }
}

#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub name: String,
    pub catalog: QueryCatalog,
    pub source_sha256: String,
    pub loaded_at: String,
}

#[derive(Debug, Clone)]
pub struct LoadedResults {
    pub query_id: QueryId,
    pub query_text: String,
    pub all: Vec<JudgmentRecord>,
    pub criteria: FilterCriteria,
    pub filtered: Vec<JudgmentRecord>,
    pub source_sha256: String,
    pub loaded_at: String,
}

impl LoadedResults {
    pub fn outcome(&self) -> FilterOutcome {
        FilterOutcome {
            filtered_count: self.filtered.len(),
            total_count: self.all.len(),
            records: self.filtered.clone(),
        }
    }

    pub fn known_labels(&self) -> KnownLabels {
        KnownLabels::collect(&self.all)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub phase: Phase,
    pub generation: u64,
    pub dataset: Option<String>,
    pub query_count: usize,
    pub query_id: Option<String>,
    pub filtered_count: Option<usize>,
    pub total_count: Option<usize>,
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    generation: u64,
    phase: Phase,
    pending_dataset: Option<String>,
    dataset: Option<LoadedDataset>,
    results: Option<LoadedResults>,
    selection: CriteriaSelection,
    last_error: Option<SessionError>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            generation: 0,
            phase: Phase::NoDataset,
            pending_dataset: None,
            dataset: None,
            results: None,
            selection: CriteriaSelection::default(),
            last_error: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn dataset(&self) -> Option<&LoadedDataset> {
        self.dataset.as_ref()
    }

    pub fn catalog(&self) -> Option<&QueryCatalog> {
        self.dataset.as_ref().map(|dataset| &dataset.catalog)
    }

    pub fn results(&self) -> Option<&LoadedResults> {
        self.results.as_ref()
    }

    pub fn selection(&self) -> &CriteriaSelection {
        &self.selection
    }

    pub fn last_error(&self) -> Option<&SessionError> {
        self.last_error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn outcome(&self) -> Result<FilterOutcome, SessionError> {
        self.results
            .as_ref()
            .map(LoadedResults::outcome)
            .ok_or(SessionError::NoResults)
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            phase: self.phase,
            generation: self.generation,
            dataset: self
                .dataset
                .as_ref()
                .map(|dataset| dataset.name.clone())
                .or_else(|| self.pending_dataset.clone()),
            query_count: self.catalog().map(QueryCatalog::len).unwrap_or(0),
            query_id: self
                .results
                .as_ref()
                .map(|results| results.query_id.to_string()),
            filtered_count: self.results.as_ref().map(|results| results.filtered.len()),
            total_count: self.results.as_ref().map(|results| results.all.len()),
            error: self.last_error.as_ref().map(ToString::to_string),
        }
    }

    pub fn begin_dataset_load(&mut self, dataset: &str) -> CatalogTicket {
        self.generation += 1;
        self.phase = Phase::QueriesLoading;
        self.pending_dataset = Some(dataset.to_string());
        self.dataset = None;
        self.results = None;
        self.selection = CriteriaSelection::default();
        self.last_error = None;

        CatalogTicket {
            generation: self.generation,
            dataset: dataset.to_string(),
        }
    }

    pub fn finish_dataset_load(
        &mut self,
        ticket: CatalogTicket,
        fetched: Result<String, FetchFailure>,
    ) -> Result<LoadApplied, SessionError> {
        if self.is_stale(ticket.generation) {
            warn!(
                dataset = %ticket.dataset,
                generation = ticket.generation,
                current = self.generation,
                "discarding superseded catalog load"
            );
            return Ok(LoadApplied::Stale);
        }

        let loaded = fetched
            .map_err(SessionError::from)
            .and_then(|text| self.decode_catalog(&ticket, &text));

        match loaded {
            Ok(dataset) => {
                info!(
                    dataset = %dataset.name,
                    queries = dataset.catalog.len(),
                    "loaded query catalog"
                );
                self.dataset = Some(dataset);
                self.pending_dataset = None;
                self.phase = Phase::QueriesLoaded;
                Ok(LoadApplied::Applied)
            }
            Err(err) => {
                self.phase = Phase::NoDataset;
                self.pending_dataset = None;
                Err(self.record_error(err))
            }
        }
    }

    pub fn load_dataset(
        &mut self,
        source: &dyn TextSource,
        dataset: &str,
    ) -> Result<LoadApplied, SessionError> {
        let ticket = self.begin_dataset_load(dataset);
        let fetched = source.fetch_text(&ticket.file_name());
        self.finish_dataset_load(ticket, fetched)
    }

    pub fn begin_results_load(&mut self, query_id: &str) -> Result<ResultsTicket, SessionError> {
        self.last_error = None;

        let dataset = match self.phase {
            Phase::QueriesLoaded | Phase::ResultsLoading | Phase::ResultsLoaded => self
                .dataset
                .as_ref()
                .map(|dataset| dataset.name.clone()),
            Phase::NoDataset | Phase::QueriesLoading => None,
        };
        let Some(dataset) = dataset else {
            return Err(self.record_error(SessionError::NoDataset));
        };

        let Some(query_id) = QueryId::parse(query_id.trim()) else {
            return Err(self.record_error(SessionError::InvalidQueryId {
                query_id: query_id.to_string(),
            }));
        };

        if !self.catalog().is_some_and(|catalog| catalog.contains(&query_id)) {
            return Err(self.record_error(SessionError::UnknownQuery {
                query_id: query_id.to_string(),
            }));
        }

        self.generation += 1;
        self.phase = Phase::ResultsLoading;
        self.results = None;

        Ok(ResultsTicket {
            generation: self.generation,
            dataset,
            query_id,
        })
    }

    pub fn finish_results_load(
        &mut self,
        ticket: ResultsTicket,
        fetched: Result<String, FetchFailure>,
    ) -> Result<LoadApplied, SessionError> {
        if self.is_stale(ticket.generation) {
            warn!(
                query_id = %ticket.query_id,
                generation = ticket.generation,
                current = self.generation,
                "discarding superseded results load"
            );
            return Ok(LoadApplied::Stale);
        }

        let loaded = fetched
            .map_err(SessionError::from)
            .and_then(|text| self.decode_results(&ticket, &text));

        match loaded {
            Ok(results) => {
                info!(
                    query_id = %results.query_id,
                    total = results.all.len(),
                    filtered = results.filtered.len(),
                    "loaded judgments"
                );
                self.results = Some(results);
                self.phase = Phase::ResultsLoaded;
                Ok(LoadApplied::Applied)
            }
            Err(err) => {
                self.phase = Phase::QueriesLoaded;
                Err(self.record_error(err))
            }
        }
    }

    pub fn select_query(
        &mut self,
        source: &dyn TextSource,
        query_id: &str,
    ) -> Result<LoadApplied, SessionError> {
        let ticket = self.begin_results_load(query_id)?;
        let fetched = source.fetch_text(&ticket.file_name());
        self.finish_results_load(ticket, fetched)
    }

    pub fn clear_query(&mut self) {
        self.last_error = None;
        self.results = None;
        if self.dataset.is_some() {
            self.generation += 1;
            self.phase = Phase::QueriesLoaded;
        }
    }

    pub fn set_criteria(&mut self, selection: CriteriaSelection) -> Option<FilterOutcome> {
        self.last_error = None;
        self.selection = selection;

        let results = self.results.as_mut()?;
        results.criteria = self.selection.resolve(&results.all);
        results.filtered = filter::apply(&results.all, &results.criteria);
        info!(
            query_id = %results.query_id,
            filtered = results.filtered.len(),
            total = results.all.len(),
            "applied filters"
        );
        Some(results.outcome())
    }

    pub fn set_judgements(&mut self, judgements: LabelSelection) -> Option<FilterOutcome> {
        let selection = CriteriaSelection {
            judgements,
            strata: self.selection.strata.clone(),
        };
        self.set_criteria(selection)
    }

    pub fn set_strata(&mut self, strata: LabelSelection) -> Option<FilterOutcome> {
        let selection = CriteriaSelection {
            judgements: self.selection.judgements.clone(),
            strata,
        };
        self.set_criteria(selection)
    }

    fn is_stale(&self, generation: u64) -> bool {
        generation != self.generation
    }

    fn record_error(&mut self, err: SessionError) -> SessionError {
        warn!(error = %err, "session operation failed");
        self.last_error = Some(err.clone());
        err
    }

    fn check_diagnostics(
        &self,
        file: String,
        diagnostics: Vec<LineDiagnostic>,
    ) -> Result<(), SessionError> {
        if diagnostics.is_empty() {
            return Ok(());
        }
        if self.config.strict {
            return Err(SessionError::MalformedInput { file, diagnostics });
        }
        info!(file = %file, skipped = diagnostics.len(), "skipped malformed lines");
        Ok(())
    }

    fn decode_catalog(
        &self,
        ticket: &CatalogTicket,
        text: &str,
    ) -> Result<LoadedDataset, SessionError> {
        let parsed = parse::parse_query_catalog(text);
        self.check_diagnostics(ticket.file_name(), parsed.diagnostics)?;

        if parsed.value.is_empty() {
            return Err(SessionError::EmptyCatalog {
                dataset: ticket.dataset.clone(),
            });
        }

        Ok(LoadedDataset {
            name: ticket.dataset.clone(),
            catalog: parsed.value,
            source_sha256: sha256_text(text),
            loaded_at: now_utc_string(),
        })
    }

    fn decode_results(
        &self,
        ticket: &ResultsTicket,
        text: &str,
    ) -> Result<LoadedResults, SessionError> {
        let parsed = parse::parse_judgments(text, &ticket.query_id);
        self.check_diagnostics(ticket.file_name(), parsed.diagnostics)?;

        let query_text = self
            .catalog()
            .and_then(|catalog| catalog.get(&ticket.query_id))
            .unwrap_or("N/A")
            .to_string();
        let all = parsed.value;
        let criteria = self.selection.resolve(&all);
        let filtered = filter::apply(&all, &criteria);

        Ok(LoadedResults {
            query_id: ticket.query_id.clone(),
            query_text,
            all,
            criteria,
            filtered,
            source_sha256: sha256_text(text),
            loaded_at: now_utc_string(),
        })
    }
}
