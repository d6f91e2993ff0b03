use std::collections::HashSet;

use serde::Serialize;

use crate::model::JudgmentRecord;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub judgements: HashSet<String>,
    pub strata: HashSet<String>,
}

impl FilterCriteria {
    pub fn new<J, S>(judgements: J, strata: S) -> Self
    where
        J: IntoIterator,
        J::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            judgements: judgements.into_iter().map(Into::into).collect(),
            strata: strata.into_iter().map(Into::into).collect(),
        }
    }

    pub fn accept_all(records: &[JudgmentRecord]) -> Self {
        let labels = KnownLabels::collect(records);
        Self::new(
            labels.judgements.into_iter().map(|label| label.label),
            labels.strata.into_iter().map(|label| label.label),
        )
    }

    pub fn accepts(&self, record: &JudgmentRecord) -> bool {
        self.judgements.contains(&record.judgement) && self.strata.contains(&record.stratum)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LabelSelection {
    #[default]
    All,
    Only(HashSet<String>),
}

impl LabelSelection {
    pub fn only<I>(labels: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self::Only(labels.into_iter().map(Into::into).collect())
    }

    fn resolve<'a>(&self, present: impl Iterator<Item = &'a str>) -> HashSet<String> {
        match self {
            Self::All => present.map(ToOwned::to_owned).collect(),
            Self::Only(labels) => labels.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CriteriaSelection {
    pub judgements: LabelSelection,
    pub strata: LabelSelection,
}

impl CriteriaSelection {
    pub fn resolve(&self, records: &[JudgmentRecord]) -> FilterCriteria {
        FilterCriteria {
            judgements: self
                .judgements
                .resolve(records.iter().map(|record| record.judgement.as_str())),
            strata: self
                .strata
                .resolve(records.iter().map(|record| record.stratum.as_str())),
        }
    }
}

pub fn apply(records: &[JudgmentRecord], criteria: &FilterCriteria) -> Vec<JudgmentRecord> {
    records
        .iter()
        .filter(|record| criteria.accepts(record))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOutcome {
    pub filtered_count: usize,
    pub total_count: usize,
    pub records: Vec<JudgmentRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

/// Distinct labels of a result set, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KnownLabels {
    pub judgements: Vec<LabelCount>,
    pub strata: Vec<LabelCount>,
}

impl KnownLabels {
    pub fn collect(records: &[JudgmentRecord]) -> Self {
        let mut labels = Self::default();
        for record in records {
            bump(&mut labels.judgements, &record.judgement);
            bump(&mut labels.strata, &record.stratum);
        }
        labels
    }
}

fn bump(counts: &mut Vec<LabelCount>, label: &str) {
    match counts.iter_mut().find(|entry| entry.label == label) {
        Some(entry) => entry.count += 1,
        None => counts.push(LabelCount {
            label: label.to_string(),
            count: 1,
        }),
    }
}
