use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix the judgment file prepends to every catalog query id.
pub const JUDGMENT_QUERY_PREFIX: &str = "1";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct QueryId(String);

impl QueryId {
    pub fn parse(value: &str) -> Option<Self> {
        if is_all_digits(value) {
            Some(Self(value.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn prefixed(&self) -> String {
        format!("{JUDGMENT_QUERY_PREFIX}{}", self.0)
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn is_all_digits(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|character| character.is_ascii_digit())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryEntry {
    pub query_id: QueryId,
    pub query_text: String,
}

/// Ordered id → text mapping. A repeated id keeps its first position and takes
/// the latest text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryCatalog {
    entries: Vec<QueryEntry>,
}

impl QueryCatalog {
    pub fn insert(&mut self, query_id: QueryId, query_text: String) {
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.query_id == query_id)
        {
            Some(entry) => entry.query_text = query_text,
            None => self.entries.push(QueryEntry {
                query_id,
                query_text,
            }),
        }
    }

    pub fn get(&self, query_id: &QueryId) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| &entry.query_id == query_id)
            .map(|entry| entry.query_text.as_str())
    }

    pub fn contains(&self, query_id: &QueryId) -> bool {
        self.get(query_id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgmentRecord {
    /// Prefixed id exactly as it appears in the judgment file.
    pub query_id: String,
    pub junk: String,
    pub shot_id: String,
    pub stratum: String,
    pub judgement: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_id_rejects_non_digit_candidates() {
        assert!(QueryId::parse("123").is_some());
        assert!(QueryId::parse("").is_none());
        assert!(QueryId::parse("12a").is_none());
        assert!(QueryId::parse("-1").is_none());
        assert!(QueryId::parse("١٢").is_none());
    }

    #[test]
    fn prefixed_id_prepends_literal_one() {
        let id = QueryId::parse("5").expect("digits should parse");
        assert_eq!(id.prefixed(), "15");
    }

    #[test]
    fn catalog_overwrites_repeated_id_in_place() {
        let mut catalog = QueryCatalog::default();
        let five = QueryId::parse("5").expect("digits should parse");
        let seven = QueryId::parse("7").expect("digits should parse");
        catalog.insert(five.clone(), "cats".to_string());
        catalog.insert(seven.clone(), "dogs".to_string());
        catalog.insert(five.clone(), "lions".to_string());

        let ids = catalog
            .iter()
            .map(|entry| entry.query_id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["5", "7"]);
        assert_eq!(catalog.get(&five), Some("lions"));
        assert_eq!(catalog.len(), 2);
    }
}
