pub mod error;
pub mod filename;
pub mod listing;
pub mod store;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use error::StoreError;
pub use listing::list_summaries;
pub use store::{next_id, retrieve_solution, store_solution, SolutionStore};

pub type SolutionId = u64;

/// Keys every listed solution must carry.
pub const REQUIRED_FIELDS: [&str; 3] = ["book", "author", "problem"];

/// A submitted solution: string fields keyed by name, persisted as one flat JSON object.
/// Only `book`, `author` and `problem` are interpreted; anything else rides along.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Solution(BTreeMap<String, String>);

impl Solution {
    pub fn new() -> Self { Self::default() }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Fields in key order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Solution {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<BTreeMap<String, String>> for Solution {
    fn from(map: BTreeMap<String, String>) -> Self { Self(map) }
}

/// The projection of a solution shown on the index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolutionSummary {
    pub id: SolutionId,
    pub book: String,
    pub author: String,
    pub problem: String,
}

impl SolutionSummary {
    pub fn from_solution(id: SolutionId, solution: &Solution) -> Result<Self, StoreError> {
        let field = |name: &'static str| {
            solution
                .get(name)
                .map(str::to_owned)
                .ok_or(StoreError::MissingField { id, field: name })
        };
        Ok(Self { id, book: field("book")?, author: field("author")?, problem: field("problem")? })
    }
}
