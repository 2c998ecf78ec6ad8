use crate::store::{list_ids, retrieve_solution, Result};
use crate::SolutionSummary;
use std::path::Path;

/// Summaries of every solution in `dir`, ordered by id.
///
/// One unreadable or incomplete record fails the whole listing.
pub fn list_summaries(dir: &Path) -> Result<Vec<SolutionSummary>> {
    let ids = list_ids(dir)?;
    let mut summaries = Vec::with_capacity(ids.len());
    for id in ids {
        let summary = retrieve_solution(dir, id).and_then(|s| SolutionSummary::from_solution(id, &s));
        match summary {
            Ok(summary) => summaries.push(summary),
            Err(e) => {
                tracing::error!(id, error = %e, "listing aborted");
                return Err(e);
            }
        }
    }
    Ok(summaries)
}
