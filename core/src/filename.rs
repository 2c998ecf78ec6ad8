use crate::SolutionId;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RE: Regex = Regex::new(r"^solution_([0-9]+)\.json$").expect("valid regex");
}

/// Filename under which the solution with `id` is stored.
pub fn filename_from_id(id: SolutionId) -> String {
    format!("solution_{id}.json")
}

/// Inverse of [`filename_from_id`]. Returns `None` for anything that is not exactly
/// `solution_<digits>.json`, including digit runs too large for a `SolutionId`.
pub fn id_from_filename(name: &str) -> Option<SolutionId> {
    let caps = RE.captures(name)?;
    caps[1].parse().ok()
}
