use crate::error::StoreError;
use crate::filename::{filename_from_id, id_from_filename};
use crate::{Solution, SolutionId, SolutionSummary};
use parking_lot::Mutex;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub type Result<T> = std::result::Result<T, StoreError>;

/// How many times `store_solution` re-scans after losing an id to another writer.
pub const MAX_ALLOCATION_ATTEMPTS: usize = 64;

/// Ids of every stored solution in `dir`, ascending. Entries whose names are not
/// solution filenames are skipped.
pub fn list_ids(dir: &Path) -> Result<Vec<SolutionId>> {
    let entries = fs::read_dir(dir).map_err(|e| StoreError::io(dir, e))?;
    let mut ids = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| StoreError::io(dir, e))?;
        let name = entry.file_name();
        match name.to_str().and_then(id_from_filename) {
            Some(id) => ids.push(id),
            None => tracing::debug!(name = %name.to_string_lossy(), "skipping non-solution entry"),
        }
    }
    ids.sort_unstable();
    Ok(ids)
}

/// One past the largest stored id, or 0 for a directory with no solutions.
pub fn next_id(dir: &Path) -> Result<SolutionId> {
    match list_ids(dir)?.last() {
        Some(max) => max.checked_add(1).ok_or(StoreError::IdSpaceExhausted),
        None => Ok(0),
    }
}

/// Write `solution` under a freshly allocated id and return that id.
///
/// The record is written to a temporary file in `dir` and then linked into place only
/// if the target name is still free, so two writers racing on the same id never
/// overwrite each other and readers never observe a partial file.
pub fn store_solution(dir: &Path, solution: &Solution) -> Result<SolutionId> {
    let start = next_id(dir)?;
    store_from(dir, solution, start, MAX_ALLOCATION_ATTEMPTS)
}

/// Try `candidate` first, then re-scan after every id lost to another writer.
fn store_from(dir: &Path, solution: &Solution, mut candidate: SolutionId, max_attempts: usize) -> Result<SolutionId> {
    let bytes = serde_json::to_vec(solution)?;
    for attempt in 1..=max_attempts {
        let path = dir.join(filename_from_id(candidate));
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
        tmp.write_all(&bytes).map_err(|e| StoreError::io(tmp.path(), e))?;
        match tmp.persist_noclobber(&path) {
            Ok(_) => {
                tracing::info!(id = candidate, fields = solution.len(), "stored solution");
                return Ok(candidate);
            }
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                tracing::warn!(id = candidate, attempt, "solution id taken, retrying");
                let after = candidate.checked_add(1).ok_or(StoreError::IdSpaceExhausted)?;
                candidate = next_id(dir)?.max(after);
            }
            Err(e) => return Err(StoreError::io(path, e.error)),
        }
    }
    Err(StoreError::AllocationExhausted(max_attempts))
}

/// Read back the solution stored under `id`.
pub fn retrieve_solution(dir: &Path, id: SolutionId) -> Result<Solution> {
    let path = dir.join(filename_from_id(id));
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(StoreError::NotFound(id)),
        Err(e) => return Err(StoreError::io(path, e)),
    };
    tracing::debug!(id, bytes = text.len(), "retrieved solution");
    serde_json::from_str(&text).map_err(|source| StoreError::Malformed { id, source })
}

/// A solutions directory shared by request handlers.
pub struct SolutionStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl SolutionStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf(), write_lock: Mutex::new(()) }
    }

    /// Like [`SolutionStore::new`], creating the directory if it does not exist yet.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        fs::create_dir_all(root).map_err(|e| StoreError::io(root, e))?;
        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path { &self.root }

    pub fn path_for(&self, id: SolutionId) -> PathBuf { self.root.join(filename_from_id(id)) }

    pub fn next_id(&self) -> Result<SolutionId> { next_id(&self.root) }

    /// Writers in this process take turns; writers in other processes are still
    /// kept apart by the no-clobber link in [`store_solution`].
    pub fn store(&self, solution: &Solution) -> Result<SolutionId> {
        let _guard = self.write_lock.lock();
        store_solution(&self.root, solution)
    }

    pub fn retrieve(&self, id: SolutionId) -> Result<Solution> { retrieve_solution(&self.root, id) }

    pub fn list_summaries(&self) -> Result<Vec<SolutionSummary>> { crate::listing::list_summaries(&self.root) }
}
