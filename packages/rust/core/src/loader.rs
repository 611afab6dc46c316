//! End-to-end load workflow: source file → parsed lines → KB mappings.

use std::fs::File;
use std::io::BufReader;
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument};

use kbload_shared::{KbLoadError, LoadRequest, Result};

use crate::entries::{EntryLines, ParsedLine};
use crate::store::KbStore;

/// Result of one `load_kb` run.
#[derive(Debug, Clone)]
pub struct LoadSummary {
    /// Target KB name.
    pub kb_name: String,
    /// Whether the KB was created by this run (as opposed to updated).
    pub created: bool,
    /// Mappings successfully inserted.
    pub inserted: usize,
    /// Lines skipped because they did not split into exactly two fields.
    pub malformed: usize,
    /// Lines with no content.
    pub blank: usize,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting load status.
pub trait LoadReporter {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called for each line that was skipped as malformed.
    fn malformed(&self, line_number: usize, fields: &[String]);
    /// Called after each successful insert with the running total.
    fn inserted(&self, total: usize);
    /// Called when the load completes.
    fn done(&self, summary: &LoadSummary);
}

/// No-op reporter for headless/test usage.
pub struct SilentReporter;

impl LoadReporter for SilentReporter {
    fn phase(&self, _name: &str) {}
    fn malformed(&self, _line_number: usize, _fields: &[String]) {}
    fn inserted(&self, _total: usize) {}
    fn done(&self, _summary: &LoadSummary) {}
}

/// Load every well-formed line of `request.file_path` into `request.kb_name`.
///
/// 1. Open the source file (before any store mutation)
/// 2. Create the KB, or refresh its description if it already exists
/// 3. Insert one mapping per well-formed line, in file order
///
/// Malformed lines are reported and skipped. Store errors abort the load;
/// mappings inserted before the failure are kept.
#[instrument(skip_all, fields(kb = %request.kb_name, file = %request.file_path.display()))]
pub async fn load_kb<S: KbStore>(
    request: &LoadRequest,
    store: &S,
    delimiter: &str,
    reporter: &dyn LoadReporter,
) -> Result<LoadSummary> {
    if delimiter.is_empty() {
        return Err(KbLoadError::validation("delimiter must not be empty"));
    }

    let start = Instant::now();
    let kb_name = request.kb_name.as_str();

    let file =
        File::open(&request.file_path).map_err(|e| KbLoadError::io(&request.file_path, e))?;
    let lines = EntryLines::new(BufReader::new(file), delimiter);

    // --- Phase 1: KB metadata ---
    reporter.phase("Preparing knowledge base");
    let created = if store.kb_exists(kb_name).await? {
        debug!("kb exists, refreshing description");
        store
            .update_kb(kb_name, kb_name, &request.description)
            .await?;
        false
    } else {
        debug!("kb not found, creating");
        store.create_kb(kb_name, &request.description).await?;
        true
    };

    // --- Phase 2: Mappings ---
    reporter.phase("Inserting entries");
    let mut inserted = 0;
    let mut malformed = 0;
    let mut blank = 0;

    for line in lines {
        let line = line.map_err(|e| KbLoadError::io(&request.file_path, e))?;
        match line.parsed {
            ParsedLine::Blank => blank += 1,
            ParsedLine::Malformed(fields) => {
                debug!(line = line.number, ?fields, "skipping malformed entry");
                reporter.malformed(line.number, &fields);
                malformed += 1;
            }
            ParsedLine::Entry(entry) => {
                store
                    .insert_mapping(kb_name, &entry.key, &entry.value)
                    .await?;
                inserted += 1;
                reporter.inserted(inserted);
            }
        }
    }

    let summary = LoadSummary {
        kb_name: kb_name.to_string(),
        created,
        inserted,
        malformed,
        blank,
        elapsed: start.elapsed(),
    };

    info!(
        inserted,
        malformed,
        created,
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "load finished"
    );
    reporter.done(&summary);
    Ok(summary)
}
