use crate::api::MarkupSource;
use crate::extractor::Extractor;
use crate::reconciler::Reconciler;
use crate::store::JsonStore;
use crate::types::{Dataset, DrawResult};
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::path::PathBuf;

/// Everything the console report needs about one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub bytes_fetched: usize,
    pub candidates: usize,
    pub existing: usize,
    pub added_draws: Vec<u32>,
    pub corrected_draws: Vec<u32>,
    pub saved: usize,
    pub saved_to: PathBuf,
    pub latest: Option<DrawResult>,
}

/// Fetch, extract, merge and persist. A fetch or save failure aborts the run;
/// a page with no recognisable draws does not.
pub async fn run<S: MarkupSource>(
    source: &S,
    store: &JsonStore,
    extractor: &Extractor,
    reconciler: &Reconciler,
    now: DateTime<Utc>,
) -> Result<RunSummary> {
    let markup = source.fetch().await?;
    crate::reports::fetched(markup.len());

    let incoming = extractor.extract(&markup);
    crate::reports::parsed(incoming.len());

    let existing = store.load().results;
    crate::reports::loaded(existing.len());

    let old_draws: HashSet<u32> = existing.iter().map(DrawResult::draw_number).collect();
    let candidates = incoming.len();
    let existing_count = existing.len();

    let (merged, report) = reconciler.merge_with_report(existing, incoming);

    let mut added_draws: Vec<u32> = merged
        .iter()
        .map(DrawResult::draw_number)
        .filter(|n| !old_draws.contains(n))
        .collect();
    added_draws.sort_unstable_by(|a, b| b.cmp(a));

    let dataset = Dataset {
        last_updated: Some(now),
        source: store.source().to_string(),
        results: merged,
    };
    store.save(&dataset)?;
    tracing::info!(path = %store.path().display(), saved = dataset.results.len(), "saved results");

    Ok(RunSummary {
        bytes_fetched: markup.len(),
        candidates,
        existing: existing_count,
        added_draws,
        corrected_draws: report.corrected,
        saved: dataset.results.len(),
        saved_to: store.path().to_path_buf(),
        latest: dataset.results.first().cloned(),
    })
}
