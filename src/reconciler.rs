use crate::types::DrawResult;
use std::collections::BTreeMap;

pub const DEFAULT_MAX_RESULTS: usize = 30;

/// What a merge changed besides adding draws.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub corrected: Vec<u32>,
    pub dropped: usize,
}

/// Folds freshly scraped draws into the stored history, keyed by draw number
/// and capped at the `cap` most recent draws.
#[derive(Debug, Clone)]
pub struct Reconciler {
    cap: usize,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RESULTS)
    }
}

impl Reconciler {
    pub fn new(cap: usize) -> Self {
        Self { cap }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn merge<I>(&self, existing: Vec<DrawResult>, incoming: I) -> Vec<DrawResult>
    where
        I: IntoIterator<Item = DrawResult>,
    {
        self.merge_with_report(existing, incoming).0
    }

    /// Incoming draws win over stored ones with the same number (corrections
    /// overwrite, no history kept). Output is sorted by draw number, newest
    /// first; anything past the cap is gone for good.
    pub fn merge_with_report<I>(
        &self,
        existing: Vec<DrawResult>,
        incoming: I,
    ) -> (Vec<DrawResult>, MergeReport)
    where
        I: IntoIterator<Item = DrawResult>,
    {
        let mut by_draw: BTreeMap<u32, DrawResult> = existing
            .into_iter()
            .map(|d| (d.draw_number(), d.canonicalize()))
            .collect();
        let mut report = MergeReport::default();

        for draw in incoming {
            let draw = draw.canonicalize();
            match by_draw.get(&draw.draw_number()) {
                None => {
                    by_draw.insert(draw.draw_number(), draw);
                }
                Some(stored) if stored.conflicts_with(&draw) => {
                    tracing::info!(
                        draw_number = draw.draw_number(),
                        old = ?stored.numbers(),
                        new = ?draw.numbers(),
                        "correcting stored draw"
                    );
                    report.corrected.push(draw.draw_number());
                    by_draw.insert(draw.draw_number(), draw);
                }
                Some(_) => {}
            }
        }

        report.dropped = by_draw.len().saturating_sub(self.cap);
        if report.dropped > 0 {
            tracing::info!(dropped = report.dropped, cap = self.cap, "trimming history to cap");
        }

        let merged = by_draw.into_values().rev().take(self.cap).collect();
        (merged, report)
    }
}
