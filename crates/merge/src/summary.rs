//! Merge result counters.

use crate::merger::{CopyReason, TensorOutcome};
use serde::Serialize;

/// What a merge did.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct MergeSummary {
    /// Tensors blended from both models
    pub tensors_blended: usize,
    /// Tensors copied from A because B has no tensor of that name
    pub tensors_missing_in_b: usize,
    /// Non-float tensors copied from A
    pub tensors_non_float: usize,
    /// Tensors only in B, left out of the output
    pub tensors_dropped: usize,
    /// Blends whose projection coefficient hit `coef_clip`
    pub coef_clipped: usize,
    /// Elements pulled back into the trust region
    pub elements_clamped: u64,
    /// Elements replaced by A because the blend was not finite
    pub elements_fallback: u64,
    /// Elements written by blends
    pub elements_blended: u64,
    /// Wall time (microseconds)
    pub elapsed_micros: u64,
}

impl MergeSummary {
    /// Fold one tensor's outcome into the counters.
    pub fn record(&mut self, outcome: &TensorOutcome) {
        match outcome {
            TensorOutcome::Blended(report) => {
                self.tensors_blended += 1;
                if report.coef_clipped {
                    self.coef_clipped += 1;
                }
                self.elements_clamped += report.clamped as u64;
                self.elements_fallback += report.fallbacks as u64;
                self.elements_blended += report.numel as u64;
            }
            TensorOutcome::Copied(CopyReason::MissingInDonor) => self.tensors_missing_in_b += 1,
            TensorOutcome::Copied(CopyReason::NonFloat) => self.tensors_non_float += 1,
        }
    }

    /// Tensors written to the output.
    pub fn tensors_written(&self) -> usize {
        self.tensors_blended + self.tensors_missing_in_b + self.tensors_non_float
    }

    /// Get human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "Merge complete: {} blended, {} copied from A ({} missing in B, {} non-float), {} dropped, {} clipped coefs, {} clamped, {} fallback elements, {:.2}ms",
            self.tensors_blended,
            self.tensors_missing_in_b + self.tensors_non_float,
            self.tensors_missing_in_b,
            self.tensors_non_float,
            self.tensors_dropped,
            self.coef_clipped,
            self.elements_clamped,
            self.elements_fallback,
            self.elapsed_micros as f64 / 1000.0,
        )
    }

    /// Whether the models did not line up cleanly or any element fell back.
    pub fn has_issues(&self) -> bool {
        self.tensors_missing_in_b > 0 || self.tensors_dropped > 0 || self.elements_fallback > 0
    }
}
