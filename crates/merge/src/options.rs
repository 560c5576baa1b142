//! Merge configuration.

use orbit_core::BlendParams;

/// Options for a model merge.
///
/// Use the builder pattern to configure options:
///
/// ```ignore
/// use orbit_merge::MergeOptions;
///
/// let opts = MergeOptions::new().threads(8).keep_metadata(false);
/// ```
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Parameters passed to every blend
    pub params: BlendParams,
    /// Worker threads; `None` uses rayon's global pool
    pub threads: Option<usize>,
    /// Copy model A's `__metadata__` into the output
    pub keep_metadata: bool,
}

impl MergeOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the blend parameters.
    pub fn params(mut self, params: BlendParams) -> Self {
        self.params = params;
        self
    }

    /// Cap the number of worker threads.
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Whether to carry model A's metadata into the output.
    pub fn keep_metadata(mut self, keep: bool) -> Self {
        self.keep_metadata = keep;
        self
    }
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            params: BlendParams::default(),
            threads: None,
            keep_metadata: true,
        }
    }
}
