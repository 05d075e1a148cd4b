//! Per-extractor option flags.

use serde::{Deserialize, Serialize};

/// Independently settable switches for a [`MergedExtractor`](crate::MergedExtractor).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "each flag toggles an independent pipeline stage"
)]
pub struct MergeOptions {
    /// Strip superfluous words before detection and run timezone detection.
    pub enable_preview: bool,

    /// Drop detector spans that look like "from X to Y" markers.
    pub skip_from_to_merge: bool,

    /// Run the alternative-expression reinterpretation pass.
    pub extended_types: bool,

    /// Apply the calendar filter-word denylist.
    pub calendar_mode: bool,
}

impl MergeOptions {
    /// Combines two option sets, enabling every flag set in either.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            enable_preview: self.enable_preview || other.enable_preview,
            skip_from_to_merge: self.skip_from_to_merge || other.skip_from_to_merge,
            extended_types: self.extended_types || other.extended_types,
            calendar_mode: self.calendar_mode || other.calendar_mode,
        }
    }
}
