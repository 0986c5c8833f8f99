/// Fraction of a ground-truth region's foreground that a one-to-one match
/// must recover to count as a correct segmentation.
pub const DEFAULT_CORRECT_SEGMENTATION_THRESHOLD: f64 = 0.99;

/// Region label used when the caller does not restrict evaluation to one
/// region type.
pub const ALL_REGIONS_LABEL: &str = "all";

/// Worker threads used for batch evaluation when none are requested.
pub const DEFAULT_BATCH_WORKERS: usize = 4;
