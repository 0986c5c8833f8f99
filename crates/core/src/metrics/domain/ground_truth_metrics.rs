use serde::{Deserialize, Serialize};

/// Weight of one ground-truth box relative to the whole page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GtBoxDescription {
    /// Box foreground pixels over page foreground pixels.
    pub fg_pix_ratio: f64,
    /// Box area over page area.
    pub area_ratio: f64,
}

/// Page-level summary of the ground-truth segmentation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GroundTruthMetrics {
    /// Number of ground-truth regions on the page.
    pub segmentations: usize,
    /// Foreground pixels inside ground-truth regions (the positives).
    pub total_seg_fg_pixels: u64,
    /// Foreground pixels outside every ground-truth region (the negatives).
    pub total_nonseg_fg_pixels: u64,
    pub total_fg_pixels: u64,
    pub fg_pixel_ratio: f64,
    pub total_seg_area: u64,
    pub total_area: u64,
    pub area_ratio: f64,
    pub descriptions: Vec<GtBoxDescription>,
}
