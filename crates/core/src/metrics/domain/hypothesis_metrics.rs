use serde::{Deserialize, Serialize};

use crate::graph::domain::vertex::VertexId;
use crate::shared::rect::Rect;

/// Pixel accounting for one detected (hypothesis) region.
///
/// A detected region only holds positives: matching pixels are true
/// positives, the rest of its foreground is false positive. False
/// negatives are the foreground of the overlapping ground-truth regions
/// this region failed to recover.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionDescription {
    pub rect: Rect,
    pub vertex: VertexId,
    pub area: u64,
    pub num_fg_pixels: u64,
    pub num_fg_pixels_duplicate: u64,
    pub true_positive_pix: u64,
    pub false_positive_pix: u64,
    pub false_positive_pix_duplicate: u64,
    pub false_negative_pix: u64,
    /// True positives over all ground-truth positives of the page.
    pub recall: f64,
    /// True positives over the region's detected pixels.
    pub precision: f64,
    /// False positives over all ground-truth negatives of the page.
    pub fallout: f64,
    pub fallout_duplicate: f64,
    /// False positives over the region's detected pixels.
    pub false_discovery: f64,
    pub false_discovery_duplicate: f64,
    /// Number of ground-truth regions overlapping this one.
    pub num_gt_overlap: usize,
}

/// Pixel accounting for one ground-truth region, seen from the hypothesis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlappingGtRegion {
    pub rect: Rect,
    pub vertex: VertexId,
    pub false_negative_pixels: u64,
    pub false_negative_pixels_duplicate: u64,
    /// Number of hypothesis regions overlapping this one.
    pub num_edges: usize,
}

impl OverlappingGtRegion {
    pub fn is_missed(&self) -> bool {
        self.num_edges == 0
    }
}

// True Positive Rate (Recall):        TPR = TP / P
// False Positive Rate (Fallout):      FPR = FP / N
// Accuracy:                           ACC = (TP + TN) / (P + N)
// True Negative Rate (Specificity):   SPC = TN / N
// Positive Predictive Value:          PPV = TP / (TP + FP)
// Negative Predictive Value:          NPV = TN / (TN + FN)
// False Discovery Rate:               FDR = FP / (TP + FP)

/// Page-level evaluation of the hypothesis segmentation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HypothesisMetrics {
    /// One-to-one matches recovering the ground-truth region's foreground.
    pub correct_segmentations: usize,
    pub total_gt_regions: usize,
    pub total_recall: f64,
    pub total_fallout: f64,
    pub total_precision: f64,
    pub total_fdr: f64,
    /// Hypothesis regions contributing to oversegmented ground-truth regions.
    pub oversegmentations: usize,
    pub avg_oversegmentations_per_box: f64,
    /// Ground-truth regions contributing to undersegmented hypothesis regions.
    pub undersegmentations: usize,
    pub avg_undersegmentations_per_box: f64,
    /// Ground-truth regions split across more than one hypothesis region.
    pub oversegmented_components: usize,
    /// Hypothesis regions merging more than one ground-truth region.
    pub undersegmented_components: usize,
    /// Ground-truth regions no hypothesis region overlaps.
    pub false_negatives: usize,
    /// Hypothesis regions overlapping no ground-truth region.
    pub false_positives: usize,
    pub negative_predictive_val: f64,
    pub specificity: f64,
    pub accuracy: f64,
    pub total_false_negative_pix: u64,
    pub total_false_positive_pix: u64,
    /// Foreground pixels the hypothesis segmented (TP + FP).
    pub total_positive_fg_pix: u64,
    pub total_true_positive_fg_pix: u64,
    pub total_true_negative_fg_pix: u64,
    pub total_fg_pix: u64,
    /// Foreground pixels the hypothesis left unsegmented (TN + FN).
    pub total_negative_fg_pix: u64,
    pub boxes: Vec<RegionDescription>,
    pub overlap_gts: Vec<OverlappingGtRegion>,
    /// Region type the page was evaluated for, if restricted.
    pub region_type: Option<String>,
}

impl HypothesisMetrics {
    /// Ground-truth regions entirely missed by the hypothesis.
    pub fn missed_regions(&self) -> impl Iterator<Item = &OverlappingGtRegion> {
        self.overlap_gts.iter().filter(|r| r.is_missed())
    }

    /// Hypothesis regions with no ground-truth counterpart.
    pub fn false_alarm_regions(&self) -> impl Iterator<Item = &RegionDescription> {
        self.boxes.iter().filter(|b| b.num_gt_overlap == 0)
    }
}
