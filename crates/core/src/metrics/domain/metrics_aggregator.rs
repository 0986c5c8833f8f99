use crate::graph::domain::vertex::Vertex;
use crate::metrics::domain::ground_truth_metrics::{GroundTruthMetrics, GtBoxDescription};
use crate::metrics::domain::hypothesis_metrics::{
    HypothesisMetrics, OverlappingGtRegion, RegionDescription,
};
use crate::metrics::domain::page_totals::PageTotals;
use crate::metrics::domain::ratio::ratio;
use crate::shared::constants::DEFAULT_CORRECT_SEGMENTATION_THRESHOLD;

/// Turns an edge-annotated pair of vertex sets into page metrics.
///
/// Segmentation counts follow the graph degree:
/// - a ground-truth vertex of degree `d > 1` is one oversegmented component
///   and adds `d` to `oversegmentations` (every contributing hypothesis
///   region counts);
/// - a hypothesis vertex of degree `d > 1` is one undersegmented component
///   and adds `d` to `undersegmentations`;
/// - degree zero is a missed region (ground truth) or a false alarm
///   (hypothesis).
pub struct MetricsAggregator {
    correct_threshold: f64,
}

impl MetricsAggregator {
    pub fn new(correct_threshold: f64) -> Self {
        Self { correct_threshold }
    }

    pub fn aggregate(
        &self,
        ground_truth: &[Vertex],
        hypothesis: &[Vertex],
        totals: &PageTotals,
    ) -> (GroundTruthMetrics, HypothesisMetrics) {
        let gt_metrics = ground_truth_metrics(ground_truth, totals);
        let hyp_metrics = self.hypothesis_metrics(ground_truth, hypothesis, totals, &gt_metrics);
        log::debug!(
            "aggregated {} ground truth / {} hypothesis regions: {} correct, {} missed, {} false alarms",
            ground_truth.len(),
            hypothesis.len(),
            hyp_metrics.correct_segmentations,
            hyp_metrics.false_negatives,
            hyp_metrics.false_positives
        );
        (gt_metrics, hyp_metrics)
    }

    fn hypothesis_metrics(
        &self,
        ground_truth: &[Vertex],
        hypothesis: &[Vertex],
        totals: &PageTotals,
        gt_metrics: &GroundTruthMetrics,
    ) -> HypothesisMetrics {
        let mut m = HypothesisMetrics {
            total_gt_regions: ground_truth.len(),
            total_fg_pix: totals.total_fg_pixels,
            ..HypothesisMetrics::default()
        };

        // Missed regions have no edges, so only a scan of the ground-truth
        // set can find them.
        for gt in ground_truth {
            let region = overlapping_gt_region(gt);
            m.total_false_negative_pix += region.false_negative_pixels;
            match gt.degree() {
                0 => m.false_negatives += 1,
                1 => {}
                d => {
                    m.oversegmented_components += 1;
                    m.oversegmentations += d;
                }
            }
            m.overlap_gts.push(region);
        }

        for hyp in hypothesis {
            let region = describe_region(hyp, ground_truth, gt_metrics);
            match hyp.degree() {
                0 => m.false_positives += 1,
                1 => {
                    if self.is_correct_segmentation(hyp, ground_truth) {
                        m.correct_segmentations += 1;
                    }
                }
                d => {
                    m.undersegmented_components += 1;
                    m.undersegmentations += d;
                }
            }
            m.total_true_positive_fg_pix += region.true_positive_pix;
            m.total_false_positive_pix += region.false_positive_pix;
            m.total_recall += region.recall;
            m.total_precision += region.precision;
            m.total_fallout += region.fallout;
            m.total_fdr += region.false_discovery;
            m.boxes.push(region);
        }

        m.avg_oversegmentations_per_box = ratio(
            m.oversegmentations as u64,
            m.oversegmented_components as u64,
        );
        m.avg_undersegmentations_per_box = ratio(
            m.undersegmentations as u64,
            m.undersegmented_components as u64,
        );

        m.total_positive_fg_pix = m.total_true_positive_fg_pix + m.total_false_positive_pix;
        m.total_negative_fg_pix = m.total_fg_pix.saturating_sub(m.total_positive_fg_pix);
        m.total_true_negative_fg_pix = totals.true_negative_pixels.unwrap_or_else(|| {
            m.total_negative_fg_pix
                .saturating_sub(m.total_false_negative_pix)
        });

        let tn = m.total_true_negative_fg_pix;
        m.accuracy = ratio(m.total_true_positive_fg_pix + tn, m.total_fg_pix);
        m.specificity = ratio(tn, gt_metrics.total_nonseg_fg_pixels);
        m.negative_predictive_val = ratio(tn, tn + m.total_false_negative_pix);
        m
    }

    /// One-to-one match whose single edge recovers at least the threshold
    /// fraction of the ground-truth region's foreground. A ground-truth
    /// region without foreground can never be matched correctly.
    fn is_correct_segmentation(&self, hyp: &Vertex, ground_truth: &[Vertex]) -> bool {
        let [edge] = hyp.edges.as_slice() else {
            return false;
        };
        let Some(gt) = ground_truth.get(edge.opposite.index) else {
            return false;
        };
        if gt.degree() != 1 || gt.foreground_pixels == 0 {
            return false;
        }
        edge.intersecting_foreground_pixels as f64
            >= self.correct_threshold * gt.foreground_pixels as f64
    }
}

impl Default for MetricsAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_CORRECT_SEGMENTATION_THRESHOLD)
    }
}

fn ground_truth_metrics(ground_truth: &[Vertex], totals: &PageTotals) -> GroundTruthMetrics {
    let total_seg_area: u64 = ground_truth.iter().map(|v| v.area).sum();
    let total_seg_fg_pixels: u64 = ground_truth.iter().map(|v| v.foreground_pixels).sum();

    let descriptions = ground_truth
        .iter()
        .map(|v| GtBoxDescription {
            fg_pix_ratio: ratio(v.foreground_pixels, totals.total_fg_pixels),
            area_ratio: ratio(v.area, totals.total_area),
        })
        .collect();

    GroundTruthMetrics {
        segmentations: ground_truth.len(),
        total_seg_fg_pixels,
        total_nonseg_fg_pixels: totals.total_fg_pixels.saturating_sub(total_seg_fg_pixels),
        total_fg_pixels: totals.total_fg_pixels,
        fg_pixel_ratio: ratio(total_seg_fg_pixels, totals.total_fg_pixels),
        total_seg_area,
        total_area: totals.total_area,
        area_ratio: ratio(total_seg_area, totals.total_area),
        descriptions,
    }
}

fn overlapping_gt_region(gt: &Vertex) -> OverlappingGtRegion {
    OverlappingGtRegion {
        rect: gt.rect,
        vertex: gt.id(),
        false_negative_pixels: gt.foreground_pixels.saturating_sub(gt.matched_pixels()),
        false_negative_pixels_duplicate: gt
            .foreground_pixels_duplicate
            .saturating_sub(gt.matched_duplicate_pixels),
        num_edges: gt.degree(),
    }
}

fn describe_region(
    hyp: &Vertex,
    ground_truth: &[Vertex],
    gt_metrics: &GroundTruthMetrics,
) -> RegionDescription {
    let tp = hyp.matched_pixels();
    let fp = hyp.foreground_pixels.saturating_sub(tp);
    let fp_dup = hyp
        .foreground_pixels_duplicate
        .saturating_sub(hyp.matched_duplicate_pixels);
    let fn_pix: u64 = hyp
        .edges
        .iter()
        .filter_map(|e| {
            ground_truth
                .get(e.opposite.index)
                .map(|gt| gt.foreground_pixels.saturating_sub(e.intersecting_foreground_pixels))
        })
        .sum();

    let positives = gt_metrics.total_seg_fg_pixels;
    let negatives = gt_metrics.total_nonseg_fg_pixels;

    RegionDescription {
        rect: hyp.rect,
        vertex: hyp.id(),
        area: hyp.area,
        num_fg_pixels: hyp.foreground_pixels,
        num_fg_pixels_duplicate: hyp.foreground_pixels_duplicate,
        true_positive_pix: tp,
        false_positive_pix: fp,
        false_positive_pix_duplicate: fp_dup,
        false_negative_pix: fn_pix,
        recall: ratio(tp, positives),
        precision: ratio(tp, tp + fp),
        fallout: ratio(fp, negatives),
        fallout_duplicate: ratio(fp_dup, negatives),
        false_discovery: ratio(fp, tp + fp),
        false_discovery_duplicate: ratio(fp_dup, tp + fp + fp_dup),
        num_gt_overlap: hyp.degree(),
    }
}
