use layout_eval_core::metrics::domain::hypothesis_metrics::HypothesisMetrics;
use layout_eval_core::pipeline::evaluate_page_use_case::PageMetrics;

/// Page-level summary block.
pub fn page_summary(page: &PageMetrics) -> String {
    let g = &page.ground_truth;
    let h = &page.hypothesis;
    let region_type = h.region_type.as_deref().unwrap_or("all regions");

    let lines = [
        format!("Page {} ({region_type}):", page.name),
        format!(
            "  Ground truth:   {} regions, {} of {} foreground pixels segmented ({:.1}%)",
            g.segmentations,
            g.total_seg_fg_pixels,
            g.total_fg_pixels,
            g.fg_pixel_ratio * 100.0
        ),
        format!(
            "  Correct:        {} of {} ground truth regions",
            h.correct_segmentations, h.total_gt_regions
        ),
        format!(
            "  Oversegmented:  {} regions, {} contributors (avg {:.2})",
            h.oversegmented_components, h.oversegmentations, h.avg_oversegmentations_per_box
        ),
        format!(
            "  Undersegmented: {} regions, {} merged (avg {:.2})",
            h.undersegmented_components, h.undersegmentations, h.avg_undersegmentations_per_box
        ),
        format!(
            "  Missed:         {} regions ({} pixels)",
            h.false_negatives, h.total_false_negative_pix
        ),
        format!(
            "  False alarms:   {} regions ({} pixels)",
            h.false_positives, h.total_false_positive_pix
        ),
        format!(
            "  Pixels:         TP {}  FP {}  FN {}  TN {}",
            h.total_true_positive_fg_pix,
            h.total_false_positive_pix,
            h.total_false_negative_pix,
            h.total_true_negative_fg_pix
        ),
        format!(
            "  Recall {:.4}  Precision {:.4}  Accuracy {:.4}  Specificity {:.4}  NPV {:.4}",
            h.total_recall,
            mean_precision(h),
            h.accuracy,
            h.specificity,
            h.negative_predictive_val
        ),
    ];
    lines.join("\n")
}

/// One line per hypothesis region, then one per missed ground-truth region.
pub fn region_lines(page: &PageMetrics) -> String {
    let h = &page.hypothesis;
    let mut lines = Vec::new();
    for r in &h.boxes {
        lines.push(format!(
            "  hyp {:>3} [{} {} {} {}]  overlaps {}  TP {}  FP {} (+{} dup)  FN {}  \
             recall {:.4}  precision {:.4}  fallout {:.4}  fdr {:.4}",
            r.vertex.index,
            r.rect.x,
            r.rect.y,
            r.rect.width,
            r.rect.height,
            r.num_gt_overlap,
            r.true_positive_pix,
            r.false_positive_pix,
            r.false_positive_pix_duplicate,
            r.false_negative_pix,
            r.recall,
            r.precision,
            r.fallout,
            r.false_discovery
        ));
    }
    for gt in h.missed_regions() {
        lines.push(format!(
            "  gt  {:>3} [{} {} {} {}]  missed ({} pixels)",
            gt.vertex.index,
            gt.rect.x,
            gt.rect.y,
            gt.rect.width,
            gt.rect.height,
            gt.false_negative_pixels
        ));
    }
    lines.join("\n")
}

/// Totals over every successfully evaluated page.
pub fn batch_summary(pages: &[PageMetrics], failed: usize) -> String {
    let correct: usize = pages.iter().map(|p| p.hypothesis.correct_segmentations).sum();
    let gt_regions: usize = pages.iter().map(|p| p.hypothesis.total_gt_regions).sum();
    let over: usize = pages.iter().map(|p| p.hypothesis.oversegmented_components).sum();
    let under: usize = pages.iter().map(|p| p.hypothesis.undersegmented_components).sum();
    let missed: usize = pages.iter().map(|p| p.hypothesis.false_negatives).sum();
    let alarms: usize = pages.iter().map(|p| p.hypothesis.false_positives).sum();

    format!(
        "Batch summary ({} pages, {failed} failed): {correct}/{gt_regions} correct, \
         {over} oversegmented, {under} undersegmented, {missed} missed, {alarms} false alarms",
        pages.len()
    )
}

fn mean_precision(h: &HypothesisMetrics) -> f64 {
    if h.boxes.is_empty() {
        return 0.0;
    }
    h.total_precision / h.boxes.len() as f64
}
