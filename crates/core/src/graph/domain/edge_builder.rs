use crate::accounting::domain::pixel_accountant::PixelAccountant;
use crate::accounting::domain::pixel_tracker::PixelTracker;
use crate::graph::domain::vertex::{Edge, Vertex};
use crate::shared::classified_image::ClassifiedImage;
use crate::shared::error::EvalResult;
use crate::shared::pixel_class::{PixelClass, PixelSelector};
use crate::shared::rect::Rect;

/// Connects every intersecting ground-truth/hypothesis rectangle pair.
///
/// Pairs are visited ground truth outer, hypothesis inner, both in input
/// order. Matching pixels inside each overlap are counted on the
/// hypothesis image with the hypothesis tracker, so a pixel shared by
/// several overlaps is credited to the first edge only. The ground-truth
/// image is read with its own tracker for diagnostics only: a disagreement
/// with the hypothesis count is traced, nothing else reads those marks.
///
/// Once all edges exist, each vertex gets `matched_duplicate_pixels`: the
/// matching pixels inside both an earlier rectangle of its own set and one
/// of its overlaps. Edge duplicates also include pixels shared through
/// rectangles of the other set, so they are not used for this.
pub struct EdgeBuilder<'a> {
    accountant: &'a PixelAccountant,
    matching: PixelSelector,
}

impl<'a> EdgeBuilder<'a> {
    pub fn new(accountant: &'a PixelAccountant, matching_class: PixelClass) -> Self {
        Self {
            accountant,
            matching: PixelSelector::Class(matching_class),
        }
    }

    /// Appends one edge record to each endpoint of every overlapping pair.
    /// Returns the number of edges created.
    pub fn connect(
        &self,
        ground_truth: &mut [Vertex],
        hypothesis: &mut [Vertex],
        gt_image: &ClassifiedImage,
        hyp_image: &ClassifiedImage,
        gt_tracker: &mut PixelTracker,
        hyp_tracker: &mut PixelTracker,
    ) -> EvalResult<usize> {
        let mut created = 0;
        for gt in ground_truth.iter_mut() {
            for hyp in hypothesis.iter_mut() {
                let Some(overlap) = gt.rect.intersection(&hyp.rect) else {
                    continue;
                };

                let hyp_reading =
                    self.accountant
                        .count(&overlap, hyp_image, self.matching, hyp_tracker)?;
                let gt_reading = self
                    .accountant
                    .count(&overlap, gt_image, self.matching, gt_tracker)?;
                if gt_reading.count != hyp_reading.count {
                    log::trace!(
                        "gt {} / hyp {}: {} matching pixels in hypothesis, {} in ground truth",
                        gt.index,
                        hyp.index,
                        hyp_reading.count,
                        gt_reading.count
                    );
                }

                let overlap_area = overlap.area();
                gt.edges.push(Edge {
                    opposite: hyp.id(),
                    overlap_area,
                    intersecting_foreground_pixels: hyp_reading.count,
                    intersecting_foreground_duplicate: hyp_reading.duplicates,
                });
                hyp.edges.push(Edge {
                    opposite: gt.id(),
                    overlap_area,
                    intersecting_foreground_pixels: hyp_reading.count,
                    intersecting_foreground_duplicate: hyp_reading.duplicates,
                });
                created += 1;
            }
        }
        log::debug!(
            "connected {} ground truth and {} hypothesis vertices with {created} edges",
            ground_truth.len(),
            hypothesis.len()
        );

        let gt_rects: Vec<Rect> = ground_truth.iter().map(|v| v.rect).collect();
        let hyp_rects: Vec<Rect> = hypothesis.iter().map(|v| v.rect).collect();
        for v in ground_truth.iter_mut() {
            v.matched_duplicate_pixels =
                self.matched_duplicates(v, &gt_rects, &hyp_rects, hyp_image);
        }
        for v in hypothesis.iter_mut() {
            v.matched_duplicate_pixels =
                self.matched_duplicates(v, &hyp_rects, &gt_rects, hyp_image);
        }
        Ok(created)
    }

    fn matched_duplicates(
        &self,
        vertex: &Vertex,
        same_set: &[Rect],
        opposite_set: &[Rect],
        image: &ClassifiedImage,
    ) -> u64 {
        let earlier: Vec<&Rect> = same_set
            .get(..vertex.index)
            .unwrap_or(&[])
            .iter()
            .filter(|r| r.intersects(&vertex.rect))
            .collect();
        let overlaps: Vec<Rect> = vertex
            .edges
            .iter()
            .filter_map(|e| opposite_set.get(e.opposite.index))
            .filter_map(|r| r.intersection(&vertex.rect))
            .collect();
        if earlier.is_empty() || overlaps.is_empty() {
            return 0;
        }
        self.accountant
            .count_covered(&vertex.rect, image, self.matching, |x, y| {
                earlier.iter().any(|r| r.contains(x, y))
                    && overlaps.iter().any(|r| r.contains(x, y))
            })
    }
}
