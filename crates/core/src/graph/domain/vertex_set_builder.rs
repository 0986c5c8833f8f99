use crate::accounting::domain::pixel_accountant::PixelAccountant;
use crate::accounting::domain::pixel_tracker::PixelTracker;
use crate::graph::domain::vertex::{GraphSet, Vertex};
use crate::shared::classified_image::ClassifiedImage;
use crate::shared::error::{EvalResult, ValidationError};
use crate::shared::pixel_class::PixelSelector;
use crate::shared::rect::Rect;

/// Builds one vertex per rectangle of a set.
///
/// Rectangles are processed in input order. Where two rectangles of the
/// same set overlap, the earlier one owns the shared foreground pixels and
/// the later one records them in `foreground_pixels_duplicate`.
pub struct VertexSetBuilder<'a> {
    accountant: &'a PixelAccountant,
    selector: PixelSelector,
}

impl<'a> VertexSetBuilder<'a> {
    pub fn new(accountant: &'a PixelAccountant, selector: PixelSelector) -> Self {
        Self {
            accountant,
            selector,
        }
    }

    pub fn build(
        &self,
        set: GraphSet,
        rects: &[Rect],
        image: &ClassifiedImage,
        tracker: &mut PixelTracker,
    ) -> EvalResult<Vec<Vertex>> {
        let mut vertices = Vec::with_capacity(rects.len());
        for (index, rect) in rects.iter().enumerate() {
            vertices.push(self.build_vertex(set, index, rect, image, tracker)?);
        }
        log::debug!("built {} {set} vertices", vertices.len());
        Ok(vertices)
    }

    fn build_vertex(
        &self,
        set: GraphSet,
        index: usize,
        rect: &Rect,
        image: &ClassifiedImage,
        tracker: &mut PixelTracker,
    ) -> EvalResult<Vertex> {
        if rect.is_degenerate() {
            return Err(ValidationError::DegenerateRect {
                set,
                index,
                rect: *rect,
            }
            .into());
        }
        let Some(clipped) = rect.clip_to(image.width(), image.height()) else {
            return Err(ValidationError::OutOfBounds {
                set,
                index,
                rect: *rect,
                width: image.width(),
                height: image.height(),
            }
            .into());
        };
        if clipped != *rect {
            log::warn!("{set} rectangle {index} clipped from {rect:?} to {clipped:?}");
        }

        let area = rect.area();
        let pixels = self.accountant.count(rect, image, self.selector, tracker)?;
        let seen = pixels.count + pixels.duplicates;
        if seen > area {
            return Err(ValidationError::CountExceedsArea {
                set,
                index,
                count: seen,
                area,
            }
            .into());
        }

        Ok(Vertex {
            rect: *rect,
            area,
            foreground_pixels: pixels.count,
            foreground_pixels_duplicate: pixels.duplicates,
            matched_duplicate_pixels: 0,
            set,
            index,
            edges: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::error::EvalError;
    use crate::shared::pixel_class::Palette;
    use rstest::rstest;

    const WHITE: [u8; 3] = [255, 255, 255];
    const RED: [u8; 3] = [255, 0, 0];

    fn page() -> ClassifiedImage {
        let mut img = ClassifiedImage::filled(40, 40, WHITE);
        img.paint(Rect::new(0, 0, 20, 20), RED);
        img
    }

    fn build(rects: &[Rect]) -> EvalResult<Vec<Vertex>> {
        let img = page();
        let accountant = PixelAccountant::new(Palette::default());
        let mut tracker = PixelTracker::new(40, 40).unwrap();
        VertexSetBuilder::new(&accountant, PixelSelector::AnyForeground).build(
            GraphSet::GroundTruth,
            rects,
            &img,
            &mut tracker,
        )
    }

    #[test]
    fn test_one_vertex_per_rect_in_order() {
        let rects = [Rect::new(0, 0, 10, 10), Rect::new(20, 20, 5, 4)];
        let vertices = build(&rects).unwrap();
        assert_eq!(vertices.len(), 2);
        assert_eq!(vertices[0].rect, rects[0]);
        assert_eq!(vertices[0].index, 0);
        assert_eq!(vertices[0].area, 100);
        assert_eq!(vertices[0].foreground_pixels, 100);
        assert_eq!(vertices[1].index, 1);
        assert_eq!(vertices[1].area, 20);
        assert_eq!(vertices[1].foreground_pixels, 0);
        assert!(vertices.iter().all(|v| v.edges.is_empty()));
        assert!(vertices.iter().all(|v| v.set == GraphSet::GroundTruth));
    }

    #[test]
    fn test_overlap_attributed_to_first_rect() {
        // overlap (5,5)-(10,10) = 25 foreground pixels
        let rects = [Rect::new(0, 0, 10, 10), Rect::new(5, 5, 10, 10)];
        let vertices = build(&rects).unwrap();
        assert_eq!(vertices[0].foreground_pixels, 100);
        assert_eq!(vertices[0].foreground_pixels_duplicate, 0);
        assert_eq!(vertices[1].foreground_pixels, 75);
        assert_eq!(vertices[1].foreground_pixels_duplicate, 25);
    }

    #[test]
    fn test_processing_order_decides_ownership() {
        let rects = [Rect::new(5, 5, 10, 10), Rect::new(0, 0, 10, 10)];
        let vertices = build(&rects).unwrap();
        assert_eq!(vertices[0].foreground_pixels, 100);
        assert_eq!(vertices[1].foreground_pixels, 75);
        assert_eq!(vertices[1].foreground_pixels_duplicate, 25);
    }

    #[test]
    fn test_duplicates_never_exceed_foreground_bound() {
        let rects = [
            Rect::new(0, 0, 20, 20),
            Rect::new(0, 0, 20, 20),
            Rect::new(10, 10, 20, 20),
        ];
        for v in build(&rects).unwrap() {
            assert!(v.foreground_pixels + v.foreground_pixels_duplicate <= v.area);
        }
    }

    #[test]
    fn test_contained_rect_has_only_duplicates() {
        // Every foreground pixel of the inner rect belongs to the outer one.
        let rects = [Rect::new(0, 0, 20, 20), Rect::new(5, 5, 5, 5)];
        let vertices = build(&rects).unwrap();
        assert_eq!(vertices[1].foreground_pixels, 0);
        assert_eq!(vertices[1].foreground_pixels_duplicate, 25);
        assert!(vertices[1].foreground_pixels_duplicate > vertices[1].foreground_pixels);
        assert!(vertices[1].foreground_pixels_duplicate <= vertices[1].area);
    }

    #[test]
    fn test_rect_past_coordinate_range_rejected() {
        let err = build(&[Rect::new(i32::MAX - 5, 0, 100, 10)]).unwrap_err();
        assert!(matches!(
            err,
            EvalError::Validation(ValidationError::OutOfBounds { index: 0, .. })
        ));
    }

    #[rstest]
    #[case::zero_width(Rect::new(0, 0, 0, 10))]
    #[case::negative_height(Rect::new(0, 0, 10, -1))]
    fn test_degenerate_rect_rejected(#[case] rect: Rect) {
        let err = build(&[Rect::new(0, 0, 5, 5), rect]).unwrap_err();
        assert!(matches!(
            err,
            EvalError::Validation(ValidationError::DegenerateRect { index: 1, .. })
        ));
    }

    #[test]
    fn test_rect_outside_image_rejected() {
        let err = build(&[Rect::new(100, 100, 5, 5)]).unwrap_err();
        assert!(matches!(
            err,
            EvalError::Validation(ValidationError::OutOfBounds { index: 0, .. })
        ));
    }

    #[test]
    fn test_partially_outside_rect_is_clipped() {
        let vertices = build(&[Rect::new(-10, -10, 20, 20)]).unwrap();
        assert_eq!(vertices[0].area, 400);
        assert_eq!(vertices[0].foreground_pixels, 100);
    }

    #[test]
    fn test_empty_input() {
        assert!(build(&[]).unwrap().is_empty());
    }
}
