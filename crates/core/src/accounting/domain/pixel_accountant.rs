use serde::{Deserialize, Serialize};

use crate::accounting::domain::pixel_tracker::PixelTracker;
use crate::shared::classified_image::ClassifiedImage;
use crate::shared::error::{EvalError, EvalResult};
use crate::shared::pixel_class::{Palette, PixelSelector};
use crate::shared::rect::Rect;

/// Result of one accounting call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelCount {
    /// Matching pixels seen for the first time.
    pub count: u64,
    /// Matching pixels an earlier call already counted.
    pub duplicates: u64,
}

/// Counts classified pixels inside rectangles without counting any pixel
/// twice.
///
/// Rectangles are clipped to the image. A matching pixel that is not yet
/// marked in the tracker is counted and marked; one that is already marked
/// is reported as a duplicate.
#[derive(Clone, Copy, Debug, Default)]
pub struct PixelAccountant {
    palette: Palette,
}

impl PixelAccountant {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    pub fn count(
        &self,
        rect: &Rect,
        image: &ClassifiedImage,
        selector: PixelSelector,
        tracker: &mut PixelTracker,
    ) -> EvalResult<PixelCount> {
        if (tracker.width(), tracker.height()) != image.dimensions() {
            return Err(EvalError::Resource(format!(
                "tracker is {}x{} but image is {}x{}",
                tracker.width(),
                tracker.height(),
                image.width(),
                image.height()
            )));
        }

        let mut result = PixelCount::default();
        let Some(clipped) = rect.clip_to(image.width(), image.height()) else {
            return Ok(result);
        };

        for y in clipped.y as u32..clipped.bottom() as u32 {
            for x in clipped.x as u32..clipped.right() as u32 {
                if !self.palette.matches(selector, image.pixel(x, y)) {
                    continue;
                }
                if tracker.mark(x, y, selector) {
                    result.count += 1;
                } else {
                    result.duplicates += 1;
                }
            }
        }
        Ok(result)
    }

    /// Counts matching pixels in `rect` with no deduplication.
    pub fn count_untracked(
        &self,
        rect: &Rect,
        image: &ClassifiedImage,
        selector: PixelSelector,
    ) -> u64 {
        let Some(clipped) = rect.clip_to(image.width(), image.height()) else {
            return 0;
        };
        let view = image.as_ndarray();
        let mut n = 0;
        for row in view
            .outer_iter()
            .skip(clipped.y as usize)
            .take(clipped.height as usize)
        {
            for px in row
                .outer_iter()
                .skip(clipped.x as usize)
                .take(clipped.width as usize)
            {
                if self.palette.matches(selector, [px[0], px[1], px[2]]) {
                    n += 1;
                }
            }
        }
        n
    }

    /// Counts matching pixels in `rect` whose coordinates satisfy
    /// `covered`, with no deduplication.
    pub fn count_covered<F>(
        &self,
        rect: &Rect,
        image: &ClassifiedImage,
        selector: PixelSelector,
        covered: F,
    ) -> u64
    where
        F: Fn(i32, i32) -> bool,
    {
        let Some(clipped) = rect.clip_to(image.width(), image.height()) else {
            return 0;
        };
        let mut n = 0;
        for y in clipped.y..clipped.y + clipped.height {
            for x in clipped.x..clipped.x + clipped.width {
                if !covered(x, y) {
                    continue;
                }
                if self.palette.matches(selector, image.pixel(x as u32, y as u32)) {
                    n += 1;
                }
            }
        }
        n
    }

    /// Counts matching pixels over the whole image.
    pub fn count_image(&self, image: &ClassifiedImage, selector: PixelSelector) -> u64 {
        let full = Rect::new(0, 0, image.width() as i32, image.height() as i32);
        self.count_untracked(&full, image, selector)
    }
}
