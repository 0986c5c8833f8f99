use ndarray::Array2;

use crate::shared::error::{EvalError, EvalResult};
use crate::shared::pixel_class::PixelSelector;

/// Scratch mask recording which pixels each accounting pass already
/// counted.
///
/// One byte per pixel; every [`PixelSelector`] owns one bit, so foreground
/// and matching passes over the same pixel do not interfere while repeated
/// passes of the same kind are deduplicated. One tracker belongs to one
/// vertex set of one graph.
#[derive(Clone, Debug)]
pub struct PixelTracker {
    marks: Array2<u8>,
}

impl PixelTracker {
    /// Allocates a cleared tracker for a `width x height` image.
    ///
    /// Allocation failure is reported instead of aborting the process.
    pub fn new(width: u32, height: u32) -> EvalResult<Self> {
        let (w, h) = (width as usize, height as usize);
        let len = w
            .checked_mul(h)
            .ok_or_else(|| EvalError::Resource(format!("tracker {width}x{height} overflows")))?;

        let mut buf: Vec<u8> = Vec::new();
        buf.try_reserve_exact(len).map_err(|e| {
            EvalError::Resource(format!("cannot allocate {width}x{height} tracker: {e}"))
        })?;
        buf.resize(len, 0);

        let marks = Array2::from_shape_vec((h, w), buf)
            .map_err(|e| EvalError::Resource(format!("tracker shape: {e}")))?;
        Ok(Self { marks })
    }

    pub fn width(&self) -> u32 {
        self.marks.ncols() as u32
    }

    pub fn height(&self) -> u32 {
        self.marks.nrows() as u32
    }

    /// Marks `(x, y)` for `selector`. Returns `false` if it was already
    /// marked.
    pub fn mark(&mut self, x: u32, y: u32, selector: PixelSelector) -> bool {
        let cell = &mut self.marks[[y as usize, x as usize]];
        let bit = selector.track_bit();
        if *cell & bit != 0 {
            return false;
        }
        *cell |= bit;
        true
    }

    /// Number of pixels marked for `selector`.
    pub fn marked_count(&self, selector: PixelSelector) -> u64 {
        let bit = selector.track_bit();
        self.marks.iter().filter(|m| **m & bit != 0).count() as u64
    }
}
