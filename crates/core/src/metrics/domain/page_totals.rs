use serde::{Deserialize, Serialize};

use crate::shared::error::ValidationError;

/// Page-wide pixel totals supplied by the caller.
///
/// The evaluation never recomputes these; they come from the same
/// classified images the graph is built from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageTotals {
    pub total_area: u64,
    pub total_fg_pixels: u64,
    /// Foreground pixels correctly left unsegmented. Derived from the other
    /// counts when absent.
    pub true_negative_pixels: Option<u64>,
}

impl PageTotals {
    pub fn new(total_area: u64, total_fg_pixels: u64) -> Self {
        Self {
            total_area,
            total_fg_pixels,
            true_negative_pixels: None,
        }
    }

    pub fn with_true_negatives(mut self, pixels: u64) -> Self {
        self.true_negative_pixels = Some(pixels);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.total_fg_pixels > self.total_area {
            return Err(ValidationError::InvalidTotals(format!(
                "{} foreground pixels on a page of {} pixels",
                self.total_fg_pixels, self.total_area
            )));
        }
        if let Some(tn) = self.true_negative_pixels {
            if tn > self.total_fg_pixels {
                return Err(ValidationError::InvalidTotals(format!(
                    "{tn} true negatives exceed {} foreground pixels",
                    self.total_fg_pixels
                )));
            }
        }
        Ok(())
    }
}
