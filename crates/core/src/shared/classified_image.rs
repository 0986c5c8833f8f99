use ndarray::ArrayView3;

use crate::shared::error::{EvalError, EvalResult};
use crate::shared::rect::Rect;

const CHANNELS: usize = 3;

/// A colour-coded page image: contiguous RGB bytes in row-major order.
///
/// Each pixel carries the correctness class assigned upstream; decoding
/// happens at the I/O boundary and this type treats the bytes as opaque
/// colour codes.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassifiedImage {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl ClassifiedImage {
    /// Wraps a raw RGB buffer, rejecting buffers whose length does not
    /// match `width * height * 3`.
    pub fn from_raw(data: Vec<u8>, width: u32, height: u32) -> EvalResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(CHANNELS))
            .ok_or_else(|| EvalError::Resource(format!("image {width}x{height} is too large")))?;
        if data.len() != expected {
            return Err(EvalError::Resource(format!(
                "pixel buffer holds {} bytes, expected {expected} for {width}x{height} RGB",
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates an image filled with a single colour.
    pub fn filled(width: u32, height: u32, color: [u8; 3]) -> Self {
        let data = color
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * CHANNELS)
            .collect();
        Self {
            data,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Colour at `(x, y)`. Callers clip coordinates to the image first.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let offset = (y as usize * self.width as usize + x as usize) * CHANNELS;
        [
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
        ]
    }

    /// Paints `rect` (clipped to the image) with `color`.
    pub fn paint(&mut self, rect: Rect, color: [u8; 3]) {
        let Some(clipped) = rect.clip_to(self.width, self.height) else {
            return;
        };
        let w = self.width as usize;
        for y in clipped.y as usize..clipped.bottom() as usize {
            let row_start = (y * w + clipped.x as usize) * CHANNELS;
            let row_end = row_start + clipped.width as usize * CHANNELS;
            for px in self.data[row_start..row_end].chunks_exact_mut(CHANNELS) {
                px.copy_from_slice(&color);
            }
        }
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(
            (self.height as usize, self.width as usize, CHANNELS),
            &self.data,
        )
        .expect("image data length must match dimensions")
    }
}

impl From<image::RgbImage> for ClassifiedImage {
    fn from(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            data: img.into_raw(),
            width,
            height,
        }
    }
}
