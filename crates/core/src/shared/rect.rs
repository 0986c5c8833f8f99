use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in image pixel coordinates.
///
/// `x`/`y` is the top-left corner; `right()` and `bottom()` are exclusive,
/// so a rectangle covers `width * height` pixels. Edges are computed in
/// `i64` since `x + width` may not fit an `i32`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// Pixel area; zero for degenerate rectangles.
    pub fn area(&self) -> u64 {
        if self.is_degenerate() {
            return 0;
        }
        self.width as u64 * self.height as u64
    }

    pub fn is_degenerate(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Overlapping region of two rectangles.
    ///
    /// Edge or corner contact has zero area and yields `None`.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let ix1 = self.x.max(other.x);
        let iy1 = self.y.max(other.y);
        let ix2 = self.right().min(other.right());
        let iy2 = self.bottom().min(other.bottom());

        if ix2 <= ix1 as i64 || iy2 <= iy1 as i64 {
            return None;
        }
        // Bounded by the narrower input, so the extent fits an i32.
        Some(Rect::new(
            ix1,
            iy1,
            (ix2 - ix1 as i64) as i32,
            (iy2 - iy1 as i64) as i32,
        ))
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection(other).is_some()
    }

    pub fn overlap_area(&self, other: &Rect) -> u64 {
        self.intersection(other).map_or(0, |r| r.area())
    }

    /// Clips the rectangle to a `width x height` image anchored at the origin.
    pub fn clip_to(&self, width: u32, height: u32) -> Option<Rect> {
        let bounds = Rect::new(0, 0, width as i32, height as i32);
        self.intersection(&bounds)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x
            && (x as i64) < self.right()
            && y >= self.y
            && (y as i64) < self.bottom()
    }
}
