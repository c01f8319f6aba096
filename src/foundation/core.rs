/// Straight (non-premultiplied) RGBA8 color.
pub type Rgba8 = [u8; 4];

/// Fully transparent black.
pub const TRANSPARENT: Rgba8 = [0, 0, 0, 0];

/// Half-open pixel rectangle `[x0, x1) x [y0, y1)`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Rect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32, // exclusive
    pub y1: u32, // exclusive
}

impl Rect {
    pub const fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn from_origin_size(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self::new(x, y, x.saturating_add(width), y.saturating_add(height))
    }

    pub fn width(self) -> u32 {
        self.x1.saturating_sub(self.x0)
    }

    pub fn height(self) -> u32 {
        self.y1.saturating_sub(self.y0)
    }

    pub fn area(self) -> usize {
        (self.width() as usize) * (self.height() as usize)
    }

    pub fn is_empty(self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    #[cfg(test)]
    pub(crate) fn contains(self, x: u32, y: u32) -> bool {
        self.x0 <= x && x < self.x1 && self.y0 <= y && y < self.y1
    }

    /// Overlap of two rectangles; an empty rect anchored at `self`'s origin when they are disjoint.
    pub fn intersect(self, other: Rect) -> Rect {
        let x0 = self.x0.max(other.x0);
        let y0 = self.y0.max(other.y0);
        let x1 = self.x1.min(other.x1);
        let y1 = self.y1.min(other.y1);
        if x0 >= x1 || y0 >= y1 {
            return Rect::new(self.x0, self.y0, self.x0, self.y0);
        }
        Rect { x0, y0, x1, y1 }
    }

    /// Scale each corner independently, rounding half away from zero.
    pub fn scaled(self, width_ratio: f64, height_ratio: f64) -> Rect {
        fn scale(v: u32, ratio: f64) -> u32 {
            let out = (f64::from(v) * ratio).round();
            if out <= 0.0 { 0 } else { out as u32 }
        }

        Rect {
            x0: scale(self.x0, width_ratio),
            y0: scale(self.y0, height_ratio),
            x1: scale(self.x1, width_ratio),
            y1: scale(self.y1, height_ratio),
        }
    }
}

/// How many times a player repeats the animation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopCount {
    #[default]
    Forever,
    Times(u16),
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
