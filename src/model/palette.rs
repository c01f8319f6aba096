use crate::foundation::core::{Rgba8, TRANSPARENT};
use crate::foundation::math::premultiply;

/// Indexed color table, straight-alpha RGBA8 entries.
///
/// A frame's palette is carried through resizing untouched: output pixels are
/// mapped back onto the same entries the source frame used.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Palette {
    colors: Vec<Rgba8>,
}

impl Palette {
    pub fn new(colors: Vec<Rgba8>) -> Self {
        Self { colors }
    }

    /// Build from an RGB color table where `transparent` (if any) names the entry
    /// that is fully transparent, the way GIF graphic control blocks describe it.
    pub fn from_rgb(rgb: &[[u8; 3]], transparent: Option<u8>) -> Self {
        let colors = rgb
            .iter()
            .enumerate()
            .map(|(i, &[r, g, b])| {
                if transparent == Some(i as u8) {
                    TRANSPARENT
                } else {
                    [r, g, b, 255]
                }
            })
            .collect();
        Self { colors }
    }

    pub fn colors(&self) -> &[Rgba8] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, index: u8) -> Option<Rgba8> {
        self.colors.get(usize::from(index)).copied()
    }

    /// Out-of-range indices resolve to transparent.
    pub fn resolve(&self, index: u8) -> Rgba8 {
        self.get(index).unwrap_or(TRANSPARENT)
    }

    /// `true` when some entry is fully transparent.
    pub fn has_transparent(&self) -> bool {
        self.colors.iter().any(|c| c[3] == 0)
    }

    /// Index of the entry closest to `color`.
    ///
    /// Distance is the squared difference of premultiplied channels, so every
    /// fully transparent entry is equally close to any fully transparent input.
    /// Ties resolve to the lowest index. An empty palette maps everything to 0.
    pub fn nearest_index(&self, color: Rgba8) -> u8 {
        let want = premultiply(color);
        let mut best = 0usize;
        let mut best_dist = u32::MAX;
        for (i, &entry) in self.colors.iter().enumerate().take(256) {
            let have = premultiply(entry);
            let mut dist = 0u32;
            for c in 0..4 {
                let d = i32::from(want[c]) - i32::from(have[c]);
                dist += (d * d) as u32;
            }
            if dist < best_dist {
                best = i;
                best_dist = dist;
                if dist == 0 {
                    break;
                }
            }
        }
        best as u8
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/palette.rs"]
mod tests;
