use image::RgbaImage;
use image::imageops::{self, FilterType};

/// Resampling capability used for every flattened frame.
///
/// Implementations receive a full-canvas image whose origin is `(0, 0)` and
/// must return an image of exactly `width x height`. They are called from
/// several worker threads at once.
pub trait FrameScaler: Send + Sync {
    fn scale(&self, src: &RgbaImage, width: u32, height: u32) -> anyhow::Result<RgbaImage>;
}

impl<F> FrameScaler for F
where
    F: Fn(&RgbaImage, u32, u32) -> anyhow::Result<RgbaImage> + Send + Sync,
{
    fn scale(&self, src: &RgbaImage, width: u32, height: u32) -> anyhow::Result<RgbaImage> {
        self(src, width, height)
    }
}

/// [`FrameScaler`] backed by one of the `image` crate's resampling filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterScaler {
    filter: FilterType,
}

impl FilterScaler {
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> FilterType {
        self.filter
    }
}

impl Default for FilterScaler {
    fn default() -> Self {
        Self::new(FilterType::CatmullRom)
    }
}

impl FrameScaler for FilterScaler {
    fn scale(&self, src: &RgbaImage, width: u32, height: u32) -> anyhow::Result<RgbaImage> {
        if width == 0 || height == 0 {
            anyhow::bail!("cannot scale to an empty {width}x{height} image");
        }
        Ok(imageops::resize(src, width, height, self.filter))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scale/scaler.rs"]
mod tests;
