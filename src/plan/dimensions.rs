use crate::foundation::core::Rect;
use crate::foundation::error::{ResizeError, ResizeResult};

/// Rule deciding whether (and how) the output keeps the source aspect ratio.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectPolicy {
    /// Scale each axis independently to the requested size.
    Ignore,
    /// Fit inside the requested box, using the smaller of the two ratios.
    #[default]
    Maintain,
    /// The requested width drives both axes.
    WidthFirst,
    /// The requested height drives both axes.
    HeightFirst,
}

/// Target size and per-axis ratios, resolved once and applied to every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizePlan {
    pub width: u32,
    pub height: u32,
    pub width_ratio: f64,
    pub height_ratio: f64,
}

impl ResizePlan {
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Where a source rectangle lands on the resized canvas.
    ///
    /// Corners are scaled independently; the result is clipped to the target
    /// canvas and widened to one pixel on any axis where it collapsed.
    pub fn dest_rect(&self, src: Rect) -> Rect {
        let r = src.scaled(self.width_ratio, self.height_ratio);
        let (x0, x1) = non_empty_span(r.x0, r.x1.min(self.width), self.width);
        let (y0, y1) = non_empty_span(r.y0, r.y1.min(self.height), self.height);
        Rect { x0, y0, x1, y1 }
    }
}

/// Resolve the output size of a `src_width x src_height` canvas.
///
/// A requested dimension of 0 means "derive it": that axis takes the other
/// axis's ratio whatever the policy. Derived dimensions round half away from
/// zero and never drop below one pixel.
pub fn plan_dimensions(
    src_width: u32,
    src_height: u32,
    width: u32,
    height: u32,
    policy: AspectPolicy,
) -> ResizeResult<ResizePlan> {
    if src_width == 0 || src_height == 0 {
        return Err(ResizeError::InvalidSourceDimensions {
            width: src_width,
            height: src_height,
        });
    }
    if width == 0 && height == 0 {
        return Err(ResizeError::AtLeastOneDimensionRequired);
    }

    let src_w = f64::from(src_width);
    let src_h = f64::from(src_height);
    let requested_wr = (width > 0).then(|| f64::from(width) / src_w);
    let requested_hr = (height > 0).then(|| f64::from(height) / src_h);

    // (width_ratio, height_ratio, keep requested width, keep requested height)
    let (width_ratio, height_ratio, keep_w, keep_h) = match (policy, requested_wr, requested_hr) {
        (_, None, None) => return Err(ResizeError::AtLeastOneDimensionRequired),
        (AspectPolicy::Ignore, Some(wr), Some(hr)) => (wr, hr, true, true),
        (AspectPolicy::Maintain, Some(wr), Some(hr)) => {
            if wr < hr {
                (wr, wr, true, false)
            } else {
                (hr, hr, false, true)
            }
        }
        (AspectPolicy::HeightFirst, _, Some(hr)) | (_, None, Some(hr)) => (hr, hr, false, true),
        (AspectPolicy::WidthFirst, Some(wr), _) | (_, Some(wr), _) => (wr, wr, true, false),
    };

    Ok(ResizePlan {
        width: if keep_w {
            width
        } else {
            derive_dimension(src_w, width_ratio)
        },
        height: if keep_h {
            height
        } else {
            derive_dimension(src_h, height_ratio)
        },
        width_ratio,
        height_ratio,
    })
}

fn non_empty_span(start: u32, end: u32, limit: u32) -> (u32, u32) {
    if start < end {
        return (start, end);
    }
    let start = start.min(limit.saturating_sub(1));
    (start, start + 1)
}

fn derive_dimension(src: f64, ratio: f64) -> u32 {
    let v = (src * ratio).round();
    if v < 1.0 {
        1
    } else if v >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        v as u32
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plan/dimensions.rs"]
mod tests;
