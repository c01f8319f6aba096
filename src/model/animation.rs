use crate::foundation::core::{LoopCount, Rect, Rgba8, TRANSPARENT};
use crate::foundation::error::{ResizeError, ResizeResult};
use crate::model::palette::Palette;

/// How the canvas is prepared once a frame has been shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisposalMethod {
    /// No disposal given; composited exactly like [`DisposalMethod::None`].
    #[default]
    Unspecified,
    /// Leave the painted frame in place.
    None,
    /// Clear the frame's rectangle to the background color.
    Background,
    /// Restore the canvas to what it was before the frame was painted.
    Previous,
}

impl DisposalMethod {
    /// Map a GIF graphic-control disposal code; reserved codes read as unspecified.
    pub fn from_gif_code(code: u8) -> Self {
        match code {
            1 => Self::None,
            2 => Self::Background,
            3 => Self::Previous,
            _ => Self::Unspecified,
        }
    }

    pub fn to_gif_code(self) -> u8 {
        match self {
            Self::Unspecified => 0,
            Self::None => 1,
            Self::Background => 2,
            Self::Previous => 3,
        }
    }
}

/// One palette-indexed frame, positioned inside the animation canvas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub rect: Rect,
    pub palette: Palette,
    /// Row-major palette indices, `rect.area()` entries.
    pub indices: Vec<u8>,
    pub disposal: DisposalMethod,
    /// Display time in centiseconds.
    pub delay: u16,
}

impl Frame {
    /// A frame whose indices are all `fill`.
    pub fn filled(rect: Rect, palette: Palette, fill: u8) -> Self {
        Self {
            rect,
            palette,
            indices: vec![fill; rect.area()],
            disposal: DisposalMethod::Unspecified,
            delay: 0,
        }
    }

    pub fn with_disposal(mut self, disposal: DisposalMethod) -> Self {
        self.disposal = disposal;
        self
    }

    pub fn with_delay(mut self, delay: u16) -> Self {
        self.delay = delay;
        self
    }

    /// Palette index at canvas coordinates `(x, y)`, which must lie inside `rect`.
    pub fn index_at(&self, x: u32, y: u32) -> u8 {
        let col = (x - self.rect.x0) as usize;
        let row = (y - self.rect.y0) as usize;
        self.indices[row * self.rect.width() as usize + col]
    }

    /// Straight RGBA color at canvas coordinates `(x, y)`.
    pub fn color_at(&self, x: u32, y: u32) -> Rgba8 {
        self.palette.resolve(self.index_at(x, y))
    }
}

/// A decoded multi-frame animation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Animation {
    pub width: u32,
    pub height: u32,
    /// Frames in playback order.
    pub frames: Vec<Frame>,
    /// Shared color table; the background color is looked up here.
    pub global_palette: Option<Palette>,
    pub background_index: u8,
    pub loop_count: LoopCount,
}

impl Animation {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            frames: Vec::new(),
            global_palette: None,
            background_index: 0,
            loop_count: LoopCount::Forever,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Background color; transparent when the global palette has no such entry.
    pub fn background_color(&self) -> Rgba8 {
        self.global_palette
            .as_ref()
            .and_then(|p| p.get(self.background_index))
            .unwrap_or(TRANSPARENT)
    }

    pub fn delays(&self) -> Vec<u16> {
        self.frames.iter().map(|f| f.delay).collect()
    }

    pub fn disposals(&self) -> Vec<DisposalMethod> {
        self.frames.iter().map(|f| f.disposal).collect()
    }

    /// Check that frame buffers are consistent with their rectangles.
    pub fn validate(&self) -> ResizeResult<()> {
        for (i, frame) in self.frames.iter().enumerate() {
            if frame.rect.is_empty() {
                return Err(ResizeError::invalid_animation(format!(
                    "frame {i} has an empty rectangle {:?}",
                    frame.rect
                )));
            }
            if frame.indices.len() != frame.rect.area() {
                return Err(ResizeError::invalid_animation(format!(
                    "frame {i} has {} indices for a {}x{} rectangle",
                    frame.indices.len(),
                    frame.rect.width(),
                    frame.rect.height()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/animation.rs"]
mod tests;
