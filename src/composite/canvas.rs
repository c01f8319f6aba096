use image::{Rgba, RgbaImage};

use crate::composite::blend::over_straight;
use crate::foundation::core::{Rect, Rgba8, TRANSPARENT};
use crate::model::animation::{Animation, DisposalMethod, Frame};
use crate::model::palette::Palette;
use crate::plan::dimensions::ResizePlan;

/// Flattened full-canvas image for one frame, owned by whoever scales it.
#[derive(Clone, Debug)]
pub struct FrameSnapshot {
    /// Position of the source frame in playback order.
    pub index: usize,
    /// Deep copy of the working canvas right after this frame was painted.
    pub canvas: RgbaImage,
    /// Crop window on the resized canvas.
    pub dest: Rect,
    /// The source frame's own color table.
    pub palette: Palette,
}

/// Replays an animation's disposal semantics over a single working canvas.
///
/// Yields one [`FrameSnapshot`] per source frame, in playback order. The working
/// canvas never leaves this type; consumers only ever see copies.
pub struct CanvasCompositor<'a> {
    anim: &'a Animation,
    plan: ResizePlan,
    canvas: RgbaImage,
    background: Rgba8,
    /// Canvas as it was before the last `Previous`-disposed frame was painted.
    restore: Option<RgbaImage>,
    next: usize,
}

impl<'a> CanvasCompositor<'a> {
    pub fn new(anim: &'a Animation, plan: ResizePlan) -> Self {
        Self {
            anim,
            plan,
            canvas: RgbaImage::new(anim.width, anim.height),
            background: anim.background_color(),
            restore: None,
            next: 0,
        }
    }

    #[cfg(test)]
    pub(crate) fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    fn paint(&mut self, frame: &Frame) {
        let clip = frame.rect.intersect(self.anim.bounds());
        for y in clip.y0..clip.y1 {
            for x in clip.x0..clip.x1 {
                let px = self.canvas.get_pixel_mut(x, y);
                px.0 = over_straight(px.0, frame.color_at(x, y));
            }
        }
    }

    fn clear_to_background(&mut self, frame: &Frame) {
        // A transparent entry in the frame palette overrides the nominal background color.
        let fill = if frame.palette.has_transparent() {
            TRANSPARENT
        } else {
            self.background
        };
        let clip = frame.rect.intersect(self.anim.bounds());
        for y in clip.y0..clip.y1 {
            for x in clip.x0..clip.x1 {
                self.canvas.put_pixel(x, y, Rgba(fill));
            }
        }
    }
}

impl Iterator for CanvasCompositor<'_> {
    type Item = FrameSnapshot;

    fn next(&mut self) -> Option<FrameSnapshot> {
        let frame = self.anim.frames.get(self.next)?;
        let index = self.next;
        self.next += 1;

        if let Some(saved) = self.restore.take() {
            self.canvas = saved;
        }
        if frame.disposal == DisposalMethod::Previous {
            self.restore = Some(self.canvas.clone());
        }

        self.paint(frame);
        let snapshot = FrameSnapshot {
            index,
            canvas: self.canvas.clone(),
            dest: self.plan.dest_rect(frame.rect),
            palette: frame.palette.clone(),
        };

        if frame.disposal == DisposalMethod::Background {
            self.clear_to_background(frame);
        }

        tracing::trace!(index, disposal = ?frame.disposal, "composited frame");
        Some(snapshot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.anim.frames.len().saturating_sub(self.next);
        (left, Some(left))
    }
}

impl ExactSizeIterator for CanvasCompositor<'_> {}

#[cfg(test)]
#[path = "../../tests/unit/composite/canvas.rs"]
mod tests;
