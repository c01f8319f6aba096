//! animscale resizes decoded, palette-indexed animations (GIF-style) frame by frame.
//!
//! Partial-update frames only make sense on top of whatever earlier frames left
//! on the canvas, so each frame is first flattened through the animation's
//! disposal rules, then scaled as a full canvas and cropped back to its own
//! rectangle. Scaling runs on a bounded set of worker threads:
//!
//! - [`plan_dimensions`] resolves the target size once
//! - [`CanvasCompositor`] replays disposal on a single working canvas
//! - [`BoundedParallelScaler`] scales snapshots with at most `n` jobs in flight
//! - [`resize`] ties it together and reassembles the output [`Animation`]
#![forbid(unsafe_code)]

mod composite;
mod foundation;
mod model;
mod pipeline;
mod plan;
mod scale;

pub use crate::composite::blend::{PremulRgba8, over, over_straight};
pub use crate::composite::canvas::{CanvasCompositor, FrameSnapshot};
pub use crate::foundation::core::{LoopCount, Rect, Rgba8, TRANSPARENT};
pub use crate::foundation::error::{ResizeError, ResizeResult};
pub use crate::model::animation::{Animation, DisposalMethod, Frame};
pub use crate::model::palette::Palette;
pub use crate::pipeline::{ResizeConfig, ResizeStats, resize, resize_with_stats};
pub use crate::plan::dimensions::{AspectPolicy, ResizePlan, plan_dimensions};
pub use crate::scale::cancel::{CancelToken, CancelWake};
pub use crate::scale::gate::{AdmissionGate, Parallelism, Permit};
pub use crate::scale::parallel::{BoundedParallelScaler, ScaleStats, ScaledFrame};
pub use crate::scale::scaler::{FilterScaler, FrameScaler};

pub use enough::{Stop, StopReason, Unstoppable};

/// Re-exported so callers can pick a [`FilterScaler`] kernel without a direct `image` dependency.
pub use image::imageops::FilterType;
