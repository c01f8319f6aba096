use std::sync::Arc;

use crate::composite::canvas::CanvasCompositor;
use crate::foundation::error::{ResizeError, ResizeResult};
use crate::model::animation::{Animation, Frame};
use crate::plan::dimensions::{AspectPolicy, ResizePlan, plan_dimensions};
use crate::scale::cancel::CancelToken;
use crate::scale::gate::Parallelism;
use crate::scale::parallel::{BoundedParallelScaler, ScaleStats, ScaledFrame};
use crate::scale::scaler::{FilterScaler, FrameScaler};

/// Options for [`resize`] and [`resize_with_stats`].
#[derive(Clone)]
pub struct ResizeConfig {
    /// How the requested size relates to the source aspect ratio.
    pub aspect: AspectPolicy,
    /// Resampling applied to every flattened frame.
    pub scaler: Arc<dyn FrameScaler>,
    /// Cap on concurrently running scale jobs.
    pub parallelism: Parallelism,
}

impl ResizeConfig {
    pub fn with_aspect(mut self, aspect: AspectPolicy) -> Self {
        self.aspect = aspect;
        self
    }

    pub fn with_scaler(mut self, scaler: impl FrameScaler + 'static) -> Self {
        self.scaler = Arc::new(scaler);
        self
    }

    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            aspect: AspectPolicy::default(),
            scaler: Arc::new(FilterScaler::default()),
            parallelism: Parallelism::default(),
        }
    }
}

impl std::fmt::Debug for ResizeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResizeConfig")
            .field("aspect", &self.aspect)
            .field("parallelism", &self.parallelism)
            .finish_non_exhaustive()
    }
}

/// What a resize call resolved and did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeStats {
    pub plan: ResizePlan,
    pub scale: ScaleStats,
}

/// Resize every frame of `anim` to `width x height`.
///
/// Either dimension may be 0, in which case it is derived from the other
/// according to `config.aspect`. Disposal effects are flattened before
/// scaling, so partial-update frames resize without seams. Fails without
/// partial output on the first scaling error or when `cancel` trips.
pub fn resize(
    anim: &Animation,
    width: u32,
    height: u32,
    config: &ResizeConfig,
    cancel: &CancelToken,
) -> ResizeResult<Animation> {
    resize_with_stats(anim, width, height, config, cancel).map(|(out, _)| out)
}

/// [`resize`], also returning the resolved plan and scaling counters.
#[tracing::instrument(skip(anim, config, cancel), fields(frames = anim.frames.len()))]
pub fn resize_with_stats(
    anim: &Animation,
    width: u32,
    height: u32,
    config: &ResizeConfig,
    cancel: &CancelToken,
) -> ResizeResult<(Animation, ResizeStats)> {
    anim.validate()?;
    let plan = plan_dimensions(anim.width, anim.height, width, height, config.aspect)?;
    tracing::debug!(
        src_width = anim.width,
        src_height = anim.height,
        width = plan.width,
        height = plan.height,
        width_ratio = plan.width_ratio,
        height_ratio = plan.height_ratio,
        "resolved resize plan"
    );

    let compositor = CanvasCompositor::new(anim, plan);
    let scaler = BoundedParallelScaler::new(config.scaler.as_ref(), plan, config.parallelism)
        .waking_on(cancel);
    let (scaled, scale) = scaler.run(compositor, cancel)?;
    tracing::debug!(?scale, "scaled all frames");

    let out = assemble(anim, plan, scaled)?;
    Ok((out, ResizeStats { plan, scale }))
}

/// Rebuild an animation around resized frames, keeping the source metadata.
fn assemble(
    src: &Animation,
    plan: ResizePlan,
    scaled: Vec<ScaledFrame>,
) -> ResizeResult<Animation> {
    if scaled.len() != src.frames.len() {
        return Err(ResizeError::internal(format!(
            "expected {} scaled frames, got {}",
            src.frames.len(),
            scaled.len()
        )));
    }

    let frames = src
        .frames
        .iter()
        .zip(scaled)
        .map(|(orig, out)| Frame {
            rect: out.rect,
            palette: out.palette,
            indices: out.indices,
            disposal: orig.disposal,
            delay: orig.delay,
        })
        .collect();

    Ok(Animation {
        width: plan.width,
        height: plan.height,
        frames,
        global_palette: src.global_palette.clone(),
        background_index: src.background_index,
        loop_count: src.loop_count,
    })
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
