use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};

use enough::{Stop, StopReason};
use image::{GenericImageView, RgbaImage, imageops};

use crate::composite::canvas::FrameSnapshot;
use crate::foundation::core::Rect;
use crate::foundation::error::{ResizeError, ResizeResult};
use crate::model::palette::Palette;
use crate::plan::dimensions::ResizePlan;
use crate::scale::cancel::CancelToken;
use crate::scale::gate::{AdmissionGate, Parallelism};
use crate::scale::scaler::FrameScaler;

/// Resized, re-palettized pixels for one source frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScaledFrame {
    pub rect: Rect,
    pub palette: Palette,
    pub indices: Vec<u8>,
}

/// Counters for one scaling run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScaleStats {
    /// Snapshots handed to the scaler.
    pub frames_total: u64,
    /// Jobs admitted through the gate.
    pub frames_admitted: u64,
    /// Jobs that produced a frame.
    pub frames_scaled: u64,
    /// Most jobs admitted and not yet finished at the same time.
    pub peak_in_flight: usize,
}

/// Fans flattened snapshots out to a [`FrameScaler`] on a rayon thread pool.
///
/// At most `parallelism` jobs run at once. Results land in slots addressed by
/// frame index, so completion order never affects output order. The first
/// failure wins and stops further admissions; every started job is finished
/// before [`run`](Self::run) returns.
pub struct BoundedParallelScaler<'a> {
    scaler: &'a dyn FrameScaler,
    plan: ResizePlan,
    parallelism: Parallelism,
    wake_on: Option<&'a CancelToken>,
}

impl<'a> BoundedParallelScaler<'a> {
    pub fn new(scaler: &'a dyn FrameScaler, plan: ResizePlan, parallelism: Parallelism) -> Self {
        Self {
            scaler,
            plan,
            parallelism,
            wake_on: None,
        }
    }

    /// Wake a blocked admission as soon as `token` is cancelled instead of at
    /// the next poll. Pass the same token to [`run`](Self::run).
    pub fn waking_on(mut self, token: &'a CancelToken) -> Self {
        self.wake_on = Some(token);
        self
    }

    /// Scale every snapshot, admitting jobs from the calling thread.
    ///
    /// `stop` is checked before each admission. Jobs run on a pool sized to
    /// the parallelism limit (hardware threads when unlimited).
    pub fn run<I>(
        &self,
        snapshots: I,
        stop: &dyn Stop,
    ) -> ResizeResult<(Vec<ScaledFrame>, ScaleStats)>
    where
        I: ExactSizeIterator<Item = FrameSnapshot>,
    {
        let frame_count = snapshots.len();
        let pool = build_thread_pool(self.parallelism.limit())?;
        let gate = AdmissionGate::new(self.parallelism);
        // Tripped by us on the first job failure.
        let halt = CancelToken::new();
        let _halt_wake = halt.on_cancel(gate.waker());
        let _caller_wake = self.wake_on.map(|token| token.on_cancel(gate.waker()));
        let run_stop = RunStop { caller: stop, halt: &halt };

        let failure = FirstFailure::default();
        let scaled = AtomicU64::new(0);
        let mut admitted = 0u64;
        let mut submitted = 0u64;

        let mut slots: Vec<Option<ScaledFrame>> = (0..frame_count).map(|_| None).collect();
        let mut free_slots = slots.iter_mut().enumerate();

        pool.in_place_scope(|scope| {
            for snapshot in snapshots {
                submitted += 1;
                let permit = match gate.acquire(&run_stop) {
                    Ok(permit) => permit,
                    Err(e) => {
                        failure.record(e);
                        break;
                    }
                };
                let Some((_, slot)) = free_slots.find(|(i, _)| *i == snapshot.index) else {
                    failure.record(ResizeError::internal(format!(
                        "no output slot for frame {}",
                        snapshot.index
                    )));
                    break;
                };
                admitted += 1;
                tracing::trace!(index = snapshot.index, "admitted frame");

                let (scaler, plan) = (self.scaler, self.plan);
                let (failure, halt, scaled) = (&failure, &halt, &scaled);
                scope.spawn(move |_| {
                    let index = snapshot.index;
                    let result = panic::catch_unwind(AssertUnwindSafe(|| {
                        scale_snapshot(scaler, plan, snapshot)
                    }))
                    .unwrap_or_else(|payload| {
                        Err(ResizeError::internal(format!(
                            "scale job for frame {index} panicked: {}",
                            panic_message(&*payload)
                        )))
                    });
                    match result {
                        Ok(frame) => {
                            *slot = Some(frame);
                            scaled.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(e) => {
                            tracing::warn!(index, error = %e, "frame scaling failed");
                            failure.record(e);
                            halt.cancel();
                        }
                    }
                    // Released only after a failure is recorded and the run halted.
                    drop(permit);
                });
            }
        });

        let stats = ScaleStats {
            frames_total: submitted,
            frames_admitted: admitted,
            frames_scaled: scaled.into_inner(),
            peak_in_flight: gate.peak(),
        };
        if let Some(err) = failure.into_inner() {
            if err.is_interrupt() {
                tracing::warn!(?stats, error = %err, "frame scaling interrupted");
            }
            return Err(err);
        }

        let frames = slots
            .into_iter()
            .enumerate()
            .map(|(i, slot)| {
                slot.ok_or_else(|| ResizeError::internal(format!("frame {i} was never scaled")))
            })
            .collect::<ResizeResult<Vec<_>>>()?;
        Ok((frames, stats))
    }
}

/// The caller's stop, or our own halt once a job has failed.
struct RunStop<'a> {
    caller: &'a dyn Stop,
    halt: &'a CancelToken,
}

impl Stop for RunStop<'_> {
    fn check(&self) -> Result<(), StopReason> {
        self.caller.check()?;
        self.halt.check()
    }
}

fn build_thread_pool(threads: Option<usize>) -> ResizeResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ResizeError::internal(format!("failed to build rayon thread pool: {e}")))
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

/// Keeps only the first error reported by any thread.
#[derive(Debug, Default)]
struct FirstFailure(OnceLock<ResizeError>);

impl FirstFailure {
    fn record(&self, err: ResizeError) {
        let _ = self.0.set(err);
    }

    fn into_inner(self) -> Option<ResizeError> {
        self.0.into_inner()
    }
}

fn scale_snapshot(
    scaler: &dyn FrameScaler,
    plan: ResizePlan,
    snapshot: FrameSnapshot,
) -> ResizeResult<ScaledFrame> {
    let FrameSnapshot {
        index,
        canvas,
        dest,
        palette,
    } = snapshot;

    let resized = scaler
        .scale(&canvas, plan.width, plan.height)
        .map_err(|e| ResizeError::scale_function(index, e))?;
    if resized.dimensions() != (plan.width, plan.height) {
        return Err(ResizeError::ScaledSizeMismatch {
            index,
            expected: (plan.width, plan.height),
            actual: resized.dimensions(),
        });
    }

    let indices = crop_to_palette(&resized, dest, &palette);
    Ok(ScaledFrame {
        rect: dest,
        palette,
        indices,
    })
}

/// Cut `dest` out of a resized canvas, mapping each pixel to its nearest palette entry.
///
/// Parts of `dest` outside the image map to index 0.
pub(crate) fn crop_to_palette(resized: &RgbaImage, dest: Rect, palette: &Palette) -> Vec<u8> {
    let view = imageops::crop_imm(resized, dest.x0, dest.y0, dest.width(), dest.height());
    let (vw, vh) = view.dimensions();
    let mut indices = Vec::with_capacity(dest.area());
    for dy in 0..dest.height() {
        for dx in 0..dest.width() {
            let idx = if dx < vw && dy < vh {
                palette.nearest_index(view.get_pixel(dx, dy).0)
            } else {
                0
            };
            indices.push(idx);
        }
    }
    indices
}

#[cfg(test)]
#[path = "../../tests/unit/scale/parallel.rs"]
mod tests;
