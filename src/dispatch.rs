use crate::capture::Frame;
use crate::config::SamplingSettings;
use crate::state::MatchState;
use crate::verify::{Verdict, Verifier};
use image::DynamicImage;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Samples every Nth successfully captured frame and fires one background
/// verification task per sample. The capture loop never waits on these
/// tasks, and by default nothing bounds how many run at once; with
/// `skip_when_busy` a due sample is dropped while a prior task is still
/// in flight.
pub struct Dispatcher {
    verifier: Arc<dyn Verifier>,
    reference: Arc<DynamicImage>,
    state: MatchState,
    runtime: Handle,
    interval: u64,
    frames_seen: u64,
    skip_when_busy: bool,
    in_flight: Arc<AtomicBool>,
}

impl Dispatcher {
    pub fn new(
        verifier: Arc<dyn Verifier>,
        reference: Arc<DynamicImage>,
        state: MatchState,
        sampling: &SamplingSettings,
        runtime: Handle,
    ) -> Self {
        Self {
            verifier,
            reference,
            state,
            runtime,
            interval: sampling.interval_frames.max(1),
            frames_seen: 0,
            skip_when_busy: sampling.skip_when_busy,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Called once per successfully captured frame; failed reads never reach
    /// this, so they never perturb the sampling cadence. Dispatches on frame
    /// counts 0, N, 2N, ... and returns the task handle when a task was
    /// spawned so callers that care (tests) can await the verdict write.
    pub fn observe(&mut self, frame: &Frame) -> Option<JoinHandle<()>> {
        let due = self.frames_seen % self.interval == 0;
        self.frames_seen += 1;
        if !due {
            return None;
        }

        if self.skip_when_busy
            && self
                .in_flight
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
        {
            tracing::debug!("verification still in flight, skipping frame {}", frame.id());
            return None;
        }

        let verifier = Arc::clone(&self.verifier);
        let reference = Arc::clone(&self.reference);
        let state = self.state.clone();
        let candidate = frame.image_handle();
        let in_flight = Arc::clone(&self.in_flight);
        let release_slot = self.skip_when_busy;

        Some(self.runtime.spawn_blocking(move || {
            let verdict = match verifier.verify(&candidate, &reference) {
                Ok(true) => Verdict::Match,
                Ok(false) => Verdict::NoMatch,
                Err(e) => {
                    tracing::error!("face verification failed: {e}");
                    Verdict::Failed(e.to_string())
                }
            };
            // Writing the verdict is always the task's final act, even on
            // failure, so the overlay never keeps a stale match.
            state.set(verdict);
            if release_slot {
                in_flight.store(false, Ordering::Release);
            }
        }))
    }
}
