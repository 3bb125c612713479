use crate::capture::{Frame, FrameSource};
use crate::dispatch::Dispatcher;
use crate::error::AppError;
use std::time::Duration;
use tokio::sync::mpsc::Sender;
use tokio_util::sync::CancellationToken;

/// Owns the capture loop. Camera I/O is blocking, so the loop runs on a
/// dedicated thread: read a frame, hand it to the dispatcher, send it to
/// the UI channel, repeat until cancelled. Read failures are logged and
/// retried on the next pass; an unrecoverable device failure looks the
/// same as a transient one and keeps looping.
pub struct Coordinator {
    capture_thread: Option<std::thread::JoinHandle<()>>,
    cancel_token: CancellationToken,
}

impl Coordinator {
    pub fn spawn<S, F>(open_source: F, dispatcher: Dispatcher, frame_tx: Sender<Frame>) -> Self
    where
        S: FrameSource + 'static,
        F: FnMut() -> Result<S, AppError> + Send + 'static,
    {
        let cancel_token = CancellationToken::new();
        let capture_thread =
            Self::start_capture(open_source, dispatcher, frame_tx, cancel_token.clone());
        Self {
            capture_thread: Some(capture_thread),
            cancel_token,
        }
    }

    fn start_capture<S, F>(
        mut open_source: F,
        mut dispatcher: Dispatcher,
        frame_tx: Sender<Frame>,
        cancel_token: CancellationToken,
    ) -> std::thread::JoinHandle<()>
    where
        S: FrameSource + 'static,
        F: FnMut() -> Result<S, AppError> + Send + 'static,
    {
        std::thread::spawn(move || {
            let mut source = loop {
                if cancel_token.is_cancelled() {
                    return;
                }
                match open_source() {
                    Ok(source) => break source,
                    Err(e) => {
                        tracing::error!("failed to open frame source: {e}");
                        std::thread::sleep(Duration::from_secs(1));
                    }
                }
            };

            while !cancel_token.is_cancelled() {
                match source.read() {
                    Ok(frame) => {
                        // Fire-and-forget; the loop never waits on a check.
                        let _task = dispatcher.observe(&frame);
                        if frame_tx.blocking_send(frame).is_err() {
                            tracing::info!("frame channel closed, capture shutting down");
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!("frame read failed, retrying: {e}");
                    }
                }
            }
            // Dropping the source here releases the device handle exactly once.
        })
    }

    pub fn stop(&self) {
        self.cancel_token.cancel();
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.stop();
        // The thread may be parked inside a blocking camera read; it exits on
        // its own once the read returns, so it is not joined here.
        let _ = self.capture_thread.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SamplingSettings;
    use crate::state::MatchState;
    use crate::verify::{Verdict, Verifier};
    use image::{DynamicImage, ImageBuffer, Rgb};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::runtime::Handle;

    fn test_image() -> DynamicImage {
        DynamicImage::ImageRgb8(ImageBuffer::<Rgb<u8>, Vec<u8>>::from_pixel(
            32,
            32,
            Rgb([8, 16, 32]),
        ))
    }

    /// Plays back a fixed read script, then reports read failures forever.
    struct ScriptedSource {
        script: VecDeque<Result<Frame, AppError>>,
    }

    impl ScriptedSource {
        fn new(script: Vec<Result<Frame, AppError>>) -> Self {
            Self {
                script: script.into(),
            }
        }
    }

    impl FrameSource for ScriptedSource {
        fn read(&mut self) -> Result<Frame, AppError> {
            match self.script.pop_front() {
                Some(step) => step,
                None => {
                    std::thread::sleep(Duration::from_millis(5));
                    Err(AppError::Camera(nokhwa::NokhwaError::ReadFrameError(
                        "script exhausted".to_string(),
                    )))
                }
            }
        }
    }

    struct CountingVerifier {
        calls: Arc<AtomicUsize>,
        delay: Duration,
        outcome: Result<bool, String>,
    }

    impl Verifier for CountingVerifier {
        fn verify(
            &self,
            _candidate: &DynamicImage,
            _reference: &DynamicImage,
        ) -> Result<bool, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(self.delay);
            self.outcome.clone().map_err(AppError::Verification)
        }
    }

    fn read_error() -> Result<Frame, AppError> {
        Err(AppError::Camera(nokhwa::NokhwaError::ReadFrameError(
            "transient hiccup".to_string(),
        )))
    }

    fn test_dispatcher(
        verifier: CountingVerifier,
        interval_frames: u64,
        state: MatchState,
    ) -> Dispatcher {
        Dispatcher::new(
            Arc::new(verifier),
            Arc::new(test_image()),
            state,
            &SamplingSettings {
                interval_frames,
                skip_when_busy: false,
            },
            Handle::current(),
        )
    }

    #[tokio::test]
    async fn slow_verification_flips_state_after_completion() {
        let state = MatchState::new();
        let dispatcher = test_dispatcher(
            CountingVerifier {
                calls: Arc::new(AtomicUsize::new(0)),
                delay: Duration::from_millis(100),
                outcome: Ok(true),
            },
            30,
            state.clone(),
        );

        let (frame_tx, mut frame_rx) = tokio::sync::mpsc::channel(16);
        let coordinator = Coordinator::spawn(
            move || Ok(ScriptedSource::new(vec![Ok(Frame::new(test_image()))])),
            dispatcher,
            frame_tx,
        );

        let _first = frame_rx.recv().await.expect("first frame reaches the UI");
        // The check dispatched at frame 0 is still running.
        assert!(!state.get().is_match());

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(state.get().is_match());
        coordinator.stop();
    }

    #[tokio::test]
    async fn failed_reads_are_skipped_and_do_not_advance_sampling() {
        let calls = Arc::new(AtomicUsize::new(0));
        let state = MatchState::new();
        let dispatcher = test_dispatcher(
            CountingVerifier {
                calls: Arc::clone(&calls),
                delay: Duration::ZERO,
                outcome: Ok(false),
            },
            2,
            state.clone(),
        );

        // Successful captures are frames 0, 1 and 2; with an interval of 2
        // only frames 0 and 2 are sampled, regardless of the failed reads
        // interleaved between them.
        let mut script = vec![
            read_error(),
            Ok(Frame::new(test_image())),
            read_error(),
            Ok(Frame::new(test_image())),
            read_error(),
            Ok(Frame::new(test_image())),
        ];
        let (frame_tx, mut frame_rx) = tokio::sync::mpsc::channel(16);
        let coordinator = Coordinator::spawn(
            move || Ok(ScriptedSource::new(script.drain(..).collect())),
            dispatcher,
            frame_tx,
        );

        let mut delivered = 0;
        while delivered < 3 {
            frame_rx.recv().await.expect("frame reaches the UI");
            delivered += 1;
        }
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        coordinator.stop();
    }

    #[tokio::test]
    async fn verification_errors_keep_the_loop_running() {
        let calls = Arc::new(AtomicUsize::new(0));
        let state = MatchState::new();
        let dispatcher = test_dispatcher(
            CountingVerifier {
                calls: Arc::clone(&calls),
                delay: Duration::ZERO,
                outcome: Err("model exploded".to_string()),
            },
            2,
            state.clone(),
        );

        let mut script = vec![
            Ok(Frame::new(test_image())),
            Ok(Frame::new(test_image())),
            Ok(Frame::new(test_image())),
        ];
        let (frame_tx, mut frame_rx) = tokio::sync::mpsc::channel(16);
        let coordinator = Coordinator::spawn(
            move || Ok(ScriptedSource::new(script.drain(..).collect())),
            dispatcher,
            frame_tx,
        );

        for _ in 0..3 {
            frame_rx.recv().await.expect("frame reaches the UI");
        }
        tokio::time::sleep(Duration::from_millis(200)).await;

        // Dispatched again at the next interval despite the first failure.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(matches!(state.get(), Verdict::Failed(_)));
        coordinator.stop();
    }
}
