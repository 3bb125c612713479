mod app;
mod capture;
mod config;
mod coordinator;
mod dispatch;
mod error;
mod overlay;
mod state;
mod verify;

use crate::app::ViewerApp;
use crate::capture::WebcamSource;
use crate::config::Settings;
use crate::coordinator::Coordinator;
use crate::dispatch::Dispatcher;
use crate::error::AppError;
use crate::state::MatchState;
use crate::verify::{load_reference, PerceptualVerifier, Verifier};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::Level;

fn init_logging() {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    init_logging();

    let settings = Settings::load()?;
    // The only intended fatal startup failure: no reference image, no demo.
    let reference = Arc::new(load_reference(&settings.reference_path)?);

    let match_state = MatchState::new();
    let verifier: Arc<dyn Verifier> = Arc::new(PerceptualVerifier::new(&settings.verifier));
    let dispatcher = Dispatcher::new(
        verifier,
        reference,
        match_state.clone(),
        &settings.sampling,
        Handle::current(),
    );

    let (frame_tx, frame_rx) = tokio::sync::mpsc::channel(settings.frame_buffer_size.max(1));
    let camera_settings = settings.camera.clone();
    let coordinator = Coordinator::spawn(
        move || WebcamSource::open(&camera_settings),
        dispatcher,
        frame_tx,
    );

    ViewerApp::run(&settings, frame_rx, match_state, coordinator)?;
    Ok(())
}
