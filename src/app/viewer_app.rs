use crate::app::VideoView;
use crate::capture::Frame;
use crate::config::Settings;
use crate::coordinator::Coordinator;
use crate::state::MatchState;
use tokio::sync::mpsc::error::TryRecvError as MpscTryRecvError;
use tokio::sync::mpsc::Receiver;
use tracing::error;

/// The display window: drains captured frames, shows the newest one with
/// the current verdict stamped on it, and quits on `q`.
pub struct ViewerApp {
    frame_rx: Receiver<Frame>,
    match_state: MatchState,
    coordinator: Coordinator,
    view: VideoView,
}

impl ViewerApp {
    pub fn run(
        settings: &Settings,
        frame_rx: Receiver<Frame>,
        match_state: MatchState,
        coordinator: Coordinator,
    ) -> Result<(), eframe::Error> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size(egui::vec2(
                    settings.camera.width as f32 + 40.0,
                    settings.camera.height as f32 + 100.0,
                ))
                .with_title("facegate - live video"),
            ..Default::default()
        };

        eframe::run_native(
            "facegate",
            options,
            Box::new(move |_cc| {
                Ok(Box::new(ViewerApp {
                    frame_rx,
                    match_state,
                    coordinator,
                    view: VideoView::new(),
                }))
            }),
        )
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Keep only the newest frame; the capture side may outpace rendering.
        loop {
            match self.frame_rx.try_recv() {
                Ok(frame) => self.view.set_frame(frame),
                Err(MpscTryRecvError::Empty) => break,
                Err(MpscTryRecvError::Disconnected) => {
                    error!("frame channel disconnected, capture side is gone");
                    break;
                }
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.view.draw(ui, &self.match_state.get());
        });

        if ctx.input(|i| i.key_pressed(egui::Key::Q)) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
        ctx.request_repaint();
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.coordinator.stop();
    }
}
