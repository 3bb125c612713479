use crate::capture::Frame;
use crate::overlay;
use crate::verify::Verdict;
use egui::TextureOptions;

/// Draws the newest camera frame with the match label stamped over it.
pub struct VideoView {
    current_frame: Option<Frame>,
    show_label: bool,
}

impl VideoView {
    pub fn new() -> Self {
        Self {
            current_frame: None,
            show_label: true,
        }
    }

    pub fn set_frame(&mut self, frame: Frame) {
        self.current_frame = Some(frame);
    }

    pub fn draw(&mut self, ui: &mut egui::Ui, verdict: &Verdict) {
        ui.checkbox(&mut self.show_label, "Show match label");
        ui.separator();

        let Some(frame) = &self.current_frame else {
            ui.label("Waiting for the first camera frame...");
            return;
        };

        ui.label(format!(
            "{}x{} captured at {}",
            frame.image().width(),
            frame.image().height(),
            frame.captured_at().format("%H:%M:%S%.3f")
        ));

        let image = frame.image().to_rgb8();
        let color_image = egui::ColorImage::from_rgb(
            [image.width() as usize, image.height() as usize],
            image.as_raw().as_slice(),
        );
        let texture_handle =
            ui.ctx()
                .load_texture("live_frame", color_image, TextureOptions::default());

        let response = ui.image(&texture_handle);
        if self.show_label {
            overlay::paint(ui.painter(), response.rect, verdict);
        }
    }
}

impl Default for VideoView {
    fn default() -> Self {
        Self::new()
    }
}
