pub mod video_view;
pub mod viewer_app;

pub use video_view::VideoView;
pub use viewer_app::ViewerApp;
