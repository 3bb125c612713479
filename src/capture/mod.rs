pub mod camera;
pub mod frame;

pub use camera::{FrameSource, WebcamSource};
pub use frame::Frame;
