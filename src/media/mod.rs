//! Image Acquirer: live-page capture and uploaded-image preparation.

pub mod capture;
pub mod detection;
pub mod processing;

pub use capture::{ScreenshotApiClient, ScreenshotCapture};
pub use processing::{PreparedImage, UploadMeta, prepare_upload};
