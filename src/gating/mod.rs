//! Gating Workflow: teaser first, full critique after an email capture.

pub mod validation;
pub mod views;
pub mod workflow;

pub use validation::{TargetUrl, is_valid_email, validate_target_url};
pub use views::{AnalyzeResponse, CaptureResponse, RoastState, RoastView};
pub use workflow::{RoastWorkflow, WorkflowParts};
