//! Report Dispatcher: render the unlocked critique and email it.

pub mod dispatcher;
pub mod render;
pub mod sender;
mod templates;

pub use dispatcher::ReportDispatcher;
pub use render::{RenderedReport, ReportRenderer};
pub use sender::{OutgoingEmail, ReportSender, ResendSender};
