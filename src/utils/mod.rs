pub mod http;
pub mod scrub;
pub mod text;

pub use http::{build_client_with_timeout, error_from_response};
pub use scrub::{sanitize_api_error, scrub_secret_patterns};
pub use text::truncate_with_ellipsis;
