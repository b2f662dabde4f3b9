use crate::roast::{FullCritique, Grade, RoastAnalysis};
use serde::{Deserialize, Serialize};

/// Input for [`super::RoastStore::create`].
#[derive(Debug, Clone)]
pub struct NewRoast {
    pub source_url: Option<String>,
    pub image_url: String,
    pub analysis: RoastAnalysis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoastRecord {
    pub id: String,
    pub source_url: Option<String>,
    pub image_url: String,
    pub grade: Grade,
    pub teaser_critique: String,
    /// Always stored; only exposed once `email_captured` is set.
    pub full_critique: FullCritique,
    pub email_captured: bool,
    /// RFC 3339, immutable.
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailCapture {
    pub id: String,
    pub email: String,
    pub roast_id: String,
    pub has_received_full_audit: bool,
    pub created_at: String,
}
