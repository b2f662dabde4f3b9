use crate::roast::{FullCritique, Grade};
use crate::store::RoastRecord;
use serde::{Deserialize, Serialize};

/// Visibility state of one roast.
///
/// Records are written only after both critiques succeed, so a stored roast
/// starts out teaser-visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RoastState {
    TeaserVisible,
    FullVisible,
}

impl RoastState {
    pub fn of(record: &RoastRecord) -> Self {
        if record.email_captured {
            Self::FullVisible
        } else {
            Self::TeaserVisible
        }
    }

    pub fn full_visible(self) -> bool {
        self == Self::FullVisible
    }
}

/// Answer to both analyze operations. Never carries the full critique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub roast_id: String,
    pub grade: Grade,
    pub partial_roast: String,
    pub screenshot_url: String,
}

impl From<&RoastRecord> for AnalyzeResponse {
    fn from(record: &RoastRecord) -> Self {
        Self {
            roast_id: record.id.clone(),
            grade: record.grade,
            partial_roast: record.teaser_critique.clone(),
            screenshot_url: record.image_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureResponse {
    pub success: bool,
    pub full_roast: FullCritique,
}

/// Read-side view; `full_roast` is `null` until an email is captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoastView {
    pub roast_id: String,
    pub url: Option<String>,
    pub screenshot_url: String,
    pub grade: Grade,
    pub partial_roast: String,
    pub is_email_captured: bool,
    pub full_roast: Option<FullCritique>,
    pub created_at: String,
}

impl From<RoastRecord> for RoastView {
    fn from(record: RoastRecord) -> Self {
        let full_visible = RoastState::of(&record).full_visible();
        Self {
            roast_id: record.id,
            url: record.source_url,
            screenshot_url: record.image_url,
            grade: record.grade,
            partial_roast: record.teaser_critique,
            is_email_captured: record.email_captured,
            full_roast: full_visible.then_some(record.full_critique),
            created_at: record.created_at,
        }
    }
}
