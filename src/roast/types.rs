use super::grade::Grade;
use crate::error::RoastError;
use serde::{Deserialize, Serialize};

pub const MIN_RECOMMENDATIONS: usize = 3;
pub const MAX_RECOMMENDATIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionCritique {
    pub grade: Grade,
    pub critique: String,
}

/// Five graded dimensions plus ranked recommendations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullCritique {
    pub headline: DimensionCritique,
    pub value_proposition: DimensionCritique,
    pub visual_hierarchy: DimensionCritique,
    pub cta: DimensionCritique,
    pub trust_signals: DimensionCritique,
    #[serde(alias = "recommendations")]
    pub actionable_recommendations: Vec<String>,
}

impl FullCritique {
    /// Dimensions in presentation order with their display labels.
    pub fn dimensions(&self) -> [(&'static str, &DimensionCritique); 5] {
        [
            ("Headline", &self.headline),
            ("Value Proposition", &self.value_proposition),
            ("Visual Hierarchy", &self.visual_hierarchy),
            ("Call to Action", &self.cta),
            ("Trust Signals", &self.trust_signals),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeaserCritique {
    pub grade: Grade,
    pub partial_roast: String,
}

/// Output of one analysis pass: both critiques, computed together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoastAnalysis {
    pub grade: Grade,
    pub partial_roast: String,
    pub full_roast: FullCritique,
}

// ── Model wire shapes ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawTeaser {
    pub(crate) grade: String,
    #[serde(alias = "teaserCritique")]
    pub(crate) partial_roast: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawDimension {
    pub(crate) grade: String,
    pub(crate) critique: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawFullCritique {
    pub(crate) headline: RawDimension,
    pub(crate) value_proposition: RawDimension,
    pub(crate) visual_hierarchy: RawDimension,
    pub(crate) cta: RawDimension,
    pub(crate) trust_signals: RawDimension,
    #[serde(alias = "recommendations")]
    pub(crate) actionable_recommendations: Vec<String>,
}

fn non_empty(field: &str, text: String) -> Result<String, RoastError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(RoastError::upstream(format!("model returned an empty {field}")));
    }
    Ok(trimmed.to_string())
}

impl TryFrom<RawTeaser> for TeaserCritique {
    type Error = RoastError;

    fn try_from(raw: RawTeaser) -> Result<Self, Self::Error> {
        Ok(Self {
            grade: Grade::parse_lenient(&raw.grade)?,
            partial_roast: non_empty("teaser critique", raw.partial_roast)?,
        })
    }
}

impl RawDimension {
    fn validate(self, name: &str) -> Result<DimensionCritique, RoastError> {
        Ok(DimensionCritique {
            grade: Grade::parse_lenient(&self.grade)?,
            critique: non_empty(&format!("{name} critique"), self.critique)?,
        })
    }
}

impl TryFrom<RawFullCritique> for FullCritique {
    type Error = RoastError;

    fn try_from(raw: RawFullCritique) -> Result<Self, Self::Error> {
        let mut recommendations: Vec<String> = raw
            .actionable_recommendations
            .into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect();

        if recommendations.len() < MIN_RECOMMENDATIONS {
            return Err(RoastError::upstream(format!(
                "model returned {} recommendations, expected at least {MIN_RECOMMENDATIONS}",
                recommendations.len()
            )));
        }
        // Ranked by priority; keep the top ones.
        recommendations.truncate(MAX_RECOMMENDATIONS);

        Ok(Self {
            headline: raw.headline.validate("headline")?,
            value_proposition: raw.value_proposition.validate("value proposition")?,
            visual_hierarchy: raw.visual_hierarchy.validate("visual hierarchy")?,
            cta: raw.cta.validate("call to action")?,
            trust_signals: raw.trust_signals.validate("trust signals")?,
            actionable_recommendations: recommendations,
        })
    }
}
