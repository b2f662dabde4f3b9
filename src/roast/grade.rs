use crate::error::RoastError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Letter grade with optional modifier, worst to best.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
pub enum Grade {
    #[serde(rename = "F")]
    #[strum(serialize = "F")]
    F,
    #[serde(rename = "D-")]
    #[strum(serialize = "D-")]
    DMinus,
    #[serde(rename = "D")]
    #[strum(serialize = "D")]
    D,
    #[serde(rename = "D+")]
    #[strum(serialize = "D+")]
    DPlus,
    #[serde(rename = "C-")]
    #[strum(serialize = "C-")]
    CMinus,
    #[serde(rename = "C")]
    #[strum(serialize = "C")]
    C,
    #[serde(rename = "C+")]
    #[strum(serialize = "C+")]
    CPlus,
    #[serde(rename = "B-")]
    #[strum(serialize = "B-")]
    BMinus,
    #[serde(rename = "B")]
    #[strum(serialize = "B")]
    B,
    #[serde(rename = "B+")]
    #[strum(serialize = "B+")]
    BPlus,
    #[serde(rename = "A-")]
    #[strum(serialize = "A-")]
    AMinus,
    #[serde(rename = "A")]
    #[strum(serialize = "A")]
    A,
    #[serde(rename = "A+")]
    #[strum(serialize = "A+")]
    APlus,
}

impl Grade {
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Accept model output such as `" b+ "`. Anything outside the 13-value
    /// scale is an upstream failure.
    pub fn parse_lenient(raw: &str) -> Result<Self, RoastError> {
        let normalized = raw.trim().to_ascii_uppercase();
        Self::from_str(&normalized)
            .map_err(|_| RoastError::upstream(format!("model returned an unknown grade {raw:?}")))
    }
}
