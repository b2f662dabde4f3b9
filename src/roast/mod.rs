//! Critique Engine: two vision-model calls normalized into one analysis.

pub mod engine;
pub mod grade;
pub mod prompts;
pub mod types;

pub use engine::{CritiqueEngine, ImageInput};
pub use grade::Grade;
pub use types::{DimensionCritique, FullCritique, RoastAnalysis, TeaserCritique};
