use super::templates::{REPORT_HTML, REPORT_TXT};
use crate::store::RoastRecord;
use serde::Serialize;
use tera::Tera;

const HTML_TEMPLATE: &str = "report.html";
const TEXT_TEMPLATE: &str = "report.txt";

#[derive(Debug, Serialize)]
struct DimensionView<'a> {
    label: &'static str,
    grade: &'static str,
    critique: &'a str,
}

/// Both renderings of one report.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Tera-backed renderer for the emailed roast report.
///
/// The HTML template name ends in `.html`, so Tera autoescapes model output.
pub struct ReportRenderer {
    tera: Tera,
}

impl ReportRenderer {
    pub fn new() -> anyhow::Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(HTML_TEMPLATE, REPORT_HTML)?;
        tera.add_raw_template(TEXT_TEMPLATE, REPORT_TXT)?;
        Ok(Self { tera })
    }

    pub fn render(&self, record: &RoastRecord) -> anyhow::Result<RenderedReport> {
        let dimensions: Vec<DimensionView<'_>> = record
            .full_critique
            .dimensions()
            .into_iter()
            .map(|(label, dimension)| DimensionView {
                label,
                grade: dimension.grade.as_str(),
                critique: &dimension.critique,
            })
            .collect();

        let mut context = tera::Context::new();
        context.insert("grade", record.grade.as_str());
        context.insert("url", &record.source_url);
        context.insert("screenshot_url", &record.image_url);
        context.insert("partial_roast", &record.teaser_critique);
        context.insert("dimensions", &dimensions);
        context.insert(
            "recommendations",
            &record.full_critique.actionable_recommendations,
        );

        Ok(RenderedReport {
            subject: format!("Your Landing Page Roast Report - Grade: {}", record.grade),
            html: self.tera.render(HTML_TEMPLATE, &context)?,
            text: self.tera.render(TEXT_TEMPLATE, &context)?,
        })
    }
}
