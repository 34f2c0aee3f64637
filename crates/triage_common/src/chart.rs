//! Chart rendering collaborator.
//!
//! The report renderer builds a [`ChartSpec`] describing what to draw; how
//! it gets drawn is the backend's business. The built-in backend emits
//! self-contained HTML with inline SVG so reports need no external assets.

use crate::error::TriageError;

/// One bar in a per-organization chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartBar {
    /// Axis tick label, already truncated for presentation.
    pub label: String,
    pub value: usize,
    /// Color grouping key (work area).
    pub color_key: String,
    /// Facet key (cast type); bars with the same facet render together.
    pub facet: String,
}

/// Input to a per-organization bar chart.
#[derive(Debug, Clone, Default)]
pub struct ChartSpec {
    pub title: String,
    pub bars: Vec<ChartBar>,
}

/// One leaf of the cross-organization overview hierarchy.
#[derive(Debug, Clone)]
pub struct OverviewRow {
    pub organization: String,
    pub work_area: String,
    pub label: String,
    pub count: usize,
}

/// External charting collaborator.
pub trait ChartBackend {
    /// Render a per-organization chart to an embeddable fragment.
    fn render(&self, spec: &ChartSpec) -> Result<String, TriageError>;

    /// Render the organization -> work area -> message hierarchy as a
    /// standalone document body.
    fn render_overview(&self, rows: &[OverviewRow]) -> Result<String, TriageError>;

    /// File extension for documents embedding this backend's output.
    fn extension(&self) -> &str;
}

const PALETTE: [&str; 8] = [
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc948", "#b07aa1", "#9c755f",
];

const BAR_HEIGHT: usize = 18;
const BAR_GAP: usize = 6;
const LABEL_WIDTH: usize = 340;
const BAR_MAX_WIDTH: usize = 420;

/// Built-in backend: horizontal bars, one facet section per cast type,
/// colored by work area.
#[derive(Debug, Default)]
pub struct HtmlBarChart;

impl HtmlBarChart {
    fn color_for(&self, keys: &[String], key: &str) -> &'static str {
        let idx = keys.iter().position(|k| k == key).unwrap_or(0);
        PALETTE[idx % PALETTE.len()]
    }
}

impl ChartBackend for HtmlBarChart {
    fn render(&self, spec: &ChartSpec) -> Result<String, TriageError> {
        let max = spec.bars.iter().map(|b| b.value).max().unwrap_or(0);
        if max == 0 {
            return Err(TriageError::Chart(format!(
                "chart '{}' has no bars to draw",
                spec.title
            )));
        }

        // First-seen orders keep colors and facet sections stable per run.
        let mut color_keys: Vec<String> = Vec::new();
        let mut facets: Vec<String> = Vec::new();
        for bar in &spec.bars {
            if !color_keys.contains(&bar.color_key) {
                color_keys.push(bar.color_key.clone());
            }
            if !facets.contains(&bar.facet) {
                facets.push(bar.facet.clone());
            }
        }

        let mut out = String::new();
        out.push_str(&format!(
            "<figure class=\"error-chart\"><figcaption>{}</figcaption>\n",
            escape(&spec.title)
        ));
        for facet in &facets {
            let bars: Vec<&ChartBar> = spec.bars.iter().filter(|b| &b.facet == facet).collect();
            if !facet.is_empty() {
                out.push_str(&format!("<h4>{}</h4>\n", escape(facet)));
            }
            let height = bars.len() * (BAR_HEIGHT + BAR_GAP);
            out.push_str(&format!(
                "<svg width=\"{}\" height=\"{}\" role=\"img\">\n",
                LABEL_WIDTH + BAR_MAX_WIDTH + 60,
                height
            ));
            for (i, bar) in bars.iter().enumerate() {
                let y = i * (BAR_HEIGHT + BAR_GAP);
                let width = (bar.value * BAR_MAX_WIDTH) / max;
                let color = self.color_for(&color_keys, &bar.color_key);
                out.push_str(&format!(
                    "<text x=\"{}\" y=\"{}\" text-anchor=\"end\" font-size=\"12\">{}</text>\n",
                    LABEL_WIDTH,
                    y + BAR_HEIGHT - 5,
                    escape(&bar.label)
                ));
                out.push_str(&format!(
                    "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"><title>{}: {}</title></rect>\n",
                    LABEL_WIDTH + 10,
                    y,
                    width.max(1),
                    BAR_HEIGHT,
                    color,
                    escape(&bar.color_key),
                    bar.value
                ));
                out.push_str(&format!(
                    "<text x=\"{}\" y=\"{}\" font-size=\"12\">{}</text>\n",
                    LABEL_WIDTH + 14 + width.max(1),
                    y + BAR_HEIGHT - 5,
                    bar.value
                ));
            }
            out.push_str("</svg>\n");
        }
        out.push_str("</figure>");
        Ok(out)
    }

    fn render_overview(&self, rows: &[OverviewRow]) -> Result<String, TriageError> {
        if rows.is_empty() {
            return Err(TriageError::Chart("overview has no rows".to_string()));
        }
        let max = rows.iter().map(|r| r.count).max().unwrap_or(1);

        let mut out = String::new();
        out.push_str("<ul class=\"overview\">\n");
        let mut current_org: Option<&str> = None;
        let mut current_area: Option<&str> = None;
        for row in rows {
            if current_org != Some(row.organization.as_str()) {
                if current_org.is_some() {
                    out.push_str("</ul></li>\n</ul></li>\n");
                }
                out.push_str(&format!(
                    "<li><strong>{}</strong><ul>\n",
                    escape(&row.organization)
                ));
                current_org = Some(row.organization.as_str());
                current_area = None;
            }
            if current_area != Some(row.work_area.as_str()) {
                if current_area.is_some() {
                    out.push_str("</ul></li>\n");
                }
                out.push_str(&format!("<li>{}<ul>\n", escape(&row.work_area)));
                current_area = Some(row.work_area.as_str());
            }
            let width = (row.count * 200) / max;
            out.push_str(&format!(
                "<li>{} ({})<span class=\"bar\" style=\"display:inline-block;height:0.6em;background:#4e79a7;width:{}px\"></span></li>\n",
                escape(&row.label),
                row.count,
                width.max(2)
            ));
        }
        if current_area.is_some() {
            out.push_str("</ul></li>\n");
        }
        if current_org.is_some() {
            out.push_str("</ul></li>\n");
        }
        out.push_str("</ul>");
        Ok(out)
    }

    fn extension(&self) -> &str {
        "html"
    }
}

pub(crate) fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
