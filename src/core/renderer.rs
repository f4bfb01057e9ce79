use crate::core::aggregator::max_category;
use crate::domain::catalog;
use crate::domain::model::{
    Category, CategoryScores, ChartArtifacts, ResponseSet, BAR_CHART, RADAR_CHART,
};
use crate::domain::ports::ChartRenderer;
use crate::utils::error::{Result, ScreenError};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt::Write;

const BAR_FILL: &str = "#87ceeb";
const RADAR_FILL: &str = "#87ceeb";
const RADAR_STROKE: &str = "#1f4fd8";
const GRID: &str = "#e5e7eb";
const TEXT: &str = "#374151";
const MUTED: &str = "#6b7280";

/// Chart dimensions. Row-based so the bar chart grows with the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartLayout {
    pub bar_width: f64,
    pub row_height: f64,
    pub label_width: f64,
    pub max_label_chars: usize,
    pub radar_size: f64,
    pub radar_rings: u32,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            bar_width: 1000.0,
            row_height: 28.0,
            label_width: 430.0,
            max_label_chars: 52,
            radar_size: 640.0,
            radar_rings: 4,
        }
    }
}

impl ChartLayout {
    fn check(&self) -> std::result::Result<(), String> {
        let finite = [self.bar_width, self.row_height, self.label_width, self.radar_size]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0);
        if !finite {
            return Err("chart dimensions must be positive".to_string());
        }
        if self.label_width + BAR_RIGHT_MARGIN + 50.0 > self.bar_width {
            return Err(format!(
                "label_width {} leaves no room for bars in width {}",
                self.label_width, self.bar_width
            ));
        }
        if self.radar_size <= 2.0 * RADAR_PADDING {
            return Err(format!("radar_size {} is too small", self.radar_size));
        }
        if self.max_label_chars == 0 || self.radar_rings == 0 {
            return Err("max_label_chars and radar_rings must be at least 1".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SvgRenderer {
    layout: ChartLayout,
    max_per_question: u32,
}

impl SvgRenderer {
    pub fn new(layout: ChartLayout, max_per_question: u32) -> Self {
        Self {
            layout,
            max_per_question,
        }
    }
}

impl ChartRenderer for SvgRenderer {
    fn render(
        &self,
        responses: &ResponseSet,
        category_scores: &CategoryScores,
    ) -> Result<ChartArtifacts> {
        self.layout
            .check()
            .map_err(|message| ScreenError::RenderError {
                chart: "layout".to_string(),
                message,
            })?;

        let bar = render_bar_chart(responses, &self.layout, self.max_per_question)?;
        let radar = render_radar_chart(category_scores, &self.layout, self.max_per_question)?;
        tracing::debug!(
            bar_bytes = bar.len(),
            radar_bytes = radar.len(),
            "Rendered charts"
        );

        Ok(ChartArtifacts {
            bar: bar.into_bytes(),
            radar: radar.into_bytes(),
        })
    }
}

const BAR_TOP_MARGIN: f64 = 50.0;
const BAR_BOTTOM_MARGIN: f64 = 60.0;
const BAR_RIGHT_MARGIN: f64 = 30.0;

pub fn render_bar_chart(
    responses: &ResponseSet,
    layout: &ChartLayout,
    max_per_question: u32,
) -> Result<String> {
    let fail = |message: String| ScreenError::RenderError {
        chart: BAR_CHART.to_string(),
        message,
    };
    if max_per_question == 0 {
        return Err(fail("scale maximum must be at least 1".to_string()));
    }

    let rows = catalog::question_count();
    let plot_left = layout.label_width;
    let plot_width = layout.bar_width - layout.label_width - BAR_RIGHT_MARGIN;
    let plot_height = rows as f64 * layout.row_height;
    let plot_bottom = BAR_TOP_MARGIN + plot_height;
    let height = plot_bottom + BAR_BOTTOM_MARGIN;
    let scale = plot_width / f64::from(max_per_question);

    let mut bars = String::new();
    for (i, (question, value)) in responses.with_questions().enumerate() {
        if value > max_per_question {
            return Err(fail(format!(
                "score {} for '{}' exceeds scale {}",
                value, question.id, max_per_question
            )));
        }
        let y = BAR_TOP_MARGIN + i as f64 * layout.row_height;
        let bar_height = layout.row_height * 0.7;
        let bar_y = y + (layout.row_height - bar_height) / 2.0;

        write!(
            bars,
            r##"  <rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"><title>{}: {}</title></rect>
  <text x="{:.1}" y="{:.1}" text-anchor="end" font-size="12" fill="{}">{}</text>
"##,
            plot_left,
            bar_y,
            f64::from(value) * scale,
            bar_height,
            BAR_FILL,
            escape_xml(question.prompt),
            value,
            plot_left - 8.0,
            y + layout.row_height / 2.0 + 4.0,
            TEXT,
            escape_xml(&truncate_label(question.prompt, layout.max_label_chars)),
        )
        .map_err(|e| fail(e.to_string()))?;
    }

    let step = (max_per_question / 10).max(1);
    let mut ticks = String::new();
    for tick in (0..=max_per_question).step_by(step as usize) {
        let x = plot_left + f64::from(tick) * scale;
        write!(
            ticks,
            r##"  <line x1="{x:.1}" y1="{:.1}" x2="{x:.1}" y2="{:.1}" stroke="{}" stroke-width="1"/>
  <text x="{x:.1}" y="{:.1}" text-anchor="middle" font-size="11" fill="{}">{}</text>
"##,
            BAR_TOP_MARGIN,
            plot_bottom,
            GRID,
            plot_bottom + 16.0,
            MUTED,
            tick,
        )
        .map_err(|e| fail(e.to_string()))?;
    }

    let mut svg = String::new();
    write!(
        svg,
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}" style="background:white">
  <text x="{:.1}" y="28" text-anchor="middle" font-size="16" font-weight="600" fill="{}">Scores for Each Question</text>
{}{}  <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="2"/>
  <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="2"/>
  <text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="12" fill="{}">Score</text>
  <text x="14" y="{:.1}" text-anchor="middle" font-size="12" fill="{}" transform="rotate(-90, 14, {:.1})">Questions</text>
</svg>
"##,
        layout.bar_width / 2.0,
        TEXT,
        ticks,
        bars,
        plot_left,
        plot_bottom,
        plot_left + plot_width,
        plot_bottom,
        MUTED,
        plot_left,
        BAR_TOP_MARGIN,
        plot_left,
        plot_bottom,
        MUTED,
        plot_left + plot_width / 2.0,
        plot_bottom + 40.0,
        MUTED,
        BAR_TOP_MARGIN + plot_height / 2.0,
        MUTED,
        BAR_TOP_MARGIN + plot_height / 2.0,
        w = layout.bar_width,
        h = height,
    )
    .map_err(|e| fail(e.to_string()))?;

    Ok(svg)
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadarAxis {
    pub category: Category,
    /// Clockwise from 12 o'clock.
    pub angle_degrees: f64,
    pub end: (f64, f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadarGeometry {
    pub axes: Vec<RadarAxis>,
    /// One vertex per axis plus the first vertex repeated to close the shape.
    pub vertices: Vec<(f64, f64)>,
}

fn polar(center: (f64, f64), radius: f64, angle_degrees: f64) -> (f64, f64) {
    let theta = angle_degrees * PI / 180.0;
    (center.0 + radius * theta.sin(), center.1 - radius * theta.cos())
}

/// Lays out one axis per category in display order and the closed score
/// polygon. `max_value` maps to the full `radius`.
pub fn radar_geometry(
    scores: &CategoryScores,
    max_value: u32,
    center: (f64, f64),
    radius: f64,
) -> Result<RadarGeometry> {
    let fail = |message: String| ScreenError::RenderError {
        chart: RADAR_CHART.to_string(),
        message,
    };
    if max_value == 0 {
        return Err(fail("radial scale maximum must be at least 1".to_string()));
    }

    let step = 360.0 / Category::DISPLAY_ORDER.len() as f64;
    let mut axes = Vec::with_capacity(Category::DISPLAY_ORDER.len());
    let mut vertices = Vec::with_capacity(Category::DISPLAY_ORDER.len() + 1);

    for (k, category) in Category::DISPLAY_ORDER.into_iter().enumerate() {
        let score = scores.get(category);
        if score > max_value {
            return Err(fail(format!(
                "{} subscore {} exceeds scale {}",
                category, score, max_value
            )));
        }
        let angle_degrees = k as f64 * step;
        let vertex = polar(center, radius * f64::from(score) / f64::from(max_value), angle_degrees);
        if !vertex.0.is_finite() || !vertex.1.is_finite() {
            return Err(fail(format!("non-finite vertex for {}", category)));
        }

        axes.push(RadarAxis {
            category,
            angle_degrees,
            end: polar(center, radius, angle_degrees),
        });
        vertices.push(vertex);
    }

    if let Some(&first) = vertices.first() {
        vertices.push(first);
    }

    Ok(RadarGeometry { axes, vertices })
}

const RADAR_PADDING: f64 = 110.0;

pub fn render_radar_chart(
    scores: &CategoryScores,
    layout: &ChartLayout,
    max_per_question: u32,
) -> Result<String> {
    let fail = |e: std::fmt::Error| ScreenError::RenderError {
        chart: RADAR_CHART.to_string(),
        message: e.to_string(),
    };

    let size = layout.radar_size;
    let center = (size / 2.0, size / 2.0 + 20.0);
    let radius = size / 2.0 - RADAR_PADDING;
    let geometry = radar_geometry(scores, max_category(max_per_question), center, radius)?;

    let mut grid = String::new();
    for ring in 1..=layout.radar_rings {
        let r = radius * f64::from(ring) / f64::from(layout.radar_rings);
        let ring_points: Vec<(f64, f64)> = geometry
            .axes
            .iter()
            .map(|axis| polar(center, r, axis.angle_degrees))
            .collect();
        writeln!(
            grid,
            r##"  <polygon points="{}" fill="none" stroke="{}" stroke-width="1"/>"##,
            points_attr(&ring_points),
            GRID
        )
        .map_err(fail)?;
    }

    let mut axes = String::new();
    for axis in &geometry.axes {
        let label_at = polar(center, radius + 18.0, axis.angle_degrees);
        let anchor = if axis.angle_degrees == 0.0 || axis.angle_degrees == 180.0 {
            "middle"
        } else if axis.angle_degrees < 180.0 {
            "start"
        } else {
            "end"
        };
        write!(
            axes,
            r##"  <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="1"/>
  <text x="{:.1}" y="{:.1}" text-anchor="{}" font-size="13" fill="{}">{}</text>
"##,
            center.0,
            center.1,
            axis.end.0,
            axis.end.1,
            GRID,
            label_at.0,
            label_at.1 + 4.0,
            anchor,
            TEXT,
            escape_xml(axis.category.label()),
        )
        .map_err(fail)?;
    }

    let outline = geometry
        .vertices
        .iter()
        .enumerate()
        .map(|(i, (x, y))| {
            let cmd = if i == 0 { "M" } else { "L" };
            format!("{}{:.1},{:.1}", cmd, x, y)
        })
        .collect::<Vec<_>>()
        .join(" ");

    let mut svg = String::new();
    write!(
        svg,
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{s:.0}" height="{h:.0}" viewBox="0 0 {s:.0} {h:.0}" style="background:white">
  <text x="{:.1}" y="32" text-anchor="middle" font-size="20" fill="blue">Radar Chart of Assessment Scores</text>
{}{}  <polygon points="{}" fill="{}" fill-opacity="0.5" stroke="none"/>
  <path d="{}" fill="none" stroke="{}" stroke-width="2"/>
</svg>
"##,
        center.0,
        grid,
        axes,
        points_attr(&geometry.vertices[..geometry.vertices.len().saturating_sub(1)]),
        RADAR_FILL,
        outline,
        RADAR_STROKE,
        s = size,
        h = size + 40.0,
    )
    .map_err(fail)?;

    Ok(svg)
}

fn points_attr(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{:.1},{:.1}", x, y))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn truncate_label(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}

pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregator::aggregate;

    fn scores(values: [u32; 5]) -> CategoryScores {
        CategoryScores {
            social: values[0],
            behavior: values[1],
            emotion: values[2],
            language: values[3],
            sense: values[4],
        }
    }

    fn close(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn test_radar_has_five_axes_and_closed_polygon() {
        let geometry = radar_geometry(&scores([4, 8, 12, 16, 20]), 20, (0.0, 0.0), 100.0).unwrap();

        assert_eq!(geometry.axes.len(), 5);
        assert_eq!(geometry.vertices.len(), 6);
        assert_eq!(geometry.vertices.first(), geometry.vertices.last());

        let angles: Vec<f64> = geometry.axes.iter().map(|a| a.angle_degrees).collect();
        assert_eq!(angles, vec![0.0, 72.0, 144.0, 216.0, 288.0]);
    }

    #[test]
    fn test_radar_axes_follow_display_order() {
        let geometry = radar_geometry(&scores([0; 5]), 20, (0.0, 0.0), 1.0).unwrap();
        let order: Vec<Category> = geometry.axes.iter().map(|a| a.category).collect();
        assert_eq!(
            order,
            vec![
                Category::Social,
                Category::Behavior,
                Category::Language,
                Category::Sense,
                Category::Emotion,
            ]
        );
    }

    #[test]
    fn test_radar_first_axis_points_up_and_runs_clockwise() {
        // social full, behavior full: first vertex straight up, second to the right
        let geometry = radar_geometry(&scores([20, 20, 0, 0, 0]), 20, (50.0, 50.0), 10.0).unwrap();

        assert!(close(geometry.vertices[0], (50.0, 40.0)));
        assert!(geometry.vertices[1].0 > 50.0);
        assert!(geometry.vertices[1].1 < 50.0);
        // zero scores collapse onto the center
        assert!(close(geometry.vertices[2], (50.0, 50.0)));
    }

    #[test]
    fn test_radar_rejects_scores_beyond_scale() {
        let err = radar_geometry(&scores([21, 0, 0, 0, 0]), 20, (0.0, 0.0), 1.0).unwrap_err();
        assert!(matches!(err, ScreenError::RenderError { .. }));
    }

    #[test]
    fn test_bar_chart_has_one_bar_per_question() {
        let responses = ResponseSet::from_values(&[3; 20], 5).unwrap();
        let svg = render_bar_chart(&responses, &ChartLayout::default(), 5).unwrap();

        assert_eq!(svg.matches("<rect ").count(), 20);
        assert!(svg.contains("Scores for Each Question"));
        assert!(svg.contains("Child avoids eye contact"));
        // the full prompt survives in the tooltip, parentheses included
        assert!(svg.contains(
            "<title>Repetitive behaviors (rocking, spinning, hand-flapping): 3</title>"
        ));
    }

    #[test]
    fn test_bar_chart_height_follows_row_height() {
        let responses = ResponseSet::from_values(&[0; 20], 5).unwrap();
        let layout = ChartLayout {
            row_height: 10.0,
            ..ChartLayout::default()
        };
        let svg = render_bar_chart(&responses, &layout, 5).unwrap();
        // 50 top + 20 * 10 rows + 60 bottom
        assert!(svg.contains(r#"height="310""#));
    }

    #[test]
    fn test_render_produces_both_artifacts() {
        let responses =
            ResponseSet::from_values(&[5, 5, 5, 5, 5, 5, 5, 5, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0], 5)
                .unwrap();
        let result = aggregate(&responses);
        let renderer = SvgRenderer::new(ChartLayout::default(), 5);

        let charts = renderer.render(&responses, &result.category_scores).unwrap();
        let radar = String::from_utf8(charts.radar).unwrap();

        assert!(String::from_utf8(charts.bar).unwrap().starts_with("<svg"));
        assert!(radar.contains("Radar Chart of Assessment Scores"));
        for category in Category::ALL {
            assert!(radar.contains(&escape_xml(category.label())));
        }
        assert!(radar.contains("Social &amp; Communication"));
        assert!(!radar.contains("Social & Communication"));
    }

    #[test]
    fn test_invalid_layout_is_render_error() {
        let responses = ResponseSet::from_values(&[1; 20], 5).unwrap();
        let layout = ChartLayout {
            label_width: 990.0,
            ..ChartLayout::default()
        };
        let renderer = SvgRenderer::new(layout, 5);
        let err = renderer
            .render(&responses, &aggregate(&responses).category_scores)
            .unwrap_err();
        assert!(matches!(err, ScreenError::RenderError { .. }));
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("short", 10), "short");
        assert_eq!(truncate_label("Shows intolerance to certain", 10), "Shows int…");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("Social & Communication"), "Social &amp; Communication");
        assert_eq!(escape_xml("<a>"), "&lt;a&gt;");
    }
}
