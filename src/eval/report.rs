//! Benchmark report output: console summary, JSON file and an SVG bar chart.

use crate::error::{RecommenderError, Result};
use crate::eval::evaluator::{EvaluationReport, QueryMetrics};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

pub const REPORT_JSON: &str = "benchmark_results.json";
pub const REPORT_SVG: &str = "benchmark_results.svg";

const SERIES: [(&str, &str); 5] = [
    ("precision@k", "#4e79a7"),
    ("ndcg@k", "#f28e2b"),
    ("mrr", "#e15759"),
    ("diversity (test types)", "#76b7b2"),
    ("diversity (job levels)", "#59a14f"),
];

fn series_values(m: &QueryMetrics) -> [f64; 5] {
    [m.precision_at_k, m.ndcg_at_k, m.mrr, m.diversity, m.job_level_diversity]
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(max.saturating_sub(3)).collect();
        out.push_str("...");
        out
    }
}

fn render_bar(value: f64, width: usize) -> String {
    let filled = ((value.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Human-readable summary for the terminal.
pub fn render_summary(report: &EvaluationReport) -> String {
    let k = report.k;
    let mut out = String::new();

    let _ = writeln!(out, "=== SHL Recommender Benchmark (K = {k}) ===");
    let _ = writeln!(
        out,
        "Queries evaluated: {}  skipped: {}  generated: {} UTC",
        report.evaluated, report.skipped, report.generated_at
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<40} {:>7} {:>7} {:>7} {:>7} {:>7}",
        "query", "P@K", "NDCG@K", "MRR", "DivTT", "DivJL"
    );
    for m in &report.per_query {
        let _ = writeln!(
            out,
            "{:<40} {:>7.3} {:>7.3} {:>7.3} {:>7.3} {:>7.3}",
            truncate(&m.query, 40),
            m.precision_at_k,
            m.ndcg_at_k,
            m.mrr,
            m.diversity,
            m.job_level_diversity
        );
    }

    let agg = &report.aggregate;
    let _ = writeln!(out);
    let _ = writeln!(out, "=== Averages ===");
    for (label, value) in [
        (format!("Precision@{k}"), agg.precision_at_k),
        (format!("NDCG@{k}"), agg.ndcg_at_k),
        ("MRR".to_string(), agg.mrr),
        ("Diversity (test types)".to_string(), agg.diversity),
        ("Diversity (job levels)".to_string(), agg.job_level_diversity),
    ] {
        let _ = writeln!(out, "{:<24} {:.3}  {}", label, value, render_bar(value, 30));
    }
    out
}

/// Write the report as pretty JSON into `dir`.
pub fn write_json(report: &EvaluationReport, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(REPORT_JSON);
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(&path, json)?;
    Ok(path)
}

/// Grouped bar chart: one group per query, one bar per metric, y axis in [0, 1].
pub fn render_svg(report: &EvaluationReport) -> Result<String> {
    if report.per_query.is_empty() {
        return Err(RecommenderError::Report(
            "no evaluated queries to plot".to_string(),
        ));
    }

    const HEIGHT: f64 = 480.0;
    const MARGIN_LEFT: f64 = 60.0;
    const MARGIN_TOP: f64 = 50.0;
    const PLOT_HEIGHT: f64 = 300.0;
    const BAR_WIDTH: f64 = 14.0;
    const GROUP_GAP: f64 = 30.0;

    let group_width = BAR_WIDTH * SERIES.len() as f64 + GROUP_GAP;
    let plot_width = group_width * report.per_query.len() as f64;
    let width = (MARGIN_LEFT + plot_width + 220.0).max(640.0);
    let baseline = MARGIN_TOP + PLOT_HEIGHT;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width:.0}" height="{HEIGHT:.0}" font-family="sans-serif" font-size="11">"#
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="25" font-size="15" text-anchor="middle">SHL Recommender Benchmark Performance by Query (K = {})</text>"#,
        width / 2.0,
        report.k
    );

    // Y axis with gridlines at 0.2 steps
    for step in 0..=5 {
        let value = step as f64 * 0.2;
        let y = baseline - value * PLOT_HEIGHT;
        let _ = writeln!(
            svg,
            r##"<line x1="{MARGIN_LEFT}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#dddddd"/>"##,
            MARGIN_LEFT + plot_width
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end">{value:.1}</text>"#,
            MARGIN_LEFT - 6.0,
            y + 4.0
        );
    }
    let _ = writeln!(
        svg,
        r#"<text x="15" y="{:.1}" transform="rotate(-90 15 {:.1})" text-anchor="middle">Score</text>"#,
        MARGIN_TOP + PLOT_HEIGHT / 2.0,
        MARGIN_TOP + PLOT_HEIGHT / 2.0
    );

    for (group, metrics) in report.per_query.iter().enumerate() {
        let group_x = MARGIN_LEFT + group as f64 * group_width + GROUP_GAP / 2.0;
        for (series, value) in series_values(metrics).iter().enumerate() {
            let bar_height = value.clamp(0.0, 1.0) * PLOT_HEIGHT;
            let _ = writeln!(
                svg,
                r#"<rect x="{:.1}" y="{:.1}" width="{BAR_WIDTH}" height="{:.1}" fill="{}"><title>{}: {:.3}</title></rect>"#,
                group_x + series as f64 * BAR_WIDTH,
                baseline - bar_height,
                bar_height,
                SERIES[series].1,
                SERIES[series].0,
                value
            );
        }
        let label_x = group_x + BAR_WIDTH * SERIES.len() as f64 / 2.0;
        let _ = writeln!(
            svg,
            r#"<text x="{label_x:.1}" y="{:.1}" text-anchor="end" transform="rotate(-35 {label_x:.1} {:.1})">{}</text>"#,
            baseline + 14.0,
            baseline + 14.0,
            escape_xml(&truncate(&metrics.query, 30))
        );
    }

    let _ = writeln!(
        svg,
        r#"<line x1="{MARGIN_LEFT}" y1="{baseline:.1}" x2="{:.1}" y2="{baseline:.1}" stroke="black"/>"#,
        MARGIN_LEFT + plot_width
    );

    let legend_x = MARGIN_LEFT + plot_width + 20.0;
    for (idx, (name, color)) in SERIES.iter().enumerate() {
        let y = MARGIN_TOP + idx as f64 * 18.0;
        let _ = writeln!(
            svg,
            r#"<rect x="{legend_x:.1}" y="{y:.1}" width="12" height="12" fill="{color}"/><text x="{:.1}" y="{:.1}">{name}</text>"#,
            legend_x + 18.0,
            y + 10.0
        );
    }

    svg.push_str("</svg>\n");
    Ok(svg)
}

/// Write the SVG chart into `dir`.
pub fn write_svg(report: &EvaluationReport, dir: &Path) -> Result<PathBuf> {
    let svg = render_svg(report)?;
    std::fs::create_dir_all(dir)?;
    let path = dir.join(REPORT_SVG);
    std::fs::write(&path, svg)?;
    Ok(path)
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
