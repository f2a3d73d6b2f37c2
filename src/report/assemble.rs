use crate::core::model::{BUSCO_TOTAL, BuscoSummary, CategoryCount, StatSummary, ValueScale};
use crate::core::stage::{stage, stage_done, stats_enabled};
use crate::core::{busco, gff, io, omark};
use crate::report::chart::{BarChart, Page, TablePage};
use crate::report::pdf::{self, RenderContext};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

pub struct ReportConfig {
    pub gff: PathBuf,
    pub busco: PathBuf,
    pub omark: PathBuf,
    pub output: PathBuf,
}

/// Parses the three inputs and writes the PDF report. Nothing is written
/// unless every parse succeeds.
pub fn assemble(cfg: &ReportConfig) -> Result<()> {
    let stats = stats_enabled();
    let t0 = Instant::now();

    info!("Validating input files...");
    info!("GFF file path: {}", cfg.gff.display());
    info!("BUSCO stats path: {}", cfg.busco.display());
    info!("OMArk stats path: {}", cfg.omark.display());
    info!("Output PDF path: {}", cfg.output.display());
    stage(stats, "preflight", || {
        io::check_file_exists(&cfg.gff)?;
        io::check_file_exists(&cfg.busco)?;
        io::check_file_exists(&cfg.omark)?;
        io::ensure_output_dir(&cfg.output)?;
        Ok(())
    })?;

    info!("Reading GFF and counting feature types...");
    let features = stage(stats, "gff", || {
        gff::count_feature_types(&cfg.gff)
            .with_context(|| format!("failed to read {}", cfg.gff.display()))
    })?;
    debug!(types = features.len(), lines = features.total(), "feature types counted");

    info!("Parsing BUSCO stats...");
    let busco_summary = stage(stats, "busco", || {
        busco::parse_busco_summary(&cfg.busco)
            .with_context(|| format!("failed to read {}", cfg.busco.display()))
    })?;

    info!("Parsing OMArk stats...");
    let omark_summary = stage(stats, "omark", || {
        omark::parse_omark_summary(&cfg.omark)
            .with_context(|| format!("failed to read {}", cfg.omark.display()))
    })?;

    info!("Building PDF...");
    let t_pdf = Instant::now();
    let pages = build_pages(&features, &busco_summary, &omark_summary);
    let ctx = RenderContext::init();
    let svgs = pages
        .iter()
        .map(|p| p.to_svg().with_context(|| format!("failed to draw '{}'", p.title())))
        .collect::<Result<Vec<_>>>()?;
    let bytes = pdf::render_document(&ctx, &svgs)?;
    io::write_atomic(&cfg.output, &bytes)
        .with_context(|| format!("failed to write {}", cfg.output.display()))?;
    stage_done(stats, "pdf", t_pdf);

    info!("PDF successfully saved to {}", cfg.output.display());
    stage_done(stats, "total", t0);
    Ok(())
}

/// Feature page, BUSCO chart and details, OMArk chart and details.
pub fn build_pages(
    features: &CategoryCount,
    busco_summary: &BuscoSummary,
    omark_summary: &StatSummary,
) -> Vec<Page> {
    let mut pages = Vec::with_capacity(5);
    pages.push(feature_page(features));
    pages.extend(busco_pages(busco_summary));
    pages.extend(omark_pages(omark_summary));
    pages
}

const FEATURE_TITLE: &str = "Feature Distribution in GFF File";

fn feature_page(features: &CategoryCount) -> Page {
    if features.is_empty() {
        return Page::Table(TablePage {
            title: FEATURE_TITLE.to_string(),
            rows: vec![("Info".to_string(), "No features found".to_string())],
            note: None,
        });
    }
    Page::Bars(BarChart {
        title: FEATURE_TITLE.to_string(),
        x_label: "Feature Type".to_string(),
        y_label: "Count".to_string(),
        bars: features
            .iter()
            .map(|(k, v)| (k.to_string(), v as f64))
            .collect(),
        rotate_labels: true,
    })
}

fn busco_pages(summary: &BuscoSummary) -> [Page; 2] {
    let chart = Page::Bars(BarChart {
        title: "BUSCO Summary".to_string(),
        x_label: "Category".to_string(),
        y_label: ValueScale::Percent.axis_label().to_string(),
        bars: summary
            .percentages()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
        rotate_labels: false,
    });
    let rows = summary
        .to_stat_summary()
        .iter()
        .map(|(k, v)| {
            let shown = if k == BUSCO_TOTAL {
                format!("{}", v as i64)
            } else {
                format!("{:.2}%", v)
            };
            (k.to_string(), shown)
        })
        .collect();
    let details = Page::Table(TablePage {
        title: "BUSCO Details".to_string(),
        rows,
        note: Some("Values shown are percentages except for (n).".to_string()),
    });
    [chart, details]
}

fn omark_pages(summary: &StatSummary) -> [Page; 2] {
    let scale = summary.value_scale();
    let keys = omark::display_order(summary);
    let values: Vec<f64> = keys
        .iter()
        .map(|k| summary.get(k).unwrap_or(f64::NAN))
        .collect();

    let chart = Page::Bars(BarChart {
        title: "OMArk Summary".to_string(),
        x_label: "Category".to_string(),
        y_label: scale.axis_label().to_string(),
        bars: keys
            .iter()
            .zip(&values)
            .map(|(k, v)| (title_case(k), *v))
            .collect(),
        rotate_labels: false,
    });
    let rows = keys
        .iter()
        .zip(&values)
        .map(|(k, v)| (k.to_string(), format_omark_value(*v, scale)))
        .collect();
    let details = Page::Table(TablePage {
        title: "OMArk Details".to_string(),
        rows,
        note: Some(
            "Values interpreted as percentages if they all fit in 0\u{2013}100.".to_string(),
        ),
    });
    [chart, details]
}

fn format_omark_value(v: f64, scale: ValueScale) -> String {
    if v.is_nan() {
        return match scale {
            ValueScale::Percent => "nan%".to_string(),
            ValueScale::Count => "nan".to_string(),
        };
    }
    match scale {
        ValueScale::Percent => format!("{:.2}%", v),
        ValueScale::Count if v.is_finite() && v.fract() == 0.0 => format!("{}", v as i64),
        ValueScale::Count => format!("{}", v),
    }
}

/// Upper-cases the first letter of every run of letters.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}
