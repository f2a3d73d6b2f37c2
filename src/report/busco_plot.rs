use crate::core::model::BuscoTableRow;
use crate::core::stage::{stage, stats_enabled};
use crate::core::{busco_table, io};
use crate::report::{chart, png};
use anyhow::{Context, Result, bail};
use std::path::PathBuf;
use tracing::info;

/// Pixels per SVG unit in the written image.
pub const RASTER_SCALE: f32 = 2.0;

pub struct PlotConfig {
    pub table: PathBuf,
    pub output: PathBuf,
}

pub fn run(cfg: &PlotConfig) -> Result<()> {
    let stats = stats_enabled();

    stage(stats, "preflight", || {
        io::check_file_exists(&cfg.table)?;
        io::ensure_output_dir(&cfg.output)?;
        Ok(())
    })?;

    info!("Reading BUSCO table {}", cfg.table.display());
    let rows = stage(stats, "table", || {
        busco_table::read_table(&cfg.table)
            .with_context(|| format!("failed to read {}", cfg.table.display()))
    })?;

    let image = stage(stats, "render", || {
        let svg = completeness_plot_svg(&rows)?;
        png::render_png(&svg, RASTER_SCALE)
    })?;
    io::write_atomic(&cfg.output, &image)
        .with_context(|| format!("failed to write {}", cfg.output.display()))?;

    info!("Image saved to {}", cfg.output.display());
    Ok(())
}

/// Orders rows by first appearance of their organism and draws one bar per
/// row, labelled `<organism>_<version>`. Title fields come from the first
/// row.
pub fn completeness_plot_svg(rows: &[BuscoTableRow]) -> Result<String> {
    let Some(first) = rows.first() else {
        bail!("BUSCO table has no rows");
    };
    let ordered = group_by_organism(rows);
    let species: Vec<String> = ordered
        .iter()
        .map(|r| format!("{}_{}", r.organism, r.version))
        .collect();
    let title = format!(
        "{} {} - Barplot of completeness of assembly",
        first.dataset_name, first.group
    );
    chart::completeness_svg(&title, &species, &ordered)
}

fn group_by_organism(rows: &[BuscoTableRow]) -> Vec<&BuscoTableRow> {
    let mut organisms: Vec<&str> = Vec::new();
    for row in rows {
        if !organisms.contains(&row.organism.as_str()) {
            organisms.push(&row.organism);
        }
    }
    organisms
        .iter()
        .flat_map(|org| rows.iter().filter(move |r| r.organism == *org))
        .collect()
}
