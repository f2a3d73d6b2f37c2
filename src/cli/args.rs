use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "asmqc-report",
    version,
    about = "PDF report of GFF feature types, BUSCO and OMArk summaries"
)]
pub struct ReportArgs {
    /// GFF/GTF annotation file (may be gzip-compressed)
    pub gff_file: PathBuf,

    /// BUSCO short summary
    pub busco_stats_file: PathBuf,

    /// OMArk summary (key:value lines, CSV or TSV)
    pub omark_stats_file: PathBuf,

    pub output_pdf: PathBuf,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Parser)]
#[command(
    name = "busco-plot",
    version,
    about = "Completeness bar plot (PNG) from a BUSCO results table"
)]
pub struct PlotArgs {
    /// CSV/TSV with organism, version, group, dataset_name, single copy,
    /// multi copy, fragmented, missing and one_line_summary columns
    pub busco_table_file: PathBuf,

    pub output_image_path: PathBuf,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
