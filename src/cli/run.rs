use crate::cli::args::{PlotArgs, ReportArgs};
use crate::report::assemble::{self, ReportConfig};
use crate::report::busco_plot::{self, PlotConfig};
use anyhow::Result;
use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

pub fn report_entry() -> Result<()> {
    let args: ReportArgs = parse_or_exit();
    init_logging(args.verbose);
    let config = ReportConfig {
        gff: args.gff_file,
        busco: args.busco_stats_file,
        omark: args.omark_stats_file,
        output: args.output_pdf,
    };
    assemble::assemble(&config)
}

pub fn plot_entry() -> Result<()> {
    let args: PlotArgs = parse_or_exit();
    init_logging(args.verbose);
    let config = PlotConfig {
        table: args.busco_table_file,
        output: args.output_image_path,
    };
    busco_plot::run(&config)
}

/// Usage errors exit with status 1; `--help` and `--version` with 0.
fn parse_or_exit<P: Parser>() -> P {
    match P::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "asmqc_report=debug,info"
    } else {
        "asmqc_report=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
