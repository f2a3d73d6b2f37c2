fn main() -> anyhow::Result<()> {
    asmqc_report::cli::run::plot_entry()
}
