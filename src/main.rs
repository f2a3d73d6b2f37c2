fn main() -> anyhow::Result<()> {
    asmqc_report::cli::run::report_entry()
}
