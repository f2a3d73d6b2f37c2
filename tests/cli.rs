//! End-to-end runs of the `asmqc-report` and `busco-plot` binaries.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const GFF: &str = "##gff-version 3
chr1\tsrc\tgene\t1\t100\t.\t+\t.\tID=g1
chr1\tsrc\tmRNA\t1\t100\t.\t+\t.\tID=t1;Parent=g1
chr1\tsrc\texon\t1\t100\t.\t+\t.\tParent=t1
";

const BUSCO: &str = "# BUSCO version is: 5.4.3
\tC:95.3%[S:93.1%,D:2.2%],F:2.6%,M:2.1%,n:255
";

const OMARK: &str = "complete: 80\nmissing: 5\n";

const TABLE: &str = "organism,version,group,dataset_name,single copy,multi copy,fragmented,missing,one_line_summary
yeast,v1,fungi,fungi_odb10,90.5,2.0,3.5,4.0,\"C:92.5%[S:90.5%,D:2.0%],F:3.5%,M:4.0%,n:758\"
yeast,v2,fungi,fungi_odb10,91.0,1.0,4.0,4.0,\"C:92.0%[S:91.0%,D:1.0%],F:4.0%,M:4.0%,n:758\"
";

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn inputs(gff: &str, busco: &str, omark: &str) -> (TempDir, [PathBuf; 3]) {
    let dir = TempDir::new().unwrap();
    let paths = [
        write(dir.path(), "genes.gff3", gff),
        write(dir.path(), "short_summary.txt", busco),
        write(dir.path(), "omark.sum", omark),
    ];
    (dir, paths)
}

fn report_cmd() -> Command {
    Command::cargo_bin("asmqc-report").unwrap()
}

#[test]
fn writes_pdf_report() {
    let (dir, [gff, busco, omark]) = inputs(GFF, BUSCO, OMARK);
    let out = dir.path().join("results/report.pdf");

    report_cmd()
        .args([&gff, &busco, &omark, &out])
        .assert()
        .success()
        .stderr(predicate::str::contains("PDF successfully saved"));

    let bytes = fs::read(&out).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    assert!(String::from_utf8_lossy(&bytes).contains("/Count 5"));
}

#[test]
fn empty_annotation_still_renders() {
    let (dir, [gff, busco, omark]) = inputs("# nothing\n", BUSCO, OMARK);
    let out = dir.path().join("report.pdf");

    report_cmd()
        .args([&gff, &busco, &omark, &out])
        .assert()
        .success();
    assert!(out.is_file());
}

#[test]
fn wrong_arity_prints_usage() {
    report_cmd()
        .args(["a.gff", "b.txt"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_exits_zero() {
    report_cmd().arg("--help").assert().success();
}

#[test]
fn missing_input_fails() {
    let (dir, [gff, busco, _]) = inputs(GFF, BUSCO, OMARK);
    let out = dir.path().join("report.pdf");

    report_cmd()
        .args([&gff, &busco, &dir.path().join("absent.txt"), &out])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("file not found"));
    assert!(!out.exists());
}

#[test]
fn malformed_annotation_names_line_and_writes_nothing() {
    let bad = "##gff-version 3\nchr1\tsrc\tgene\t1\t100\t.\t+\t.\tID=g1\nchr1\tsrc\texon\n";
    let (dir, [gff, busco, omark]) = inputs(bad, BUSCO, OMARK);
    let out = dir.path().join("report.pdf");

    report_cmd()
        .args([&gff, &busco, &omark, &out])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("line 3").and(predicate::str::contains("got 3")));
    assert!(!out.exists());
}

#[test]
fn unparseable_summary_fails() {
    let (dir, [gff, busco, omark]) = inputs(GFF, BUSCO, "hello world\n");
    let out = dir.path().join("report.pdf");

    report_cmd()
        .args([&gff, &busco, &omark, &out])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not parse OMArk stats"));
    assert!(!out.exists());
}

#[test]
fn existing_report_survives_failed_run() {
    let (dir, [gff, _, omark]) = inputs(GFF, BUSCO, OMARK);
    let busco = write(dir.path(), "bad_busco.txt", "no numbers here\n");
    let out = write(dir.path(), "report.pdf", "previous");

    report_cmd()
        .args([&gff, &busco, &omark, &out])
        .assert()
        .code(1);
    assert_eq!(fs::read_to_string(&out).unwrap(), "previous");
}

#[test]
fn busco_plot_writes_png() {
    let dir = TempDir::new().unwrap();
    let table = write(dir.path(), "busco.csv", TABLE);
    let out = dir.path().join("plots/busco.png");

    Command::cargo_bin("busco-plot")
        .unwrap()
        .args([&table, &out])
        .assert()
        .success();

    let bytes = fs::read(&out).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn busco_plot_names_missing_column() {
    let dir = TempDir::new().unwrap();
    let table = write(
        dir.path(),
        "busco.tsv",
        "organism\tversion\tgroup\tdataset_name\tsingle copy\tmulti copy\tfragmented\tone_line_summary\n",
    );
    let out = dir.path().join("busco.png");

    Command::cargo_bin("busco-plot")
        .unwrap()
        .args([&table, &out])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing column: missing"));
    assert!(!out.exists());
}

#[test]
fn busco_plot_wrong_arity() {
    Command::cargo_bin("busco-plot")
        .unwrap()
        .arg("only-one.csv")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"));
}
