//! # asmqc-report
//!
//! Builds an assembly QC report from three inputs:
//!
//! - a GFF/GTF-like annotation, summarised as feature-type counts
//! - a BUSCO short summary (compact `C:..%[S:..%,D:..%],F:..%,M:..%,n:..`
//!   line or verbose one-category-per-line layout)
//! - an OMArk summary of loosely defined layout (key:value lines, CSV/TSV,
//!   or free text)
//!
//! The parsers in [`core`] turn each input into counts or a metric map; the
//! [`report`] modules draw the pages as SVG and write a multi-page PDF. A
//! second tool draws a BUSCO completeness bar plot as PNG from a results
//! table.
//!
//! ```rust,no_run
//! use asmqc_report::core::busco::parse_busco_text;
//!
//! let summary = parse_busco_text("C:95.3%[S:93.1%,D:2.2%],F:2.6%,M:2.1%,n:255").unwrap();
//! assert_eq!(summary.total_count, 255.0);
//! ```

pub mod cli;
pub mod core;
pub mod report;
