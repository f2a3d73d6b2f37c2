pub mod assemble;
pub mod busco_plot;
pub mod chart;
pub mod pdf;
pub mod png;
