pub mod busco;
pub mod busco_table;
pub mod error;
pub mod gff;
pub mod io;
pub mod model;
pub mod omark;
pub mod stage;
