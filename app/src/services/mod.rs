//! Conversion and output services.

pub mod convert;
pub mod output;

pub use convert::{Conversion, PageReport, Report, convert};
pub use output::{FileWriter, InputKind, PrintSubmitter, output_path};
