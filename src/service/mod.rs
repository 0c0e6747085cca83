pub mod class;
pub mod conversion;
pub mod import;
pub mod rba;
pub mod severity;
pub mod steps;
pub mod transform;
pub mod trigger;
pub mod workbook;

pub use conversion::{ConversionClient, ConversionSource, UnconfiguredConversions};
pub use import::{ImportError, ImportService};
pub use rba::{RbaClient, RunbookSink, UnconfiguredSink};
pub use severity::SeverityResolver;
pub use transform::RowTransformer;
pub use workbook::WorkbookParser;
