pub mod config;
pub mod conversion;
pub mod entry;
pub mod row;
pub mod runbook;
pub mod severity;
pub mod trigger;

pub use config::{Config, ConversionConfig, RbaConfig};
pub use conversion::ClassConversion;
pub use entry::{Entry, EntryPartition};
pub use row::{Row, columns};
pub use runbook::{Runbook, Step, StepType};
pub use severity::{SeverityLevel, SeverityTable};
pub use trigger::{ParameterMapping, Trigger, TriggerFilter};
