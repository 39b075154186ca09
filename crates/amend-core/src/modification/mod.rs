//! Correction orchestration

mod context;
mod modifier;
mod value_corrector;

pub use context::{CorrectionMode, ModificationContext};
pub use modifier::BeanModifier;
pub use value_corrector::ValueCorrector;
