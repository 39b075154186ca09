//! Correction appliers and their dispatch

pub mod builtin;
mod registry;

pub use registry::CorrectionApplierRegistry;
