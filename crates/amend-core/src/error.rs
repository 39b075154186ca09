//! Error types for the correction engine
//!
//! Provides error handling for:
//! - Metadata inspection of schema types
//! - Group sequence resolution
//! - Graph traversal
//! - Applier dispatch and invocation
//! - Orchestration, carrying partial results

use amend_api::{AnnotationType, AppliedCorrection, CorrectionError, GroupId, MapKey, TypeName};
use std::fmt::{self, Display, Formatter};

/// Where a piece of metadata was declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigurationSource {
    /// Statically declared schema
    Schema,
}

impl Display for ConfigurationSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema => f.write_str("schema"),
        }
    }
}

/// Metadata could not be built for a type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InspectionError {
    /// Type is not declared in the schema
    #[error("type '{type_name}' is not declared ({origin})")]
    UnknownType {
        type_name: TypeName,
        origin: ConfigurationSource,
    },

    /// Supertype chain loops back on itself
    #[error("failed to process class hierarchy due to circular inheritance: {type_name} ({origin})")]
    CircularInheritance {
        type_name: TypeName,
        origin: ConfigurationSource,
    },

    /// Default enum literal refers to an undeclared enum or variant
    #[error("invalid enum default {enum_type}::{variant} on {owner}.{property} ({origin})")]
    InvalidEnumDefault {
        owner: TypeName,
        property: String,
        enum_type: TypeName,
        variant: String,
        origin: ConfigurationSource,
    },
}

impl InspectionError {
    /// Source the failing metadata was declared in
    #[must_use]
    pub fn origin(&self) -> ConfigurationSource {
        match self {
            Self::UnknownType { origin, .. }
            | Self::CircularInheritance { origin, .. }
            | Self::InvalidEnumDefault { origin, .. } => *origin,
        }
    }
}

/// Invalid group configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GroupSequenceError {
    /// Group id has no declaration
    #[error("unknown group: {0}")]
    UnknownGroup(GroupId),

    /// Group is a concrete type rather than a marker
    #[error("only marker types can be used as groups. Invalid: {0}")]
    NotAMarker(GroupId),

    /// Group is reachable from itself
    #[error("cyclic group dependency detected involving: {0}")]
    Cycle(GroupId),

    /// A sequence member declares a sequence of its own
    #[error("nested group sequence detected: {sequence} contains {member}, which is also a sequence")]
    NestedSequence { sequence: GroupId, member: GroupId },
}

/// Read or write of a property or container element failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// Property has neither getter nor field
    #[error("property '{property}' on {owner} is not readable")]
    NotReadable { owner: TypeName, property: String },

    /// Container is null
    #[error("container '{property}' is null")]
    MissingContainer { property: String },

    /// Value or index does not fit the container kind
    #[error("expected {expected} but found {actual}")]
    KindMismatch { expected: String, actual: String },

    /// Position past the end of a list or array
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Key not present in a map
    #[error("key '{0}' not present in map")]
    MissingKey(MapKey),
}

/// Walk over an object graph failed
#[derive(Debug, thiserror::Error)]
#[error("{message}: {source}")]
pub struct TraversalError {
    /// Description naming the root type
    pub message: String,
    /// Underlying failure
    #[source]
    pub source: Box<CorrectorError>,
}

impl TraversalError {
    /// Wrap a failure raised while walking from `root_type`
    #[must_use]
    pub fn new(root_type: &str, source: CorrectorError) -> Self {
        Self {
            message: format!("error during bean traversal {root_type}"),
            source: Box::new(source),
        }
    }
}

/// Orchestration failed; carries the corrections applied before the failure
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ModificationError {
    /// Failure description
    pub message: String,
    /// Underlying failure
    #[source]
    pub source: Option<Box<CorrectorError>>,
    /// Corrections already applied, across all passes so far
    pub applied_corrections: Vec<AppliedCorrection>,
}

impl ModificationError {
    /// Convert a failed pass into a modification error
    #[must_use]
    pub fn from_traversal(error: TraversalError, applied_corrections: Vec<AppliedCorrection>) -> Self {
        Self {
            message: format!("{}: {}", error.message, error.source),
            source: Some(error.source),
            applied_corrections,
        }
    }
}

/// Main engine error type
#[derive(Debug, thiserror::Error)]
pub enum CorrectorError {
    /// Applier lookup, instantiation or invocation failed
    #[error("failed to apply correction '{annotation}': {source}")]
    Correction {
        annotation: AnnotationType,
        #[source]
        source: CorrectionError,
    },

    /// Metadata inspection failed
    #[error("inspection failed: {0}")]
    Inspection(#[from] InspectionError),

    /// Invalid group configuration
    #[error("group sequence error: {0}")]
    GroupSequence(#[from] GroupSequenceError),

    /// Graph walk failed
    #[error("traversal failed: {0}")]
    Traversal(#[from] TraversalError),

    /// Orchestration failed with partial progress
    #[error("modification failed: {0}")]
    Modification(#[from] ModificationError),

    /// Property or container access failed
    #[error("access failed: {0}")]
    Access(#[from] AccessError),

    /// Traversal went deeper than the configured limit
    #[error("maximum traversal depth {0} exceeded")]
    DepthExceeded(usize),
}

impl CorrectorError {
    /// Wrap an applier failure with the correction it ran for
    #[must_use]
    pub fn correction(annotation: AnnotationType, source: CorrectionError) -> Self {
        Self::Correction { annotation, source }
    }

    /// Corrections applied before the failure
    ///
    /// Only modification errors carry partial progress; everything else
    /// failed before any correction ran.
    #[must_use]
    pub fn applied_corrections(&self) -> &[AppliedCorrection] {
        match self {
            Self::Modification(e) => &e.applied_corrections,
            _ => &[],
        }
    }

    /// Innermost engine error, unwrapping traversal and modification layers
    #[must_use]
    pub fn root_cause(&self) -> &CorrectorError {
        match self {
            Self::Traversal(e) => e.source.root_cause(),
            Self::Modification(ModificationError {
                source: Some(source),
                ..
            }) => source.root_cause(),
            _ => self,
        }
    }
}

/// Result alias for engine operations
pub type Result<T> = std::result::Result<T, CorrectorError>;
