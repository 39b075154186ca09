//! Corrector facade
//!
//! Wires the metadata cache, applier registry, group generator, traverser
//! and modifier around one schema:
//! - [`Corrector::correct`] applies every group-applicable correction
//! - [`Corrector::correct_violations`] applies only corrections whose
//!   constraint filter matches a violation at the same path

use crate::config::CorrectorConfig;
use crate::correction::CorrectionApplierRegistry;
use crate::error::CorrectorError;
use crate::group::GroupSequenceGenerator;
use crate::metadata::{MetadataCache, SchemaInspector};
use crate::modification::{BeanModifier, CorrectionMode, ValueCorrector};
use crate::traversal::BeanTraverser;
use amend_api::{AnnotationType, AppliedCorrection, ApplierDeclaration, GroupId, Schema, Value, Violation};
use std::sync::Arc;

/// Entry point of the correction engine
///
/// `Send + Sync`: one instance may correct distinct graphs from several
/// threads at once. Correcting the same graph concurrently is not
/// supported.
#[derive(Debug)]
pub struct Corrector {
    config: CorrectorConfig,
    metadata: Arc<MetadataCache>,
    registry: Arc<CorrectionApplierRegistry>,
    modifier: BeanModifier,
}

impl Corrector {
    /// Corrector over `schema` with default configuration
    #[must_use]
    pub fn new(schema: impl Into<Arc<Schema>>) -> Self {
        Self::builder(schema).build()
    }

    /// Start building a corrector over `schema`
    #[must_use]
    pub fn builder(schema: impl Into<Arc<Schema>>) -> CorrectorBuilder {
        CorrectorBuilder {
            schema: schema.into(),
            config: CorrectorConfig::default(),
            appliers: Vec::new(),
        }
    }

    /// Apply corrections for `groups` to the graph rooted at `bean`
    ///
    /// An empty `groups` slice runs the default group.
    ///
    /// # Errors
    /// Returns [`CorrectorError::GroupSequence`] for invalid groups, or
    /// [`CorrectorError::Modification`] carrying partial results if a pass
    /// fails.
    pub fn correct(&self, bean: &Value, groups: &[GroupId]) -> Result<Vec<AppliedCorrection>, CorrectorError> {
        self.run(bean, CorrectionMode::All, groups)
    }

    /// Apply only corrections triggered by `violations`
    ///
    /// A correction runs when its constraint filter names the constraint of
    /// a violation recorded at the correction's path.
    ///
    /// # Errors
    /// Same as [`Corrector::correct`].
    pub fn correct_violations(
        &self,
        bean: &Value,
        violations: &[Violation],
        groups: &[GroupId],
    ) -> Result<Vec<AppliedCorrection>, CorrectorError> {
        self.run(bean, CorrectionMode::ViolationsOnly(violations), groups)
    }

    fn run(
        &self,
        bean: &Value,
        mode: CorrectionMode<'_>,
        groups: &[GroupId],
    ) -> Result<Vec<AppliedCorrection>, CorrectorError> {
        tracing::info!(root = %bean, groups = groups.len(), "correcting object graph");
        let requested = (!groups.is_empty()).then_some(groups);
        match self.modifier.modify_bean(bean, mode, requested) {
            Ok(applied) => {
                tracing::info!(applied = applied.len(), "correction completed");
                Ok(applied)
            }
            Err(e) => {
                tracing::warn!(
                    applied = e.applied_corrections().len(),
                    error = %e,
                    "correction failed"
                );
                Err(e)
            }
        }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CorrectorConfig {
        &self.config
    }

    /// Shared metadata cache
    #[inline]
    #[must_use]
    pub fn metadata(&self) -> &MetadataCache {
        &self.metadata
    }

    /// Shared applier registry
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &CorrectionApplierRegistry {
        &self.registry
    }
}

/// Builder for [`Corrector`]
#[derive(Debug)]
pub struct CorrectorBuilder {
    schema: Arc<Schema>,
    config: CorrectorConfig,
    appliers: Vec<(AnnotationType, ApplierDeclaration)>,
}

impl CorrectorBuilder {
    /// Replace the configuration
    #[inline]
    #[must_use]
    pub fn config(mut self, config: CorrectorConfig) -> Self {
        self.config = config;
        self
    }

    /// Pre-register an applier for `annotation`
    ///
    /// Registered appliers take precedence over a correction's own declared
    /// appliers for the same value type.
    #[must_use]
    pub fn applier(mut self, annotation: impl Into<AnnotationType>, declaration: ApplierDeclaration) -> Self {
        self.appliers.push((annotation.into(), declaration));
        self
    }

    /// Finish the corrector
    #[must_use]
    pub fn build(self) -> Corrector {
        let registry = if self.config.seed_builtin_appliers {
            CorrectionApplierRegistry::with_defaults()
        } else {
            CorrectionApplierRegistry::new()
        };
        for (annotation, declaration) in self.appliers {
            registry.register(annotation, declaration);
        }
        let registry = Arc::new(registry);
        let metadata = Arc::new(MetadataCache::new(SchemaInspector::new(Arc::clone(&self.schema))));

        let modifier = BeanModifier::new(
            BeanTraverser::new(Arc::clone(&metadata), self.config.max_traversal_depth),
            GroupSequenceGenerator::new(self.schema),
            ValueCorrector::new(Arc::clone(&registry)),
        );
        tracing::debug!(
            appliers = registry.len(),
            max_depth = self.config.max_traversal_depth,
            "built corrector"
        );
        Corrector {
            config: self.config,
            metadata,
            registry,
            modifier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amend_api::{Bean, CorrectionDescriptor, PropertyDecl, TypeDescriptor, TypeSchema};

    fn schema() -> Schema {
        Schema::builder()
            .ty(TypeSchema::new("PhoneNumber")
                .property(PropertyDecl::new("number", TypeDescriptor::String).on_field(CorrectionDescriptor::trim())))
            .build()
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn corrector_is_send_sync() {
        assert_send_sync::<Corrector>();
    }

    #[test]
    fn empty_groups_run_default_pass() {
        let corrector = Corrector::new(schema());
        let phone = Bean::new("PhoneNumber").with("number", " 555 ").build();
        let applied = corrector.correct(&phone, &[]).unwrap();
        assert_eq!(applied.len(), 1);
        assert_eq!(phone.as_bean().unwrap().get("number"), Value::from("555"));
    }

    #[test]
    fn unseeded_registry_finds_nothing() {
        let corrector = Corrector::builder(schema())
            .config(CorrectorConfig::new().with_seed_builtin_appliers(false))
            .build();
        let phone = Bean::new("PhoneNumber").with("number", " 555 ").build();
        assert!(corrector.correct(&phone, &[]).unwrap().is_empty());
        assert!(corrector.registry().is_empty());
    }

    #[test]
    fn metadata_is_cached_across_calls() {
        let corrector = Corrector::new(schema());
        let phone = Bean::new("PhoneNumber").with("number", "555").build();
        corrector.correct(&phone, &[]).unwrap();
        corrector.correct(&phone, &[]).unwrap();
        assert_eq!(corrector.metadata().len(), 1);
        assert_eq!(corrector.config().max_traversal_depth, 256);
    }
}
