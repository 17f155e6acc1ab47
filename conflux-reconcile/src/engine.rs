//! ReconcileEngine — composes detection, resolution, scoring, and lineage
//! into one unit of work per (entity, source, observation) triple.
//!
//! `reconcile` is read-only: it returns a [`ReconciliationResult`] and
//! touches nothing. `persist` is the single write point and is atomic from
//! the caller's view. Concurrent calls for different entities never
//! interact; callers that can reconcile the same entity from two sources
//! simultaneously must serialize `persist` for that entity.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, instrument};

use conflux_core::config::ReconcileConfig;
use conflux_core::constants::AUTO_RESOLVED_BY;
use conflux_core::errors::{ConfluxResult, ReconcileError};
use conflux_core::models::{
    EntityKind, EntityRef, NetworkEntity, Observation, ReconciliationResult,
};
use conflux_core::traits::IReconciliationStorage;

use crate::detector::detect_conflicts;
use crate::lineage;
use crate::registry::PriorityRegistry;
use crate::scorer::score_source;
use crate::strategies::{self, ResolutionContext};

/// The reconciliation orchestrator. Holds the storage seam and the policy
/// config; the config is immutable for the engine's lifetime.
pub struct ReconcileEngine {
    storage: Arc<dyn IReconciliationStorage>,
    config: ReconcileConfig,
}

impl ReconcileEngine {
    pub fn new(storage: Arc<dyn IReconciliationStorage>, config: ReconcileConfig) -> Self {
        Self { storage, config }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Merge one observation against the stored record.
    ///
    /// Fetches the entity's current fields (empty on first sight), detects
    /// per-field conflicts, resolves each through the configured strategy,
    /// scores the submitting source, and builds lineage. Performs no writes.
    #[instrument(skip(self, observation), fields(entity_id = %observation.entity_id, source_id = %observation.source_id))]
    pub fn reconcile(&self, observation: &Observation) -> ConfluxResult<ReconciliationResult> {
        let entity_ref = observation.entity_ref();
        let existing = self.fetch_existing(observation)?;
        let existing_fields = existing
            .as_ref()
            .map(|e| e.fields.clone())
            .unwrap_or_default();

        let registry = PriorityRegistry::load(self.storage.as_ref())?;
        let confidence = score_source(&registry, &observation.source_id);

        let mut conflicts = detect_conflicts(
            &entity_ref,
            &existing_fields,
            &observation.fields,
            observation.observed_at,
        );

        // Merged map: existing fields, conflict fields overwritten by their
        // resolved value, plus incoming-only fields added unchanged.
        let mut reconciled_data = existing_fields.clone();

        let auto_resolve = confidence.value() >= self.config.auto_resolve_threshold;
        for conflict in &mut conflicts {
            let strategy = self.config.strategy_for(&conflict.field_name);
            let history = self.storage.field_lineage(
                &entity_ref,
                &conflict.field_name,
                self.config.consensus_window,
            )?;

            let latest_claim = history.first();
            let existing_source = latest_claim
                .map(|l| l.source_id.as_str())
                .or(existing
                    .as_ref()
                    .and_then(|e| e.primary_source_id.as_deref()));
            let existing_observed_at = latest_claim
                .map(|l| l.recorded_at)
                .or(existing.as_ref().and_then(|e| e.last_reconciled));

            let ctx = ResolutionContext {
                conflict: &*conflict,
                registry: &registry,
                existing_source,
                existing_observed_at,
                incoming_source: &observation.source_id,
                incoming_observed_at: observation.observed_at,
                field_history: &history,
                consensus_quorum: self.config.consensus_quorum,
            };
            let resolved = strategies::resolve(&ctx, strategy);

            reconciled_data.insert(conflict.field_name.clone(), resolved.clone());
            if auto_resolve {
                conflict.mark_resolved(resolved, strategy, AUTO_RESOLVED_BY, Utc::now());
            } else {
                // Stays pending for the operator; record what the engine
                // would have applied.
                conflict.resolution_strategy = Some(strategy);
            }
        }

        for (field, value) in &observation.fields {
            if !existing_fields.contains_key(field) {
                reconciled_data.insert(field.clone(), value.clone());
            }
        }

        let lineage = lineage::record(observation, confidence);
        let primary_source_id =
            self.determine_primary_source(&registry, &entity_ref, &observation.source_id)?;

        let result = ReconciliationResult {
            reconciled_data,
            conflicts,
            lineage,
            confidence_score: confidence,
            primary_source_id,
        };

        debug!(
            conflicts = result.conflicts.len(),
            pending = result.has_pending_conflicts(),
            lineage = result.lineage.len(),
            confidence = %confidence,
            primary_source_id = %result.primary_source_id,
            "reconcile complete"
        );

        Ok(result)
    }

    /// Write a reconciliation result: conflict rows, lineage rows, and the
    /// entity update land in one transaction.
    #[instrument(skip(self, observation, result), fields(entity_id = %observation.entity_id))]
    pub fn persist(
        &self,
        observation: &Observation,
        result: &ReconciliationResult,
    ) -> ConfluxResult<()> {
        self.storage
            .apply_reconciliation(&observation.entity_id, observation.kind, result, Utc::now())
    }

    /// The source that should be treated as authoritative going forward:
    /// the highest-priority contributor among every source that has ever
    /// supplied data for the entity, the calling source included. Ties
    /// break toward the caller; with an empty registry the caller wins
    /// outright.
    pub fn determine_primary_source(
        &self,
        registry: &PriorityRegistry,
        entity: &EntityRef,
        calling_source: &str,
    ) -> ConfluxResult<String> {
        let mut best = calling_source.to_string();
        let mut best_level = registry.level(calling_source);

        for source in self.storage.entity_sources(entity)? {
            let level = registry.level(&source);
            if level > best_level {
                best = source;
                best_level = level;
            }
        }

        Ok(best)
    }

    /// Fetch the stored entity for an observation, guarding against an id
    /// already registered under the opposite kind.
    fn fetch_existing(&self, observation: &Observation) -> ConfluxResult<Option<NetworkEntity>> {
        if let Some(entity) = self
            .storage
            .get_entity(observation.kind, &observation.entity_id)?
        {
            return Ok(Some(entity));
        }

        let other_kind = match observation.kind {
            EntityKind::Node => EntityKind::Connection,
            EntityKind::Connection => EntityKind::Node,
        };
        if self
            .storage
            .get_entity(other_kind, &observation.entity_id)?
            .is_some()
        {
            return Err(ReconcileError::EntityKindMismatch {
                id: observation.entity_id.clone(),
                stored: other_kind.to_string(),
                observed: observation.kind.to_string(),
            }
            .into());
        }

        Ok(None)
    }
}
