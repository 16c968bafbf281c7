use chrono::{SubsecRound, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::audit_logs::models::{AuditAction, AuditEntity, AuditLogEntry};

/// Captures before/after snapshots for one entity type.
///
/// The captured entry is handed to the entity's store, which appends it in the
/// same transaction as the mutation it describes.
#[derive(Debug, Clone, Copy)]
pub struct AuditRecorder {
    entity: AuditEntity,
}

impl AuditRecorder {
    pub fn for_entity(entity: AuditEntity) -> Self {
        Self { entity }
    }

    pub fn capture<T>(
        &self,
        admin_id: &str,
        action: AuditAction,
        entity_id: &str,
        before: Option<&T>,
        after: Option<&T>,
    ) -> Result<AuditLogEntry>
    where
        T: Serialize,
    {
        let entry = AuditLogEntry {
            id: Uuid::now_v7(),
            admin_id: admin_id.to_string(),
            action,
            entity: self.entity,
            entity_id: entity_id.to_string(),
            before: before.map(snapshot).transpose()?,
            after: after.map(snapshot).transpose()?,
            created_at: Utc::now().trunc_subsecs(6),
        };

        tracing::info!(
            admin_id = %entry.admin_id,
            action = entry.action.as_str(),
            entity = entry.entity.as_str(),
            entity_id = %entry.entity_id,
            "Audit entry captured"
        );

        Ok(entry)
    }
}

fn snapshot<T: Serialize>(value: &T) -> Result<serde_json::Value> {
    serde_json::to_value(value)
        .map_err(|e| AppError::Internal(format!("Failed to snapshot audit state: {}", e)))
}
