use sqlx::PgConnection;

use crate::features::audit_logs::models::AuditLogEntry;

/// Append an entry on the caller's connection.
///
/// Callers pass the transaction that carries the audited mutation, so the
/// entry commits or rolls back together with it. Rows are never updated.
pub async fn append(conn: &mut PgConnection, entry: &AuditLogEntry) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO audit_logs (id, admin_id, action, entity, entity_id, before, after, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(entry.id)
    .bind(&entry.admin_id)
    .bind(entry.action.as_str())
    .bind(entry.entity.as_str())
    .bind(&entry.entity_id)
    .bind(&entry.before)
    .bind(&entry.after)
    .bind(entry.created_at)
    .execute(conn)
    .await?;

    Ok(())
}
