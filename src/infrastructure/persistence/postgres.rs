//! Postgres implementation of the scan repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::scan::{
    Finding, ScanJob, ScanRepository, ScanStatus, SeverityCounts, StoreError,
};

/// Postgres-backed scan repository over a pooled connection.
///
/// Connections are acquired per operation from the pool and released on all
/// exit paths; no connection is held across calls.
pub struct PgScanRepository {
    pool: Arc<PgPool>,
}

impl PgScanRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create the scans and vulnerabilities tables if they do not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS scans (
                id UUID PRIMARY KEY,
                target_url TEXT NOT NULL,
                status TEXT NOT NULL,
                progress INTEGER NOT NULL DEFAULT 0,
                status_message TEXT NOT NULL DEFAULT '',
                start_time TIMESTAMPTZ NOT NULL,
                end_time TIMESTAMPTZ,
                total_findings INTEGER NOT NULL DEFAULT 0,
                critical_count INTEGER NOT NULL DEFAULT 0,
                high_count INTEGER NOT NULL DEFAULT 0,
                medium_count INTEGER NOT NULL DEFAULT 0,
                low_count INTEGER NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .map_err(db_error)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS vulnerabilities (
                id UUID PRIMARY KEY,
                scan_id UUID NOT NULL REFERENCES scans(id) ON DELETE CASCADE,
                type TEXT NOT NULL,
                severity TEXT NOT NULL,
                cvss_score DOUBLE PRECISION NOT NULL,
                ai_risk_score DOUBLE PRECISION NOT NULL,
                description TEXT NOT NULL,
                affected_url TEXT NOT NULL,
                discovered_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }
}

fn db_error(e: sqlx::Error) -> StoreError {
    tracing::error!(error = %e, "Database operation failed");
    StoreError::Database(e.to_string())
}

fn scan_job_from_row(row: &PgRow) -> Result<ScanJob, StoreError> {
    let status_raw: String = row.try_get("status").map_err(db_error)?;
    let status = ScanStatus::parse(&status_raw)
        .ok_or_else(|| StoreError::Database(format!("Unknown scan status: {status_raw}")))?;

    Ok(ScanJob {
        id: row.try_get("id").map_err(db_error)?,
        target_url: row.try_get("target_url").map_err(db_error)?,
        status,
        progress: row.try_get::<i32, _>("progress").map_err(db_error)?.clamp(0, 100) as u8,
        status_message: row.try_get("status_message").map_err(db_error)?,
        start_time: row.try_get("start_time").map_err(db_error)?,
        end_time: row.try_get("end_time").map_err(db_error)?,
        severity_counts: SeverityCounts {
            critical: row.try_get::<i32, _>("critical_count").map_err(db_error)? as u32,
            high: row.try_get::<i32, _>("high_count").map_err(db_error)? as u32,
            medium: row.try_get::<i32, _>("medium_count").map_err(db_error)? as u32,
            low: row.try_get::<i32, _>("low_count").map_err(db_error)? as u32,
        },
        total_findings: row.try_get::<i32, _>("total_findings").map_err(db_error)? as u32,
    })
}

fn finding_from_row(row: &PgRow) -> Result<Finding, StoreError> {
    Ok(Finding {
        id: row.try_get("id").map_err(db_error)?,
        job_id: row.try_get("scan_id").map_err(db_error)?,
        finding_type: row.try_get("type").map_err(db_error)?,
        severity: row.try_get("severity").map_err(db_error)?,
        cvss_score: row.try_get("cvss_score").map_err(db_error)?,
        ai_risk_score: row.try_get("ai_risk_score").map_err(db_error)?,
        description: row.try_get("description").map_err(db_error)?,
        affected_url: row.try_get("affected_url").map_err(db_error)?,
        discovered_at: row.try_get("discovered_at").map_err(db_error)?,
    })
}

#[async_trait]
impl ScanRepository for PgScanRepository {
    async fn create_job(&self, target_url: &str) -> Result<ScanJob, StoreError> {
        let job = ScanJob::new(target_url);

        sqlx::query(
            r#"
            INSERT INTO scans (id, target_url, status, progress, status_message, start_time)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(job.id)
        .bind(&job.target_url)
        .bind(job.status.as_str())
        .bind(job.progress as i32)
        .bind(&job.status_message)
        .bind(job.start_time)
        .execute(&*self.pool)
        .await
        .map_err(db_error)?;

        tracing::info!(job_id = %job.id, target_url, "Created scan job");
        Ok(job)
    }

    async fn update_status(&self, job_id: Uuid, status: ScanStatus) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE scans SET status = $2 WHERE id = $1")
            .bind(job_id)
            .bind(status.as_str())
            .execute(&*self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(job_id));
        }
        Ok(())
    }

    async fn update_progress(
        &self,
        job_id: Uuid,
        progress: u8,
        message: &str,
    ) -> Result<(), StoreError> {
        sqlx::query("UPDATE scans SET progress = $2, status_message = $3 WHERE id = $1")
            .bind(job_id)
            .bind(progress as i32)
            .bind(message)
            .execute(&*self.pool)
            .await
            .map_err(db_error)?;

        Ok(())
    }

    async fn finalize(
        &self,
        job_id: Uuid,
        status: ScanStatus,
        end_time: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        // Single statement so the terminal status, end time, and the counts
        // derived from persisted findings land atomically.
        let result = sqlx::query(
            r#"
            UPDATE scans SET
                status = $2,
                end_time = $3,
                total_findings = (
                    SELECT COUNT(*) FROM vulnerabilities WHERE scan_id = $1
                ),
                critical_count = (
                    SELECT COUNT(*) FROM vulnerabilities
                    WHERE scan_id = $1 AND LOWER(severity) = 'critical'
                ),
                high_count = (
                    SELECT COUNT(*) FROM vulnerabilities
                    WHERE scan_id = $1 AND LOWER(severity) = 'high'
                ),
                medium_count = (
                    SELECT COUNT(*) FROM vulnerabilities
                    WHERE scan_id = $1 AND LOWER(severity) = 'medium'
                ),
                low_count = (
                    SELECT COUNT(*) FROM vulnerabilities
                    WHERE scan_id = $1 AND LOWER(severity) = 'low'
                )
            WHERE id = $1
            "#,
        )
        .bind(job_id)
        .bind(status.as_str())
        .bind(end_time)
        .execute(&*self.pool)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(job_id));
        }

        tracing::info!(job_id = %job_id, status = %status, "Finalized scan job");
        Ok(())
    }

    async fn append_finding(&self, finding: &Finding) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO vulnerabilities
                (id, scan_id, type, severity, cvss_score, ai_risk_score,
                 description, affected_url, discovered_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(finding.id)
        .bind(finding.job_id)
        .bind(&finding.finding_type)
        .bind(&finding.severity)
        .bind(finding.cvss_score)
        .bind(finding.ai_risk_score)
        .bind(&finding.description)
        .bind(&finding.affected_url)
        .bind(finding.discovered_at)
        .execute(&*self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn get_job(&self, job_id: Uuid) -> Result<Option<ScanJob>, StoreError> {
        let row = sqlx::query("SELECT * FROM scans WHERE id = $1")
            .bind(job_id)
            .fetch_optional(&*self.pool)
            .await
            .map_err(db_error)?;

        row.as_ref().map(scan_job_from_row).transpose()
    }

    async fn get_findings(&self, job_id: Uuid) -> Result<Vec<Finding>, StoreError> {
        let rows = sqlx::query(
            "SELECT * FROM vulnerabilities WHERE scan_id = $1 ORDER BY ai_risk_score DESC",
        )
        .bind(job_id)
        .fetch_all(&*self.pool)
        .await
        .map_err(db_error)?;

        rows.iter().map(finding_from_row).collect()
    }

    async fn list_jobs(&self, skip: i64, limit: i64) -> Result<Vec<ScanJob>, StoreError> {
        let rows = sqlx::query("SELECT * FROM scans ORDER BY start_time DESC LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(skip)
            .fetch_all(&*self.pool)
            .await
            .map_err(db_error)?;

        rows.iter().map(scan_job_from_row).collect()
    }

    async fn reset_all(&self) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM vulnerabilities")
            .execute(&*self.pool)
            .await
            .map_err(db_error)?;
        sqlx::query("DELETE FROM scans")
            .execute(&*self.pool)
            .await
            .map_err(db_error)?;

        tracing::info!("All scan data deleted");
        Ok(())
    }
}
