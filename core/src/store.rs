//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! The engine never touches SQL; callers hand a finished table to the store.

use crate::{
    config::RunConfig,
    error::{GenError, GenResult},
    summary::DatasetSummary,
    table::DatasetTable,
    types::Decision,
};
use rusqlite::{params, Connection, OptionalExtension};

pub struct DatasetStore {
    conn: Connection,
}

impl DatasetStore {
    /// Open (or create) the dataset database at `path`.
    pub fn open(path: &str) -> GenResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only matters for real files; ignore failure elsewhere.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> GenResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> GenResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_dataset.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(
        &self,
        run_id: &str,
        run: &RunConfig,
        version: &str,
        started_at: &str,
    ) -> GenResult<()> {
        self.conn.execute(
            "INSERT INTO run (run_id, seed, rows, row_seeding, version, started_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                run_id,
                run.seed as i64,
                run.rows as i64,
                run.row_seeding.as_str(),
                version,
                started_at,
            ],
        )?;
        Ok(())
    }

    pub fn save_summary(&self, run_id: &str, summary: &DatasetSummary) -> GenResult<()> {
        let json = serde_json::to_string(summary)?;
        let updated = self.conn.execute(
            "UPDATE run SET summary_json = ?1 WHERE run_id = ?2",
            params![json, run_id],
        )?;
        if updated == 0 {
            return Err(GenError::RunNotFound { run_id: run_id.to_string() });
        }
        Ok(())
    }

    pub fn load_summary(&self, run_id: &str) -> GenResult<Option<DatasetSummary>> {
        let json: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT summary_json FROM run WHERE run_id = ?1",
                params![run_id],
                |row| row.get(0),
            )
            .optional()?;
        match json.flatten() {
            Some(j) => Ok(Some(serde_json::from_str(&j)?)),
            None => Ok(None),
        }
    }

    // ── Applicants ─────────────────────────────────────────────

    /// Insert every row of `table` in a single transaction.
    pub fn save_table(&self, run_id: &str, table: &DatasetTable) -> GenResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO applicant (
                    run_id, id, country_of_origin, gender, age, education_level,
                    language_proficiency, family_size, prior_camp_years,
                    persecution_ground, persecution_type, nexus_established,
                    state_protection_score, internal_relocation_possible, reported_trauma,
                    credibility_score, risk_score, risk_score_uncapped, integration_score,
                    ai_decision, human_reviewed, human_override, final_decision,
                    processing_time_days, appealed, appeal_outcome, bias_flag
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
                           ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27)",
            )?;
            for r in &table.records {
                stmt.execute(params![
                    run_id,
                    r.id,
                    r.country_of_origin.as_str(),
                    r.gender.as_str(),
                    r.age,
                    r.education_level.as_str(),
                    r.language_proficiency.as_str(),
                    r.family_size,
                    r.prior_camp_years,
                    r.persecution_ground.as_str(),
                    r.persecution_type.as_str(),
                    r.nexus_established,
                    r.state_protection_score,
                    r.internal_relocation_possible,
                    r.reported_trauma,
                    r.credibility_score,
                    r.risk_score,
                    r.risk_score_uncapped,
                    r.integration_score,
                    r.ai_decision.as_str(),
                    r.human_reviewed,
                    r.human_override,
                    r.final_decision.as_str(),
                    r.processing_time_days,
                    r.appealed,
                    r.appeal_outcome.as_str(),
                    r.bias_flag.as_str(),
                ])?;
            }
        }
        tx.commit()?;
        log::debug!("stored {} applicants for run {run_id}", table.len());
        Ok(())
    }

    pub fn applicant_count(&self, run_id: &str) -> GenResult<i64> {
        let n = self.conn.query_row(
            "SELECT COUNT(*) FROM applicant WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(n)
    }

    pub fn final_decision_count(&self, run_id: &str, decision: Decision) -> GenResult<i64> {
        let n = self.conn.query_row(
            "SELECT COUNT(*) FROM applicant WHERE run_id = ?1 AND final_decision = ?2",
            params![run_id, decision.as_str()],
            |row| row.get(0),
        )?;
        Ok(n)
    }

    /// Rows breaking any per-row invariant. Zero for every generated table.
    pub fn invariant_violation_count(&self, run_id: &str) -> GenResult<i64> {
        let n = self.conn.query_row(
            "SELECT COUNT(*) FROM applicant WHERE run_id = ?1 AND (
                 (human_override = 1 AND human_reviewed = 0)
              OR ((final_decision <> ai_decision) <> (human_override = 1))
              OR (appealed = 1 AND final_decision <> 'deny')
              OR ((appealed = 0) <> (appeal_outcome = 'N/A'))
              OR risk_score <> MIN(MAX(risk_score_uncapped, 0.0), 1.0)
              OR state_protection_score < 0.05 OR state_protection_score > 1.0
              OR credibility_score < 0.0 OR credibility_score > 1.0
              OR integration_score < 0.0 OR integration_score > 1.0
             )",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(n)
    }
}
