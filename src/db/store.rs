//! Postgres operations for the objective hierarchy and scoring matrix
//!
//! The store only reads and writes plain records; every derived status is
//! recomputed by the engine on read. The matrix save sequence is deliberately
//! non-transactional: partial completion is recovered by recomputing on the
//! next read, not by rollback.

use crate::engine::matrix::{MatrixAggregator, ScoreDiff};
use crate::engine::rag::{classify_progress, RagStatus};
use crate::engine::formula::FormulaType;
use crate::models::hierarchy::{
    Classification, Department, FunctionalObjective, Frequency, Indicator, KeyResult,
    ObjectiveChildren, OrgObjective, RagBand, RagColor, Tier,
};
use crate::models::matrix::{CustomerFeature, IndicatorFeatureLink, Period, ScoreKey, ScoreSnapshot};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_postgres::{Client, NoTls};

type DbError = Box<dyn std::error::Error + Send + Sync>;

fn db_err(context: &str, e: impl std::fmt::Display) -> DbError {
    Box::new(std::io::Error::other(format!("{}: {}", context, e)))
}

pub struct DashboardDatabase {
    client: Arc<RwLock<Option<Client>>>,
}

impl DashboardDatabase {
    pub async fn new() -> Result<Self, DbError> {
        let database_url = crate::config::get_database_url();
        let (client, connection) = tokio_postgres::connect(&database_url, NoTls)
            .await
            .map_err(|e| {
                Box::new(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    format!("Failed to connect to Postgres: {}", e),
                )) as DbError
            })?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "Postgres connection error");
            }
        });

        let db = Self {
            client: Arc::new(RwLock::new(Some(client))),
        };

        db.init_schema().await?;

        Ok(db)
    }

    async fn init_schema(&self) -> Result<(), DbError> {
        let client = self.client.read().await;
        if let Some(ref c) = *client {
            let statements = [
                "CREATE TABLE IF NOT EXISTS org_objectives (
                    id BIGINT PRIMARY KEY,
                    name TEXT NOT NULL,
                    classification TEXT NOT NULL,
                    color TEXT
                )",
                "CREATE TABLE IF NOT EXISTS departments (
                    id BIGINT PRIMARY KEY,
                    name TEXT NOT NULL,
                    owner TEXT,
                    color TEXT,
                    org_objective_id BIGINT NOT NULL
                )",
                "CREATE TABLE IF NOT EXISTS functional_objectives (
                    id BIGINT PRIMARY KEY,
                    name TEXT NOT NULL,
                    owner TEXT,
                    formula TEXT,
                    department_id BIGINT,
                    org_objective_id BIGINT
                )",
                "CREATE TABLE IF NOT EXISTS key_results (
                    id BIGINT PRIMARY KEY,
                    name TEXT NOT NULL,
                    owner TEXT,
                    current_value DOUBLE PRECISION,
                    target_value DOUBLE PRECISION,
                    unit TEXT,
                    formula TEXT,
                    functional_objective_id BIGINT NOT NULL
                )",
                "CREATE TABLE IF NOT EXISTS indicators (
                    id BIGINT PRIMARY KEY,
                    name TEXT NOT NULL,
                    tier TEXT NOT NULL,
                    frequency TEXT NOT NULL,
                    current_value DOUBLE PRECISION,
                    target_value DOUBLE PRECISION,
                    unit TEXT,
                    formula TEXT,
                    rag_status TEXT,
                    key_result_id BIGINT NOT NULL
                )",
                "CREATE TABLE IF NOT EXISTS kpi_rag_bands (
                    indicator_id BIGINT NOT NULL,
                    band_label TEXT NOT NULL,
                    rag_color TEXT NOT NULL,
                    rag_numeric DOUBLE PRECISION NOT NULL,
                    sort_order INT NOT NULL
                )",
                "CREATE TABLE IF NOT EXISTS indicator_feature_links (
                    indicator_id BIGINT NOT NULL,
                    feature_id BIGINT NOT NULL
                )",
                "CREATE TABLE IF NOT EXISTS customer_features (
                    customer_id BIGINT NOT NULL,
                    feature_id BIGINT NOT NULL
                )",
                "CREATE TABLE IF NOT EXISTS customer_feature_scores (
                    indicator_id BIGINT NOT NULL,
                    customer_id BIGINT NOT NULL,
                    feature_id BIGINT NOT NULL,
                    period TEXT NOT NULL,
                    value DOUBLE PRECISION NOT NULL,
                    UNIQUE (indicator_id, customer_id, feature_id, period)
                )",
                "CREATE TABLE IF NOT EXISTS indicator_history (
                    indicator_id BIGINT NOT NULL,
                    value DOUBLE PRECISION NOT NULL,
                    period TEXT NOT NULL,
                    notes TEXT,
                    created_by TEXT,
                    created_at TIMESTAMP NOT NULL
                )",
                "CREATE TABLE IF NOT EXISTS activity_log (
                    entity_type TEXT NOT NULL,
                    entity_id BIGINT NOT NULL,
                    old_value DOUBLE PRECISION,
                    new_value DOUBLE PRECISION,
                    old_status TEXT,
                    new_status TEXT,
                    metadata_json TEXT,
                    created_by TEXT,
                    created_at TIMESTAMP NOT NULL
                )",
            ];

            for statement in statements {
                c.execute(statement, &[])
                    .await
                    .map_err(|e| db_err("Failed to create schema", e))?;
            }
        }

        Ok(())
    }

    /// Check if the database connection is available
    pub async fn is_available(&self) -> bool {
        let client = self.client.read().await;
        client.is_some()
    }

    // ----- hierarchy reads -----

    /// Load all org objectives with their full child trees
    pub async fn get_org_objectives(&self) -> Result<Vec<OrgObjective>, DbError> {
        let ids: Vec<i64> = {
            let client = self.client.read().await;
            match *client {
                Some(ref c) => c
                    .query("SELECT id FROM org_objectives ORDER BY id", &[])
                    .await
                    .map_err(|e| db_err("Failed to query org objectives", e))?
                    .iter()
                    .map(|row| row.get(0))
                    .collect(),
                None => return Ok(Vec::new()),
            }
        };

        let mut objectives = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(objective) = self.get_org_objective(id).await? {
                objectives.push(objective);
            }
        }
        Ok(objectives)
    }

    /// Load one org objective with its full child tree; None when missing
    pub async fn get_org_objective(&self, id: i64) -> Result<Option<OrgObjective>, DbError> {
        let (name, classification, color) = {
            let client = self.client.read().await;
            let c = match *client {
                Some(ref c) => c,
                None => return Ok(None),
            };
            let rows = c
                .query(
                    "SELECT name, classification, color FROM org_objectives WHERE id = $1",
                    &[&id],
                )
                .await
                .map_err(|e| db_err("Failed to query org objective", e))?;
            let row = match rows.first() {
                Some(row) => row,
                None => return Ok(None),
            };
            let name: String = row.get(0);
            let classification: String = row.get(1);
            let color: Option<String> = row.get(2);
            (name, classification, color)
        };

        let departments = self.get_departments(id).await?;
        // An objective owns departments XOR functional objectives directly
        let children = if departments.is_empty() {
            ObjectiveChildren::FunctionalObjectives(
                self.get_functional_objectives_for_objective(id).await?,
            )
        } else {
            ObjectiveChildren::Departments(departments)
        };

        Ok(Some(OrgObjective {
            id,
            name,
            classification: Classification::parse(&classification),
            color,
            children,
        }))
    }

    async fn get_departments(&self, org_objective_id: i64) -> Result<Vec<Department>, DbError> {
        let headers: Vec<(i64, String, Option<String>, Option<String>)> = {
            let client = self.client.read().await;
            let c = match *client {
                Some(ref c) => c,
                None => return Ok(Vec::new()),
            };
            c.query(
                "SELECT id, name, owner, color FROM departments
                 WHERE org_objective_id = $1 ORDER BY id",
                &[&org_objective_id],
            )
            .await
            .map_err(|e| db_err("Failed to query departments", e))?
            .iter()
            .map(|row| (row.get(0), row.get(1), row.get(2), row.get(3)))
            .collect()
        };

        let mut departments = Vec::with_capacity(headers.len());
        for (id, name, owner, color) in headers {
            let functional_objectives = self.get_functional_objectives_for_department(id).await?;
            departments.push(Department {
                id,
                name,
                owner,
                color,
                functional_objectives,
            });
        }
        Ok(departments)
    }

    async fn get_functional_objectives_for_department(
        &self,
        department_id: i64,
    ) -> Result<Vec<FunctionalObjective>, DbError> {
        self.get_functional_objectives(
            "SELECT id, name, owner, formula FROM functional_objectives
             WHERE department_id = $1 ORDER BY id",
            department_id,
        )
        .await
    }

    async fn get_functional_objectives_for_objective(
        &self,
        org_objective_id: i64,
    ) -> Result<Vec<FunctionalObjective>, DbError> {
        self.get_functional_objectives(
            "SELECT id, name, owner, formula FROM functional_objectives
             WHERE org_objective_id = $1 ORDER BY id",
            org_objective_id,
        )
        .await
    }

    async fn get_functional_objectives(
        &self,
        query: &str,
        parent_id: i64,
    ) -> Result<Vec<FunctionalObjective>, DbError> {
        let headers: Vec<(i64, String, Option<String>, Option<String>)> = {
            let client = self.client.read().await;
            let c = match *client {
                Some(ref c) => c,
                None => return Ok(Vec::new()),
            };
            c.query(query, &[&parent_id])
                .await
                .map_err(|e| db_err("Failed to query functional objectives", e))?
                .iter()
                .map(|row| (row.get(0), row.get(1), row.get(2), row.get(3)))
                .collect()
        };

        let mut objectives = Vec::with_capacity(headers.len());
        for (id, name, owner, formula) in headers {
            let key_results = self.get_key_results(id).await?;
            objectives.push(FunctionalObjective {
                id,
                name,
                owner,
                formula: FormulaType::parse(formula.as_deref()),
                key_results,
            });
        }
        Ok(objectives)
    }

    /// Load one functional objective with its key results; None when missing
    pub async fn get_functional_objective(
        &self,
        id: i64,
    ) -> Result<Option<FunctionalObjective>, DbError> {
        let header: Option<(String, Option<String>, Option<String>)> = {
            let client = self.client.read().await;
            let c = match *client {
                Some(ref c) => c,
                None => return Ok(None),
            };
            c.query(
                "SELECT name, owner, formula FROM functional_objectives WHERE id = $1",
                &[&id],
            )
            .await
            .map_err(|e| db_err("Failed to query functional objective", e))?
            .first()
            .map(|row| (row.get(0), row.get(1), row.get(2)))
        };

        match header {
            Some((name, owner, formula)) => {
                let key_results = self.get_key_results(id).await?;
                Ok(Some(FunctionalObjective {
                    id,
                    name,
                    owner,
                    formula: FormulaType::parse(formula.as_deref()),
                    key_results,
                }))
            }
            None => Ok(None),
        }
    }

    /// Load one department with its full subtree; None when missing
    pub async fn get_department(&self, id: i64) -> Result<Option<Department>, DbError> {
        let header: Option<(String, Option<String>, Option<String>)> = {
            let client = self.client.read().await;
            let c = match *client {
                Some(ref c) => c,
                None => return Ok(None),
            };
            c.query(
                "SELECT name, owner, color FROM departments WHERE id = $1",
                &[&id],
            )
            .await
            .map_err(|e| db_err("Failed to query department", e))?
            .first()
            .map(|row| (row.get(0), row.get(1), row.get(2)))
        };

        match header {
            Some((name, owner, color)) => {
                let functional_objectives =
                    self.get_functional_objectives_for_department(id).await?;
                Ok(Some(Department {
                    id,
                    name,
                    owner,
                    color,
                    functional_objectives,
                }))
            }
            None => Ok(None),
        }
    }

    async fn get_key_results(&self, functional_objective_id: i64) -> Result<Vec<KeyResult>, DbError> {
        let headers: Vec<(
            i64,
            String,
            Option<String>,
            Option<f64>,
            Option<f64>,
            Option<String>,
            Option<String>,
        )> = {
            let client = self.client.read().await;
            let c = match *client {
                Some(ref c) => c,
                None => return Ok(Vec::new()),
            };
            c.query(
                "SELECT id, name, owner, current_value, target_value, unit, formula
                 FROM key_results WHERE functional_objective_id = $1 ORDER BY id",
                &[&functional_objective_id],
            )
            .await
            .map_err(|e| db_err("Failed to query key results", e))?
            .iter()
            .map(|row| {
                (
                    row.get(0),
                    row.get(1),
                    row.get(2),
                    row.get(3),
                    row.get(4),
                    row.get(5),
                    row.get(6),
                )
            })
            .collect()
        };

        let mut key_results = Vec::with_capacity(headers.len());
        for (id, name, owner, current_value, target_value, unit, formula) in headers {
            let indicators = self.get_indicators(id).await?;
            key_results.push(KeyResult {
                id,
                name,
                owner,
                current_value,
                target_value,
                unit,
                formula: FormulaType::parse(formula.as_deref()),
                indicators,
            });
        }
        Ok(key_results)
    }

    /// Load one key result with its indicators; None when missing
    pub async fn get_key_result(&self, id: i64) -> Result<Option<KeyResult>, DbError> {
        let header: Option<(
            String,
            Option<String>,
            Option<f64>,
            Option<f64>,
            Option<String>,
            Option<String>,
        )> = {
            let client = self.client.read().await;
            let c = match *client {
                Some(ref c) => c,
                None => return Ok(None),
            };
            c.query(
                "SELECT name, owner, current_value, target_value, unit, formula
                 FROM key_results WHERE id = $1",
                &[&id],
            )
            .await
            .map_err(|e| db_err("Failed to query key result", e))?
            .first()
            .map(|row| {
                (
                    row.get(0),
                    row.get(1),
                    row.get(2),
                    row.get(3),
                    row.get(4),
                    row.get(5),
                )
            })
        };

        match header {
            Some((name, owner, current_value, target_value, unit, formula)) => {
                let indicators = self.get_indicators(id).await?;
                Ok(Some(KeyResult {
                    id,
                    name,
                    owner,
                    current_value,
                    target_value,
                    unit,
                    formula: FormulaType::parse(formula.as_deref()),
                    indicators,
                }))
            }
            None => Ok(None),
        }
    }

    async fn get_indicators(&self, key_result_id: i64) -> Result<Vec<Indicator>, DbError> {
        let headers: Vec<(
            i64,
            String,
            String,
            String,
            Option<f64>,
            Option<f64>,
            Option<String>,
            Option<String>,
        )> = {
            let client = self.client.read().await;
            let c = match *client {
                Some(ref c) => c,
                None => return Ok(Vec::new()),
            };
            c.query(
                "SELECT id, name, tier, frequency, current_value, target_value, unit, formula
                 FROM indicators WHERE key_result_id = $1 ORDER BY id",
                &[&key_result_id],
            )
            .await
            .map_err(|e| db_err("Failed to query indicators", e))?
            .iter()
            .map(|row| {
                (
                    row.get(0),
                    row.get(1),
                    row.get(2),
                    row.get(3),
                    row.get(4),
                    row.get(5),
                    row.get(6),
                    row.get(7),
                )
            })
            .collect()
        };

        let mut indicators = Vec::with_capacity(headers.len());
        for (id, name, tier, frequency, current_value, target_value, unit, formula) in headers {
            let bands = self.get_rag_bands(id).await?;
            indicators.push(Indicator {
                id,
                name,
                tier: Tier::parse(&tier),
                frequency: Frequency::parse(&frequency),
                current_value,
                target_value,
                unit,
                formula: FormulaType::parse(formula.as_deref()),
                bands,
            });
        }
        Ok(indicators)
    }

    /// Load one indicator with its custom bands; None when missing
    pub async fn get_indicator(&self, id: i64) -> Result<Option<Indicator>, DbError> {
        let header: Option<(
            String,
            String,
            String,
            Option<f64>,
            Option<f64>,
            Option<String>,
            Option<String>,
        )> = {
            let client = self.client.read().await;
            let c = match *client {
                Some(ref c) => c,
                None => return Ok(None),
            };
            c.query(
                "SELECT name, tier, frequency, current_value, target_value, unit, formula
                 FROM indicators WHERE id = $1",
                &[&id],
            )
            .await
            .map_err(|e| db_err("Failed to query indicator", e))?
            .first()
            .map(|row| {
                (
                    row.get(0),
                    row.get(1),
                    row.get(2),
                    row.get(3),
                    row.get(4),
                    row.get(5),
                    row.get(6),
                )
            })
        };

        match header {
            Some((name, tier, frequency, current_value, target_value, unit, formula)) => {
                let bands = self.get_rag_bands(id).await?;
                Ok(Some(Indicator {
                    id,
                    name,
                    tier: Tier::parse(&tier),
                    frequency: Frequency::parse(&frequency),
                    current_value,
                    target_value,
                    unit,
                    formula: FormulaType::parse(formula.as_deref()),
                    bands,
                }))
            }
            None => Ok(None),
        }
    }

    /// Ordered custom band list for an indicator; rows with an unknown color
    /// are skipped rather than failing the whole read
    pub async fn get_rag_bands(&self, indicator_id: i64) -> Result<Vec<RagBand>, DbError> {
        let client = self.client.read().await;
        let c = match *client {
            Some(ref c) => c,
            None => return Ok(Vec::new()),
        };

        let rows = c
            .query(
                "SELECT band_label, rag_color, rag_numeric, sort_order
                 FROM kpi_rag_bands WHERE indicator_id = $1 ORDER BY sort_order",
                &[&indicator_id],
            )
            .await
            .map_err(|e| db_err("Failed to query rag bands", e))?;

        let mut bands = Vec::with_capacity(rows.len());
        for row in rows {
            let band_label: String = row.get(0);
            let color_raw: String = row.get(1);
            let rag_numeric: f64 = row.get(2);
            let sort_order: i32 = row.get(3);
            match RagColor::parse(&color_raw) {
                Some(rag_color) => bands.push(RagBand {
                    band_label,
                    rag_color,
                    rag_numeric,
                    sort_order,
                }),
                None => {
                    tracing::warn!(indicator_id, color = %color_raw, "Skipping band with unknown color");
                }
            }
        }
        Ok(bands)
    }

    // ----- matrix reads -----

    pub async fn get_indicator_feature_links(
        &self,
        indicator_id: i64,
    ) -> Result<Vec<IndicatorFeatureLink>, DbError> {
        let client = self.client.read().await;
        let c = match *client {
            Some(ref c) => c,
            None => return Ok(Vec::new()),
        };

        let rows = c
            .query(
                "SELECT indicator_id, feature_id FROM indicator_feature_links
                 WHERE indicator_id = $1",
                &[&indicator_id],
            )
            .await
            .map_err(|e| db_err("Failed to query indicator feature links", e))?;

        Ok(rows
            .iter()
            .map(|row| IndicatorFeatureLink {
                indicator_id: row.get(0),
                feature_id: row.get(1),
            })
            .collect())
    }

    pub async fn get_customer_features(&self) -> Result<Vec<CustomerFeature>, DbError> {
        let client = self.client.read().await;
        let c = match *client {
            Some(ref c) => c,
            None => return Ok(Vec::new()),
        };

        let rows = c
            .query("SELECT customer_id, feature_id FROM customer_features", &[])
            .await
            .map_err(|e| db_err("Failed to query customer features", e))?;

        Ok(rows
            .iter()
            .map(|row| CustomerFeature {
                customer_id: row.get(0),
                feature_id: row.get(1),
            })
            .collect())
    }

    /// Stored grid snapshot for one indicator and period
    pub async fn get_scores(
        &self,
        indicator_id: i64,
        period: &Period,
    ) -> Result<ScoreSnapshot, DbError> {
        let client = self.client.read().await;
        let c = match *client {
            Some(ref c) => c,
            None => return Ok(ScoreSnapshot::new(period.clone())),
        };

        let rows = c
            .query(
                "SELECT customer_id, feature_id, value FROM customer_feature_scores
                 WHERE indicator_id = $1 AND period = $2",
                &[&indicator_id, &period.as_str()],
            )
            .await
            .map_err(|e| db_err("Failed to query scores", e))?;

        let mut snapshot = ScoreSnapshot::new(period.clone());
        for row in rows {
            snapshot.set(
                ScoreKey {
                    indicator_id,
                    customer_id: row.get(0),
                    feature_id: row.get(1),
                },
                row.get(2),
            );
        }
        Ok(snapshot)
    }

    // ----- matrix writes -----

    /// Apply an edit-session diff and recompute the indicator from the grid.
    ///
    /// Sequence: upsert set cells, delete cleared cells, recompute the
    /// indicator's current value from the stored grid with the same engine
    /// formula the read path uses, update the indicator row, then append the
    /// immutable history and activity ledger rows.
    pub async fn save_matrix(
        &self,
        indicator_id: i64,
        period: &Period,
        diff: &ScoreDiff,
        created_by: Option<&str>,
        notes: Option<&str>,
    ) -> Result<(Option<f64>, RagStatus), DbError> {
        let previous = self.get_indicator(indicator_id).await?;
        let old_value = previous.as_ref().and_then(|i| i.current_value);
        let old_status = crate::engine::rag::classify_pair(
            old_value,
            previous.as_ref().and_then(|i| i.target_value),
        );

        {
            let client = self.client.read().await;
            let c = match *client {
                Some(ref c) => c,
                None => {
                    return Err(Box::new(std::io::Error::new(
                        std::io::ErrorKind::NotConnected,
                        "Database connection not available",
                    )))
                }
            };

            for (key, weight) in &diff.upserts {
                c.execute(
                    "INSERT INTO customer_feature_scores
                         (indicator_id, customer_id, feature_id, period, value)
                     VALUES ($1, $2, $3, $4, $5)
                     ON CONFLICT (indicator_id, customer_id, feature_id, period)
                     DO UPDATE SET value = EXCLUDED.value",
                    &[
                        &key.indicator_id,
                        &key.customer_id,
                        &key.feature_id,
                        &period.as_str(),
                        weight,
                    ],
                )
                .await
                .map_err(|e| db_err("Failed to upsert score cell", e))?;
            }

            // Cleared cells are removed outright, never left as stale rows
            for key in &diff.deletes {
                c.execute(
                    "DELETE FROM customer_feature_scores
                     WHERE indicator_id = $1 AND customer_id = $2
                       AND feature_id = $3 AND period = $4",
                    &[
                        &key.indicator_id,
                        &key.customer_id,
                        &key.feature_id,
                        &period.as_str(),
                    ],
                )
                .await
                .map_err(|e| db_err("Failed to delete score cell", e))?;
            }
        }

        // Recompute from what is actually stored, with the engine formula
        let snapshot = self.get_scores(indicator_id, period).await?;
        let new_value = MatrixAggregator::indicator_aggregate(&snapshot, indicator_id);
        let new_status = match new_value {
            Some(v) => classify_progress(v),
            None => RagStatus::NotSet,
        };

        let now = Utc::now().naive_utc();
        let client = self.client.read().await;
        let c = match *client {
            Some(ref c) => c,
            None => {
                return Err(Box::new(std::io::Error::new(
                    std::io::ErrorKind::NotConnected,
                    "Database connection not available",
                )))
            }
        };

        c.execute(
            "UPDATE indicators
             SET current_value = $1, target_value = 100, rag_status = $2
             WHERE id = $3",
            &[&new_value, &new_status.as_str(), &indicator_id],
        )
        .await
        .map_err(|e| db_err("Failed to update indicator", e))?;

        if let Some(value) = new_value {
            c.execute(
                "INSERT INTO indicator_history (indicator_id, value, period, notes, created_by, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6)",
                &[&indicator_id, &value, &period.as_str(), &notes, &created_by, &now],
            )
            .await
            .map_err(|e| db_err("Failed to append indicator history", e))?;
        }

        let metadata = serde_json::json!({
            "upserted": diff.upserts.len(),
            "deleted": diff.deletes.len(),
            "period": period.as_str(),
        });
        let metadata_json = metadata.to_string();
        c.execute(
            "INSERT INTO activity_log
                 (entity_type, entity_id, old_value, new_value, old_status, new_status,
                  metadata_json, created_by, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            &[
                &"indicator",
                &indicator_id,
                &old_value,
                &new_value,
                &old_status.as_str(),
                &new_status.as_str(),
                &metadata_json,
                &created_by,
                &now,
            ],
        )
        .await
        .map_err(|e| db_err("Failed to append activity log", e))?;

        Ok((new_value, new_status))
    }
}
