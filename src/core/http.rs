//! HTTP endpoint server using Axum
//!
//! Read endpoints recompute rollup statuses from stored records on every
//! request; nothing derived is trusted from the database.

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::{get, put},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, Level};

use crate::db::DashboardDatabase;
use crate::engine::breakdown::{BreakdownReporter, CalculationBreakdown, EntityKind};
use crate::engine::formula::FormulaType;
use crate::engine::matrix::{EligibilityIndex, MatrixAggregator, ScoreDiff};
use crate::engine::rag::{weight_allowed, RagStatus};
use crate::engine::rollup::{NodeProgress, RollupEngine};
use crate::metrics::Metrics;
use crate::models::hierarchy::{
    Classification, Department, Frequency, FunctionalObjective, Indicator, KeyResult,
    ObjectiveChildren, OrgObjective, Tier,
};
use crate::models::matrix::{Period, ScoreKey, ScoreSnapshot};

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub database: Option<Arc<DashboardDatabase>>,
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "ragboard-rollup-engine"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();

    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();

    state.metrics.http_requests_in_flight.dec();
    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

// ----- response types: every node carries its recomputed progress/status -----

#[derive(Debug, Serialize)]
struct IndicatorNode {
    id: i64,
    name: String,
    tier: Tier,
    frequency: Frequency,
    current_value: Option<f64>,
    target_value: Option<f64>,
    unit: Option<String>,
    progress: Option<f64>,
    status: RagStatus,
}

impl From<&Indicator> for IndicatorNode {
    fn from(indicator: &Indicator) -> Self {
        let node = RollupEngine::indicator_progress(indicator);
        Self {
            id: indicator.id,
            name: indicator.name.clone(),
            tier: indicator.tier,
            frequency: indicator.frequency,
            current_value: indicator.current_value,
            target_value: indicator.target_value,
            unit: indicator.unit.clone(),
            progress: node.progress,
            status: node.status,
        }
    }
}

#[derive(Debug, Serialize)]
struct KeyResultNode {
    id: i64,
    name: String,
    owner: Option<String>,
    formula: FormulaType,
    current_value: Option<f64>,
    target_value: Option<f64>,
    unit: Option<String>,
    progress: Option<f64>,
    status: RagStatus,
    indicators: Vec<IndicatorNode>,
}

impl From<&KeyResult> for KeyResultNode {
    fn from(kr: &KeyResult) -> Self {
        let node = RollupEngine::key_result_progress(kr);
        Self {
            id: kr.id,
            name: kr.name.clone(),
            owner: kr.owner.clone(),
            formula: kr.formula,
            current_value: kr.current_value,
            target_value: kr.target_value,
            unit: kr.unit.clone(),
            progress: node.progress,
            status: node.status,
            indicators: kr.indicators.iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct FunctionalObjectiveNode {
    id: i64,
    name: String,
    owner: Option<String>,
    formula: FormulaType,
    progress: Option<f64>,
    status: RagStatus,
    key_results: Vec<KeyResultNode>,
}

impl From<&FunctionalObjective> for FunctionalObjectiveNode {
    fn from(fo: &FunctionalObjective) -> Self {
        let node = RollupEngine::functional_objective_progress(fo);
        Self {
            id: fo.id,
            name: fo.name.clone(),
            owner: fo.owner.clone(),
            formula: fo.formula,
            progress: node.progress,
            status: node.status,
            key_results: fo.key_results.iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct DepartmentNode {
    id: i64,
    name: String,
    owner: Option<String>,
    color: Option<String>,
    progress: Option<f64>,
    status: RagStatus,
    functional_objectives: Vec<FunctionalObjectiveNode>,
}

impl From<&Department> for DepartmentNode {
    fn from(department: &Department) -> Self {
        let node = RollupEngine::department_progress(department);
        Self {
            id: department.id,
            name: department.name.clone(),
            owner: department.owner.clone(),
            color: department.color.clone(),
            progress: node.progress,
            status: node.status,
            functional_objectives: department
                .functional_objectives
                .iter()
                .map(Into::into)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum ObjectiveChildrenNode {
    Departments(Vec<DepartmentNode>),
    FunctionalObjectives(Vec<FunctionalObjectiveNode>),
}

#[derive(Debug, Serialize)]
struct ObjectiveTreeResponse {
    id: i64,
    name: String,
    classification: Classification,
    color: Option<String>,
    progress: Option<f64>,
    status: RagStatus,
    children: ObjectiveChildrenNode,
}

impl From<&OrgObjective> for ObjectiveTreeResponse {
    fn from(objective: &OrgObjective) -> Self {
        let node = RollupEngine::org_objective_progress(objective);
        let children = match &objective.children {
            ObjectiveChildren::Departments(departments) => ObjectiveChildrenNode::Departments(
                departments.iter().map(Into::into).collect(),
            ),
            ObjectiveChildren::FunctionalObjectives(fos) => {
                ObjectiveChildrenNode::FunctionalObjectives(fos.iter().map(Into::into).collect())
            }
        };
        Self {
            id: objective.id,
            name: objective.name.clone(),
            classification: objective.classification,
            color: objective.color.clone(),
            progress: node.progress,
            status: node.status,
            children,
        }
    }
}

#[derive(Debug, Serialize)]
struct ObjectiveSummary {
    id: i64,
    name: String,
    classification: Classification,
    color: Option<String>,
    progress: Option<f64>,
    status: RagStatus,
}

// ----- hierarchy endpoints -----

/// List all org objectives with their recomputed rollup status
async fn list_objectives(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let db = state
        .database
        .as_ref()
        .ok_or(StatusCode::SERVICE_UNAVAILABLE)?;

    let objectives = db.get_org_objectives().await.map_err(|e| {
        error!(error = %e, "Failed to load org objectives");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    state
        .metrics
        .rollup_evaluations_total
        .inc_by(objectives.len() as u64);

    let summaries: Vec<ObjectiveSummary> = objectives
        .iter()
        .map(|objective| {
            let NodeProgress { progress, status } = RollupEngine::org_objective_progress(objective);
            ObjectiveSummary {
                id: objective.id,
                name: objective.name.clone(),
                classification: objective.classification,
                color: objective.color.clone(),
                progress,
                status,
            }
        })
        .collect();
    Ok(Json(json!(summaries)))
}

/// One objective's full tree with per-node progress and status
async fn get_objective(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ObjectiveTreeResponse>, StatusCode> {
    let db = state
        .database
        .as_ref()
        .ok_or(StatusCode::SERVICE_UNAVAILABLE)?;

    let objective = db
        .get_org_objective(id)
        .await
        .map_err(|e| {
            error!(error = %e, objective_id = id, "Failed to load org objective");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    state.metrics.rollup_evaluations_total.inc();
    Ok(Json((&objective).into()))
}

/// Calculation breakdown for any entity in the hierarchy
async fn get_breakdown(
    State(state): State<AppState>,
    Path((entity, id)): Path<(String, i64)>,
) -> Result<Json<CalculationBreakdown>, StatusCode> {
    let db = state
        .database
        .as_ref()
        .ok_or(StatusCode::SERVICE_UNAVAILABLE)?;

    let kind = EntityKind::parse(&entity).ok_or(StatusCode::BAD_REQUEST)?;

    let load_err = |e: Box<dyn std::error::Error + Send + Sync>| {
        error!(error = %e, entity = %entity, entity_id = id, "Failed to load entity for breakdown");
        StatusCode::INTERNAL_SERVER_ERROR
    };

    let breakdown = match kind {
        EntityKind::OrgObjective => db
            .get_org_objective(id)
            .await
            .map_err(load_err)?
            .map(|o| BreakdownReporter::org_objective(&o)),
        EntityKind::Department => db
            .get_department(id)
            .await
            .map_err(load_err)?
            .map(|d| BreakdownReporter::department(&d)),
        EntityKind::FunctionalObjective => db
            .get_functional_objective(id)
            .await
            .map_err(load_err)?
            .map(|fo| BreakdownReporter::functional_objective(&fo)),
        EntityKind::KeyResult => db
            .get_key_result(id)
            .await
            .map_err(load_err)?
            .map(|kr| BreakdownReporter::key_result(&kr)),
        EntityKind::Indicator => db
            .get_indicator(id)
            .await
            .map_err(load_err)?
            .map(|ind| BreakdownReporter::indicator(&ind)),
    };

    breakdown.map(Json).ok_or(StatusCode::NOT_FOUND)
}

// ----- matrix endpoints -----

#[derive(Debug, Deserialize)]
struct MatrixQuery {
    period: String,
}

#[derive(Debug, Serialize)]
struct MatrixCell {
    customer_id: i64,
    feature_id: i64,
    value: f64,
    status: RagStatus,
}

#[derive(Debug, Serialize)]
struct RowAverage {
    customer_id: i64,
    feature_id: i64,
    average: f64,
}

#[derive(Debug, Serialize)]
struct CustomerAverage {
    customer_id: i64,
    average: f64,
}

#[derive(Debug, Serialize)]
struct MatrixResponse {
    indicator_id: i64,
    period: Period,
    cells: Vec<MatrixCell>,
    row_averages: Vec<RowAverage>,
    customer_averages: Vec<CustomerAverage>,
    overall: Option<f64>,
    status: RagStatus,
}

/// Grid for one indicator and period, with row/column/overall averages
async fn get_matrix(
    State(state): State<AppState>,
    Path(indicator_id): Path<i64>,
    Query(params): Query<MatrixQuery>,
) -> Result<Json<MatrixResponse>, StatusCode> {
    let db = state
        .database
        .as_ref()
        .ok_or(StatusCode::SERVICE_UNAVAILABLE)?;

    let period = Period::parse(&params.period).map_err(|_| StatusCode::BAD_REQUEST)?;

    let indicator = db
        .get_indicator(indicator_id)
        .await
        .map_err(|e| {
            error!(error = %e, indicator_id, "Failed to load indicator");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    let snapshot = db.get_scores(indicator_id, &period).await.map_err(|e| {
        error!(error = %e, indicator_id, "Failed to load scores");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let mut cells: Vec<MatrixCell> = snapshot
        .iter()
        .map(|(key, weight)| MatrixCell {
            customer_id: key.customer_id,
            feature_id: key.feature_id,
            value: *weight,
            status: crate::engine::rag::classify_band_weight(*weight, &indicator.bands),
        })
        .collect();
    cells.sort_by_key(|c| (c.customer_id, c.feature_id));

    let mut pairs: Vec<(i64, i64)> = cells.iter().map(|c| (c.customer_id, c.feature_id)).collect();
    pairs.dedup();
    let row_averages: Vec<RowAverage> = pairs
        .iter()
        .filter_map(|&(customer_id, feature_id)| {
            MatrixAggregator::feature_row_average(&snapshot, customer_id, feature_id).map(
                |average| RowAverage {
                    customer_id,
                    feature_id,
                    average,
                },
            )
        })
        .collect();

    let mut customer_ids: Vec<i64> = cells.iter().map(|c| c.customer_id).collect();
    customer_ids.dedup();
    let customer_averages: Vec<CustomerAverage> = customer_ids
        .iter()
        .filter_map(|&customer_id| {
            MatrixAggregator::customer_average(&snapshot, customer_id)
                .map(|average| CustomerAverage { customer_id, average })
        })
        .collect();

    let overall = MatrixAggregator::indicator_aggregate(&snapshot, indicator_id);
    let status = match overall {
        Some(v) => crate::engine::rag::classify_progress(v),
        None => RagStatus::NotSet,
    };

    Ok(Json(MatrixResponse {
        indicator_id,
        period,
        cells,
        row_averages,
        customer_averages,
        overall,
        status,
    }))
}

#[derive(Debug, Deserialize)]
struct CellInput {
    customer_id: i64,
    feature_id: i64,
    /// None clears the cell (a delete, not an upsert of null)
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SaveScoresRequest {
    period: String,
    #[serde(default)]
    created_by: Option<String>,
    #[serde(default)]
    notes: Option<String>,
    cells: Vec<CellInput>,
}

#[derive(Debug, Serialize)]
struct SaveScoresResponse {
    upserted: usize,
    deleted: usize,
    current_value: Option<f64>,
    rag_status: RagStatus,
}

/// Save a full working snapshot of one indicator's grid for a period.
///
/// The working snapshot is diffed against the stored one: set cells are
/// upserted, cells present before but cleared now are deleted, then the
/// indicator is recomputed from the grid and history/activity rows appended.
async fn save_matrix_scores(
    State(state): State<AppState>,
    Path(indicator_id): Path<i64>,
    Json(request): Json<SaveScoresRequest>,
) -> Result<Json<SaveScoresResponse>, StatusCode> {
    let db = state
        .database
        .as_ref()
        .ok_or(StatusCode::SERVICE_UNAVAILABLE)?;

    let period = Period::parse(&request.period).map_err(|_| StatusCode::BAD_REQUEST)?;

    let indicator = db
        .get_indicator(indicator_id)
        .await
        .map_err(|e| {
            error!(error = %e, indicator_id, "Failed to load indicator");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    // Weights must be ones the indicator's band list declares
    for cell in &request.cells {
        if let Some(value) = cell.value {
            if !weight_allowed(value, &indicator.bands) {
                return Err(StatusCode::UNPROCESSABLE_ENTITY);
            }
        }
    }

    let links = db.get_indicator_feature_links(indicator_id).await.map_err(|e| {
        error!(error = %e, indicator_id, "Failed to load feature links");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    let subscriptions = db.get_customer_features().await.map_err(|e| {
        error!(error = %e, "Failed to load customer features");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    let eligibility = EligibilityIndex::new(&links, &subscriptions);

    let original = db.get_scores(indicator_id, &period).await.map_err(|e| {
        error!(error = %e, indicator_id, "Failed to load stored scores");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    // Build the working snapshot; structurally ineligible cells are a no-op
    let mut working = ScoreSnapshot::new(period.clone());
    for cell in &request.cells {
        let key = ScoreKey {
            indicator_id,
            customer_id: cell.customer_id,
            feature_id: cell.feature_id,
        };
        if !eligibility.is_eligible(&key) {
            continue;
        }
        if let Some(value) = cell.value {
            working.set(key, value);
        }
    }

    let diff = ScoreDiff::compute(&original, &working);
    let (current_value, rag_status) = db
        .save_matrix(
            indicator_id,
            &period,
            &diff,
            request.created_by.as_deref(),
            request.notes.as_deref(),
        )
        .await
        .map_err(|e| {
            error!(error = %e, indicator_id, "Failed to save matrix scores");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    state.metrics.matrix_saves_total.inc();
    info!(
        indicator_id,
        period = %period,
        upserted = diff.upserts.len(),
        deleted = diff.deletes.len(),
        "Saved matrix scores"
    );

    Ok(Json(SaveScoresResponse {
        upserted: diff.upserts.len(),
        deleted: diff.deletes.len(),
        current_value,
        rag_status,
    }))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/objectives", get(list_objectives))
        .route("/api/objectives/{id}", get(get_objective))
        .route("/api/breakdown/{entity}/{id}", get(get_breakdown))
        .route("/api/matrix/{indicator_id}", get(get_matrix))
        .route("/api/matrix/{indicator_id}/scores", put(save_matrix_scores))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = Arc::new(Metrics::new()?);
    let start_time = Arc::new(Instant::now());

    // The API works without a database, but objective and matrix endpoints
    // report 503 until one is available
    let database = match DashboardDatabase::new().await {
        Ok(db) => {
            info!("Postgres connected for API server");
            Some(Arc::new(db))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to connect to Postgres - dashboard endpoints will be unavailable");
            None
        }
    };

    let state = AppState {
        health: Arc::new(RwLock::new(HealthStatus::default())),
        metrics: metrics.clone(),
        start_time: start_time.clone(),
        database,
    };
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    axum::serve(listener, app).await?;

    Ok(())
}
