//! Ragboard — hierarchical OKR/KPI rollup and RAG classification engine.
//!
//! The engine converts raw indicator measurements (numeric or derived from a
//! customer × feature scoring matrix) into progress percentages, rolls them up
//! through the objective hierarchy with per-node aggregation formulas, and
//! classifies every level into a Red/Amber/Green health status.

pub mod config;
pub mod core;
pub mod db;
pub mod engine;
pub mod logging;
pub mod metrics;
pub mod models;
