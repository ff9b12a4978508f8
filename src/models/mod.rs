//! Data models for the objective hierarchy and scoring matrix

pub mod hierarchy;
pub mod matrix;

pub use hierarchy::*;
pub use matrix::*;
