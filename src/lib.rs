// src/lib.rs

pub mod analytics;
pub mod compute;
pub mod config;
pub mod core;
pub mod error;
pub mod notify;
pub mod persistence;
pub mod selection;

pub use crate::core::engine::AnnotationEngine;
pub use crate::core::types::{ConfigurationOptions, Pair, ProjectState, Substring, TextSide};
pub use crate::error::{EngineError, EngineResult};
