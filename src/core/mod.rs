// src/core/mod.rs
pub mod engine;
pub mod highlight;
pub mod history;
pub mod pair_index;
pub mod synonyms;
pub mod types;
