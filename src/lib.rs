//! Reading Match - Adaptive compatibility scoring for reading club members
//!
//! This crate scores how well two club members would read together. A
//! deterministic questionnaire score is always available; when the AI
//! analysis backend is healthy it is enriched with personality, implicit
//! preference and pairwise deep analyses, and when the backend struggles
//! scoring degrades gracefully back to the questionnaire.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
