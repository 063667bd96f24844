//! Core types for Lifeline sequence diagrams.
//!
//! This crate provides the building blocks shared by the parser, layout,
//! and rendering stages:
//!
//! - [`geometry`] - Points, sizes, and inset math
//! - [`color`] - Color parsing and formatting
//! - [`font`] - Font specification for text measurement
//! - [`text`] - The text measurement capability and its implementations
//! - [`semantic`] - The diagram model produced by parsing
//! - [`draw`] - Stroke definitions shared by rendering themes

pub mod color;
pub mod draw;
pub mod font;
pub mod geometry;
pub mod semantic;
pub mod text;
