//! Pericope Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Pericope layout
//! engine and its hosts. It includes:
//!
//! - **Identifiers**: String-interned node identifiers ([`identifier::Id`])
//! - **Geometry**: Points, sizes and grid spans ([`geometry`] module)
//! - **Semantic**: The annotation snapshot consumed by a layout pass ([`semantic`] module)
//! - **Style**: Label styling and text direction ([`style`] module)

pub mod geometry;
pub mod identifier;
pub mod semantic;
pub mod style;
