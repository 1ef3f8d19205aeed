//! Polygon approximation and genetic nesting of wood inlay shapes.
//!
//! Closed inlay shapes are flattened into simple polygons and packed onto a rectangular surface
//! by an evolutionary search that is advanced one generation per tick of a cooperative timer.

/// Geometric primitives and base algorithms
pub mod geometry;

/// Inlay shapes, placements and candidate layouts
pub mod entities;

/// The nesting driver and its evolutionary loop
pub mod engine;

/// Importing instances and exporting layouts
pub mod io;

/// Helper functions which do not belong to any specific module
pub mod util;
