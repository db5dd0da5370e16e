mod grid;

#[cfg(test)]
mod tests;

pub use grid::{GridDetector, ReadingDirection};

/// Maximum drift between column starts of adjacent rows, in coordinate
/// units (points for PDF sources). Rows drifting further apart are not
/// part of the same grid.
pub const ALIGNMENT_TOLERANCE: f64 = 5.0;

/// Vertical rounding step used to cluster atoms into rows: atoms whose Y
/// coordinates round to the same 0.1-unit step share a row. Both constants
/// encode assumptions about the source coordinate system's units.
pub const ROW_CLUSTER_PRECISION: f64 = 0.1;
