use std::collections::HashMap;

use log::{debug, info};

use super::{ALIGNMENT_TOLERANCE, ROW_CLUSTER_PRECISION};
use crate::geometry::{Atom, StructuralRange};

/// Horizontal reading order within a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadingDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

/// Detects tabular structures from spatial alignment of atoms
///
/// No OCR or text semantics involved. Pure coordinate math: rows are
/// clustered by vertical position, and a run of adjacent rows whose column
/// starts line up forms one zone.
#[derive(Debug, Clone)]
pub struct GridDetector {
    direction: ReadingDirection,
    alignment_tolerance: f64,
}

impl GridDetector {
    /// Create a detector with left-to-right ordering and the default
    /// alignment tolerance
    pub fn new() -> Self {
        Self {
            direction: ReadingDirection::LeftToRight,
            alignment_tolerance: ALIGNMENT_TOLERANCE,
        }
    }

    /// Set the reading order used to sort atoms within a row
    pub fn direction(mut self, direction: ReadingDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Override the column alignment tolerance (coordinate units)
    pub fn alignment_tolerance(mut self, tolerance: f64) -> Self {
        self.alignment_tolerance = tolerance;
        self
    }

    /// Scan a page's atoms and return the ranges identified as grids
    ///
    /// The returned ranges are no-cut zones for the chunker. Irregular
    /// layouts simply fail the alignment test and produce no zone.
    pub fn detect(&self, atoms: &[Atom]) -> Vec<StructuralRange> {
        if atoms.is_empty() {
            return Vec::new();
        }

        info!(
            "structure scan started: page {} with {} atoms",
            atoms[0].page,
            atoms.len()
        );

        let rows = self.cluster_rows(atoms);
        let mut zones = Vec::new();
        let mut streak_start: Option<usize> = None;

        for i in 1..rows.len() {
            if self.rows_aligned(&rows[i - 1], &rows[i]) {
                // First aligned pair opens the zone at the previous row
                streak_start.get_or_insert(i - 1);
            } else if let Some(start) = streak_start.take() {
                close_zone(&mut zones, &rows[start..i]);
            }
        }

        // Catch a structure still open at the end of the page
        if let Some(start) = streak_start {
            close_zone(&mut zones, &rows[start..]);
        }

        zones
    }

    /// Group atoms into horizontal rows keyed by rounded Y, ordered top to
    /// bottom, each row sorted by reading order
    fn cluster_rows<'a>(&self, atoms: &'a [Atom]) -> Vec<Vec<&'a Atom>> {
        let mut by_line: HashMap<i64, Vec<&Atom>> = HashMap::new();
        for atom in atoms {
            let key = (atom.bounds.y / ROW_CLUSTER_PRECISION).round() as i64;
            by_line.entry(key).or_default().push(atom);
        }

        // Descending Y puts the top of the page first
        let mut keys: Vec<i64> = by_line.keys().copied().collect();
        keys.sort_unstable_by(|a, b| b.cmp(a));

        let mut rows = Vec::with_capacity(keys.len());
        for key in keys {
            let mut row = by_line.remove(&key).unwrap_or_default();
            match self.direction {
                ReadingDirection::LeftToRight => {
                    row.sort_by(|a, b| a.bounds.x.total_cmp(&b.bounds.x));
                }
                ReadingDirection::RightToLeft => {
                    row.sort_by(|a, b| b.bounds.x.total_cmp(&a.bounds.x));
                }
            }
            rows.push(row);
        }
        rows
    }

    /// Two rows share a grid when both carry at least 2 columns, the
    /// column counts match, and every column start lines up within the
    /// tolerance
    fn rows_aligned(&self, upper: &[&Atom], lower: &[&Atom]) -> bool {
        if upper.len() < 2 || lower.len() < 2 {
            return false;
        }
        if upper.len() != lower.len() {
            return false;
        }

        upper.iter().zip(lower.iter()).all(|(a, b)| {
            (a.bounds.x.round() - b.bounds.x.round()).abs() <= self.alignment_tolerance
        })
    }
}

impl Default for GridDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Close an open streak of aligned rows into one structural range spanning
/// the lowest and highest atom index seen in the block
fn close_zone(zones: &mut Vec<StructuralRange>, block: &[Vec<&Atom>]) {
    let mut indices = block.iter().flatten().map(|atom| atom.index);
    let Some(first) = indices.next() else {
        return;
    };

    let (mut start, mut end) = (first, first);
    for index in indices {
        start = start.min(index);
        end = end.max(index);
    }

    debug!("structure detected: Table from atom {} to {}", start, end);
    zones.push(StructuralRange::new(start, end, "Table"));
}
