use crate::geometry::{Atom, StructuralRange};

/// Immutable index of a page's atoms and the structures covering them
///
/// Built once, then shared read-only: concurrent chunk traversals over the
/// same manifest are safe because nothing here mutates after construction.
pub struct Manifest {
    atoms: Vec<Atom>,
    structures: Vec<StructuralRange>,
    /// One slot per atom index plus a sentinel slot; each slot lists the
    /// positions (into `structures`) of the ranges covering that atom.
    /// Dense and position-keyed on purpose: atom indices are contiguous.
    coverage: Vec<Vec<usize>>,
}

impl Manifest {
    /// Build the manifest and its per-atom coverage table
    ///
    /// Structure bounds are clamped into the atom index space before they
    /// are recorded, so a malformed upstream range degrades instead of
    /// failing.
    pub fn new(atoms: Vec<Atom>, structures: Vec<StructuralRange>) -> Self {
        let mut coverage = vec![Vec::new(); atoms.len() + 1];

        if !atoms.is_empty() {
            let last = atoms.len() - 1;
            for (slot, structure) in structures.iter().enumerate() {
                let start = structure.start.min(last);
                let end = structure.end.min(last);
                for entry in coverage.iter_mut().take(end + 1).skip(start) {
                    entry.push(slot);
                }
            }
        }

        Self {
            atoms,
            structures,
            coverage,
        }
    }

    /// Structures covering the given atom, in structure-list order
    ///
    /// O(1) slot lookup; out-of-range indices return an empty list.
    pub fn structures_at(&self, atom_index: usize) -> Vec<&StructuralRange> {
        match self.coverage.get(atom_index) {
            Some(slots) => slots.iter().map(|&slot| &self.structures[slot]).collect(),
            None => Vec::new(),
        }
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn structures(&self) -> &[StructuralRange] {
        &self.structures
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoundingBox;

    fn make_atoms(count: usize) -> Vec<Atom> {
        (0..count)
            .map(|i| {
                Atom::new(
                    "word",
                    BoundingBox::new(0.0, 0.0, 10.0, 10.0),
                    1,
                    1,
                    i,
                )
            })
            .collect()
    }

    #[test]
    fn test_coverage_lookup() {
        let manifest = Manifest::new(
            make_atoms(10),
            vec![StructuralRange::new(2, 5, "Table")],
        );

        assert!(manifest.structures_at(1).is_empty());
        assert_eq!(manifest.structures_at(2).len(), 1);
        assert_eq!(manifest.structures_at(5).len(), 1);
        assert!(manifest.structures_at(6).is_empty());
    }

    #[test]
    fn test_out_of_range_structure_is_clamped() {
        let manifest = Manifest::new(
            make_atoms(10),
            vec![StructuralRange::new(150, 200, "Table")],
        );

        // The range collapses onto the last atom instead of failing
        assert_eq!(manifest.structures_at(9).len(), 1);
        assert!(manifest.structures_at(8).is_empty());
    }

    #[test]
    fn test_out_of_range_query_is_empty() {
        let manifest = Manifest::new(make_atoms(3), vec![StructuralRange::new(0, 2, "Table")]);

        assert!(manifest.structures_at(42).is_empty());
    }

    #[test]
    fn test_overlapping_structures_keep_list_order() {
        let manifest = Manifest::new(
            make_atoms(10),
            vec![
                StructuralRange::new(0, 8, "Table"),
                StructuralRange::new(4, 6, "Grid"),
            ],
        );

        let covering = manifest.structures_at(5);
        assert_eq!(covering.len(), 2);
        assert_eq!(covering[0].kind, "Table");
        assert_eq!(covering[1].kind, "Grid");
    }

    #[test]
    fn test_empty_atoms_record_nothing() {
        let manifest = Manifest::new(Vec::new(), vec![StructuralRange::new(0, 5, "Table")]);

        assert_eq!(manifest.atom_count(), 0);
        assert!(manifest.structures_at(0).is_empty());
    }
}
