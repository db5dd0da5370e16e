use super::*;
use crate::geometry::{Atom, BoundingBox};

fn make_atom(index: usize, text: &str, x: f64, y: f64) -> Atom {
    Atom::new(text, BoundingBox::new(x, y, 10.0, 10.0), 1, 1, index)
}

/// Build a perfectly aligned grid: columns 100 units apart, rows 20 units
/// apart going down the page
fn grid_atoms(rows: usize, columns: usize, start_x: f64) -> Vec<Atom> {
    let mut atoms = Vec::new();
    let mut index = 0;
    for r in 0..rows {
        for c in 0..columns {
            atoms.push(make_atom(
                index,
                "cell",
                start_x + (c as f64) * 100.0,
                500.0 - (r as f64) * 20.0,
            ));
            index += 1;
        }
    }
    atoms
}

#[test]
fn test_detects_aligned_grid() {
    let atoms = grid_atoms(5, 2, 50.0);

    let zones = GridDetector::new().detect(&atoms);

    assert_eq!(zones.len(), 1);
    assert_eq!(zones[0].kind, "Table");
    assert_eq!(zones[0].start, 0);
    assert_eq!(zones[0].end, 9);
}

#[test]
fn test_ragged_paragraph_produces_no_zone() {
    // Prose with drifting X-offsets never passes the alignment test
    let atoms = vec![
        make_atom(0, "Once", 50.0, 100.0),
        make_atom(1, "upon", 65.0, 100.0),
        make_atom(2, "a", 58.0, 90.0),
        make_atom(3, "time", 80.0, 90.0),
    ];

    let zones = GridDetector::new().detect(&atoms);

    assert!(zones.is_empty());
}

#[test]
fn test_two_aligned_rows_form_a_zone() {
    // A single aligned row pair is already a zone
    let atoms = grid_atoms(2, 2, 50.0);

    let zones = GridDetector::new().detect(&atoms);

    assert_eq!(zones.len(), 1);
    assert_eq!(zones[0].start, 0);
    assert_eq!(zones[0].end, 3);
}

#[test]
fn test_column_count_change_closes_zone() {
    let mut atoms = grid_atoms(3, 2, 50.0);
    // A fourth row with an extra column breaks the streak
    atoms.push(make_atom(6, "cell", 50.0, 440.0));
    atoms.push(make_atom(7, "cell", 150.0, 440.0));
    atoms.push(make_atom(8, "cell", 250.0, 440.0));

    let zones = GridDetector::new().detect(&atoms);

    assert_eq!(zones.len(), 1);
    assert_eq!(zones[0].start, 0);
    assert_eq!(zones[0].end, 5);
}

#[test]
fn test_trailing_grid_closed_at_page_end() {
    let mut atoms = vec![
        make_atom(0, "heading", 50.0, 600.0),
        make_atom(1, "intro", 62.0, 580.0),
    ];
    // Grid occupying the bottom of the page, still open when input ends
    for (offset, atom) in grid_atoms(3, 2, 50.0).iter().enumerate() {
        let mut atom = atom.clone();
        atom.index = 2 + offset;
        atoms.push(atom);
    }

    let zones = GridDetector::new().detect(&atoms);

    assert_eq!(zones.len(), 1);
    assert_eq!(zones[0].start, 2);
    assert_eq!(zones[0].end, 7);
}

#[test]
fn test_single_row_rtl_completes() {
    let atoms = vec![
        make_atom(0, "Left", 10.0, 100.0),
        make_atom(1, "Middle", 50.0, 100.0),
        make_atom(2, "Right", 90.0, 100.0),
    ];

    let zones = GridDetector::new()
        .direction(ReadingDirection::RightToLeft)
        .detect(&atoms);

    // One row cannot form a multi-row zone
    assert!(zones.is_empty());
}

#[test]
fn test_rtl_grid_detected() {
    let zones = GridDetector::new()
        .direction(ReadingDirection::RightToLeft)
        .detect(&grid_atoms(3, 2, 50.0));

    assert_eq!(zones.len(), 1);
}

#[test]
fn test_alignment_within_tolerance() {
    let atoms = vec![
        make_atom(0, "a", 50.0, 100.0),
        make_atom(1, "b", 150.0, 100.0),
        // Second row drifts exactly the tolerance
        make_atom(2, "c", 55.0, 90.0),
        make_atom(3, "d", 155.0, 90.0),
    ];

    let zones = GridDetector::new().detect(&atoms);

    assert_eq!(zones.len(), 1);
}

#[test]
fn test_alignment_beyond_tolerance() {
    let atoms = vec![
        make_atom(0, "a", 50.0, 100.0),
        make_atom(1, "b", 150.0, 100.0),
        make_atom(2, "c", 56.0, 90.0),
        make_atom(3, "d", 156.0, 90.0),
    ];

    let zones = GridDetector::new().detect(&atoms);

    assert!(zones.is_empty());
}

#[test]
fn test_custom_tolerance_is_respected() {
    let atoms = vec![
        make_atom(0, "a", 50.0, 100.0),
        make_atom(1, "b", 150.0, 100.0),
        make_atom(2, "c", 53.0, 90.0),
        make_atom(3, "d", 153.0, 90.0),
    ];

    let strict = GridDetector::new().alignment_tolerance(1.0);
    assert!(strict.detect(&atoms).is_empty());

    let loose = GridDetector::new().alignment_tolerance(10.0);
    assert_eq!(loose.detect(&atoms).len(), 1);
}

#[test]
fn test_empty_input_yields_no_zones() {
    assert!(GridDetector::new().detect(&[]).is_empty());
}
