use serde::{Deserialize, Serialize};

/// Axis-aligned box in page coordinates
///
/// The coordinate frame comes from the upstream extractor; the only
/// assumption made here is that Y grows in one consistent direction
/// across a page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// The smallest addressable text unit: one positioned token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Atom {
    /// Text content of this token
    pub text: String,
    /// Position and extent on the page
    pub bounds: BoundingBox,
    /// 1-based page number
    pub page: u32,
    /// Cost of this token toward chunk budgets (>= 1)
    pub token_count: usize,
    /// Position in the atom sequence; contiguous from 0
    pub index: usize,
}

impl Atom {
    pub fn new(
        text: impl Into<String>,
        bounds: BoundingBox,
        page: u32,
        token_count: usize,
        index: usize,
    ) -> Self {
        Self {
            text: text.into(),
            bounds,
            page,
            token_count,
            index,
        }
    }
}

/// A contiguous run of atoms identified as one structure (e.g. a table)
///
/// `end` is inclusive. Ranges produced by the detector never overlap;
/// externally supplied ranges may.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralRange {
    /// First atom index covered by the structure
    pub start: usize,
    /// Last atom index covered by the structure (inclusive)
    pub end: usize,
    /// Structure tag, e.g. "Table"
    pub kind: String,
}

impl StructuralRange {
    pub fn new(start: usize, end: usize, kind: impl Into<String>) -> Self {
        Self {
            start,
            end,
            kind: kind.into(),
        }
    }
}

/// Estimate token count for a piece of text
///
/// Average token is ~4 characters for English text; rounds up and never
/// returns zero so every atom carries a cost.
pub fn estimate_tokens(text: &str) -> usize {
    text.len().div_ceil(4).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_estimation() {
        assert_eq!(estimate_tokens(""), 1); // Minimum of 1
        assert_eq!(estimate_tokens("test"), 1); // 4 chars = 1 token
        assert_eq!(estimate_tokens("tests"), 2); // 5 chars round up
        assert_eq!(estimate_tokens(&"x".repeat(8000)), 2000);
    }

    #[test]
    fn test_range_holds_inclusive_bounds() {
        let range = StructuralRange::new(3, 9, "Table");
        assert_eq!(range.start, 3);
        assert_eq!(range.end, 9);
        assert_eq!(range.kind, "Table");
    }
}
