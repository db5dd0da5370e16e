// Public API exports
pub mod chunker;
pub mod detector;
pub mod geometry;
pub mod input;
pub mod manifest;
pub mod pipeline;
pub mod report;

// Re-export main types for convenience
pub use geometry::{estimate_tokens, Atom, BoundingBox, StructuralRange};

pub use detector::{GridDetector, ReadingDirection, ALIGNMENT_TOLERANCE, ROW_CLUSTER_PRECISION};

pub use manifest::Manifest;

pub use chunker::{Chunk, ChunkError, ChunkOptions, ChunkStream, DEFAULT_HARD_MAX_RATIO};

pub use pipeline::{process_document, DocumentSummary, PipelineOptions};

pub use input::{atoms_from_tokens, load_atoms, InputError, RawToken};

pub use report::{ChunkReport, ReportStats};
