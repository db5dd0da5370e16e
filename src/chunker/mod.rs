mod stream;


pub use stream::{Chunk, ChunkError, ChunkOptions, ChunkStream};

/// Ratio applied to `target_tokens` when no hard ceiling is given
pub const DEFAULT_HARD_MAX_RATIO: f64 = 1.2;

/// Position within a structure (0 = its start, 1 = its end) past which a
/// colliding boundary advances to swallow the whole structure
pub const SOFT_BREAK_THRESHOLD: f64 = 0.5;

/// Fraction of `target_tokens` under which a trailing remainder is folded
/// into the preceding chunk
pub const TRAILING_MERGE_RATIO: f64 = 0.2;

/// Floor for the trailing-remainder threshold, in atoms
pub const TRAILING_MERGE_FLOOR: usize = 10;
