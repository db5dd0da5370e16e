use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    DEFAULT_HARD_MAX_RATIO, SOFT_BREAK_THRESHOLD, TRAILING_MERGE_FLOOR, TRAILING_MERGE_RATIO,
};
use crate::manifest::Manifest;

#[derive(Error, Debug)]
pub enum ChunkError {
    #[error("target_tokens must be positive")]
    InvalidTargetTokens,
}

/// One integrity-preserved chunk
///
/// `start_index`/`end_index` are inclusive atom indices within the
/// manifest the chunk came from; `page` is the page of its first atom.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Marker prefix ("[Page N]", one "[<kind>]" per touched structure
    /// kind) followed by the space-joined atom text
    pub content: String,
    pub start_index: usize,
    pub end_index: usize,
    pub page: u32,
    pub token_count: usize,
    /// Why the boundary landed where it did: "TargetReached",
    /// "Preserved-<kind>", "Backpressure-Recede", "SoftBreak-<kind>" or
    /// "ForcedSplit-<kind>"
    pub discriminator: String,
}

/// Size and overlap settings for one chunk traversal
#[derive(Debug, Clone, Copy)]
pub struct ChunkOptions {
    target_tokens: usize,
    hard_max_tokens: Option<usize>,
    overlap_tokens: usize,
}

impl ChunkOptions {
    pub fn new(target_tokens: usize) -> Self {
        Self {
            target_tokens,
            hard_max_tokens: None,
            overlap_tokens: 0,
        }
    }

    /// Ceiling above which a structure is too large to preserve intact.
    /// Defaults to ceil(1.2 x target_tokens).
    pub fn hard_max_tokens(mut self, limit: usize) -> Self {
        self.hard_max_tokens = Some(limit);
        self
    }

    /// Tokens of trailing context repeated at the start of the next chunk.
    /// Defaults to 0.
    pub fn overlap_tokens(mut self, overlap: usize) -> Self {
        self.overlap_tokens = overlap;
        self
    }
}

/// Pull-based chunk producer over a manifest
///
/// Walks the atom sequence once, negotiating every proposed cut against
/// the structures covering it. Each stream owns its cursor, so several
/// streams may traverse one shared manifest concurrently. Dropping a
/// stream mid-traversal is safe; a new traversal starts from a fresh
/// `ChunkStream`.
pub struct ChunkStream<'a> {
    manifest: &'a Manifest,
    target_tokens: usize,
    hard_max_tokens: usize,
    overlap_tokens: usize,
    cursor: usize,
    emitted: usize,
}

impl<'a> ChunkStream<'a> {
    pub fn new(manifest: &'a Manifest, options: ChunkOptions) -> Result<Self, ChunkError> {
        if options.target_tokens == 0 {
            return Err(ChunkError::InvalidTargetTokens);
        }

        let hard_max_tokens = options.hard_max_tokens.unwrap_or_else(|| {
            (options.target_tokens as f64 * DEFAULT_HARD_MAX_RATIO).ceil() as usize
        });

        Ok(Self {
            manifest,
            target_tokens: options.target_tokens,
            hard_max_tokens,
            overlap_tokens: options.overlap_tokens,
            cursor: 0,
            emitted: 0,
        })
    }

    /// First index whose inclusion would push the running token sum past
    /// `limit` (exclusive end). Consumes at least one atom while any
    /// remain, even when that atom alone exceeds the limit.
    fn token_boundary(&self, start: usize, limit: usize) -> usize {
        let atoms = self.manifest.atoms();
        let mut tokens = 0;
        let mut i = start;
        while i < atoms.len() {
            tokens += atoms[i].token_count;
            if tokens > limit {
                break;
            }
            i += 1;
        }

        if i == start && start < atoms.len() {
            return start + 1;
        }
        i
    }

    /// Walk backward from the boundary until the accumulated token count
    /// exceeds the overlap budget; the next chunk starts just past that
    /// point
    fn overlap_start(&self, end: usize) -> usize {
        let atoms = self.manifest.atoms();
        let mut tokens = 0;
        let mut i = end;
        while i > 0 {
            tokens += atoms[i - 1].token_count;
            if tokens > self.overlap_tokens {
                return i;
            }
            i -= 1;
        }
        0
    }
}

impl Iterator for ChunkStream<'_> {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        let manifest = self.manifest;
        let atoms = manifest.atoms();
        let total = atoms.len();

        if self.cursor >= total {
            return None;
        }

        // 1. Proposed cut point from the token target
        let proposed = self.token_boundary(self.cursor, self.target_tokens);
        let mut end = proposed;
        let mut reason = String::from("TargetReached");

        // 2. Does the boundary atom sit inside a structure? First covering
        // structure wins when several overlap.
        if let Some(zone) = manifest.structures_at(end).first().copied() {
            let structure_size = zone.end.saturating_sub(zone.start);
            let proximity =
                (end as f64 - zone.start as f64) / structure_size.max(1) as f64;

            if structure_size > self.hard_max_tokens {
                // Too large to ever fit under the ceiling; cut through it
                debug!("soft break inside oversized {} [{}..{}]", zone.kind, zone.start, zone.end);
                reason = format!("SoftBreak-{}", zone.kind);
            } else if proximity > SOFT_BREAK_THRESHOLD {
                // Past the midpoint: advance to keep the structure whole
                debug!(
                    "boundary {} advanced past {} [{}..{}]",
                    end, zone.kind, zone.start, zone.end
                );
                end = zone.end + 1;
                reason = format!("Preserved-{}", zone.kind);
            } else {
                // Entering the front half: back off to before the structure
                warn!(
                    "backpressure at atom {}: receding before {} [{}..{}]",
                    end, zone.kind, zone.start, zone.end
                );
                end = zone.start;
                reason = String::from("Backpressure-Recede");

                if end <= self.cursor {
                    // Recession made no progress; fall back to the
                    // original cut so the cursor always moves
                    end = proposed;
                    reason = format!("ForcedSplit-{}", zone.kind);
                }
            }
        }

        end = end.min(total);
        if end <= self.cursor {
            return None;
        }

        // 3. Fold an undersized trailing remainder into this chunk instead
        // of emitting it on its own
        let merge_threshold =
            TRAILING_MERGE_FLOOR.max((self.target_tokens as f64 * TRAILING_MERGE_RATIO) as usize);
        let remaining = total - end;
        if remaining > 0 && remaining < merge_threshold {
            end = total;
        }

        // 4. Assemble content: page marker, one marker per structure kind
        // touching either edge of the chunk, then the text
        let members = &atoms[self.cursor..end];
        let page = members[0].page;

        let mut kinds: Vec<&str> = Vec::new();
        for edge in [self.cursor, end - 1] {
            for zone in manifest.structures_at(edge) {
                if !kinds.contains(&zone.kind.as_str()) {
                    kinds.push(zone.kind.as_str());
                }
            }
        }

        let mut content = format!("[Page {}]", page);
        for kind in &kinds {
            content.push_str(&format!(" [{}]", kind));
        }
        for atom in members {
            content.push(' ');
            content.push_str(&atom.text);
        }

        let token_count = members.iter().map(|a| a.token_count).sum();
        let chunk = Chunk {
            content,
            start_index: members[0].index,
            end_index: members[members.len() - 1].index,
            page,
            token_count,
            discriminator: reason,
        };

        debug!(
            "chunk {} emitted: {} tokens ({})",
            self.emitted, chunk.token_count, chunk.discriminator
        );
        self.emitted += 1;

        // 5. Advance; overlap never moves the cursor backward
        self.cursor = if self.overlap_tokens > 0 {
            self.overlap_start(end).max(self.cursor + 1)
        } else {
            end
        };

        Some(chunk)
    }
}
