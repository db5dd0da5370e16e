use log::info;

use crate::chunker::{Chunk, ChunkError, ChunkOptions, ChunkStream};
use crate::detector::{GridDetector, ReadingDirection};
use crate::geometry::Atom;
use crate::manifest::Manifest;

/// Settings for a whole-document run
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    pub chunking: ChunkOptions,
    pub direction: ReadingDirection,
}

impl PipelineOptions {
    pub fn new(chunking: ChunkOptions) -> Self {
        Self {
            chunking,
            direction: ReadingDirection::LeftToRight,
        }
    }

    pub fn direction(mut self, direction: ReadingDirection) -> Self {
        self.direction = direction;
        self
    }
}

/// Outcome of one document run
#[derive(Debug, Clone)]
pub struct DocumentSummary {
    pub chunks: Vec<Chunk>,
    pub page_count: usize,
    pub atom_count: usize,
    pub structure_count: usize,
}

/// Run detection and chunking over a whole document, page by page
///
/// The input is split into consecutive same-page runs (callers supply
/// atoms in page order) and each page is re-indexed from zero, so chunk
/// indices are page relative and `Chunk::page` disambiguates. Pages are
/// hard boundaries: no structure or chunk spans two pages.
pub fn process_document(
    atoms: Vec<Atom>,
    options: &PipelineOptions,
) -> Result<DocumentSummary, ChunkError> {
    let atom_count = atoms.len();
    let detector = GridDetector::new().direction(options.direction);

    let mut chunks = Vec::new();
    let mut page_count = 0;
    let mut structure_count = 0;

    for mut page_atoms in split_pages(atoms) {
        page_count += 1;
        for (i, atom) in page_atoms.iter_mut().enumerate() {
            atom.index = i;
        }

        let zones = detector.detect(&page_atoms);
        structure_count += zones.len();

        let manifest = Manifest::new(page_atoms, zones);
        let stream = ChunkStream::new(&manifest, options.chunking)?;
        chunks.extend(stream);
    }

    info!(
        "document mapping complete: {} pages, {} atoms, {} structures, {} chunks",
        page_count,
        atom_count,
        structure_count,
        chunks.len()
    );

    Ok(DocumentSummary {
        chunks,
        page_count,
        atom_count,
        structure_count,
    })
}

/// Split atoms into consecutive runs sharing a page number
fn split_pages(atoms: Vec<Atom>) -> Vec<Vec<Atom>> {
    let mut pages: Vec<Vec<Atom>> = Vec::new();
    for atom in atoms {
        match pages.last_mut() {
            Some(page) if page[0].page == atom.page => page.push(atom),
            _ => pages.push(vec![atom]),
        }
    }
    pages
}
