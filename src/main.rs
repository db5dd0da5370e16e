use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use tablesafe::{
    load_atoms, process_document, ChunkOptions, ChunkReport, PipelineOptions, ReadingDirection,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DirectionArg {
    Ltr,
    Rtl,
}

impl From<DirectionArg> for ReadingDirection {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Ltr => ReadingDirection::LeftToRight,
            DirectionArg::Rtl => ReadingDirection::RightToLeft,
        }
    }
}

/// Geometry-aware document chunking that keeps detected tables intact
#[derive(Parser)]
#[command(name = "tablesafe", version, about)]
struct Cli {
    /// JSON token dump produced by an upstream extractor
    input: PathBuf,

    /// Target token budget per chunk
    #[arg(long, default_value_t = 512)]
    target_tokens: usize,

    /// Hard ceiling for preserving structures intact (default: 1.2x target)
    #[arg(long)]
    hard_max_tokens: Option<usize>,

    /// Tokens of context repeated between consecutive chunks
    #[arg(long, default_value_t = 0)]
    overlap_tokens: usize,

    /// Reading order within a row
    #[arg(long, value_enum, default_value = "ltr")]
    direction: DirectionArg,

    /// Write a JSON report of the run
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Print each chunk to stdout
    #[arg(long)]
    show_chunks: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start_time = Instant::now();

    println!("=== tablesafe: geometry-aware chunking ===\n");

    // Step 1: Load the token dump
    let step1_start = Instant::now();
    println!("Step 1: Loading token dump...");
    let atoms = load_atoms(&cli.input)
        .with_context(|| format!("Failed to load {}", cli.input.display()))?;
    println!(
        "✓ Loaded {} atoms [{:.2}s]\n",
        atoms.len(),
        step1_start.elapsed().as_secs_f64()
    );

    // Step 2: Detect structures and chunk, page by page
    let step2_start = Instant::now();
    println!("Step 2: Detecting structures and chunking...");
    let mut chunk_options = ChunkOptions::new(cli.target_tokens);
    if let Some(limit) = cli.hard_max_tokens {
        chunk_options = chunk_options.hard_max_tokens(limit);
    }
    chunk_options = chunk_options.overlap_tokens(cli.overlap_tokens);

    let pipeline_options = PipelineOptions::new(chunk_options).direction(cli.direction.into());
    let summary = process_document(atoms, &pipeline_options).context("Chunking failed")?;
    println!(
        "✓ Produced {} chunks across {} pages ({} structures) [{:.2}s]\n",
        summary.chunks.len(),
        summary.page_count,
        summary.structure_count,
        step2_start.elapsed().as_secs_f64()
    );

    if cli.show_chunks {
        for (i, chunk) in summary.chunks.iter().enumerate() {
            println!(
                "--- Chunk {} [{}] ({} tokens, atoms {}-{})",
                i, chunk.discriminator, chunk.token_count, chunk.start_index, chunk.end_index
            );
            println!("{}\n", chunk.content);
        }
    }

    // Step 3: Optional report artifact
    if let Some(path) = &cli.output {
        let step3_start = Instant::now();
        println!("Step 3: Writing report...");
        let report = ChunkReport::new(Some(cli.input.display().to_string()), &summary);
        report.write_to_file(path)?;
        println!(
            "✓ Report written to {} [{:.2}s]\n",
            path.display(),
            step3_start.elapsed().as_secs_f64()
        );
    }

    // Statistics
    let total_tokens: usize = summary.chunks.iter().map(|c| c.token_count).sum();
    println!("=== Run Statistics ===");
    println!("Pages:            {}", summary.page_count);
    println!("Atoms:            {}", summary.atom_count);
    println!("Structures:       {}", summary.structure_count);
    println!("Chunks:           {}", summary.chunks.len());
    println!("Total tokens:     {}", total_tokens);
    println!(
        "Avg tokens/chunk: {:.1}",
        if summary.chunks.is_empty() {
            0.0
        } else {
            total_tokens as f64 / summary.chunks.len() as f64
        }
    );
    println!(
        "\nTotal execution:  {:.3}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}
