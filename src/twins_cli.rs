//! twins subcommand - similar submission detection

use clap::Subcommand;
use shape::{TokenSequence, Tokenizer};
use std::path::{Path, PathBuf};
use std::time::Instant;
use twins::{OutputFormat, Scanner, TwinsConfig};

#[derive(Subcommand)]
pub enum TwinsCommands {
    /// Scan submissions for structurally similar pairs
    Scan {
        /// Submissions: JSON file, JSON Lines file (.jsonl) or directory of .py files
        input: PathBuf,
        /// Similarity threshold between 0 and 1 (default 0.9, env COPYCAT_THRESHOLD)
        #[arg(short, long)]
        threshold: Option<f64>,
        /// Output format: text, json (env COPYCAT_FORMAT)
        #[arg(short, long)]
        format: Option<String>,
        /// Max pairs shown in text output (env COPYCAT_MAX_RESULTS)
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Score the structural similarity of two files
    Compare {
        /// File A
        file_a: PathBuf,
        /// File B
        file_b: PathBuf,
    },
}

pub fn run(cmd: TwinsCommands) -> anyhow::Result<()> {
    match cmd {
        TwinsCommands::Scan { input, threshold, format, limit } => {
            cmd_scan(&input, threshold, format.as_deref(), limit)?;
        }
        TwinsCommands::Compare { file_a, file_b } => {
            cmd_compare(&file_a, &file_b)?;
        }
    }
    Ok(())
}

// ==================== Scan ====================

fn cmd_scan(
    input: &Path,
    threshold: Option<f64>,
    format: Option<&str>,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    let mut config = TwinsConfig::from_env();
    if let Some(t) = threshold {
        config.threshold = t;
    }
    if let Some(f) = format {
        config.format = OutputFormat::from_str(f)
            .ok_or_else(|| anyhow::anyhow!("Unsupported format: {}", f))?;
    }
    if let Some(l) = limit {
        config.max_results = l;
    }

    let t0 = Instant::now();
    let entries = twins::load(input)?;
    tracing::info!("Loaded {} submissions from {}", entries.len(), input.display());

    let report = Scanner::from_config(&config).scan(&entries)?;

    match config.format {
        OutputFormat::Json => {
            println!("{}", twins::to_json(&report)?);
        }
        OutputFormat::Text => {
            println!("{}", twins::format_text(&report, config.threshold, config.max_results));
            println!(
                "\nDone: {} comparisons in {:.2}s",
                report.comparisons,
                t0.elapsed().as_secs_f32()
            );
        }
    }

    Ok(())
}

// ==================== Compare ====================

fn cmd_compare(file_a: &Path, file_b: &Path) -> anyhow::Result<()> {
    let mut tokenizer = Tokenizer::new()?;
    let seq_a = tokenize_file(&mut tokenizer, file_a)?;
    let seq_b = tokenize_file(&mut tokenizer, file_b)?;

    let similarity = twins::score(&seq_a, &seq_b);

    println!("A: {} ({} tokens, {})", file_a.display(), seq_a.len(), seq_a.fingerprint());
    println!("B: {} ({} tokens, {})", file_b.display(), seq_b.len(), seq_b.fingerprint());
    println!();
    if seq_a == seq_b {
        println!("similarity: {:.2}% (identical structure)", similarity * 100.0);
    } else {
        println!("similarity: {:.2}%", similarity * 100.0);
    }

    Ok(())
}

// ==================== Helpers ====================

fn tokenize_file(tokenizer: &mut Tokenizer, path: &Path) -> anyhow::Result<TokenSequence> {
    let code = std::fs::read_to_string(path)?;
    match tokenizer.tokenize(&code) {
        Ok(seq) => Ok(seq),
        Err(e) => anyhow::bail!("{}: {}", path.display(), e),
    }
}
