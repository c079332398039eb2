//! shape subcommand - structural tokens of a single file

use clap::Subcommand;
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum ShapeCommands {
    /// Print the structural token sequence of a file
    Tokens {
        /// Python source file
        file: PathBuf,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Check a file for syntax errors
    Check {
        /// Python source file
        file: PathBuf,
    },
}

pub fn run(cmd: ShapeCommands) -> anyhow::Result<()> {
    match cmd {
        ShapeCommands::Tokens { file, json } => cmd_tokens(&file, json)?,
        ShapeCommands::Check { file } => cmd_check(&file)?,
    }
    Ok(())
}

fn cmd_tokens(file: &Path, json: bool) -> anyhow::Result<()> {
    let code = std::fs::read_to_string(file)?;
    let seq = match shape::tokenize(&code) {
        Ok(seq) => seq,
        Err(e) => anyhow::bail!("{}: {}", file.display(), e),
    };

    if json {
        let output = serde_json::json!({
            "file": file.display().to_string(),
            "count": seq.len(),
            "fingerprint": seq.fingerprint(),
            "tokens": seq,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("File: {}", file.display());
        println!("Tokens ({}): {}", seq.len(), seq);
        println!("Fingerprint: {}", seq.fingerprint());
    }

    Ok(())
}

fn cmd_check(file: &Path) -> anyhow::Result<()> {
    let code = std::fs::read_to_string(file)?;
    match shape::check(&code) {
        Ok(()) => {
            println!("{}: ok", file.display());
            Ok(())
        }
        Err(e) if e.is_syntax() => {
            eprintln!("{}: {}", file.display(), e);
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}
