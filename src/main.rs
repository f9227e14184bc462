// SPDX-License-Identifier: MIT

//! po-mend: merge gettext PO catalogs and repair duplicated plural forms.
//!
//! The binary is a thin boundary around the library: it reads files, runs
//! one core operation, writes the result in a single pass, and reports. All
//! user interaction (overwrite confirmation, colored status lines, the
//! JSON-per-line defect report) happens here, never in the core.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use po_mend::catalog::{self, Catalog};
use po_mend::{dupes, merge};

#[derive(Parser)]
#[command(name = "po-mend")]
#[command(version)]
#[command(about = "Merge translations between PO catalogs and repair duplicated plural forms")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy finished translations from a complete catalog into a subset catalog
    Merge {
        /// Fully translated catalog to take translations from
        #[arg(value_name = "COMPLETE")]
        complete: PathBuf,

        /// Structurally matching catalog with untranslated entries
        #[arg(value_name = "SUBSET")]
        subset: PathBuf,

        /// Where to write the merged catalog
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Overwrite the output file without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Scan a catalog for duplicated plural translations
    Check {
        /// Catalog to scan
        #[arg(value_name = "TARGET")]
        target: PathBuf,

        /// Repair defects from this reference catalog and rewrite TARGET
        #[arg(long, value_name = "REFERENCE")]
        fix: Option<PathBuf>,

        /// Rewrite TARGET without asking
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Merge {
            complete,
            subset,
            output,
            force,
        } => run_merge(&complete, &subset, &output, force),
        Commands::Check { target, fix, force } => match fix {
            Some(reference) => run_fix(&target, &reference, force),
            None => run_check(&target),
        },
    }
}

fn run_merge(complete: &Path, subset: &Path, output: &Path, force: bool) -> Result<()> {
    let complete_catalog = load_catalog(complete)?;
    let mut subset_catalog = load_catalog(subset)?;

    let stats = merge::merge(&complete_catalog, &mut subset_catalog)?;

    if !confirm_overwrite(output, force)? {
        println!("{}", "aborted, nothing written".yellow());
        return Ok(());
    }
    write_catalog(output, &subset_catalog)?;

    println!(
        "{} translated, {} not translated -> {}",
        stats.translated.to_string().green(),
        stats.untranslated.to_string().red(),
        output.display()
    );
    Ok(())
}

fn run_check(target: &Path) -> Result<()> {
    let catalog = load_catalog(target)?;
    let defects = dupes::detect(&catalog, &target.to_string_lossy());

    for defect in &defects {
        println!("{}", serde_json::to_string(defect)?);
    }
    if defects.is_empty() {
        eprintln!("{}", "no duplicated plural translations found".green());
    } else {
        eprintln!(
            "{}",
            format!("{} defective entries", defects.len()).red()
        );
    }
    Ok(())
}

fn run_fix(target: &Path, reference: &Path, force: bool) -> Result<()> {
    let mut catalog = load_catalog(target)?;
    let reference_catalog = load_catalog(reference)?;

    let repairs = dupes::repair(&mut catalog, &reference_catalog, &target.to_string_lossy());
    let resolved = repairs.iter().filter(|r| r.resolved).count();

    if !confirm_overwrite(target, force)? {
        println!("{}", "aborted, nothing written".yellow());
        return Ok(());
    }
    write_catalog(target, &catalog)?;

    println!(
        "resolved {} of {} defects",
        resolved.to_string().green(),
        repairs.len()
    );
    Ok(())
}

fn load_catalog(path: &Path) -> Result<Catalog> {
    if !path.exists() {
        bail!("file not found: {}", path.display());
    }
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    catalog::parse(&source).with_context(|| format!("failed to parse {}", path.display()))
}

/// Single-pass write: all catalog mutation happened in memory before this.
fn write_catalog(path: &Path, catalog: &Catalog) -> Result<()> {
    fs::write(path, catalog::serialize(catalog))
        .with_context(|| format!("failed to write {}", path.display()))
}

/// Ask before clobbering an existing file; re-prompt on junk input.
fn confirm_overwrite(path: &Path, force: bool) -> Result<bool> {
    if force || !path.exists() {
        return Ok(true);
    }
    let stdin = io::stdin();
    loop {
        print!("overwrite {}? [y/N] ", path.display());
        io::stdout().flush()?;
        let mut answer = String::new();
        if stdin.lock().read_line(&mut answer)? == 0 {
            return Ok(false); // stdin closed: treat as "no"
        }
        match answer.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" | "" => return Ok(false),
            _ => eprintln!("please answer y or n"),
        }
    }
}
