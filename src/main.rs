use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use rayon::prelude::*;
use std::path::PathBuf;

use classort::{
    file_handler::FileHandler, organize_java_with, Outcome, Selection, SortPolicy,
};

#[derive(Parser)]
#[command(name = "classort")]
#[command(version)]
#[command(about = "A highly opinionated Java class member organizer", long_about = None)]
struct Cli {
    #[arg(help = "Files or directories to organize")]
    paths: Vec<PathBuf>,

    #[arg(short, long, help = "Check if files are organized without modifying them")]
    check: bool,

    #[arg(long, help = "Print organized output to stdout instead of writing to file")]
    stdout: bool,

    #[arg(long, help = "Skip creating backups of original files")]
    no_backup: bool,

    #[arg(
        long,
        value_name = "START:END",
        help = "Only sort members fully contained in this byte range"
    )]
    select: Option<String>,

    #[arg(long, help = "Rank list-typed fields below other fields")]
    demote_list_fields: bool,

    #[arg(long, help = "Group fields by annotation presence only, without a static group")]
    group_by_annotation_only: bool,

    #[arg(long, help = "Do not insert blank lines after documented or annotated members")]
    no_member_spacing: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.paths.is_empty() {
        eprintln!("{}", "Error: No files or directories specified".red());
        std::process::exit(1);
    }

    let selection = cli
        .select
        .as_deref()
        .map(Selection::parse)
        .transpose()
        .context("Invalid --select range")?;

    let file_handler = FileHandler::new(!cli.no_backup);
    let files = file_handler.find_java_files(&cli.paths)?;

    if files.is_empty() {
        println!("{}", "No Java files found".yellow());
        return Ok(());
    }

    println!("{} {} files", "Organizing".green(), files.len());

    let mut had_changes = false;
    let mut had_errors = false;

    // Process files in parallel for better performance
    let results: Vec<_> = files
        .par_iter()
        .map(|file| process_file(&file_handler, file, &cli, selection))
        .collect();

    for (file, result) in files.iter().zip(results.iter()) {
        match result {
            Ok((changed, outcome)) => {
                if outcome.is_informational() {
                    println!("{} {} ({})", "-".yellow(), file.display(), outcome.message());
                } else if *changed {
                    had_changes = true;
                    if cli.check {
                        println!("{} {}", "✗".red(), file.display());
                    } else {
                        println!("{} {} ({})", "✓".green(), file.display(), outcome.message());
                    }
                } else {
                    println!("{} {} (no changes)", "✓".green(), file.display());
                }
            }
            Err(e) => {
                had_errors = true;
                eprintln!("{} {}: {}", "✗".red(), file.display(), e);
            }
        }
    }

    if cli.check && had_changes {
        eprintln!("\n{}", "Some files are not organized".red());
        std::process::exit(1);
    }

    if had_errors {
        eprintln!("\n{}", "Some files had errors".red());
        std::process::exit(1);
    }

    println!("\n{}", "All files organized successfully".green());
    Ok(())
}

fn process_file(
    file_handler: &FileHandler,
    path: &PathBuf,
    cli: &Cli,
    selection: Option<Selection>,
) -> Result<(bool, Outcome)> {
    let content = file_handler.read_file(path)?;

    let policy = SortPolicy {
        demote_list_fields: cli.demote_list_fields,
        static_precedes_annotated: !cli.group_by_annotation_only,
        blank_line_after_doc_or_annotation: !cli.no_member_spacing,
    };

    let result =
        organize_java_with(&content, &policy, selection).context("Failed to organize file")?;

    // Check if content changed
    if content == result.source {
        return Ok((false, result.outcome));
    }

    // Handle output
    if cli.stdout {
        println!("{}", result.source);
    } else if !cli.check {
        file_handler.write_file(path, &result.source)?;
    }

    Ok((true, result.outcome))
}
