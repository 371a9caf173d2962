//! `roots` command-line tool
//!
//! **Usage:**
//! ```bash
//! roots import family.ged --out vault/
//! roots check vault/ --json
//! roots fix vault/ --kind add-missing-reciprocal-links
//! roots export vault/ > graph.json
//! roots anonymize family.ged shareable.ged --keep-dates
//! ```

mod fs_store;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fs_store::FsStore;
use roots_core::{FamilyTree, ImportOptions, Importer, RootsConfig};
use roots_gedcom::{decode, AnonymizeOptions, Anonymizer};
use roots_graph::FixKind;
use roots_model::{CancelToken, Finding, Severity};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Import GEDCOM files and check family trees kept as Markdown documents
#[derive(Parser, Debug)]
#[command(name = "roots", version, about)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a GEDCOM file into person documents
    Import {
        /// GEDCOM file
        file: PathBuf,
        /// Folder to write documents into
        #[arg(long, value_name = "DIR")]
        out: PathBuf,
        /// Folder for person documents, relative to the output folder
        #[arg(long)]
        people_folder: Option<String>,
        /// Write ids only, without wikilink fields
        #[arg(long)]
        no_wikilinks: bool,
    },
    /// Validate the documents in a folder
    Check {
        /// Document folder
        dir: PathBuf,
    },
    /// Repair one or more categories of findings
    Fix {
        /// Document folder
        dir: PathBuf,
        /// Fix to run; repeat for several, omit for all
        #[arg(long)]
        kind: Vec<FixKind>,
    },
    /// Print the graph's nodes and edges as JSON
    Export {
        /// Document folder
        dir: PathBuf,
    },
    /// Strip personal data from a GEDCOM file, keeping its structure
    Anonymize {
        /// Input GEDCOM file
        input: PathBuf,
        /// Output file
        output: PathBuf,
        /// Keep dates unchanged
        #[arg(long)]
        keep_dates: bool,
        /// Keep places unchanged
        #[arg(long)]
        keep_places: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => RootsConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => RootsConfig::default(),
    };

    match cli.command {
        Command::Import {
            file,
            out,
            people_folder,
            no_wikilinks,
        } => {
            let mut options = ImportOptions::from_config(&config);
            if let Some(folder) = people_folder {
                options = options.with_people_folder(folder);
            }
            if no_wikilinks {
                options = options.with_wikilinks(false);
            }
            import(&file, &out, options, cli.json)
        }
        Command::Check { dir } => check(&dir, config, cli.json),
        Command::Fix { dir, kind } => fix(&dir, config, &kind, cli.json),
        Command::Export { dir } => export(&dir, config),
        Command::Anonymize {
            input,
            output,
            keep_dates,
            keep_places,
        } => anonymize(
            &input,
            &output,
            AnonymizeOptions::default()
                .with_keep_dates(keep_dates)
                .with_keep_places(keep_places),
            cli.json,
        ),
    }
}

fn import(file: &Path, out: &Path, options: ImportOptions, json: bool) -> Result<ExitCode> {
    let bytes = std::fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    let mut store = FsStore::open(out)?;
    let report = Importer::new(options).run(&bytes, &mut store, &CancelToken::new())?;

    if json {
        let value = serde_json::json!({
            "ids": report.ids,
            "written": report.written,
            "cancelled": report.cancelled,
            "findings": report.findings,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print_findings(&report.findings);
        println!(
            "imported {} people into {} ({} findings)",
            report.written.len(),
            out.display(),
            report.findings.len()
        );
    }
    Ok(exit_code(&report.findings))
}

fn open_tree(dir: &Path, config: RootsConfig) -> Result<(FsStore, FamilyTree)> {
    let store = FsStore::open(dir)?;
    let tree = FamilyTree::new(config);
    tree.load(&store)
        .with_context(|| format!("reading documents under {}", dir.display()))?;
    Ok((store, tree))
}

fn check(dir: &Path, config: RootsConfig, json: bool) -> Result<ExitCode> {
    let (_, tree) = open_tree(dir, config)?;
    let findings = tree.validate();

    if json {
        println!("{}", serde_json::to_string_pretty(&findings)?);
    } else {
        print_findings(&findings);
        println!("{} people, {} findings", tree.graph().len(), findings.len());
    }
    Ok(exit_code(&findings))
}

fn fix(dir: &Path, config: RootsConfig, kinds: &[FixKind], json: bool) -> Result<ExitCode> {
    let (mut store, tree) = open_tree(dir, config)?;
    let kinds = if kinds.is_empty() { FixKind::ALL.to_vec() } else { kinds.to_vec() };

    let mut applied = Vec::new();
    for kind in kinds {
        let edits = tree.apply_fix(kind, &mut store)?;
        if !json {
            for edit in &edits {
                println!("{kind}: {edit}");
            }
        }
        applied.extend(edits);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&applied)?);
    } else {
        println!("{} edits written", applied.len());
    }
    Ok(ExitCode::SUCCESS)
}

fn export(dir: &Path, config: RootsConfig) -> Result<ExitCode> {
    let (_, tree) = open_tree(dir, config)?;
    println!("{}", serde_json::to_string_pretty(&tree.graph().export())?);
    Ok(ExitCode::SUCCESS)
}

fn anonymize(input: &Path, output: &Path, options: AnonymizeOptions, json: bool) -> Result<ExitCode> {
    let bytes = std::fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let decoded = decode(&bytes);
    print_findings(&decoded.findings);

    let (text, summary) = Anonymizer::new(options).anonymize(&decoded.value.text);
    std::fs::write(output, text).with_context(|| format!("writing {}", output.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "wrote {}: {} lines, {} names and {} places replaced",
            output.display(),
            summary.lines,
            summary.names,
            summary.places
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn print_findings(findings: &[Finding]) {
    for finding in findings {
        eprintln!("{finding}");
    }
}

/// Failure when anything at error severity was found
fn exit_code(findings: &[Finding]) -> ExitCode {
    if findings.iter().any(|f| f.severity == Severity::Error) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
