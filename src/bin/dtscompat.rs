//! `dtscompat` — CLI front-end over the `dts_compat` core.
//!
//! Hand-rolled argument parsing, file loading, and text/JSON report
//! formatting only; every comparison decision lives in the library. Mirrors
//! the teacher's own `args.rs` (no `clap` dependency) and the
//! `[loct][error]`/`[loct][hint]` stderr convention from
//! `cli/dispatch/handlers/diff.rs`.

use std::path::PathBuf;
use std::process::ExitCode;

use dts_compat::policy::builtin::{DefaultPolicy, ReadOnlyPolicy, WriteOnlyPolicy};
use dts_compat::policy::Policy;
use dts_compat::parser::resolver::DirectoryResolver;
use dts_compat::types::{ReleaseType, Report};
use dts_compat::{compare, CompareOptions};

struct Args {
    old_path: PathBuf,
    new_path: PathBuf,
    old_filename: Option<String>,
    new_filename: Option<String>,
    policy: String,
    lib_dir: Option<PathBuf>,
    json: bool,
}

fn usage() -> &'static str {
    "dtscompat - compares two .d.ts files and classifies every change by semver impact\n\n\
Usage: dtscompat <old.d.ts> <new.d.ts> [options]\n\n\
Options:\n  \
  --policy <name>          default | read-only | write-only (default: default)\n  \
  --lib-dir <dir>          Directory of library .d.ts files for unresolved references\n  \
  --old-filename <name>    Display name for the old side (default: old.d.ts)\n  \
  --new-filename <name>    Display name for the new side (default: new.d.ts)\n  \
  --json                   Emit the report as JSON instead of text\n  \
  --help, -h                Show this message\n\n\
Exit codes:\n  \
  0  overall release type is none, patch, or minor\n  \
  1  overall release type is major\n  \
  2  overall release type is forbidden, or a hard error occurred\n"
}

fn parse_args(raw: &[String]) -> Result<Args, String> {
    let mut positional: Vec<PathBuf> = Vec::new();
    let mut old_filename = None;
    let mut new_filename = None;
    let mut policy = "default".to_string();
    let mut lib_dir = None;
    let mut json = false;

    let mut i = 0;
    while i < raw.len() {
        match raw[i].as_str() {
            "--policy" => {
                i += 1;
                policy = raw.get(i).ok_or("--policy requires a value")?.clone();
            }
            "--lib-dir" => {
                i += 1;
                lib_dir = Some(PathBuf::from(raw.get(i).ok_or("--lib-dir requires a value")?));
            }
            "--old-filename" => {
                i += 1;
                old_filename = Some(raw.get(i).ok_or("--old-filename requires a value")?.clone());
            }
            "--new-filename" => {
                i += 1;
                new_filename = Some(raw.get(i).ok_or("--new-filename requires a value")?.clone());
            }
            "--json" => json = true,
            other => positional.push(PathBuf::from(other)),
        }
        i += 1;
    }

    if positional.len() != 2 {
        return Err(format!(
            "expected exactly two positional arguments (old.d.ts new.d.ts), got {}",
            positional.len()
        ));
    }

    Ok(Args {
        old_path: positional[0].clone(),
        new_path: positional[1].clone(),
        old_filename,
        new_filename,
        policy,
        lib_dir,
        json,
    })
}

fn resolve_policy(name: &str) -> Result<Box<dyn Policy>, String> {
    match name {
        "default" => Ok(Box::new(DefaultPolicy)),
        "read-only" => Ok(Box::new(ReadOnlyPolicy)),
        "write-only" => Ok(Box::new(WriteOnlyPolicy)),
        other => Err(format!("unknown policy \"{other}\" (expected default, read-only, or write-only)")),
    }
}

fn print_text_report(report: &Report) {
    println!("Overall release type: {}", report.release_type);
    println!(
        "Symbols: {} old, {} new ({} added, {} removed, {} modified, {} unchanged)",
        report.stats.total_old,
        report.stats.total_new,
        report.stats.added,
        report.stats.removed,
        report.stats.modified,
        report.stats.unchanged
    );

    let sections: [(&str, &[dts_compat::Change]); 4] = [
        ("Forbidden", &report.changes_by_impact.forbidden),
        ("Breaking", &report.changes_by_impact.breaking),
        ("Non-breaking", &report.changes_by_impact.non_breaking),
        ("Unchanged", &report.changes_by_impact.unchanged),
    ];

    for (label, changes) in sections {
        if changes.is_empty() || label == "Unchanged" {
            continue;
        }
        println!("\n{label}:");
        for change in changes {
            println!(
                "  [{}] {} ({}): {}",
                change.release_type, change.change.symbol_name, change.change.symbol_kind, change.change.explanation
            );
        }
    }

    if !report.warnings.is_empty() {
        eprintln!("\nWarnings:");
        for warning in &report.warnings {
            eprintln!("[dtscompat][warn] {warning}");
        }
    }
}

fn run() -> Result<Report, String> {
    let raw: Vec<String> = std::env::args().skip(1).collect();
    if raw.iter().any(|a| a == "--help" || a == "-h") {
        println!("{}", usage());
        std::process::exit(0);
    }

    let args = parse_args(&raw)?;

    let old_source = std::fs::read_to_string(&args.old_path)
        .map_err(|e| format!("failed to read {}: {e}", args.old_path.display()))?;
    let new_source = std::fs::read_to_string(&args.new_path)
        .map_err(|e| format!("failed to read {}: {e}", args.new_path.display()))?;

    let policy = resolve_policy(&args.policy)?;
    let resolver = args.lib_dir.clone().map(DirectoryResolver::new);

    let mut options = CompareOptions::new(old_source, new_source).with_policy(policy.as_ref());
    if let Some(old_filename) = &args.old_filename {
        options.old_filename = old_filename.clone();
    } else {
        options.old_filename = args.old_path.display().to_string();
    }
    if let Some(new_filename) = &args.new_filename {
        options.new_filename = new_filename.clone();
    } else {
        options.new_filename = args.new_path.display().to_string();
    }
    if let Some(resolver) = &resolver {
        options = options.with_library_file_resolver(resolver);
    }

    let report = compare(options);

    if args.json {
        let json = serde_json::to_string_pretty(&report).map_err(|e| format!("failed to serialize report: {e}"))?;
        println!("{json}");
    } else {
        print_text_report(&report);
    }

    Ok(report)
}

fn main() -> ExitCode {
    match run() {
        Ok(report) => match report.release_type {
            ReleaseType::Forbidden => ExitCode::from(2),
            ReleaseType::Major => ExitCode::from(1),
            ReleaseType::Minor | ReleaseType::Patch | ReleaseType::None => ExitCode::SUCCESS,
        },
        Err(err) => {
            eprintln!("[dtscompat][error] {err}");
            eprintln!("[dtscompat][hint] run with --help for usage");
            ExitCode::from(2)
        }
    }
}

