mod cli;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("HCLSORT_LOG"))
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(clean) => {
            if !clean {
                std::process::exit(1);
            }
        }
        Err(e) => {
            for error in e.chain() {
                eprintln!("{error}")
            }
            std::process::exit(1);
        }
    }
}

/// Runs the tool; returns false when --check found files that are not
/// canonically ordered.
fn run(cli: cli::Cli) -> anyhow::Result<bool> {
    let sort_kinds: HashSet<String> = cli.sort_kinds.iter().cloned().collect();

    if cli.paths.is_empty() {
        anyhow::ensure!(!cli.write, "--write requires file paths");
        let src = std::io::read_to_string(std::io::stdin())?;
        return process_stdin(&src, cli.check, &sort_kinds);
    }

    let files = discover(&cli.paths)?;
    anyhow::ensure!(!files.is_empty(), "No configuration files found");

    let mut clean = true;
    for path in files {
        let src = std::fs::read_to_string(&path)?;
        let sorted = hclsort::sort_source(&src, &path.display().to_string(), &sort_kinds)?;
        let changed = sorted != src;

        if cli.check {
            if changed {
                eprintln!("{} is not canonically ordered", path.display());
                clean = false;
            }
        } else if cli.write {
            if changed {
                std::fs::write(&path, &sorted)?;
                tracing::info!(path = %path.display(), "rewrote file");
            }
        } else {
            print!("{sorted}");
        }
    }

    Ok(clean)
}

/// Sorts stdin input; prints the result, or with `check` only reports
/// whether the input was already canonically ordered.
fn process_stdin(
    src: &str,
    check: bool,
    sort_kinds: &HashSet<String>,
) -> anyhow::Result<bool> {
    let sorted = hclsort::sort_source(src, "<stdin>", sort_kinds)?;

    if check {
        if sorted != src {
            eprintln!("<stdin> is not canonically ordered");
            return Ok(false);
        }
        return Ok(true);
    }

    print!("{sorted}");
    Ok(true)
}

/// Expands the given paths into the list of files to process. Plain
/// files are taken as-is, directories contribute their *.tf files.
fn discover(paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            files.extend(discover_directory(path)?);
        } else {
            files.push(path.clone());
        }
    }

    Ok(files)
}

fn discover_directory(dir_path: &Path) -> anyhow::Result<Vec<PathBuf>> {
    tracing::info!(path = %dir_path.display(), "searching directory");
    let mut files = Vec::new();

    for dir_entry in std::fs::read_dir(dir_path)? {
        let dir_entry = dir_entry?;
        if !dir_entry.file_type()?.is_file() {
            continue;
        }

        let is_tf_file = dir_entry.file_name().to_string_lossy().ends_with(".tf");
        if !is_tf_file {
            continue;
        }

        files.push(dir_entry.path());
    }

    // read_dir order is platform dependent
    files.sort();
    Ok(files)
}
