//! Input collection, parallel processing and output for the CLI

use colored::*;
use docreflow_lib::document::{DocumentError, read_text_file};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Where a piece of text came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    File(PathBuf),
}

impl Source {
    /// Label used in headers and diagnostics
    pub fn display_name(&self) -> String {
        match self {
            Source::Stdin => "<stdin>".to_string(),
            Source::File(path) => path.display().to_string(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Source::Stdin => None,
            Source::File(path) => Some(path),
        }
    }
}

/// Turn CLI paths into sources; no paths, `-` or `--stdin` mean standard input
pub fn collect_sources(paths: &[PathBuf], stdin: bool) -> Vec<Source> {
    if stdin || paths.is_empty() {
        return vec![Source::Stdin];
    }
    paths
        .iter()
        .map(|path| {
            if path.as_os_str() == "-" {
                Source::Stdin
            } else {
                Source::File(path.clone())
            }
        })
        .collect()
}

/// Directory to start configuration discovery from, based on the first input
pub fn discovery_dir(sources: &[Source]) -> Option<&Path> {
    let first = sources.first()?.path()?;
    if first.is_dir() {
        Some(first)
    } else {
        first.parent().filter(|parent| parent.is_dir())
    }
}

/// Read the text of `source`
pub fn read_source(source: &Source) -> Result<String, DocumentError> {
    match source {
        Source::File(path) => read_text_file(path),
        Source::Stdin => {
            let mut buffer = Vec::new();
            io::stdin()
                .read_to_end(&mut buffer)
                .map_err(|source| DocumentError::Io {
                    source,
                    path: PathBuf::from("<stdin>"),
                })?;
            Ok(docreflow_lib::document::decode_utf8(&buffer))
        }
    }
}

/// Apply `op` to every source, in parallel when the `parallel` feature is on
///
/// Results come back in input order.
pub fn process_sources<T, F>(sources: &[Source], op: F) -> Vec<Result<T, DocumentError>>
where
    T: Send,
    F: Fn(&Source) -> Result<T, DocumentError> + Sync + Send,
{
    // Standard input can only be read once, from the main thread
    if sources.len() <= 1 || sources.contains(&Source::Stdin) {
        return sources.iter().map(&op).collect();
    }

    #[cfg(feature = "parallel")]
    {
        sources.par_iter().map(&op).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        sources.iter().map(&op).collect()
    }
}

/// Replace the contents of `path` when `formatted` differs from `original`
///
/// Returns whether the file was written.
pub fn write_in_place(path: &Path, original: &str, formatted: &str) -> Result<bool, DocumentError> {
    if original == formatted {
        return Ok(false);
    }
    fs::write(path, formatted).map_err(|source| DocumentError::Io {
        source,
        path: path.to_path_buf(),
    })?;
    log::debug!("Rewrote {}", path.display());
    Ok(true)
}

/// Print an error for `source` to stderr
pub fn report_error(source: &Source, err: &DocumentError) {
    eprintln!("{}: {}: {}", "Error".red().bold(), source.display_name(), err);
}

/// Print a `==> name <==` header before each result when there are several
pub fn print_header(source: &Source, total: usize, quiet: bool) {
    if total > 1 && !quiet {
        println!("{}", format!("==> {} <==", source.display_name()).bold());
    }
}
