//! hclsort cli interface

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Files or directories to process
    ///
    /// Directories are searched for *.tf files. Reads from stdin and
    /// prints to stdout when no paths are given.
    pub paths: Vec<PathBuf>,

    /// Rewrite files in place instead of printing to stdout
    #[clap(short = 'w', long)]
    pub write: bool,

    /// Print nothing and exit with status 1 if any file is not
    /// canonically ordered
    #[clap(short = 'c', long, conflicts_with = "write")]
    pub check: bool,

    /// Top-level block kinds sorted by their first label
    #[clap(
        short = 's',
        long = "sort",
        value_delimiter = ',',
        default_values_t = [String::from("variable"), String::from("output")]
    )]
    pub sort_kinds: Vec<String>,
}
