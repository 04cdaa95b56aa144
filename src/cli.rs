use clap::{Parser, ValueEnum};
use std::fmt;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "fable2file")]
#[command(author, version, about, long_about = None)]
#[command(about = "Export your Fable book library to CSV, JSON, and Markdown")]
pub struct Args {
    /// Directory to write export files into
    #[arg(short, long, default_value = "exports")]
    pub output: PathBuf,

    /// Export format(s); repeatable or comma-separated
    #[arg(short, long, value_enum, value_delimiter = ',', default_values_t = [ExportFormat::Csv])]
    pub format: Vec<ExportFormat>,

    /// Write one file set per book list instead of one combined export
    #[arg(short, long)]
    pub separate_lists: bool,

    /// Per-request timeout in seconds
    #[arg(short, long, default_value = "10")]
    pub timeout: u64,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Md,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Md => "md",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Json => "JSON",
            ExportFormat::Md => "Markdown",
        }
    }

    pub fn file_name(&self, stem: &str) -> String {
        format!("{}.{}", stem, self.extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
