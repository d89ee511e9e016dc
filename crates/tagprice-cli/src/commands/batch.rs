//! Batch processing command for multiple recognizer result files.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use tagprice_core::{ExtractionResult, PriceTagParser};

use super::load_config;
use super::process::{format_result, parse_raw, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory (default: one JSON record per line on stdout)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Inputs are raw chat-completions response bodies
    #[arg(long)]
    completion: bool,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue when a file cannot be read
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    result: Option<ExtractionResult>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let parser = Arc::new(PriceTagParser::from_config(&config));

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        tokio::fs::create_dir_all(output_dir).await?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let permits = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut tasks = JoinSet::new();

    for (index, path) in files.into_iter().enumerate() {
        let parser = Arc::clone(&parser);
        let permits = Arc::clone(&permits);
        let completion = args.completion;

        tasks.spawn(async move {
            let _permit = permits.acquire_owned().await;
            let file_start = Instant::now();

            let outcome = tokio::fs::read(&path)
                .await
                .map(|bytes| parse_raw(&parser, &String::from_utf8_lossy(&bytes), completion));

            let processing_time_ms = file_start.elapsed().as_millis() as u64;
            let result = match outcome {
                Ok(result) => ProcessResult {
                    path,
                    result: Some(result),
                    error: None,
                    processing_time_ms,
                },
                Err(e) => ProcessResult {
                    path,
                    result: None,
                    error: Some(e.to_string()),
                    processing_time_ms,
                },
            };

            (index, result)
        });
    }

    let mut results = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        let (index, result) = joined?;

        if let Some(error_msg) = &result.error {
            if args.continue_on_error {
                warn!("Failed to read {}: {}", result.path.display(), error_msg);
            } else {
                error!("Failed to read {}: {}", result.path.display(), error_msg);
                anyhow::bail!("Processing failed: {}", error_msg);
            }
        }

        results.push((index, result));
        pb.inc(1);
    }
    pb.finish_and_clear();

    results.sort_by_key(|(index, _)| *index);
    let results: Vec<ProcessResult> = results.into_iter().map(|(_, r)| r).collect();

    write_outputs(&results, &args).await?;

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();
    let defaulted = results
        .iter()
        .filter_map(|r| r.result.as_ref())
        .filter(|r| !r.warnings.is_empty())
        .count();

    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} clean, {} with defaults, {} unreadable",
        style(results.len() - failed.len() - defaulted).green(),
        style(defaulted).yellow(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Unreadable files:").red());
        for result in &failed {
            eprintln!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

async fn write_outputs(results: &[ProcessResult], args: &BatchArgs) -> anyhow::Result<()> {
    for item in results {
        let Some(result) = &item.result else {
            continue;
        };

        match &args.output_dir {
            Some(output_dir) => {
                let output_path = output_path_for(output_dir, &item.path, args.format);
                tokio::fs::write(&output_path, format_result(result, args.format)?).await?;
                debug!("Wrote output to {}", output_path.display());
            }
            None => println!("{}", serde_json::to_string(&result.record)?),
        }
    }

    Ok(())
}

fn output_path_for(output_dir: &Path, input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("result");

    output_dir.join(format!("{}.{}", stem, format.extension()))
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "source",
        "label",
        "price",
        "warnings",
        "processing_time_ms",
        "error",
    ])?;

    for item in results {
        let filename = item.path.file_name().and_then(|s| s.to_str()).unwrap_or("");
        let time = item.processing_time_ms.to_string();

        if let Some(result) = &item.result {
            wtr.write_record([
                filename,
                "success",
                result.source.as_str(),
                &result.record.label,
                &result.record.price,
                &result.warnings.len().to_string(),
                &time,
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                &time,
                item.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_for() {
        let path = output_path_for(Path::new("out"), Path::new("in/card-01.txt"), OutputFormat::Csv);
        assert_eq!(path, PathBuf::from("out/card-01.csv"));

        let path = output_path_for(Path::new("out"), Path::new("in/card-01.txt"), OutputFormat::Envelope);
        assert_eq!(path, PathBuf::from("out/card-01.json"));
    }

    #[test]
    fn test_write_summary() {
        let dir = tempfile::tempdir().unwrap();
        let summary_path = dir.path().join("summary.csv");
        let parser = PriceTagParser::new();

        let results = vec![
            ProcessResult {
                path: PathBuf::from("a.txt"),
                result: Some(parser.parse("Nikon F3 税込88,000円")),
                error: None,
                processing_time_ms: 1,
            },
            ProcessResult {
                path: PathBuf::from("b.txt"),
                result: None,
                error: Some("permission denied".to_string()),
                processing_time_ms: 0,
            },
        ];

        write_summary(&summary_path, &results).unwrap();
        let content = std::fs::read_to_string(&summary_path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "a.txt,success,fallback,Nikon F3,\"税込88,000円\",0,1,");
        assert_eq!(lines[2], "b.txt,error,,,,,0,permission denied");
    }
}
