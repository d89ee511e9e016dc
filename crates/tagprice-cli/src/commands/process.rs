//! Process command - normalize a single recognizer result.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use tagprice_core::upstream::content_from_completion;
use tagprice_core::{ExtractionResult, PriceTagParser};

use super::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Recognizer result file, or "-" for stdin
    #[arg(default_value = "-")]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Input is a raw chat-completions response body
    #[arg(long)]
    completion: bool,

    /// Show which stage produced the record and any warnings
    #[arg(long)]
    show_warnings: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// {"label": ..., "price": ...}
    Json,
    /// {"商品": {"名前": ..., "価格": ...}}
    Envelope,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json | OutputFormat::Envelope => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let parser = PriceTagParser::from_config(&config);

    let raw = read_input(&args.input).await?;
    info!("Read {} bytes from {}", raw.len(), args.input);

    let result = parse_raw(&parser, &raw, args.completion);
    let output = format_result(&result, args.format)?;

    if let Some(output_path) = &args.output {
        tokio::fs::write(output_path, &output).await?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_warnings {
        eprintln!(
            "{} Source: {}",
            style("ℹ").blue(),
            result.source.as_str()
        );
        for warning in &result.warnings {
            eprintln!("{} {}", style("!").yellow(), warning);
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

async fn read_input(input: &str) -> anyhow::Result<String> {
    let bytes = if input == "-" {
        let mut buf = Vec::new();
        tokio::io::stdin().read_to_end(&mut buf).await?;
        buf
    } else {
        let path = PathBuf::from(input);
        if !path.exists() {
            anyhow::bail!("Input file not found: {}", path.display());
        }
        tokio::fs::read(&path).await?
    };

    // Recognizer output is untrusted; invalid UTF-8 is replaced, not rejected.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Parse raw input, unwrapping a completion body first when asked to.
pub fn parse_raw(parser: &PriceTagParser, raw: &str, completion: bool) -> ExtractionResult {
    if completion {
        parser.parse_upstream(content_from_completion(raw))
    } else {
        parser.parse(raw)
    }
}

pub fn format_result(result: &ExtractionResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(&result.record)?),
        OutputFormat::Envelope => Ok(serde_json::to_string(&result.record.to_envelope())?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["label", "price", "source"])?;
    wtr.write_record([
        result.record.label.as_str(),
        result.record.price.as_str(),
        result.source.as_str(),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &ExtractionResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("Label: {}\n", result.record.label));
    output.push_str(&format!("Price: {}\n", result.record.price));
    output.push_str(&format!("Source: {}\n", result.source.as_str()));

    if !result.warnings.is_empty() {
        output.push_str("\nWarnings:\n");
        for warning in &result.warnings {
            output.push_str(&format!("  - {}\n", warning));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_csv() {
        let result = PriceTagParser::new().parse(r#"{"商品": {"名前": "Nikon F3", "価格": "税込88,000円"}}"#);
        let csv = format_result(&result, OutputFormat::Csv).unwrap();

        assert_eq!(csv, "label,price,source\nNikon F3,\"税込88,000円\",structured\n");
    }

    #[test]
    fn test_format_text_lists_warnings() {
        let result = PriceTagParser::new().parse("");
        let text = format_result(&result, OutputFormat::Text).unwrap();

        assert!(text.starts_with("Label: 不明\nPrice: 税込0円\nSource: empty\n"));
        assert!(text.contains("Warnings:"));
    }

    #[test]
    fn test_parse_raw_completion() {
        let parser = PriceTagParser::new();
        let body = r#"{"choices": [{"message": {"content": "Leica M3 税込298,000円"}}]}"#;

        let result = parse_raw(&parser, body, true);
        assert_eq!(result.record.label, "Leica M3");
        assert_eq!(result.record.price, "税込298,000円");

        let result = parse_raw(&parser, "not a completion body", true);
        assert_eq!(result.record.price, "税込0円");
    }
}
