// piiguard/src/commands/scan.rs
use anyhow::{Context, Result};
use log::{info, warn};
use std::fs;
use std::io::{self, Read, Write};

use piiguard_core::{AnalysisRequest, AnalyzerEngine, Detection};

use crate::cli::ScanCommand;
use crate::settings;

/// Analyzes the input once and writes the detections to `out` as JSON.
pub async fn run_scan<W: Write>(cmd: &ScanCommand, out: &mut W) -> Result<()> {
    let input = read_input(cmd)?;

    let mut config = settings::load_config(&cmd.config)?;
    config.default_entities = Some(settings::default_entities(&config, std::env::vars()));
    let engine = AnalyzerEngine::from_config(&config).context("Failed to build recognizers")?;

    let request = AnalysisRequest::new(input)
        .with_language(cmd.language.as_str())
        .with_entities(cmd.entities.iter().map(|e| e.trim()).filter(|e| !e.is_empty()));
    let result = engine.analyze(&request).await?;

    for failure in &result.failures {
        warn!("Recognizer '{}' contributed nothing: {}", failure.recognizer, failure.error);
    }
    info!("Found {} detections.", result.detections.len());

    write_detections(out, &result.detections, cmd.pretty)
}

fn read_input(cmd: &ScanCommand) -> Result<String> {
    match &cmd.input_file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn write_detections<W: Write>(out: &mut W, detections: &[Detection], pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, detections)?;
    } else {
        serde_json::to_writer(&mut *out, detections)?;
    }
    writeln!(out)?;
    Ok(())
}
