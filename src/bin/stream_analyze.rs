//! stream_analyze - summarize a captured picture stream and its timing
//!
//! Scans the stream directory, prints the stream identity and size, and the
//! inter-arrival/offset statistics consumed by external plotting tooling.

use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;

use camlag::{timing, StreamMetadata};

#[path = "../ui.rs"]
mod ui;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Directory containing the stream.
    streamdir: PathBuf,
    /// Dump the full stream metadata as JSON instead of the summary.
    #[arg(short, long)]
    verbose: bool,
    /// UI mode for stderr progress (auto|plain|pretty)
    #[arg(long, env = "CAMLAG_UI", default_value = "auto", value_name = "MODE")]
    ui: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    let ui = ui::Ui::new(&args.ui, std::io::stderr().is_terminal());

    let metadata = {
        let _stage = ui.stage("Scan stream");
        StreamMetadata::scan(&args.streamdir)?
    };

    if args.verbose {
        println!("{}", serde_json::to_string_pretty(&metadata)?);
    } else {
        println!("camID       => {}", metadata.identity.cam_id);
        println!("streamDir   => {}", metadata.dir.display());
        println!("streamName  => {}", metadata.identity.stream_name);
        println!("streamTime  => {}", metadata.identity.stream_time);
    }
    println!("imageCount  => {}", metadata.image_count());
    println!("streamSize  => {} bytes", metadata.total_size_bytes());

    let times = metadata.capture_times();
    let inter_ms: Vec<f64> = timing::inter_arrival_times(&times)
        .into_iter()
        .map(timing::duration_to_ms)
        .collect();
    if !inter_ms.is_empty() {
        let mean = inter_ms.iter().sum::<f64>() / inter_ms.len() as f64;
        let min = inter_ms.iter().copied().fold(f64::INFINITY, f64::min);
        let max = inter_ms.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        println!("interArrival => mean {mean:.3} ms, min {min:.3} ms, max {max:.3} ms");
    }
    if let Some(span) = timing::delay_from_first(&times, None).last() {
        println!(
            "streamSpan  => {:.3} ms over {} pictures",
            timing::duration_to_ms(*span),
            metadata.image_count()
        );
    }
    Ok(())
}
