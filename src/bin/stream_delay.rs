//! stream_delay - synthesize an artificially delayed copy of a stream
//!
//! Scans the original stream, plans a delayed copy by sampling the requested
//! delay distribution once per picture, and materializes the copy into a new
//! per-stream subfolder of the output root. The `_SUCCESS` marker inside the
//! new folder signals completion; without it the folder must be treated as
//! incomplete.

use anyhow::{anyhow, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;

use camlag::config::ToolConfig;
use camlag::{DelayModel, StreamMetadata, SyntheticStreamMetadata};

#[path = "../ui.rs"]
mod ui;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Directory containing the original stream.
    streamdir: PathBuf,
    /// Existing directory to put the modified stream in; a new, per-stream
    /// subfolder is created inside it. Falls back to CAMLAG_OUTPUT_ROOT.
    outputdir: Option<PathBuf>,
    /// Delay distribution: const,<delay_ms> | exp,<mean_ms> | norm,<mu_ms>,<sigma_ms>.
    /// Falls back to CAMLAG_DISTRIBUTION.
    #[arg(short, long)]
    distribution: Option<String>,
    /// Dump the planned synthetic metadata as JSON before materializing.
    #[arg(short, long)]
    verbose: bool,
    /// UI mode for stderr progress (auto|plain|pretty)
    #[arg(long, value_name = "MODE")]
    ui: Option<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let cfg = ToolConfig::load()?;
    let ui_mode = args.ui.as_deref().unwrap_or(&cfg.ui);
    let ui = ui::Ui::new(ui_mode, std::io::stderr().is_terminal());

    let output_root = args
        .outputdir
        .or(cfg.output_root)
        .ok_or_else(|| anyhow!("no output directory given (argument or CAMLAG_OUTPUT_ROOT)"))?;
    if !output_root.is_dir() {
        return Err(anyhow!(
            "output directory '{}' does not exist",
            output_root.display()
        ));
    }
    let spec = args
        .distribution
        .or(cfg.distribution)
        .ok_or_else(|| anyhow!("no delay distribution given (argument or CAMLAG_DISTRIBUTION)"))?;
    let model = DelayModel::parse(&spec)?;

    let metadata = {
        let _stage = ui.stage("Scan stream");
        StreamMetadata::scan(&args.streamdir)?
    };
    println!(
        "found {} images in stream '{}'",
        metadata.image_count(),
        metadata.identity.stream_name
    );

    let mut rng = rand::thread_rng();
    let plan = {
        let _stage = ui.stage("Plan delayed copy");
        SyntheticStreamMetadata::plan(&metadata, &model, &mut rng)
    };
    if args.verbose {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    }

    let target = {
        let _stage = ui.stage("Materialize delayed copy");
        plan.materialize(&output_root)?
    };
    println!("delayed stream written to {}", target.display());
    Ok(())
}
