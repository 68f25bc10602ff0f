//! Example: Run a full resonance cascade and write every layer to PNG.
//!
//! Run with:
//!     cargo run --example cascade_demo
//!
//! Set `RUST_LOG=debug` to see per-layer timing.

use env_logger::Env;
use resonance_cascade::{
    cascade_factor, theoretical_cascade_sum, CascadeConfig, CascadeDriver, CompletionHook,
    ImageSink,
};
use std::path::Path;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    println!("Resonance Cascade Demo");
    println!("======================\n");

    let config = CascadeConfig::default();
    let params = &config.params;

    println!("Parameters:");
    println!("  alpha: {}", params.alpha);
    println!("  layers: {}", params.layers);
    println!("  periods: {:?} us", params.alignment_periods);
    println!("  discrete sum: {:.6}", theoretical_cascade_sum(params));
    println!("  cascade factor: {:.6}\n", cascade_factor(params));

    let output_dir = Path::new("cascade_frames");
    println!("Writing frames to: {}", output_dir.display());
    let mut sink = ImageSink::new(output_dir)?;

    let hook = CompletionHook::new(b"cascade-complete".to_vec(), |payload| {
        println!("  Completion hook received {} bytes", payload.len());
    });

    let mut driver = CascadeDriver::new(config)?;
    let report = driver.run(&mut sink, Some(hook), None)?;

    println!();
    println!(
        "Layers successful: {}/{}",
        report.successful_layers.len(),
        report.params.layers
    );
    println!("Success rate: {:.1}%", report.success_rate * 100.0);
    println!("Cascade energy: {:.6}", report.statistics.total_energy());
    println!("Cascade efficiency: {:.1}%", report.efficiency * 100.0);
    println!("Frames written: {}", sink.written().len());

    let report_path = output_dir.join("report.json");
    std::fs::write(&report_path, report.to_json()?)?;
    println!("Report: {}", report_path.display());

    Ok(())
}
