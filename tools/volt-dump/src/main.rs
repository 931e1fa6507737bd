//! Print the voltage scale table a chip calibration produces.
//!
//! Builds the table exactly as the driver would and prints it as a grid
//! (one row per thermal zone) or as JSON, for comparison against
//! reference tables captured from hardware.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use gpu_volt::tracing::prelude::*;
use gpu_volt::{
    ChipCalibration, LinearRange, ScaleTable, ScaleTableBuilder, Speedo, ThermalCompensation,
};

#[derive(Parser, Debug)]
#[command(name = "volt-dump", version, about)]
struct Args {
    /// Speedo id (silicon bin) of the chip
    #[arg(long)]
    speedo_id: u32,

    /// Measured speedo value
    #[arg(long)]
    speedo_value: i32,

    /// JSON calibration file; the built-in GM20B data is used when omitted
    #[arg(long)]
    calibration: Option<PathBuf>,

    /// Lowest regulator step (uV)
    #[arg(long, default_value_t = 600_000)]
    min_uv: i32,

    /// Regulator step size (uV)
    #[arg(long, default_value_t = 6_250)]
    step_uv: i32,

    /// Number of regulator steps
    #[arg(long, default_value_t = 161)]
    n_steps: usize,

    /// Temperature handling for the extended curve model (fixed, per-zone)
    #[arg(long, default_value = "fixed")]
    compensation: ThermalCompensation,

    /// Report the zone selected at this temperature (millidegrees C)
    #[arg(long, allow_hyphen_values = true)]
    temp: Option<i32>,

    /// Print the table as JSON instead of a grid
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    gpu_volt::tracing::init();
    let args = Args::parse();

    let calibration = match &args.calibration {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading calibration {}", path.display()))?;
            debug!(path = %path.display(), "Loaded calibration");
            ChipCalibration::from_json(&json)
                .with_context(|| format!("parsing calibration {}", path.display()))?
        }
        None => ChipCalibration::gm20b(),
    };

    let steps = LinearRange::new(args.min_uv, args.step_uv, args.n_steps);
    let speedo = Speedo::new(args.speedo_id, args.speedo_value);

    let table = ScaleTableBuilder::new(&calibration, &steps)
        .with_compensation(args.compensation)
        .build(speedo)
        .context("building scale table")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&table)?);
    } else {
        print_grid(&table);
    }

    if let Some(temp) = args.temp {
        let zone = table.thermal().select_zone(temp);
        println!();
        println!("{} m°C -> zone {}", temp, zone);
    }

    Ok(())
}

fn print_grid(table: &ScaleTable) {
    println!(
        "model: {}  steps: {}  zones: {}  vmin: {} uV  vfloor: {} uV",
        table.model(),
        table.vid_nr(),
        table.zones(),
        table.vmin_uv(),
        table.vfloor_uv()
    );
    println!();

    let boundaries = table.thermal().boundaries_c();
    for (zone, row) in table.rows().enumerate() {
        let range = format!("[{}, {})", boundaries[zone], boundaries[zone + 1]);
        let cells: Vec<String> = row.iter().map(|entry| format!("{:>8}", entry.uv)).collect();
        println!("zone {} {:>10} °C: {}", zone, range, cells.join(" "));
    }
}
