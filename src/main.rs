use clap::{Parser, Subcommand};
use serde::Serialize;

use runnings::config::Config;
use runnings::plan::{plan_blend, BlendPlan, BoilModel, BoilSummary, CapacityNotice, Lot};
use runnings::units::{mass, vol, Correction, Dimension, Gravity, Mass, Quantity, UnitError, Vol};

/// Density of water in g/ml at reference temperature.
const WATER_DENSITY: f64 = 0.9998395;

#[derive(Parser)]
#[command(name = "runnings")]
#[command(about = "Sparge runnings blending and boil volume planner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan how much of each running to collect for a target gravity
    Plan {
        /// Runnings as <volume>/<gravity>, e.g. '3/18' or '3gal/1.050c'.
        /// Volumes are gallons unless a unit is given; gravity readings
        /// below 1.5 are specific gravities, otherwise Brix, and are
        /// treated as uncorrected refractometer readings unless suffixed
        /// with 'c'
        #[arg(short = 'w', long = "runnings", required = true, num_args = 1..)]
        runnings: Vec<Lot>,

        /// Target original gravity (assumed already corrected)
        #[arg(short = 'o', long, value_parser = parse_corrected_gravity)]
        target_og: Gravity,

        /// Pre-boil volume in gallons
        #[arg(short = 'p', long)]
        preboil_volume: Option<f64>,

        /// Post-boil volume in gallons
        #[arg(short = 's', long)]
        postboil_volume: Option<f64>,

        /// Boil-off rate in gallons/hour
        #[arg(short = 'r', long)]
        boiloff_rate: Option<f64>,

        /// Boil time in minutes
        #[arg(short = 'd', long)]
        boil_duration: Option<f64>,

        /// Cooling shrinkage percentage
        #[arg(long)]
        shrinkage: Option<f64>,

        /// Use runnings in the order given instead of richest-first
        #[arg(long)]
        keep_order: bool,

        /// Defaults file (default: runnings.toml if present)
        #[arg(long)]
        config: Option<String>,

        /// Print the plan as JSON (volumes in liters)
        #[arg(long)]
        json: bool,
    },

    /// Convert between wort mass and volume at a given gravity
    Convert {
        /// Mass as <number><unit> tokens, e.g. '500g250mg'
        #[arg(short, long, conflicts_with = "volume")]
        mass: Option<String>,

        /// Volume as <number><unit> tokens, e.g. '5gal'
        #[arg(short, long)]
        volume: Option<String>,

        /// Specific gravity of the liquid (default: water)
        #[arg(short = 'g', long, value_parser = parse_corrected_gravity)]
        specific_gravity: Option<Gravity>,

        /// Unit to show the unknown quantity in
        #[arg(short, long)]
        units: Option<String>,
    },

    /// Rescale a hop addition by alpha acid content
    Hops {
        /// Alpha acid percentage the recipe assumed
        #[arg(short, long)]
        quoted_alpha: f64,

        /// Alpha acid percentage on the packet
        #[arg(short, long)]
        obtained_alpha: f64,

        /// Recipe weight as <number><unit> tokens, e.g. '1oz' or '28g'
        #[arg(short, long, value_parser = parse_mass)]
        weight: Quantity<Mass>,

        /// Compensate for hop basket utilization loss
        #[arg(short = 'b', long)]
        hop_basket: bool,
    },
}

fn parse_corrected_gravity(text: &str) -> Result<Gravity, UnitError> {
    Gravity::from_text(text, Correction::Corrected)
}

fn parse_mass(text: &str) -> Result<Quantity<Mass>, UnitError> {
    Quantity::from_text(text)
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Plan {
            runnings,
            target_og,
            preboil_volume,
            postboil_volume,
            boiloff_rate,
            boil_duration,
            shrinkage,
            keep_order,
            config,
            json,
        } => run_plan(
            &runnings,
            target_og,
            preboil_volume,
            postboil_volume,
            boiloff_rate,
            boil_duration,
            shrinkage,
            keep_order,
            config.as_deref(),
            json,
        ),
        Commands::Convert {
            mass,
            volume,
            specific_gravity,
            units,
        } => run_convert(
            mass.as_deref(),
            volume.as_deref(),
            specific_gravity,
            units.as_deref(),
        ),
        Commands::Hops {
            quoted_alpha,
            obtained_alpha,
            weight,
            hop_basket,
        } => run_hops(quoted_alpha, obtained_alpha, weight, hop_basket),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[derive(Serialize)]
struct PlanReport {
    plan: BlendPlan,
    capacity: Option<CapacityNotice>,
    summary: BoilSummary,
}

#[allow(clippy::too_many_arguments)]
fn run_plan(
    runnings: &[Lot],
    target_og: Gravity,
    preboil_volume: Option<f64>,
    postboil_volume: Option<f64>,
    boiloff_rate: Option<f64>,
    boil_duration: Option<f64>,
    shrinkage: Option<f64>,
    keep_order: bool,
    config_path: Option<&str>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;

    let model = BoilModel {
        boil_off_rate: Quantity::of(boiloff_rate.unwrap_or(config.boil_off_rate), vol::GAL),
        duration_min: boil_duration.unwrap_or(config.boil_duration),
        shrinkage_pct: shrinkage.unwrap_or(config.shrinkage_pct),
    };

    let (start, final_volume) = model.resolve_volumes(
        preboil_volume.map(|g| Quantity::of(g, vol::GAL)),
        postboil_volume.map(|g| Quantity::of(g, vol::GAL)),
    )?;

    let plan = plan_blend(
        target_og,
        final_volume,
        start,
        runnings,
        keep_order || config.keep_order,
    )?;
    let capacity = model.capacity_notice(plan.drawn_volume, start);
    let summary = model.summary(target_og, start, final_volume);

    if json {
        let report = PlanReport {
            plan,
            capacity,
            summary,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for (i, entry) in plan.entries.iter().enumerate() {
        println!(
            "{} runnings: {:.3} gallons",
            ordinal(i + 1),
            entry.volume.in_unit(vol::GAL)
        );
    }
    if plan.topoff.base() > 0.0 {
        println!("Topoff water: {:.3} gallons", plan.topoff.in_unit(vol::GAL));
    }
    if let Some(notice) = capacity {
        println!(
            "Kettle is {:.3} gallons short of the draw: boil {:.1} min longer ({:.1} min total)",
            notice.shortfall.in_unit(vol::GAL),
            notice.extra_min,
            notice.new_duration_min
        );
    }
    println!(
        "Pre-boil:  {:.3} gallons at {}",
        summary.start_volume.in_unit(vol::GAL),
        summary.preboil_gravity
    );
    println!(
        "Post-boil: {:.3} gallons at {}",
        summary.final_volume.in_unit(vol::GAL),
        summary.postboil_gravity
    );

    Ok(())
}

fn run_convert(
    mass_text: Option<&str>,
    volume_text: Option<&str>,
    specific_gravity: Option<Gravity>,
    units: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let gravity = specific_gravity.unwrap_or_else(|| Gravity::from_points(0.0));
    let density = WATER_DENSITY * gravity.specific_gravity();

    let (mass_str, volume_str) = match (mass_text, volume_text) {
        (_, Some(text)) => {
            let volume: Quantity<Vol> = Quantity::from_text(text)?;
            let mass = Quantity::of(density * volume.in_unit(vol::ML), mass::G);
            let unit = units.and_then(Mass::unit).unwrap_or(mass::KG);
            (
                format!("{:.4} {}", mass.in_unit(unit), unit.abbrev),
                text.to_string(),
            )
        }
        (Some(text), None) => {
            let mass: Quantity<Mass> = Quantity::from_text(text)?;
            let volume = Quantity::of(mass.in_unit(mass::G) / density, vol::ML);
            let unit = units.and_then(Vol::unit).unwrap_or(vol::GAL);
            (
                text.to_string(),
                format!("{:.4} {}", volume.in_unit(unit), unit.abbrev),
            )
        }
        (None, None) => return Err("One of --mass or --volume is required".into()),
    };

    println!("Mass:   {}", mass_str);
    println!("Volume: {}", volume_str);
    println!("SG:     {}", gravity);

    Ok(())
}

fn run_hops(
    quoted_alpha: f64,
    obtained_alpha: f64,
    weight: Quantity<Mass>,
    hop_basket: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if obtained_alpha <= 0.0 {
        return Err("Obtained alpha must be positive".into());
    }

    // Accept percentages either way: 7 and 0.07 both mean 7%.
    let quoted = if quoted_alpha > 1.0 {
        quoted_alpha / 100.0
    } else {
        quoted_alpha
    };
    let obtained = if obtained_alpha > 1.0 {
        obtained_alpha / 100.0
    } else {
        obtained_alpha
    };

    let basket_factor = if hop_basket { 1.0 / 0.9 } else { 1.0 };
    let new_weight = weight * basket_factor * (quoted / obtained);

    println!("{:.2}oz", new_weight.in_unit(mass::OZ));

    Ok(())
}

fn load_config(path: Option<&str>) -> Result<Config, Box<dyn std::error::Error>> {
    match path {
        Some(p) => Config::load_from_file(p),
        None => {
            let default_path = std::path::Path::new("runnings.toml");
            if default_path.exists() {
                Config::load_from_file(default_path)
            } else {
                Ok(Config::empty())
            }
        }
    }
}

fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinal_suffixes() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(4), "4th");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(12), "12th");
        assert_eq!(ordinal(13), "13th");
        assert_eq!(ordinal(21), "21st");
        assert_eq!(ordinal(102), "102nd");
    }

    #[test]
    fn test_cli_parses_plan_invocation() {
        let cli = Cli::try_parse_from([
            "runnings", "plan", "-w", "3/18", "-w", "2/12.5", "-o", "1.050", "-s", "5",
        ])
        .expect("valid invocation");

        match cli.command {
            Commands::Plan {
                runnings,
                target_og,
                postboil_volume,
                preboil_volume,
                ..
            } => {
                assert_eq!(runnings.len(), 2);
                assert!((target_og.points() - 50.0).abs() < 1e-9);
                assert_eq!(postboil_volume, Some(5.0));
                assert_eq!(preboil_volume, None);
            }
            _ => panic!("Expected the plan subcommand"),
        }
    }

    #[test]
    fn test_cli_rejects_bad_lot() {
        assert!(Cli::try_parse_from(["runnings", "plan", "-w", "bogus", "-o", "1.050"]).is_err());
    }
}
