mod export;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use island_core::{PrimitiveKind, World, WorldGenerator, WorldProfile};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "islandgen")]
#[command(about = "Generate an island heightmap with tile layers and shoreline masks")]
struct Args {
    /// World profile (JSON). Built-in defaults are used when omitted.
    #[arg(short, long)]
    profile: Option<PathBuf>,

    /// Override the grid size (must be even)
    #[arg(short, long)]
    size: Option<usize>,

    /// Override the noise seed
    #[arg(long)]
    seed: Option<u32>,

    /// Override the water level
    #[arg(short, long)]
    water_level: Option<f32>,

    /// Use Perlin instead of the profile's noise primitive
    #[arg(long)]
    perlin: bool,

    /// Directory for grayscale PNG dumps of every grid
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Write all grids as flat JSON to this file
    #[arg(long)]
    json: Option<PathBuf>,

    /// Print the effective profile as JSON and exit
    #[arg(long)]
    print_profile: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut profile = match &args.profile {
        Some(path) => WorldProfile::from_path(path)?,
        None => WorldProfile::default(),
    };
    if let Some(size) = args.size {
        profile.size = size;
    }
    if let Some(seed) = args.seed {
        profile.noise.seed = seed;
    }
    if let Some(level) = args.water_level {
        profile.water_level = level;
    }
    if args.perlin {
        profile.noise.primitive = PrimitiveKind::Perlin;
    }

    if args.print_profile {
        profile.validate()?;
        println!("{}", profile.to_json_string()?);
        return Ok(());
    }

    let start = Instant::now();
    let generator = WorldGenerator::new(profile)?;
    let world = generator.generate();
    info!(
        size = world.size(),
        seed = world.profile().noise.seed,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "generated world"
    );
    for w in world.warnings() {
        warn!("{w}");
    }

    let land = land_cells(&world);
    let cells = world.size() * world.size();
    info!(
        "land cells: {} ({:.1}%)",
        land,
        100.0 * land as f64 / cells as f64
    );
    for (i, layer) in world.classification().layers().iter().enumerate() {
        let occupied = layer
            .occupant
            .as_slice()
            .iter()
            .filter(|o| o.is_some())
            .count();
        info!(layer = i, occupied, "layer coverage");
    }

    if let Some(dir) = &args.out {
        export::write_images(&world, dir)?;
    }
    if let Some(path) = &args.json {
        export::write_json(&world, path)?;
    }

    Ok(())
}

// Same strict comparison as the ground mask: a cell at the water level is not land
fn land_cells(world: &World) -> usize {
    let water_level = world.profile().water_level;
    world
        .height()
        .as_slice()
        .iter()
        .filter(|&&e| e > water_level)
        .count()
}

#[cfg(test)]
mod tests {
    use super::land_cells;
    use island_core::world::GROUND_MASK;
    use island_core::{WorldGenerator, WorldProfile};

    #[test]
    fn land_count_agrees_with_ground_mask() {
        let profile = WorldProfile {
            size: 48,
            ..WorldProfile::default()
        };
        let world = WorldGenerator::new(profile).unwrap().generate();
        let ground = world.mask(GROUND_MASK).unwrap();
        let lit = ground.as_slice().iter().filter(|&&v| v == 1.0).count();
        assert_eq!(land_cells(&world), lit);
    }

    #[test]
    fn cell_at_water_level_is_not_land() {
        let profile = WorldProfile {
            size: 16,
            water_level: 0.0,
            ..WorldProfile::default()
        };
        let world = WorldGenerator::new(profile).unwrap().generate();
        // the rim is pinned to exactly 0 by the falloff
        let rim = world.height().as_slice().iter().filter(|&&e| e == 0.0).count();
        assert!(rim > 0);
        assert_eq!(land_cells(&world), 16 * 16 - rim);
    }
}
