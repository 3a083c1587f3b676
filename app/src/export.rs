use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use image::{GrayImage, Luma};
use island_core::{Grid, World};
use serde::Serialize;
use tracing::info;

// Write a [0, 1] grid as 8-bit grayscale, north at the top of the image
pub fn save_grayscale(grid: &Grid<f32>, path: &Path) -> Result<()> {
    let size = grid.size();
    let mut img = GrayImage::new(size as u32, size as u32);
    for (x, y, &v) in grid.iter() {
        let gray = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        img.put_pixel(x as u32, (size - 1 - y) as u32, Luma([gray]));
    }
    img.save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "saved image");
    Ok(())
}

// Height grid, every mask and per-layer occupancy as PNGs under `dir`
pub fn write_images(world: &World, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    save_grayscale(world.height(), &dir.join("height.png"))?;
    for (name, mask) in world.masks() {
        save_grayscale(mask, &dir.join(format!("mask_{name}.png")))?;
    }
    for (i, layer) in world.classification().layers().iter().enumerate() {
        let occupancy = layer.occupancy().map(|&o| if o { 1.0 } else { 0.0 });
        save_grayscale(&occupancy, &dir.join(format!("layer_{i}.png")))?;
        if let Some(relative) = &layer.relative {
            save_grayscale(relative, &dir.join(format!("layer_{i}_relative.png")))?;
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct LayerDump<'a> {
    // band index per cell, -1 when empty
    occupant: Vec<i64>,
    adjacency: Vec<u8>,
    relative: Option<&'a [f32]>,
}

#[derive(Serialize)]
struct WorldDump<'a> {
    size: usize,
    height: &'a [f32],
    masks: BTreeMap<&'a str, &'a [f32]>,
    layers: Vec<LayerDump<'a>>,
}

// Flat row-major JSON for consumers that don't read PNG
pub fn write_json(world: &World, path: &Path) -> Result<()> {
    let classification = world.classification();
    let layers = classification
        .layers()
        .iter()
        .enumerate()
        .map(|(i, layer)| LayerDump {
            occupant: layer
                .occupant
                .as_slice()
                .iter()
                .map(|o| o.map_or(-1, |b| b as i64))
                .collect(),
            adjacency: layer
                .occupant
                .iter()
                .map(|(x, y, _)| classification.adjacency_mask(x, y, i))
                .collect(),
            relative: layer.relative.as_ref().map(|g| g.as_slice()),
        })
        .collect();

    let dump = WorldDump {
        size: world.size(),
        height: world.height().as_slice(),
        masks: world.masks().map(|(n, m)| (n, m.as_slice())).collect(),
        layers,
    };
    let text = serde_json::to_string(&dump)?;
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "saved json dump");
    Ok(())
}
