use std::collections::{BTreeMap, BTreeSet};
use anyhow::Context;
use rayon::prelude::*;
use tsxkit::{validate_loaded, FileProtocol, Protocol, Tileset, TilesetLoader, ValidationConfig};

/// Validates every tileset in parallel and prints issues in path order.
/// Returns false if any tileset failed to load or has errors.
pub fn validate(loader: &TilesetLoader, paths: &[String], config: &ValidationConfig, strict: bool) -> bool {
    let outcomes: Vec<_> = loader
        .load_all(paths)
        .into_par_iter()
        .map(|(path, loaded)| (path, loaded.map(|loaded| validate_loaded(&loaded, config))))
        .collect();

    let mut failed = 0;
    for (path, outcome) in outcomes {
        match outcome {
            Ok(report) => {
                for issue in &report.issues {
                    println!("{path}: {issue}");
                }
                if report.has_errors() || (strict && !report.is_empty()) {
                    failed += 1;
                }
            },
            Err(err) => {
                log::error!("{path}: {err:#}");
                failed += 1;
            },
        }
    }
    log::info!("Checked {} tilesets, {} failed", paths.len(), failed);
    failed == 0
}

pub fn info(loader: &TilesetLoader, path: &str) -> anyhow::Result<()> {
    let loaded = loader.load(path)?;
    let tileset = &loaded.tileset;
    println!("name:       {}", tileset.name);
    println!("version:    {} (editor {})", tileset.version, tileset.tiled_version);
    println!("tile size:  {}x{}", tileset.tile_width, tileset.tile_height);
    if tileset.is_image_collection() {
        println!("kind:       image collection");
    }
    else {
        println!("kind:       spritesheet, {} columns", tileset.columns);
    }
    if let Some(grid) = &tileset.grid {
        println!("grid:       {} {}x{}", grid.orientation.as_str(), grid.width, grid.height);
    }
    if let Some(transformations) = &tileset.transformations {
        let names: Vec<&str> = transformations.iter_names().map(|(name, _)| name).collect();
        println!("transforms: {}", names.join(", "));
    }
    println!("tiles:      {} (tilecount {})", tileset.tiles.len(), tileset.tile_count);

    let mut classes: BTreeMap<&str, usize> = BTreeMap::new();
    let mut property_names: BTreeSet<&str> = BTreeSet::new();
    for tile in &tileset.tiles {
        *classes.entry(tile.class.as_deref().unwrap_or("-")).or_default() += 1;
        property_names.extend(tile.properties.iter().map(|property| property.name.as_str()));
    }
    for (class, count) in classes {
        println!("  class {class}: {count}");
    }
    if !property_names.is_empty() {
        let names: Vec<&str> = property_names.into_iter().collect();
        println!("properties: {}", names.join(", "));
    }
    for (tile, animation) in tileset.animated_tiles() {
        println!(
            "animated:   tile {}, {} frames, {}ms loop",
            tile.id,
            animation.len(),
            animation.total_duration(),
        );
    }
    Ok(())
}

/// Rewrites each file in canonical layout.
/// With `check`, nothing is written and false is returned if any file would change.
/// Files holding elements that would be dropped are never rewritten and count as unclean.
/// Only paths using the file protocol can be written.
pub fn fmt(loader: &TilesetLoader, paths: &[String], check: bool) -> anyhow::Result<bool> {
    let mut clean = true;
    for path in paths {
        let (asset_path, bytes) = loader.read(path)?;
        let source = String::from_utf8(bytes)
            .with_context(|| format!("Failed to decode '{asset_path}'"))?;
        let tileset = Tileset::parse_str(&source)
            .with_context(|| format!("Failed to parse '{asset_path}'"))?;
        if !tileset.skipped.is_empty() {
            log::warn!(
                "{asset_path}: not reformatting, unsupported elements would be dropped: {}",
                tileset.skipped.join(", "),
            );
            clean = false;
            continue;
        }
        let formatted = tileset.write_string();
        if formatted == source {
            log::debug!("{asset_path} is already formatted");
            continue;
        }
        if check {
            println!("{asset_path}: would reformat");
            clean = false;
        }
        else {
            if asset_path.protocol != FileProtocol.name() {
                anyhow::bail!("Cannot write '{asset_path}': only the file protocol supports writing");
            }
            let file_path = asset_path.without_protocol();
            std::fs::write(&file_path, formatted)
                .with_context(|| format!("Failed to write '{file_path}'"))?;
            log::info!("Reformatted {file_path}");
        }
    }
    Ok(clean)
}

pub fn dump(loader: &TilesetLoader, path: &str) -> anyhow::Result<()> {
    let loaded = loader.load(path)?;
    print!("{}", serde_yaml::to_string(&loaded.tileset)?);
    Ok(())
}
