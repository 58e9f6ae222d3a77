use std::collections::BTreeMap;
use tracing::instrument;
use crate::{Animation, HashSet, IdGaps, Image, IssueKind, Properties, Report, Tile, Tileset, ValidationConfig};

/// Checks a tileset against the invariants of the format.
/// Does not touch the file system. See [`crate::check_images`] for that.
#[instrument(skip_all, fields(tileset = %tileset.name))]
pub fn validate(tileset: &Tileset, config: &ValidationConfig) -> Report {
    let mut report = Report::default();
    check_ids(tileset, config, &mut report);
    check_properties(None, &tileset.properties, &mut report);
    if let Some(image) = &tileset.image {
        check_image(None, image, config, &mut report);
    }

    let ids: HashSet<u32> = tileset.tiles.iter().map(|tile| tile.id).collect();
    for tile in &tileset.tiles {
        check_tile(tileset, tile, &ids, config, &mut report);
    }
    log::debug!("Validated '{}': {} issues", tileset.name, report.issues.len());
    report
}

fn check_ids(tileset: &Tileset, config: &ValidationConfig, report: &mut Report) {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for tile in &tileset.tiles {
        *counts.entry(tile.id).or_default() += 1;
    }
    for (&id, &count) in &counts {
        if count > 1 {
            report.push(Some(id), IssueKind::DuplicateTileId { id, count });
        }
    }

    if tileset.is_image_collection() {
        let actual = tileset.tiles.len();
        if tileset.tile_count as usize != actual {
            report.push(None, IssueKind::TileCountMismatch { declared: tileset.tile_count, actual });
        }
    }
    else {
        for &id in counts.keys() {
            if id >= tileset.tile_count {
                report.push(Some(id), IssueKind::TileIdOutOfRange { id, tile_count: tileset.tile_count });
            }
        }
    }

    if config.require_contiguous_ids {
        let mut gaps = Vec::new();
        let mut next: u32 = 0;
        for &id in counts.keys() {
            if id > next {
                gaps.push((next, id - 1));
            }
            next = id.saturating_add(1);
        }
        if !gaps.is_empty() {
            report.push(None, IssueKind::NonContiguousIds { gaps: IdGaps(gaps) });
        }
    }
}

fn check_tile(tileset: &Tileset, tile: &Tile, ids: &HashSet<u32>, config: &ValidationConfig, report: &mut Report) {
    let id = Some(tile.id);
    match &tile.image {
        Some(image) => check_image(id, image, config, report),
        None if tileset.is_image_collection() => report.push(id, IssueKind::MissingImage),
        None => {},
    }
    check_properties(id, &tile.properties, report);
    if let Some(animation) = &tile.animation {
        check_animation(tileset, tile.id, animation, ids, config, report);
    }
    if let Some(class) = &tile.class {
        if let Some(required) = config.required_properties.get(class) {
            for name in required {
                if tile.properties.get(name).is_none() {
                    report.push(id, IssueKind::MissingProperty { class: class.clone(), name: name.clone() });
                }
            }
        }
    }
}

fn check_image(tile: Option<u32>, image: &Image, config: &ValidationConfig, report: &mut Report) {
    if image.source.is_empty() {
        report.push(tile, IssueKind::EmptyImageSource);
    }
    else if !config.allow_absolute_paths && !image.is_relative() {
        report.push(tile, IssueKind::AbsoluteImagePath { source: image.source.clone() });
    }
    let width = image.width.unwrap_or(1);
    let height = image.height.unwrap_or(1);
    if width == 0 || height == 0 {
        report.push(tile, IssueKind::ZeroImageSize { source: image.source.clone(), width, height });
    }
}

fn check_animation(
    tileset: &Tileset,
    tile_id: u32,
    animation: &Animation,
    ids: &HashSet<u32>,
    config: &ValidationConfig,
    report: &mut Report,
) {
    let tile = Some(tile_id);
    for (frame_idx, frame) in animation.iter().enumerate() {
        if !has_tile(tileset, ids, frame.tile_id) {
            report.push(tile, IssueKind::UnknownFrameTile { frame: frame_idx, tile_id: frame.tile_id });
        }
        if frame.duration == 0 {
            report.push(tile, IssueKind::ZeroFrameDuration { frame: frame_idx });
        }
        else if frame.duration < config.min_frame_duration {
            report.push(tile, IssueKind::ShortFrameDuration {
                frame: frame_idx,
                duration: frame.duration,
                min: config.min_frame_duration,
            });
        }
    }
}

/// Spritesheet cells exist without a <tile> record. Collection tiles only exist as records.
fn has_tile(tileset: &Tileset, ids: &HashSet<u32>, id: u32) -> bool {
    if tileset.is_image_collection() {
        ids.contains(&id)
    }
    else {
        id < tileset.tile_count
    }
}

fn check_properties(tile: Option<u32>, properties: &Properties, report: &mut Report) {
    let mut seen: HashSet<&str> = HashSet::default();
    for property in properties {
        if property.name.is_empty() {
            report.push(tile, IssueKind::EmptyPropertyName);
        }
        else if !seen.insert(property.name.as_str()) {
            report.push(tile, IssueKind::DuplicateProperty { name: property.name.clone() });
        }
        if !property.is_valid() {
            report.push(tile, IssueKind::InvalidPropertyValue {
                name: property.name.clone(),
                ty: property.ty,
                value: property.value.clone(),
            });
        }
        check_properties(tile, &property.members, report);
    }
}

#[cfg(test)]
mod test {
    use crate::{validate, Animation, Frame, IdGaps, Image, IssueKind, Property, PropertyType, Tile, Tileset, ValidationConfig};

    const DETAILS: &str = include_str!("../../assets/tilesets/Stronghold Details.tsx");
    const ANIMATIONS: &str = include_str!("../../assets/tilesets/Stronghold Animations.tsx");

    fn kinds(tileset: &Tileset, config: &ValidationConfig) -> Vec<(Option<u32>, IssueKind)> {
        validate(tileset, config)
            .issues
            .into_iter()
            .map(|issue| (issue.tile, issue.kind))
            .collect()
    }

    fn tile_with_image(id: u32, source: &str) -> Tile {
        let mut tile = Tile::new(id);
        tile.image = Some(Image::new(source, 16, 16));
        tile
    }

    #[test]
    fn editor_files_are_clean() {
        let config = ValidationConfig { require_contiguous_ids: true, ..Default::default() };
        for source in [DETAILS, ANIMATIONS] {
            let tileset = Tileset::parse_str(source).unwrap();
            let report = validate(&tileset, &config);
            assert!(report.is_empty(), "{:?}", report.issues);
        }
    }

    #[test]
    fn duplicate_and_missing_ids() {
        let mut tileset = Tileset::new("Props", 16, 16);
        tileset.tiles = vec![
            tile_with_image(0, "a.png"),
            tile_with_image(3, "b.png"),
            tile_with_image(3, "c.png"),
        ];
        tileset.tile_count = 3;
        let config = ValidationConfig { require_contiguous_ids: true, ..Default::default() };
        assert_eq!(
            vec![
                (Some(3), IssueKind::DuplicateTileId { id: 3, count: 2 }),
                (None, IssueKind::NonContiguousIds { gaps: IdGaps(vec![(1, 2)]) }),
            ],
            kinds(&tileset, &config),
        );

        tileset.tile_count = 5;
        let issues = kinds(&tileset, &ValidationConfig::default());
        assert!(issues.contains(&(None, IssueKind::TileCountMismatch { declared: 5, actual: 3 })));
    }

    #[test]
    fn far_apart_ids() {
        let mut tileset = Tileset::new("Props", 16, 16);
        tileset.tiles = vec![
            tile_with_image(1, "a.png"),
            tile_with_image(2, "b.png"),
            tile_with_image(50_000_000, "c.png"),
            tile_with_image(u32::MAX, "d.png"),
        ];
        tileset.tile_count = 4;
        let config = ValidationConfig { require_contiguous_ids: true, ..Default::default() };
        let report = validate(&tileset, &config);
        assert_eq!(1, report.issues.len());
        assert_eq!(
            IssueKind::NonContiguousIds { gaps: IdGaps(vec![(0, 0), (3, 49_999_999), (50_000_001, u32::MAX - 1)]) },
            report.issues[0].kind,
        );
        assert_eq!(
            "warning: tile ids are not contiguous, missing 0, 3-49999999, 50000001-4294967294",
            report.issues[0].to_string(),
        );
    }

    #[test]
    fn spritesheet_ids() {
        let mut tileset = Tileset::new("Terrain", 16, 16);
        tileset.image = Some(Image::new("terrain.png", 64, 64));
        tileset.columns = 4;
        tileset.tile_count = 16;
        tileset.tiles = vec![Tile::new(2), Tile::new(16)];
        assert_eq!(
            vec![(Some(16), IssueKind::TileIdOutOfRange { id: 16, tile_count: 16 })],
            kinds(&tileset, &ValidationConfig::default()),
        );
    }

    #[test]
    fn image_checks() {
        let mut tileset = Tileset::new("Props", 16, 16);
        let mut zero = tile_with_image(2, "zero.png");
        zero.image.as_mut().unwrap().width = Some(0);
        tileset.tiles = vec![
            tile_with_image(0, "/home/artist/barrel.png"),
            tile_with_image(1, ""),
            zero,
            Tile::new(3),
        ];
        tileset.tile_count = 4;
        let issues = kinds(&tileset, &ValidationConfig::default());
        assert_eq!(
            vec![
                (Some(0), IssueKind::AbsoluteImagePath { source: String::from("/home/artist/barrel.png") }),
                (Some(1), IssueKind::EmptyImageSource),
                (Some(2), IssueKind::ZeroImageSize { source: String::from("zero.png"), width: 0, height: 16 }),
                (Some(3), IssueKind::MissingImage),
            ],
            issues,
        );

        let lenient = ValidationConfig { allow_absolute_paths: true, ..Default::default() };
        let issues = kinds(&tileset, &lenient);
        assert_eq!(3, issues.len());
    }

    #[test]
    fn animation_checks() {
        let mut tileset = Tileset::new("Torches", 16, 16);
        let mut torch = tile_with_image(0, "torch.png");
        let animation: Animation = [Frame::new(0, 100), Frame::new(7, 100), Frame::new(0, 0), Frame::new(0, 10)]
            .into_iter()
            .collect();
        torch.animation = Some(animation);
        tileset.tiles = vec![torch];
        tileset.tile_count = 1;
        let config = ValidationConfig { min_frame_duration: 16, ..Default::default() };
        assert_eq!(
            vec![
                (Some(0), IssueKind::UnknownFrameTile { frame: 1, tile_id: 7 }),
                (Some(0), IssueKind::ZeroFrameDuration { frame: 2 }),
                (Some(0), IssueKind::ShortFrameDuration { frame: 3, duration: 10, min: 16 }),
            ],
            kinds(&tileset, &config),
        );
    }

    #[test]
    fn spritesheet_animation_frames() {
        let mut tileset = Tileset::new("Water", 16, 16);
        tileset.image = Some(Image::new("water.png", 64, 64));
        tileset.columns = 4;
        tileset.tile_count = 16;
        let mut wave = Tile::new(0);
        wave.animation = Some([Frame::new(0, 100), Frame::new(1, 100), Frame::new(15, 100), Frame::new(16, 100)]
            .into_iter()
            .collect());
        tileset.tiles = vec![wave];
        assert_eq!(
            vec![(Some(0), IssueKind::UnknownFrameTile { frame: 3, tile_id: 16 })],
            kinds(&tileset, &ValidationConfig::default()),
        );
    }

    #[test]
    fn property_checks() {
        let mut tileset = Tileset::new("Props", 16, 16);
        let mut door = tile_with_image(0, "door.png");
        door.class = Some(String::from("Door"));
        door.properties.insert_property(Property::typed("hp", PropertyType::Int, "many"));
        door.properties.push(Property::new("Name", "Door"));
        door.properties.push(Property::new("Name", "Gate"));
        door.properties.push(Property::new("", "x"));
        tileset.tiles = vec![door];
        tileset.tile_count = 1;

        let mut config = ValidationConfig::default();
        config.required_properties.insert(String::from("Door"), vec![String::from("Name"), String::from("Locked")]);
        assert_eq!(
            vec![
                (Some(0), IssueKind::InvalidPropertyValue {
                    name: String::from("hp"),
                    ty: PropertyType::Int,
                    value: String::from("many"),
                }),
                (Some(0), IssueKind::DuplicateProperty { name: String::from("Name") }),
                (Some(0), IssueKind::EmptyPropertyName),
                (Some(0), IssueKind::MissingProperty { class: String::from("Door"), name: String::from("Locked") }),
            ],
            kinds(&tileset, &config),
        );
    }
}
