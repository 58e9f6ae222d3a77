use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use crate::URect;
use super::{Animation, Image, Properties, Tile, TsxParseError};

/// A mostly 1:1 mapping of the TSX <tileset> specification.
/// Tiles are kept in document order so that a parsed file writes back unchanged.
#[derive(Clone, PartialEq, Default, Debug, Serialize)]
pub struct Tileset {
    pub version: String,
    pub tiled_version: String,
    pub name: String,
    pub class: Option<String>,
    pub tile_width: u32,
    pub tile_height: u32,
    pub spacing: u32,
    pub margin: u32,
    pub tile_count: u32,
    pub columns: u32,
    pub object_alignment: ObjectAlignment,
    pub tile_render_size: TileRenderSize,
    pub fill_mode: FillMode,
    pub tile_offset: Option<TileOffset>,
    pub grid: Option<Grid>,
    pub transformations: Option<Transformations>,
    pub properties: Properties,
    pub image: Option<Image>,
    pub tiles: Vec<Tile>,
    /// Elements the parser does not model, such as "wangsets" or "tile 4/objectgroup".
    /// These are lost when the tileset is written back.
    #[serde(skip)]
    pub skipped: Vec<String>,
}

impl Tileset {

    pub fn new(name: impl Into<String>, tile_width: u32, tile_height: u32) -> Self {
        Self {
            version: String::from("1.5"),
            name: name.into(),
            tile_width,
            tile_height,
            ..Default::default()
        }
    }

    /// Finds a tile by its local id.
    pub fn tile(&self, id: u32) -> Option<&Tile> {
        self.tiles.iter().find(|tile| tile.id == id)
    }

    pub fn tile_mut(&mut self, id: u32) -> Option<&mut Tile> {
        self.tiles.iter_mut().find(|tile| tile.id == id)
    }

    /// True if every tile references its own image instead of a cell of a shared spritesheet.
    pub fn is_image_collection(&self) -> bool {
        self.columns == 0 && self.image.is_none()
    }

    /// Source rectangle of a tile within the image it is drawn from.
    /// For image collections, this is the whole tile image.
    /// For spritesheets, this is the cell of the tile counting row-major from the top left.
    pub fn tile_rect(&self, id: u32) -> Option<URect> {
        if self.is_image_collection() {
            let image = self.tile(id)?.image.as_ref()?;
            let width = image.width.unwrap_or(self.tile_width);
            let height = image.height.unwrap_or(self.tile_height);
            return Some(URect::new(0, 0, width, height));
        }
        if self.columns == 0 || id >= self.tile_count {
            return None;
        }
        let column = id % self.columns;
        let row = id / self.columns;
        let x = cell_offset(self.margin, column, self.tile_width, self.spacing)?;
        let y = cell_offset(self.margin, row, self.tile_height, self.spacing)?;
        Some(URect::new(x, y, self.tile_width, self.tile_height))
    }

    /// Tiles with a property of the given name and value.
    pub fn tiles_with_property<'a>(&'a self, name: &'a str, value: &'a str) -> impl Iterator<Item = &'a Tile> + 'a {
        self.tiles
            .iter()
            .filter(move |tile| tile.properties.get_value(name) == Some(value))
    }

    /// Tiles that carry an animation, paired with that animation.
    pub fn animated_tiles(&self) -> impl Iterator<Item = (&Tile, &Animation)> {
        self.tiles
            .iter()
            .filter_map(|tile| tile.animation.as_ref().map(|animation| (tile, animation)))
    }

    /// Only format 1.9 writes the tile type tag as "class". Later versions went back to "type".
    pub fn uses_class_attribute(&self) -> bool {
        let mut parts = self.version.split('.').map(|part| part.parse::<u32>().unwrap_or(0));
        let major = parts.next().unwrap_or(0);
        let minor = parts.next().unwrap_or(0);
        (major, minor) == (1, 9)
    }
}

/// Pixel offset of the n-th cell along one axis of a spritesheet.
/// None if it does not fit in a u32.
fn cell_offset(margin: u32, index: u32, size: u32, spacing: u32) -> Option<u32> {
    size.checked_add(spacing)?
        .checked_mul(index)?
        .checked_add(margin)
}

#[derive(Copy, Clone, Eq, PartialEq, Default, Debug, Serialize)]
pub enum ObjectAlignment {
    #[default]
    Unspecified,
    TopLeft,
    Top,
    TopRight,
    Left,
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl ObjectAlignment {
    pub fn parse(str: &str) -> Result<Self, TsxParseError> {
        match str {
            "unspecified" => Ok(Self::Unspecified),
            "topleft" => Ok(Self::TopLeft),
            "top" => Ok(Self::Top),
            "topright" => Ok(Self::TopRight),
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            "bottomleft" => Ok(Self::BottomLeft),
            "bottom" => Ok(Self::Bottom),
            "bottomright" => Ok(Self::BottomRight),
            _ => Err(TsxParseError::invalid("objectalignment", str)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unspecified => "unspecified",
            Self::TopLeft => "topleft",
            Self::Top => "top",
            Self::TopRight => "topright",
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::BottomLeft => "bottomleft",
            Self::Bottom => "bottom",
            Self::BottomRight => "bottomright",
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Default, Debug, Serialize)]
pub enum FillMode {
    #[default]
    Stretch,
    PreserveAspectFit,
}

impl FillMode {
    pub fn parse(str: &str) -> Result<Self, TsxParseError> {
        match str {
            "stretch" => Ok(Self::Stretch),
            "preserve-aspect-fit" => Ok(Self::PreserveAspectFit),
            _ => Err(TsxParseError::invalid("fillmode", str)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stretch => "stretch",
            Self::PreserveAspectFit => "preserve-aspect-fit",
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Default, Debug, Serialize)]
pub enum TileRenderSize {
    #[default]
    Tile,
    Grid,
}

impl TileRenderSize {
    pub fn parse(str: &str) -> Result<Self, TsxParseError> {
        match str {
            "tile" => Ok(Self::Tile),
            "grid" => Ok(Self::Grid),
            _ => Err(TsxParseError::invalid("tilerendersize", str)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tile => "tile",
            Self::Grid => "grid",
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Default, Debug, Serialize)]
pub enum Orientation {
    #[default]
    Orthogonal,
    Isometric,
}

impl Orientation {
    pub fn parse(str: &str) -> Result<Self, TsxParseError> {
        match str {
            "orthogonal" => Ok(Self::Orthogonal),
            "isometric" => Ok(Self::Isometric),
            _ => Err(TsxParseError::invalid("orientation", str)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Orthogonal => "orthogonal",
            Self::Isometric => "isometric",
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Default, Debug, Serialize)]
pub struct TileOffset { pub x: i32, pub y: i32 }

/// Grid used when snapping tiles from this tileset in the editor.
#[derive(Copy, Clone, Eq, PartialEq, Default, Debug, Serialize)]
pub struct Grid {
    pub orientation: Orientation,
    pub width: u32,
    pub height: u32,
}

bitflags! {
    /// Ways in which tiles of a tileset may be transformed when placed.
    #[derive(Copy, Clone, Eq, PartialEq, Default, Debug, Serialize, Deserialize)]
    pub struct Transformations: u8 {
        const HFLIP = 1;
        const VFLIP = 1 << 1;
        const ROTATE = 1 << 2;
        const PREFER_UNTRANSFORMED = 1 << 3;
    }
}

impl Transformations {
    /// Attribute names in the order they are written.
    pub const ATTRIBUTES: [(&'static str, Transformations); 4] = [
        ("hflip", Transformations::HFLIP),
        ("vflip", Transformations::VFLIP),
        ("rotate", Transformations::ROTATE),
        ("preferuntransformed", Transformations::PREFER_UNTRANSFORMED),
    ];
}

#[cfg(test)]
mod test {
    use crate::{Image, Tile, Tileset, URect};

    fn collection() -> Tileset {
        let mut tileset = Tileset::new("Props", 32, 48);
        let mut barrel = Tile::new(0);
        barrel.image = Some(Image::new("props/barrel.png", 16, 16));
        let mut door = Tile::new(1);
        door.image = Some(Image::new("props/door.png", 16, 32));
        door.properties.insert("Name", "Door");
        tileset.tiles = vec![barrel, door, Tile::new(2)];
        tileset.tile_count = 3;
        tileset
    }

    #[test]
    fn collection_rects() {
        let tileset = collection();
        assert!(tileset.is_image_collection());
        assert_eq!(Some(URect::new(0, 0, 16, 16)), tileset.tile_rect(0));
        assert_eq!(Some(URect::new(0, 0, 16, 32)), tileset.tile_rect(1));
        assert_eq!(None, tileset.tile_rect(2));
        assert_eq!(None, tileset.tile_rect(7));
    }

    #[test]
    fn spritesheet_rects() {
        let mut tileset = Tileset::new("Terrain", 16, 16);
        tileset.image = Some(Image::new("terrain.png", 70, 52));
        tileset.columns = 4;
        tileset.tile_count = 12;
        tileset.margin = 1;
        tileset.spacing = 2;
        assert!(!tileset.is_image_collection());
        assert_eq!(Some(URect::new(1, 1, 16, 16)), tileset.tile_rect(0));
        assert_eq!(Some(URect::new(19, 1, 16, 16)), tileset.tile_rect(1));
        assert_eq!(Some(URect::new(1, 19, 16, 16)), tileset.tile_rect(4));
        assert_eq!(Some(URect::new(55, 37, 16, 16)), tileset.tile_rect(11));
        assert_eq!(None, tileset.tile_rect(12));
    }

    #[test]
    fn property_lookup() {
        let tileset = collection();
        let doors: Vec<u32> = tileset.tiles_with_property("Name", "Door").map(|tile| tile.id).collect();
        assert_eq!(vec![1], doors);
        assert_eq!(0, tileset.tiles_with_property("Name", "Window").count());
    }

    #[test]
    fn class_attribute_by_version() {
        let mut tileset = Tileset::new("Props", 16, 16);
        tileset.version = String::from("1.5");
        assert!(!tileset.uses_class_attribute());
        tileset.version = String::from("1.9");
        assert!(tileset.uses_class_attribute());
        tileset.version = String::from("1.10");
        assert!(!tileset.uses_class_attribute());
        tileset.version = String::from("1.11");
        assert!(!tileset.uses_class_attribute());
    }

    #[test]
    fn oversized_spritesheet_rects() {
        let mut tileset = Tileset::new("Huge", u32::MAX, 16);
        tileset.image = Some(Image::new("huge.png", 64, 64));
        tileset.columns = 4;
        tileset.tile_count = 8;
        tileset.spacing = 1;
        assert_eq!(None, tileset.tile_rect(1));
        assert_eq!(None, tileset.tile_rect(5));

        tileset.spacing = 0;
        assert_eq!(Some(URect::new(0, 0, u32::MAX, 16)), tileset.tile_rect(0));
        assert_eq!(Some(URect::new(u32::MAX, 0, u32::MAX, 16)), tileset.tile_rect(1));
        assert_eq!(None, tileset.tile_rect(2));
        assert_eq!(Some(URect::new(0, 16, u32::MAX, 16)), tileset.tile_rect(4));
    }
}
