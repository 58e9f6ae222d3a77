use std::path::Path;
use serde::Serialize;
use super::{Animation, Properties};

#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct Tile {
    /// ID of tile local to its tileset
    pub id: u32,
    /// Type tag, written as "type" or "class" depending on the tileset version.
    pub class: Option<String>,
    pub probability: f32,
    pub image: Option<Image>,
    pub properties: Properties,
    pub animation: Option<Animation>,
}

impl Tile {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            class: None,
            probability: 1.0,
            image: None,
            properties: Properties::default(),
            animation: None,
        }
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Reference to an external image file.
/// The declared size is metadata only and may disagree with the file itself.
#[derive(Clone, Eq, PartialEq, Default, Debug, Serialize)]
pub struct Image {
    pub format: Option<String>,
    /// Path as written in the file, relative to the tileset.
    pub source: String,
    pub trans: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl Image {
    pub fn new(source: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            source: source.into(),
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }
    }

    /// True unless the source is rooted or starts with a drive letter or protocol.
    pub fn is_relative(&self) -> bool {
        let source = self.source.as_str();
        if source.starts_with('/') || source.starts_with('\\') || source.contains("://") {
            return false;
        }
        let bytes = source.as_bytes();
        if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
            return false;
        }
        Path::new(source).is_relative()
    }

    /// Source joined onto the directory of the tileset that references it.
    pub fn resolve(&self, parent_path: Option<&str>) -> String {
        match parent_path {
            Some(parent) if self.is_relative() => format!("{parent}/{}", self.source),
            _ => self.source.clone(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::Image;

    #[test]
    fn relative_sources() {
        assert!(Image::new("Stronghold/Details/Stronghold_Armor.png", 16, 32).is_relative());
        assert!(Image::new("../shared/barrel.png", 16, 16).is_relative());
        assert!(!Image::new("/home/artist/barrel.png", 16, 16).is_relative());
        assert!(!Image::new("C:/Users/artist/barrel.png", 16, 16).is_relative());
        assert!(!Image::new("C:\\Users\\artist\\barrel.png", 16, 16).is_relative());
        assert!(!Image::new("file:///barrel.png", 16, 16).is_relative());
    }

    #[test]
    fn resolve() {
        let image = Image::new("Stronghold/Chandelier.png", 192, 32);
        assert_eq!("tilesets/Stronghold/Chandelier.png", image.resolve(Some("tilesets")));
        assert_eq!("Stronghold/Chandelier.png", image.resolve(None));
        let absolute = Image::new("/art/Chandelier.png", 192, 32);
        assert_eq!("/art/Chandelier.png", absolute.resolve(Some("tilesets")));
    }
}
