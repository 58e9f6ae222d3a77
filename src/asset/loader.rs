use std::sync::Arc;
use derive_more::*;
use rayon::prelude::*;
use tracing::instrument;
use crate::{AssetPath, FileProtocol, HashMap, Protocol, Tileset};

/// Loader for a .tsx file.
/// Outputs a [`LoadedTileset`].
#[derive(Copy, Clone, Default, Debug)]
pub struct TsxLoader;
impl TsxLoader {
    pub const EXTENSION: &'static str = "tsx";

    pub fn load(&self, bytes: &[u8], path: &AssetPath) -> anyhow::Result<LoadedTileset> {
        let xml_source = std::str::from_utf8(bytes)?;
        let tileset = Tileset::parse_str(xml_source)?;
        Ok(LoadedTileset { path: path.clone(), tileset })
    }
}

/// A [`Tileset`] together with the path it was loaded from.
#[derive(Clone, Debug)]
pub struct LoadedTileset {
    pub path: AssetPath,
    pub tileset: Tileset,
}

/// An image referenced by a tileset, resolved against the tileset's directory.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ImageRef {
    /// Tile owning the image. None for the tileset's own spritesheet.
    pub tile_id: Option<u32>,
    pub path: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl LoadedTileset {
    pub fn image_refs(&self) -> Vec<ImageRef> {
        let parent = self.path.parent();
        let sheet = self.tileset.image.iter().map(|image| (None, image));
        let tiles = self.tileset.tiles
            .iter()
            .filter_map(|tile| tile.image.as_ref().map(|image| (Some(tile.id), image)));
        sheet
            .chain(tiles)
            .filter(|(_, image)| !image.source.is_empty())
            .map(|(tile_id, image)| ImageRef {
                tile_id,
                path: image.resolve(parent.as_deref()),
                width: image.width,
                height: image.height,
            })
            .collect()
    }
}

/// Responsible for reading tileset files through a [`Protocol`] and parsing them.
pub struct TilesetLoader {
    path_prefix: Option<String>,
    protocols: HashMap<String, Arc<dyn Protocol>>,
    default_protocol: Option<String>,
    loader: TsxLoader,
}

impl TilesetLoader {

    /// Loader without any protocols.
    pub fn new() -> Self {
        Self {
            path_prefix: None,
            protocols: HashMap::default(),
            default_protocol: None,
            loader: TsxLoader,
        }
    }

    pub fn set_path_prefix<S: Into<String>>(&mut self, prefix: Option<S>) {
        self.path_prefix = prefix.map(|s| s.into());
    }

    /// Adds a protocol for use in reading file bytes.
    pub fn add_protocol(&mut self, protocol: impl Protocol, is_default: bool) {
        let name = String::from(protocol.name());
        self.protocols.insert(name.clone(), Arc::new(protocol));
        if is_default {
            self.default_protocol = Some(name);
        }
    }

    /// Parses a path using the configured default protocol and prefix.
    pub fn resolve_path(&self, path: &str) -> Result<AssetPath, LoadError> {
        let mut path = AssetPath::parse(path, self.default_protocol.as_deref())?;
        path.prefix = self.path_prefix.clone();
        Ok(path)
    }

    /// Reads the raw bytes of a tileset file without parsing them.
    pub fn read(&self, path: &str) -> anyhow::Result<(AssetPath, Vec<u8>)> {
        let path = self.resolve_path(path)?;
        let protocol = match self.protocols.get(&path.protocol) {
            Some(protocol) => protocol.clone(),
            None => return Err(LoadError::NoSuchProtocol { protocol: path.protocol }.into()),
        };
        if path.extension != TsxLoader::EXTENSION {
            return Err(LoadError::NoSuchLoader { extension: path.extension }.into());
        }
        let bytes = protocol.read(&path)?;
        Ok((path, bytes))
    }

    /// Reads and parses a single tileset.
    #[instrument(skip(self))]
    pub fn load(&self, path: &str) -> anyhow::Result<LoadedTileset> {
        let (path, bytes) = self.read(path)?;
        let loaded = self.loader.load(&bytes, &path)?;
        log::debug!("Loaded {path}");
        Ok(loaded)
    }

    /// Reads and parses many tilesets in parallel.
    /// Results are in the same order as the paths given.
    pub fn load_all<'a>(&self, paths: &'a [String]) -> Vec<(&'a str, anyhow::Result<LoadedTileset>)> {
        paths
            .par_iter()
            .map(|path| (path.as_str(), self.load(path)))
            .collect()
    }
}

impl Default for TilesetLoader {
    /// Loader reading from the file system by default.
    fn default() -> Self {
        let mut loader = Self::new();
        loader.add_protocol(FileProtocol, true);
        loader
    }
}

#[derive(Error, Debug, Display, Clone, Eq, PartialEq)]
pub enum LoadError {
    #[display(fmt="No default protocol")]
    NoDefaultProtocol,
    #[display(fmt="No such protocol '{protocol}'")]
    NoSuchProtocol { protocol: String },
    #[display(fmt="No loader matching extension '{extension}'")]
    NoSuchLoader { extension: String },
    #[display(fmt="Path missing extension")]
    PathMissingExtension,
}
