use roxmltree::{Document, Node};
use tracing::instrument;
use crate::tileset::{FillMode, Grid, Image, ObjectAlignment, Orientation, Properties, Tile, TileOffset, TileRenderSize, Tileset, Transformations};
use super::{parse_attr, parse_flag, skip_element, TsxParseError};

impl Tileset {

    #[instrument(skip_all)]
    pub fn parse_str(source: &str) -> Result<Self, TsxParseError> {
        let doc = Document::parse(source)?;
        Self::parse_doc(doc)
    }

    pub fn parse_doc(doc: Document) -> Result<Self, TsxParseError> {
        let root = doc.root_element();
        let tag_name = root.tag_name().name();
        if tag_name != "tileset" {
            return Err(TsxParseError::UnexpectedRootError { tag_name: String::from(tag_name) });
        }
        let mut tileset = Tileset::default();
        tileset.parse(root)?;
        log::debug!("Parsed tileset '{}' with {} tiles", tileset.name, tileset.tiles.len());
        Ok(tileset)
    }

    pub fn parse(&mut self, tileset_node: Node) -> Result<(), TsxParseError> {

        // Parses attributes
        for attribute in tileset_node.attributes() {
            let name = attribute.name();
            let value = attribute.value();
            match name {
                "version" => self.version = String::from(value),
                "tiledversion" => self.tiled_version = String::from(value),
                "name" => self.name = String::from(value),
                "class" => self.class = Some(String::from(value)),
                "tilewidth" => self.tile_width = parse_attr(name, value)?,
                "tileheight" => self.tile_height = parse_attr(name, value)?,
                "spacing" => self.spacing = parse_attr(name, value)?,
                "margin" => self.margin = parse_attr(name, value)?,
                "tilecount" => self.tile_count = parse_attr(name, value)?,
                "columns" => self.columns = parse_attr(name, value)?,
                "objectalignment" => self.object_alignment = ObjectAlignment::parse(value)?,
                "tilerendersize" => self.tile_render_size = TileRenderSize::parse(value)?,
                "fillmode" => self.fill_mode = FillMode::parse(value)?,
                _ => {}
            }
        }

        // Parses children
        for child in tileset_node.children().filter(Node::is_element) {
            match child.tag_name().name() {
                "tileoffset" => self.tile_offset = Some(TileOffset::parse(child)?),
                "grid" => self.grid = Some(Grid::parse(child)?),
                "transformations" => self.transformations = Some(Transformations::parse(child)?),
                "properties" => self.properties = Properties::parse(child)?,
                "image" => self.image = Some(Image::parse(child, "image", &mut self.skipped)?),
                "tile" => self.tiles.push(Tile::parse(child, &mut self.skipped)?),
                other => skip_element(other, &mut self.skipped),
            }
        }
        Ok(())
    }
}

impl TileOffset {
    fn parse(node: Node) -> Result<Self, TsxParseError> {
        let mut offset = TileOffset::default();
        for attribute in node.attributes() {
            let name = attribute.name();
            let value = attribute.value();
            match name {
                "x" => offset.x = parse_attr(name, value)?,
                "y" => offset.y = parse_attr(name, value)?,
                _ => {}
            }
        }
        Ok(offset)
    }
}

impl Grid {
    fn parse(node: Node) -> Result<Self, TsxParseError> {
        let mut grid = Grid::default();
        for attribute in node.attributes() {
            let name = attribute.name();
            let value = attribute.value();
            match name {
                "orientation" => grid.orientation = Orientation::parse(value)?,
                "width" => grid.width = parse_attr(name, value)?,
                "height" => grid.height = parse_attr(name, value)?,
                _ => {}
            }
        }
        Ok(grid)
    }
}

impl Transformations {
    fn parse(node: Node) -> Result<Self, TsxParseError> {
        let mut transformations = Transformations::empty();
        for attribute in node.attributes() {
            let name = attribute.name();
            let flag = Transformations::ATTRIBUTES
                .iter()
                .find(|(attribute_name, _)| *attribute_name == name)
                .map(|(_, flag)| *flag);
            if let Some(flag) = flag {
                transformations.set(flag, parse_flag(name, attribute.value())?);
            }
        }
        Ok(transformations)
    }
}
