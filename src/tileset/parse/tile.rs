use roxmltree::Node;
use crate::tileset::{Animation, Frame, Image, Properties, Property, PropertyType, Tile};
use super::{parse_attr, required_attr, skip_element, TsxParseError};

impl Tile {
    /// Unmodelled child elements are recorded in `skipped` as "tile <id>/<element>".
    pub fn parse(tile_node: Node, skipped: &mut Vec<String>) -> Result<Self, TsxParseError> {
        let id: u32 = parse_attr("id", required_attr(tile_node, "id")?)?;
        let mut tile = Tile::new(id);
        for attribute in tile_node.attributes() {
            let name = attribute.name();
            let value = attribute.value();
            match name {
                "type" | "class" => tile.class = Some(String::from(value)),
                "probability" => tile.probability = parse_attr(name, value)?,
                _ => {}
            }
        }
        for child in tile_node.children().filter(Node::is_element) {
            match child.tag_name().name() {
                "properties" => tile.properties = Properties::parse(child)?,
                "image" => tile.image = Some(Image::parse(child, &format!("tile {id}/image"), skipped)?),
                "animation" => tile.animation = Some(Animation::parse(child)?),
                other => skip_element(&format!("tile {id}/{other}"), skipped),
            }
        }
        Ok(tile)
    }
}

impl Image {
    /// Embedded image data is not modelled and is recorded in `skipped` under `path`.
    pub fn parse(image_node: Node, path: &str, skipped: &mut Vec<String>) -> Result<Image, TsxParseError> {
        let mut image = Image::default();
        for attribute in image_node.attributes() {
            let name = attribute.name();
            let value = attribute.value();
            match name {
                "format" => image.format = Some(String::from(value)),
                "source" => image.source = String::from(value),
                "trans" => image.trans = Some(String::from(value)),
                "width" => image.width = Some(parse_attr(name, value)?),
                "height" => image.height = Some(parse_attr(name, value)?),
                _ => {}
            }
        }
        for child in image_node.children().filter(Node::is_element) {
            skip_element(&format!("{path}/{}", child.tag_name().name()), skipped);
        }
        Ok(image)
    }
}

impl Animation {
    pub fn parse(animation_node: Node) -> Result<Self, TsxParseError> {
        animation_node
            .children()
            .filter(|child| child.has_tag_name("frame"))
            .map(|frame_node| -> Result<Frame, TsxParseError> {
                let tile_id = parse_attr("tileid", required_attr(frame_node, "tileid")?)?;
                let duration = parse_attr("duration", required_attr(frame_node, "duration")?)?;
                Ok(Frame { tile_id, duration })
            })
            .collect()
    }
}

impl Properties {
    pub fn parse(properties_node: Node) -> Result<Self, TsxParseError> {
        let mut properties = Properties::default();
        for property_node in properties_node.children().filter(|child| child.has_tag_name("property")) {
            properties.push(Property::parse(property_node)?);
        }
        Ok(properties)
    }
}

impl Property {
    pub fn parse(property_node: Node) -> Result<Self, TsxParseError> {
        let name = required_attr(property_node, "name")?;
        let mut property = Property::new(name, "");
        let mut has_value = false;
        for attribute in property_node.attributes() {
            let value = attribute.value();
            match attribute.name() {
                "type" => property.ty = PropertyType::parse(value)?,
                "propertytype" => property.custom_type = Some(String::from(value)),
                "value" => {
                    property.value = String::from(value);
                    has_value = true;
                },
                _ => {}
            }
        }

        // Multiline strings are stored as element text
        if !has_value {
            if let Some(text) = property_node.text() {
                if property_node.children().all(|child| child.is_text()) {
                    property.value = String::from(text);
                }
            }
        }

        if let Some(members) = property_node.children().find(|child| child.has_tag_name("properties")) {
            property.members = Properties::parse(members)?;
        }
        Ok(property)
    }
}
