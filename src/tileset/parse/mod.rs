//! Parsing of the TSX format into the types of [`crate::tileset`].
//! Attributes and elements that are not modelled are skipped rather than rejected.
mod tileset;
mod tile;

use std::str::FromStr;
use derive_more::*;
use roxmltree::Node;

#[derive(Error, Display, From, Debug)]
pub enum TsxParseError {
    XmlError(roxmltree::Error),
    #[display(fmt="Expected root element 'tileset', found '{tag_name}'")]
    #[from(ignore)]
    UnexpectedRootError { tag_name: String },
    #[display(fmt="Unexpected value '{value}' for attribute '{attribute}'")]
    #[from(ignore)]
    InvalidAttributeValue { attribute: String, value: String },
    #[display(fmt="Element '{tag_name}' is missing attribute '{attribute}'")]
    #[from(ignore)]
    MissingAttribute { tag_name: String, attribute: String },
}

impl TsxParseError {
    pub(crate) fn invalid(attribute: &str, value: &str) -> Self {
        Self::InvalidAttributeValue {
            attribute: String::from(attribute),
            value: String::from(value),
        }
    }

    pub(crate) fn missing(tag_name: &str, attribute: &str) -> Self {
        Self::MissingAttribute {
            tag_name: String::from(tag_name),
            attribute: String::from(attribute),
        }
    }
}

/// Parses a numeric attribute, naming the attribute on failure.
fn parse_attr<T: FromStr>(name: &str, value: &str) -> Result<T, TsxParseError> {
    value.parse().map_err(|_| TsxParseError::invalid(name, value))
}

/// Parses a "0" / "1" flag.
fn parse_flag(name: &str, value: &str) -> Result<bool, TsxParseError> {
    match value {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(TsxParseError::invalid(name, value)),
    }
}

/// Value of a required attribute.
fn required_attr<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str, TsxParseError> {
    node.attribute(name)
        .ok_or_else(|| TsxParseError::missing(node.tag_name().name(), name))
}

/// Notes an element that is not modelled and will not be written back.
fn skip_element(path: &str, skipped: &mut Vec<String>) {
    log::debug!("Skipping unsupported element '{path}'");
    skipped.push(String::from(path));
}
