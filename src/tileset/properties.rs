use std::fmt;
use serde::Serialize;
use super::TsxParseError;

/// Custom properties attached to a tileset or tile, in document order.
#[derive(Clone, Eq, PartialEq, Default, Debug, Serialize)]
pub struct Properties(Vec<Property>);

impl Properties {

    pub fn get(&self, name: &str) -> Option<&Property> {
        self.0.iter().find(|property| property.name == name)
    }

    /// Raw value of the property with the given name.
    pub fn get_value(&self, name: &str) -> Option<&str> {
        self.get(name).map(|property| property.value.as_str())
    }

    /// Sets a string property, replacing the value of an existing property of the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.insert_property(Property::new(name, value));
    }

    pub fn insert_property(&mut self, property: Property) {
        match self.0.iter_mut().find(|existing| existing.name == property.name) {
            Some(existing) => *existing = property,
            None => self.0.push(property),
        }
    }

    /// Appends without replacing. Used by the parser so that duplicates survive for validation.
    pub(crate) fn push(&mut self, property: Property) {
        self.0.push(property);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Properties {
    type Item = &'a Property;
    type IntoIter = std::slice::Iter<'a, Property>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Clone, Eq, PartialEq, Default, Debug, Serialize)]
pub struct Property {
    pub name: String,
    pub ty: PropertyType,
    /// Name of the custom type for "class" and enum properties.
    pub custom_type: Option<String>,
    /// Raw value as written in the file.
    pub value: String,
    /// Member values of a "class" property.
    pub members: Properties,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn typed(name: impl Into<String>, ty: PropertyType, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty,
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        self.value.parse().ok()
    }

    pub fn as_float(&self) -> Option<f64> {
        self.value.parse().ok()
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    /// True if the raw value is well-formed for the declared type.
    pub fn is_valid(&self) -> bool {
        match self.ty {
            PropertyType::String | PropertyType::File | PropertyType::Class => true,
            PropertyType::Int => self.as_int().is_some(),
            PropertyType::Float => self.as_float().is_some(),
            PropertyType::Bool => self.as_bool().is_some(),
            PropertyType::Object => self.value.parse::<u32>().is_ok(),
            PropertyType::Color => is_color(&self.value),
        }
    }
}

/// Empty, #RRGGBB or #AARRGGBB.
fn is_color(value: &str) -> bool {
    if value.is_empty() {
        return true;
    }
    match value.strip_prefix('#') {
        Some(hex) => (hex.len() == 6 || hex.len() == 8) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Default, Debug, Serialize)]
pub enum PropertyType {
    #[default]
    String,
    Int,
    Float,
    Bool,
    Color,
    File,
    Object,
    Class,
}

impl PropertyType {
    pub fn parse(str: &str) -> Result<Self, TsxParseError> {
        match str {
            "string" => Ok(Self::String),
            "int" => Ok(Self::Int),
            "float" => Ok(Self::Float),
            "bool" => Ok(Self::Bool),
            "color" => Ok(Self::Color),
            "file" => Ok(Self::File),
            "object" => Ok(Self::Object),
            "class" => Ok(Self::Class),
            _ => Err(TsxParseError::invalid("type", str)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Color => "color",
            Self::File => "file",
            Self::Object => "object",
            Self::Class => "class",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
