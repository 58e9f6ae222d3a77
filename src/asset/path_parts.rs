use std::fmt;
use crate::LoadError;

/**
 * Deconstructed path to a tileset file.
 * IE: "file://tilesets/Stronghold Details.tsx".
 */
#[derive(Clone, Eq, PartialEq, Default, Debug, Hash)]
pub struct AssetPath {
    pub protocol: String,
    pub prefix: Option<String>,
    pub body: String,
    pub extension: String,
}

impl AssetPath {

    pub fn parse(path: &str, default_protocol: Option<&str>) -> Result<Self, LoadError> {
        let protocol: Option<&str>;
        let mut remainder = path;

        // Reads protocol
        match remainder.split_once("://") {
            Some((left, right)) => {
                protocol = Some(left);
                remainder = right;
            },
            None => protocol = None,
        };
        let Some(protocol) = protocol.or(default_protocol) else {
            return Err(LoadError::NoDefaultProtocol)
        };

        // Reads body and extension from the last dot of the file name only
        let file_start = remainder.rfind(|c: char| c == '/' || c == '\\').map(|idx| idx + 1).unwrap_or(0);
        let (body, extension) = match remainder[file_start..].rsplit_once('.') {
            Some((stem, extension)) if !stem.is_empty() => {
                (&remainder[..file_start + stem.len()], extension)
            },
            _ => return Err(LoadError::PathMissingExtension),
        };

        Ok(Self {
            protocol: protocol.into(),
            prefix: None,
            body: body.into(),
            extension: extension.into(),
        })
    }

    /// Prefix, body and extension. No protocol.
    pub fn without_protocol(&self) -> String {
        match self.prefix.as_deref() {
            Some(prefix) => format!("{}/{}.{}", prefix, self.body, self.extension),
            None => format!("{}.{}", self.body, self.extension),
        }
    }

    /// Directory containing this file, prefix included.
    /// None if it's at the root.
    pub fn parent(&self) -> Option<String> {
        let body_parent = self.body
            .rfind(|c: char| c == '/' || c == '\\')
            .map(|idx| &self.body[..idx]);
        match (self.prefix.as_deref(), body_parent) {
            (Some(prefix), Some(parent)) => Some(format!("{prefix}/{parent}")),
            (Some(prefix), None) => Some(String::from(prefix)),
            (None, Some(parent)) => Some(String::from(parent)),
            (None, None) => None,
        }
    }
}

impl fmt::Display for AssetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.protocol, self.without_protocol())
    }
}
