use std::fmt;
use derive_more::*;
use serde::Serialize;
use crate::PropertyType;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Serialize)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// Runs of missing tile ids, each inclusive on both ends.
#[derive(Clone, Eq, PartialEq, Default, Debug, Serialize)]
pub struct IdGaps(pub Vec<(u32, u32)>);

impl fmt::Display for IdGaps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, &(first, last)) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            if first == last {
                write!(f, "{first}")?;
            }
            else {
                write!(f, "{first}-{last}")?;
            }
        }
        Ok(())
    }
}

/// Something wrong with the content of a tileset.
#[derive(Clone, PartialEq, Debug, Display, Serialize)]
pub enum IssueKind {
    #[display(fmt="tile id {id} is defined {count} times")]
    DuplicateTileId { id: u32, count: usize },
    #[display(fmt="tilecount is {declared} but {actual} tiles are defined")]
    TileCountMismatch { declared: u32, actual: usize },
    #[display(fmt="tile id {id} is not below tilecount {tile_count}")]
    TileIdOutOfRange { id: u32, tile_count: u32 },
    #[display(fmt="tile ids are not contiguous, missing {gaps}")]
    NonContiguousIds { gaps: IdGaps },
    #[display(fmt="image source is empty")]
    EmptyImageSource,
    #[display(fmt="image source '{source}' is not a relative path")]
    AbsoluteImagePath { source: String },
    #[display(fmt="tile has no image")]
    MissingImage,
    #[display(fmt="image '{source}' declares an empty size of {width}x{height}")]
    ZeroImageSize { source: String, width: u32, height: u32 },
    #[display(fmt="animation frame {frame} references unknown tile {tile_id}")]
    UnknownFrameTile { frame: usize, tile_id: u32 },
    #[display(fmt="animation frame {frame} has a duration of 0ms")]
    ZeroFrameDuration { frame: usize },
    #[display(fmt="animation frame {frame} lasts {duration}ms, below the minimum of {min}ms")]
    ShortFrameDuration { frame: usize, duration: u32, min: u32 },
    #[display(fmt="property '{name}' is defined more than once")]
    DuplicateProperty { name: String },
    #[display(fmt="property has an empty name")]
    EmptyPropertyName,
    #[display(fmt="property '{name}' of type {ty} has invalid value '{value}'")]
    InvalidPropertyValue { name: String, ty: PropertyType, value: String },
    #[display(fmt="tile of class '{class}' is missing property '{name}'")]
    MissingProperty { class: String, name: String },
    #[display(fmt="image file '{path}' was not found")]
    ImageNotFound { path: String },
    #[display(fmt="image file '{path}' could not be read: {error}")]
    ImageUnreadable { path: String, error: String },
    #[display(fmt="image file '{path}' is {actual_width}x{actual_height} but declared as {declared_width}x{declared_height}")]
    ImageSizeMismatch {
        path: String,
        declared_width: u32,
        declared_height: u32,
        actual_width: u32,
        actual_height: u32,
    },
}

impl IssueKind {
    pub fn severity(&self) -> Severity {
        match self {
            IssueKind::TileCountMismatch { .. }
            | IssueKind::NonContiguousIds { .. }
            | IssueKind::MissingImage
            | IssueKind::ShortFrameDuration { .. }
            | IssueKind::MissingProperty { .. }
            | IssueKind::ImageSizeMismatch { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct Issue {
    pub severity: Severity,
    /// Tile the issue was found on. None for the tileset itself.
    pub tile: Option<u32>,
    pub kind: IssueKind,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tile {
            Some(tile) => write!(f, "{}: tile {}: {}", self.severity, tile, self.kind),
            None => write!(f, "{}: {}", self.severity, self.kind),
        }
    }
}

/// Issues found in one tileset, in the order they were found.
#[derive(Clone, PartialEq, Default, Debug, Serialize)]
pub struct Report {
    pub issues: Vec<Issue>,
}

impl Report {

    pub fn push(&mut self, tile: Option<u32>, kind: IssueKind) {
        let severity = kind.severity();
        self.issues.push(Issue { severity, tile, kind });
    }

    pub fn extend(&mut self, other: Report) {
        self.issues.extend(other.issues);
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|issue| issue.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|issue| issue.severity == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues of a single tile.
    pub fn for_tile(&self, id: u32) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |issue| issue.tile == Some(id))
    }
}
