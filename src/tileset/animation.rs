use derive_more::*;
use serde::Serialize;
use smallvec::SmallVec;

/// One step of a tile animation.
#[derive(Copy, Clone, Eq, PartialEq, Default, Debug, Serialize)]
pub struct Frame {
    /// Local id of the tile displayed, within the same tileset.
    pub tile_id: u32,
    /// Display time in milliseconds.
    pub duration: u32,
}

impl Frame {
    pub fn new(tile_id: u32, duration: u32) -> Self {
        Self { tile_id, duration }
    }
}

/// Ordered frames of a looping tile animation.
#[derive(Clone, Eq, PartialEq, Default, Debug, Deref, DerefMut, Serialize)]
pub struct Animation(SmallVec<[Frame; 4]>);

impl Animation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: Frame) {
        self.0.push(frame);
    }

    /// Length of a single loop in milliseconds.
    pub fn total_duration(&self) -> u64 {
        self.0.iter().map(|frame| frame.duration as u64).sum()
    }

    /// Frame displayed once `elapsed` milliseconds of looping playback have passed.
    pub fn frame_at(&self, elapsed: u64) -> Option<&Frame> {
        let first = self.0.first()?;
        let total = self.total_duration();
        if total == 0 {
            return Some(first);
        }
        let mut remaining = elapsed % total;
        for frame in &self.0 {
            let duration = frame.duration as u64;
            if remaining < duration {
                return Some(frame);
            }
            remaining -= duration;
        }
        self.0.last()
    }
}

impl FromIterator<Frame> for Animation {
    fn from_iter<T: IntoIterator<Item = Frame>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod test {
    use super::{Animation, Frame};

    fn torch() -> Animation {
        [Frame::new(3, 100), Frame::new(4, 50), Frame::new(5, 150)]
            .into_iter()
            .collect()
    }

    #[test]
    fn total_duration() {
        assert_eq!(300, torch().total_duration());
        assert_eq!(0, Animation::new().total_duration());
    }

    #[test]
    fn frame_at() {
        let animation = torch();
        assert_eq!(Some(3), animation.frame_at(0).map(|frame| frame.tile_id));
        assert_eq!(Some(3), animation.frame_at(99).map(|frame| frame.tile_id));
        assert_eq!(Some(4), animation.frame_at(100).map(|frame| frame.tile_id));
        assert_eq!(Some(5), animation.frame_at(299).map(|frame| frame.tile_id));
        assert_eq!(Some(3), animation.frame_at(300).map(|frame| frame.tile_id));
        assert_eq!(Some(4), animation.frame_at(3_120).map(|frame| frame.tile_id));
    }

    #[test]
    fn frame_at_degenerate() {
        assert_eq!(None, Animation::new().frame_at(10));
        let frozen: Animation = [Frame::new(7, 0), Frame::new(8, 0)].into_iter().collect();
        assert_eq!(Some(7), frozen.frame_at(500).map(|frame| frame.tile_id));
    }
}
