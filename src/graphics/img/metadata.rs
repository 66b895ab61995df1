//! Sidecar metadata for extracted sprites
//!
//! The PNG files cannot carry the per-frame anchor offsets or the sprite
//! header's advisory fields, so each extracted sprite gets a JSON sidecar
//! describing its layout, keyed by (direction, frame index).

use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::graphics::img::model::Sprite;

/// Description of one extracted sprite file
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SpriteMetadata {
    /// Format version from the sprite header.
    pub version: u32,
    /// Number of facing directions.
    pub directions: u32,
    /// Frames in each direction's sequence.
    pub frames_per_direction: u32,
    /// Advisory width from the sprite header; per-frame widths are authoritative.
    pub nominal_width: u32,
    /// Advisory height from the sprite header.
    pub nominal_height: u32,
    /// One entry per frame, in file order.
    pub frames: Vec<FrameMetadata>,
}

/// Per-frame entry in the sidecar
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FrameMetadata {
    /// Direction this frame belongs to.
    pub direction: u32,
    /// Position within the direction's sequence.
    pub index: u32,
    /// Nominal anchor x offset.
    pub cx: i32,
    /// Nominal anchor y offset.
    pub cy: i32,
    /// Raw mode selector from the frame header.
    pub mode: u32,
    pub width: u32,
    pub height: u32,
    /// True when the frame carries no pixel data and no PNG was written.
    pub empty: bool,
    /// File name of the exported PNG, when one exists.
    pub png: Option<String>,
}

impl SpriteMetadata {
    /// Build the sidecar description for a parsed sprite.
    ///
    /// `exported` lists the (direction, index, path) of every PNG written
    /// for this sprite.
    pub fn from_sprite(sprite: &Sprite, exported: &[(usize, usize, PathBuf)]) -> Self {
        let mut frames = Vec::with_capacity(sprite.header.total_frames as usize);

        for (direction, index, frame) in sprite.frames() {
            let png = exported
                .iter()
                .find(|(d, i, _)| *d == direction && *i == index)
                .and_then(|(_, _, path)| path.file_name())
                .map(|name| name.to_string_lossy().into_owned());

            frames.push(FrameMetadata {
                direction: direction as u32,
                index: index as u32,
                cx: frame.header.cx,
                cy: frame.header.cy,
                mode: frame.header.mode,
                width: frame.image.width(),
                height: frame.image.height(),
                empty: frame.image.is_empty(),
                png,
            });
        }

        SpriteMetadata {
            version: sprite.header.version,
            directions: sprite.header.directions,
            frames_per_direction: sprite.header.frames_per_direction(),
            nominal_width: sprite.header.width,
            nominal_height: sprite.header.height,
            frames,
        }
    }

    /// Write the sidecar as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::img::model::{FrameHeader, Image, SpriteFrame, SpriteHeader};

    #[test]
    fn sidecar_tracks_frames_and_exports() {
        let sprite = Sprite {
            header: SpriteHeader {
                version: 65537,
                total_frames: 2,
                directions: 1,
                width: 32,
                height: 32,
            },
            directions: vec![vec![
                SpriteFrame {
                    header: FrameHeader {
                        cx: 4,
                        cy: -2,
                        mode: 16,
                    },
                    image: Image::Bgr24 {
                        width: 1,
                        height: 1,
                        pixels: vec![3, 2, 1],
                    },
                },
                SpriteFrame {
                    header: FrameHeader {
                        cx: 0,
                        cy: 0,
                        mode: 0,
                    },
                    image: Image::Empty,
                },
            ]],
        };
        let exported = vec![(0usize, 0usize, PathBuf::from("out/walk_0_0.png"))];

        let metadata = SpriteMetadata::from_sprite(&sprite, &exported);
        assert_eq!(metadata.version, 65537);
        assert_eq!(metadata.frames_per_direction, 2);
        assert_eq!(metadata.frames.len(), 2);

        let first = &metadata.frames[0];
        assert_eq!(first.cx, 4);
        assert_eq!(first.cy, -2);
        assert_eq!(first.png.as_deref(), Some("walk_0_0.png"));
        assert!(!first.empty);

        let second = &metadata.frames[1];
        assert!(second.empty);
        assert_eq!(second.png, None);
    }
}
