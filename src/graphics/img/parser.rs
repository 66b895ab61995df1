//! Parser for ".img" sprite files
//!
//! This module reads the nested header hierarchy of a sprite file (sprite
//! header, per-frame headers, per-image headers) in a single forward pass,
//! decoding each frame's pixel payload as it goes. Any structural violation
//! aborts the whole parse; no partial sprite is ever returned.

use std::io::Cursor;

use crate::{
    binary_utils::{read_bytes, read_i32_le, read_u32_le},
    graphics::img::{
        codec,
        model::{FrameHeader, Image, Sprite, SpriteFrame, SpriteHeader},
        modes, ImgError, FRAME_HEADER_SIZE, FRAME_INFO_SIZE, IMAGE_HEADER_SIZE, SPRITE_HEADER_SIZE,
        SPRITE_MAGIC, SPRITE_VERSIONS,
    },
};

/// Parse a complete ".img" byte buffer into a sprite.
///
/// The buffer must contain exactly one sprite: after the last frame the
/// consumed byte count has to equal the buffer length.
pub fn parse_img(data: &[u8]) -> Result<Sprite, ImgError> {
    let mut cursor = Cursor::new(data);

    let header = read_sprite_header(&mut cursor)?;
    if header.directions == 0 || header.total_frames % header.directions != 0 {
        return Err(ImgError::InvalidFrameLayout {
            total_frames: header.total_frames,
            directions: header.directions,
        });
    }
    let frames_per_direction = header.frames_per_direction();

    let mut directions = Vec::with_capacity(header.directions as usize);
    for _ in 0..header.directions {
        let mut frames = Vec::with_capacity(frames_per_direction as usize);
        for _ in 0..frames_per_direction {
            frames.push(read_frame(&mut cursor)?);
        }
        directions.push(frames);
    }

    let consumed = cursor.position() as usize;
    if consumed != data.len() {
        return Err(ImgError::SizeMismatch {
            expected: data.len(),
            actual: consumed,
        });
    }

    Ok(Sprite { header, directions })
}

fn truncated(cursor: &Cursor<&[u8]>, needed: usize) -> ImgError {
    let offset = cursor.position() as usize;
    ImgError::TruncatedInput {
        offset,
        needed,
        available: cursor.get_ref().len().saturating_sub(offset),
    }
}

fn remaining(cursor: &Cursor<&[u8]>) -> usize {
    cursor.get_ref().len().saturating_sub(cursor.position() as usize)
}

fn read_sprite_header(cursor: &mut Cursor<&[u8]>) -> Result<SpriteHeader, ImgError> {
    if remaining(cursor) < SPRITE_HEADER_SIZE {
        return Err(truncated(cursor, SPRITE_HEADER_SIZE));
    }

    let magic = read_bytes(cursor, 8).map_err(|_| truncated(cursor, 8))?;
    if magic != SPRITE_MAGIC {
        return Err(ImgError::MalformedHeader {
            field: "sprite magic",
            found: u64::from_le_bytes(magic[..].try_into().unwrap()),
            offset: 0,
        });
    }

    let version = read_u32_le(cursor).map_err(|_| truncated(cursor, 4))?;
    if !SPRITE_VERSIONS.contains(&version) {
        return Err(ImgError::MalformedHeader {
            field: "version",
            found: version as u64,
            offset: 8,
        });
    }

    let frame_info_size = read_u32_le(cursor).map_err(|_| truncated(cursor, 4))?;
    if frame_info_size != FRAME_INFO_SIZE {
        return Err(ImgError::MalformedHeader {
            field: "frame info size",
            found: frame_info_size as u64,
            offset: 12,
        });
    }

    let total_frames = read_u32_le(cursor).map_err(|_| truncated(cursor, 4))?;
    let directions = read_u32_le(cursor).map_err(|_| truncated(cursor, 4))?;
    read_u32_le(cursor).map_err(|_| truncated(cursor, 4))?; // reserved
    read_u32_le(cursor).map_err(|_| truncated(cursor, 4))?; // reserved
    let width = read_u32_le(cursor).map_err(|_| truncated(cursor, 4))?;
    let height = read_u32_le(cursor).map_err(|_| truncated(cursor, 4))?;

    Ok(SpriteHeader {
        version,
        total_frames,
        directions,
        width,
        height,
    })
}

fn read_frame(cursor: &mut Cursor<&[u8]>) -> Result<SpriteFrame, ImgError> {
    let frame_offset = cursor.position() as usize;
    if remaining(cursor) < FRAME_HEADER_SIZE {
        return Err(truncated(cursor, FRAME_HEADER_SIZE));
    }

    let magic = read_u32_le(cursor).map_err(|_| truncated(cursor, 4))?;
    if magic != 0 {
        return Err(ImgError::MalformedHeader {
            field: "frame magic",
            found: magic as u64,
            offset: frame_offset,
        });
    }

    let cx = read_i32_le(cursor).map_err(|_| truncated(cursor, 4))?;
    let cy = read_i32_le(cursor).map_err(|_| truncated(cursor, 4))?;
    let mode = read_u32_le(cursor).map_err(|_| truncated(cursor, 4))?;
    let header = FrameHeader { cx, cy, mode };

    let image = match mode {
        modes::EMPTY => Image::Empty,
        modes::RGB565_ALPHA | modes::RGB565_ALPHA_ALT => {
            let (width, height) = read_image_header(cursor)?;
            let raw = read_payload(cursor, width, height, 3)?;
            Image::Rgb565Alpha {
                width,
                height,
                pixels: codec::decode_rgb565_alpha(width, height, &raw)?,
            }
        }
        modes::BGRA32 => {
            let (width, height) = read_image_header(cursor)?;
            let raw = read_payload(cursor, width, height, 4)?;
            Image::Bgra32 {
                width,
                height,
                pixels: codec::decode_bgra32(width, height, &raw)?,
            }
        }
        modes::BGR24 => {
            let (width, height) = read_image_header(cursor)?;
            let raw = read_payload(cursor, width, height, 3)?;
            Image::Bgr24 {
                width,
                height,
                pixels: codec::decode_bgr24(width, height, &raw)?,
            }
        }
        other => {
            return Err(ImgError::UnknownImageMode {
                mode: other,
                offset: frame_offset,
            });
        }
    };

    Ok(SpriteFrame { header, image })
}

fn read_image_header(cursor: &mut Cursor<&[u8]>) -> Result<(u32, u32), ImgError> {
    if remaining(cursor) < IMAGE_HEADER_SIZE {
        return Err(truncated(cursor, IMAGE_HEADER_SIZE));
    }

    let width = read_u32_le(cursor).map_err(|_| truncated(cursor, 4))?;
    let height = read_u32_le(cursor).map_err(|_| truncated(cursor, 4))?;
    read_u32_le(cursor).map_err(|_| truncated(cursor, 4))?; // reserved, meaning unknown
    Ok((width, height))
}

fn read_payload(
    cursor: &mut Cursor<&[u8]>,
    width: u32,
    height: u32,
    bytes_per_pixel: usize,
) -> Result<Vec<u8>, ImgError> {
    let length = width as usize * height as usize * bytes_per_pixel;
    read_bytes(cursor, length).map_err(|_| truncated(cursor, length))
}
