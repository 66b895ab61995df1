//! PNG export for decoded sprites
//!
//! This module converts canonical pixel buffers into `image` buffers and
//! writes one PNG per non-empty frame, running each file through oxipng
//! after the save.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use image::{DynamicImage, RgbImage, RgbaImage};

use crate::graphics::img::model::{Image, PixelMode, Sprite};

/// Convert a decoded image into an `image` crate buffer.
///
/// Returns `None` for empty frames, which have nothing to export.
pub fn to_dynamic_image(image: &Image) -> Option<DynamicImage> {
    if image.is_empty() {
        return None;
    }

    let width = image.width();
    let height = image.height();
    let pixels = image.pixels().to_vec();

    match image.pixel_mode() {
        PixelMode::Rgba => RgbaImage::from_raw(width, height, pixels).map(DynamicImage::ImageRgba8),
        PixelMode::Rgb => RgbImage::from_raw(width, height, pixels).map(DynamicImage::ImageRgb8),
    }
}

/// Save every non-empty frame of a sprite as `<prefix>_<direction>_<index>.png`.
///
/// Empty frames produce no file. Returns the (direction, index, path) of
/// every PNG written.
pub fn save_sprite_frames(
    sprite: &Sprite,
    prefix: &Path,
) -> io::Result<Vec<(usize, usize, PathBuf)>> {
    let mut written = Vec::new();

    for (direction, index, frame) in sprite.frames() {
        let frame_image = match to_dynamic_image(&frame.image) {
            Some(frame_image) => frame_image,
            None => continue,
        };

        let path = PathBuf::from(format!("{}_{}_{}.png", prefix.display(), direction, index));
        save_png(&frame_image, &path)?;
        written.push((direction, index, path));
    }

    Ok(written)
}

/// Saves a PNG and optimises it in place, keeping the unoptimised file when
/// optimisation fails.
fn save_png(frame_image: &DynamicImage, path: &Path) -> io::Result<()> {
    let temp_path = path.with_extension("temp.png");
    frame_image
        .save(&temp_path)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    let mut options = oxipng::Options::from_preset(2);
    options.bit_depth_reduction = true;
    options.interlace = None;

    match oxipng::optimize(
        &oxipng::InFile::Path(temp_path.clone()),
        &oxipng::OutFile::Path(Some(path.to_path_buf())),
        &options,
    ) {
        Ok(_) => {
            let _ = fs::remove_file(temp_path);
            Ok(())
        }
        Err(e) => {
            fs::rename(temp_path, path)?;
            eprintln!(
                "Warning: oxipng optimisation failed for {}: {}. File saved unoptimised.",
                path.display(),
                e
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_frames_have_no_export_image() {
        assert!(to_dynamic_image(&Image::Empty).is_none());
    }

    #[test]
    fn rgba_variants_export_with_alpha() {
        let image = Image::Bgra32 {
            width: 1,
            height: 1,
            pixels: vec![30, 20, 10, 40],
        };
        match to_dynamic_image(&image).unwrap() {
            DynamicImage::ImageRgba8(buffer) => {
                assert_eq!(buffer.width(), 1);
                assert_eq!(buffer.height(), 1);
                assert_eq!(buffer.into_raw(), vec![30, 20, 10, 40]);
            }
            _ => panic!("expected an RGBA export"),
        }
    }

    #[test]
    fn rgb_variants_export_without_alpha() {
        let image = Image::Bgr24 {
            width: 2,
            height: 1,
            pixels: vec![1, 2, 3, 4, 5, 6],
        };
        match to_dynamic_image(&image).unwrap() {
            DynamicImage::ImageRgb8(buffer) => {
                assert_eq!(buffer.width(), 2);
                assert_eq!(buffer.into_raw(), vec![1, 2, 3, 4, 5, 6]);
            }
            _ => panic!("expected an RGB export"),
        }
    }
}
