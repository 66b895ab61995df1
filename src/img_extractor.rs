//! Batch conversion of ".img" files into PNG frames
//!
//! Walks an input directory tree, converts every sprite file it finds and
//! keeps going when a single file fails; a bad file is reported and skipped.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use walkdir::WalkDir;

use crate::graphics::{
    img::{metadata::SpriteMetadata, renderer},
    parse_img,
};

/// Summary of a batch run
#[derive(Debug, Default)]
pub struct ExtractionStats {
    /// ".img" files found under the input directory
    pub files_found: usize,
    /// Files converted successfully
    pub files_converted: usize,
    /// Files skipped because parsing or writing failed
    pub files_ignored: usize,
    /// PNG frames written
    pub frames_written: usize,
}

/// Converts every ".img" file under an input directory
pub struct ImgExtractor {
    input_dir: PathBuf,
    output_dir: PathBuf,
}

impl ImgExtractor {
    pub fn new(input_dir: &Path, output_dir: &Path) -> Self {
        ImgExtractor {
            input_dir: input_dir.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
        }
    }

    /// Walk the input tree and convert everything, skipping files that fail.
    pub fn extract_all(&self) -> io::Result<ExtractionStats> {
        let mut stats = ExtractionStats::default();

        for entry in WalkDir::new(&self.input_dir) {
            let entry = entry.map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            if !entry.file_type().is_file() || !is_img_file(entry.path()) {
                continue;
            }
            stats.files_found += 1;

            match self.convert_file(entry.path()) {
                Ok(frames) => {
                    stats.files_converted += 1;
                    stats.frames_written += frames;
                }
                Err(e) => {
                    stats.files_ignored += 1;
                    println!("ignored {} because of {}", entry.path().display(), e);
                }
            }
        }

        Ok(stats)
    }

    /// Convert one file; returns the number of PNG frames written.
    fn convert_file(&self, path: &Path) -> io::Result<usize> {
        let data = fs::read(path)?;
        let sprite = parse_img(&data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let prefix = self.output_prefix(path);
        if let Some(parent) = prefix.parent() {
            fs::create_dir_all(parent)?;
        }

        let exported = renderer::save_sprite_frames(&sprite, &prefix)?;
        let metadata = SpriteMetadata::from_sprite(&sprite, &exported);
        metadata.save(&prefix.with_extension("json"))?;

        Ok(exported.len())
    }

    /// Output path prefix for a source file, preserving its subdirectory
    /// relative to the input directory.
    fn output_prefix(&self, path: &Path) -> PathBuf {
        let relative = path.strip_prefix(&self.input_dir).unwrap_or(path);
        self.output_dir.join(relative.with_extension(""))
    }
}

fn is_img_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("img"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn img_extension_is_case_insensitive() {
        assert!(is_img_file(Path::new("sprites/walk.img")));
        assert!(is_img_file(Path::new("sprites/WALK.IMG")));
        assert!(!is_img_file(Path::new("sprites/walk.png")));
        assert!(!is_img_file(Path::new("sprites/img")));
    }

    #[test]
    fn output_prefix_preserves_subdirectories() {
        let extractor = ImgExtractor::new(Path::new("input"), Path::new("output"));
        assert_eq!(
            extractor.output_prefix(Path::new("input/npc/walk.img")),
            PathBuf::from("output/npc/walk")
        );
    }
}
