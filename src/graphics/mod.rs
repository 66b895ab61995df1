//! Graphics processing for QQ Tang data formats
//!
//! This module provides functionality for handling the sprite container
//! format used by the client, from binary parsing through PNG export.

// Declare submodules
pub mod img;

// Re-export commonly used items for convenience
pub use img::{parse_img, ImgError, Sprite};
