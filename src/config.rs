//! JSON scene description for the demo application.
//!
//! A scene names the canvas resolution, a background color, the sprites to
//! composite each frame, and the filter chain applied after compositing.

use crate::color::Color;
use crate::filter::Filter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One image placement per frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sprite {
    pub path: String,
    pub x: i32,
    pub y: i32,
    /// Alpha attached to every decoded pixel
    #[serde(default = "default_alpha")]
    pub alpha: u8,
    /// When set, composite with color keying instead of alpha blending
    #[serde(default)]
    pub color_key: Option<Color>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub name: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_background")]
    pub background: Color,
    #[serde(default)]
    pub sprites: Vec<Sprite>,
    #[serde(default)]
    pub filters: Vec<Filter>,
}

fn default_alpha() -> u8 {
    255
}

fn default_width() -> u32 {
    crate::display::DEFAULT_WIDTH
}

fn default_height() -> u32 {
    crate::display::DEFAULT_HEIGHT
}

fn default_background() -> Color {
    Color::BLACK
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            width: default_width(),
            height: default_height(),
            background: default_background(),
            sprites: Vec::new(),
            filters: Vec::new(),
        }
    }

    /// Save scene to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(path, json).map_err(|e| e.to_string())
    }

    /// Load scene from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let json = fs::read_to_string(path).map_err(|e| e.to_string())?;
        serde_json::from_str(&json).map_err(|e| e.to_string())
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new("untitled")
    }
}
