// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Viewer configuration, with optional overrides from environment variables.

use ifcview_core::{Color, Point3};

/// Viewer configuration.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Location of the parser's auxiliary binary support files.
    pub parser_support_path: String,
    /// Whether `parser_support_path` is absolute rather than relative to the parser.
    pub parser_support_path_absolute: bool,
    /// Device pixel ratio handed to the renderer.
    pub pixel_ratio: f64,
    /// Surface width used when `initialize` is given a zero width.
    pub fallback_width: u32,
    /// Surface height used when `initialize` is given a zero height.
    pub fallback_height: u32,
    /// Vertical field of view in degrees.
    pub camera_fov: f64,
    pub camera_near: f64,
    pub camera_far: f64,
    /// Camera position before any model is framed.
    pub initial_camera_position: Point3<f64>,
    pub enable_damping: bool,
    pub damping_factor: f64,
    pub background: Color,
}

impl ViewerConfig {
    /// Defaults overlaid with `IFCVIEW_*` environment variables.
    ///
    /// Unset or unparseable variables keep the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parse = |key: &str| lookup(key).map(|v| v.trim().to_string());
        let defaults = Self::default();
        Self {
            parser_support_path: lookup("IFCVIEW_WASM_PATH").unwrap_or(defaults.parser_support_path),
            pixel_ratio: parse("IFCVIEW_PIXEL_RATIO")
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|ratio| ratio.is_finite() && *ratio > 0.0)
                .unwrap_or(defaults.pixel_ratio),
            fallback_width: parse("IFCVIEW_FALLBACK_WIDTH")
                .and_then(|v| v.parse::<u32>().ok())
                .filter(|w| *w > 0)
                .unwrap_or(defaults.fallback_width),
            fallback_height: parse("IFCVIEW_FALLBACK_HEIGHT")
                .and_then(|v| v.parse::<u32>().ok())
                .filter(|h| *h > 0)
                .unwrap_or(defaults.fallback_height),
            enable_damping: parse("IFCVIEW_ENABLE_DAMPING")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.enable_damping),
            ..defaults
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            // Stable web-ifc release matching the parser's expected ABI
            parser_support_path: "https://unpkg.com/web-ifc@0.0.36/".into(),
            parser_support_path_absolute: true,
            pixel_ratio: 1.0,
            fallback_width: 1280,
            fallback_height: 720,
            camera_fov: 45.0,
            camera_near: 0.1,
            camera_far: 1000.0,
            initial_camera_position: Point3::new(20.0, 20.0, 20.0),
            enable_damping: true,
            damping_factor: 0.05,
            background: Color::from_hex(0x0f172a),
        }
    }
}
