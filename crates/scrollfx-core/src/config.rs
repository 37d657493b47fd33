use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::effect::EffectBinding;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub effects: EffectsConfig,
    #[serde(default)]
    pub carousel: CarouselConfig,
    #[serde(default)]
    pub cursor: CursorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the asset server binds to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port the asset server binds to
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding the built site
    #[serde(default = "default_asset_root")]
    pub asset_root: PathBuf,
    /// Entry point served for `/` and for unknown paths
    #[serde(default = "default_index_file")]
    pub index_file: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            asset_root: default_asset_root(),
            index_file: default_index_file(),
        }
    }
}

/// Easing curve for eased scroll transitions and tweens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    Linear,
    /// Quadratic ease-out, used by hover tweens
    Quad,
    /// Exponential ease-out, `min(1, 1.001 - 2^(-10t))`
    #[default]
    EaseOut,
}

/// Smooth scrolling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Enable smooth scrolling (raw positions are used as-is when disabled)
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    /// Duration of eased scroll transitions in milliseconds
    #[serde(default = "default_animation_duration")]
    pub animation_duration_ms: u64,
    /// Easing of scroll transitions
    #[serde(default)]
    pub easing: EasingType,
    /// Explicit smoothing rate (1/s); derived from the duration when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smoothing_rate: Option<f64>,
    /// Multiplier applied to wheel deltas
    #[serde(default = "default_wheel_multiplier")]
    pub wheel_multiplier: f64,
    /// Multiplier applied to touch deltas
    #[serde(default = "default_touch_multiplier")]
    pub touch_multiplier: f64,
    /// Frame rate of the frame driver
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Largest frame step fed to the engine, in milliseconds
    #[serde(default = "default_max_frame_ms")]
    pub max_frame_ms: u64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            animation_duration_ms: default_animation_duration(),
            easing: EasingType::default(),
            smoothing_rate: None,
            wheel_multiplier: default_wheel_multiplier(),
            touch_multiplier: default_touch_multiplier(),
            animation_fps: default_animation_fps(),
            max_frame_ms: default_max_frame_ms(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EffectsConfig {
    /// Effect bindings registered when the engine starts, in order
    #[serde(default)]
    pub bindings: Vec<EffectBinding>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarouselConfig {
    /// Scroll distance per pixel of drag
    #[serde(default = "default_drag_multiplier")]
    pub drag_multiplier: f64,
    /// Distance between snap points (no snapping when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snap_interval: Option<f64>,
    /// Minimum horizontal travel for a swipe to change slides
    #[serde(default = "default_swipe_threshold")]
    pub swipe_threshold: f64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            drag_multiplier: default_drag_multiplier(),
            snap_interval: None,
            swipe_threshold: default_swipe_threshold(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CursorConfig {
    /// Enable the custom cursor on pointer devices
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Per-frame fraction of the remaining distance the cursor covers
    #[serde(default = "default_follow_factor")]
    pub follow_factor: f64,
    /// Diameter in pixels at rest
    #[serde(default = "default_cursor_normal_size")]
    pub normal_size: f64,
    /// Diameter in pixels over interactive elements
    #[serde(default = "default_cursor_hover_size")]
    pub hover_size: f64,
    /// Diameter in pixels while pressed
    #[serde(default = "default_cursor_pressed_size")]
    pub pressed_size: f64,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            follow_factor: default_follow_factor(),
            normal_size: default_cursor_normal_size(),
            hover_size: default_cursor_hover_size(),
            pressed_size: default_cursor_pressed_size(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_asset_root() -> PathBuf {
    PathBuf::from("dist")
}

fn default_index_file() -> String {
    "index.html".to_string()
}

fn default_animation_duration() -> u64 {
    1200
}

fn default_wheel_multiplier() -> f64 {
    1.0
}

fn default_touch_multiplier() -> f64 {
    1.5
}

fn default_animation_fps() -> u32 {
    60
}

fn default_max_frame_ms() -> u64 {
    100
}

fn default_drag_multiplier() -> f64 {
    2.0
}

fn default_swipe_threshold() -> f64 {
    50.0
}

fn default_follow_factor() -> f64 {
    0.3
}

fn default_cursor_normal_size() -> f64 {
    8.0
}

fn default_cursor_hover_size() -> f64 {
    24.0
}

fn default_cursor_pressed_size() -> f64 {
    6.0
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file, defaults when it is missing
    pub fn load_from(config_path: &std::path::Path) -> crate::Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            Self::parse(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to the default file
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to a specific file, creating parent directories
    pub fn save_to(&self, config_path: &std::path::Path) -> crate::Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(config_path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/scrollfx/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("scrollfx")
            .join("config.toml")
    }

    /// Get the asset root (with tilde expansion)
    pub fn asset_root(&self) -> PathBuf {
        expand_tilde(&self.server.asset_root)
    }
}
