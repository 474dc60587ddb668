use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Error;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub spring: SpringConfig,
    #[serde(default)]
    pub layers: LayerConfig,
    #[serde(default)]
    pub auto_play: AutoPlayConfig,
    #[serde(default)]
    pub depth_of_field: DepthOfFieldConfig,
    #[serde(default)]
    pub carousel: CarouselConfig,
    #[serde(default)]
    pub content: ContentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Page shown by the showcase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    /// Horizontal gallery carousel
    #[default]
    Home,
    /// Layered works gallery
    Works,
    /// Counters, timeline and video cards
    About,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Home, Page::Works, Page::About];

    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Works => "works",
            Page::About => "about",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Page::Home => Page::Works,
            Page::Works => Page::About,
            Page::About => Page::Home,
        }
    }
}

impl std::str::FromStr for Page {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "home" => Ok(Page::Home),
            "works" => Ok(Page::Works),
            "about" => Ok(Page::About),
            other => Err(Error::UnknownView(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Idle tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Frame rate while something is animating
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Page opened on launch
    #[serde(default)]
    pub start_page: Page,
    /// Show the clock in the status bar
    #[serde(default = "default_true")]
    pub show_clock: bool,
    /// Cover the first two seconds with the startup loader
    #[serde(default = "default_true")]
    pub show_loader: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            animation_fps: default_animation_fps(),
            start_page: Page::default(),
            show_clock: default_true(),
            show_loader: default_true(),
        }
    }
}

/// Smoothing stage parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    #[serde(default = "default_stiffness")]
    pub stiffness: f64,
    #[serde(default = "default_damping")]
    pub damping: f64,
    #[serde(default = "default_mass")]
    pub mass: f64,
    /// Distance to target below which the spring may settle
    #[serde(default = "default_rest_delta")]
    pub rest_delta: f64,
    /// Speed below which the spring may settle
    #[serde(default = "default_rest_speed")]
    pub rest_speed: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: default_stiffness(),
            damping: default_damping(),
            mass: default_mass(),
            rest_delta: default_rest_delta(),
            rest_speed: default_rest_speed(),
        }
    }
}

impl SpringConfig {
    /// Zero stiffness is accepted; such a spring never converges
    pub fn validate(&self) -> crate::Result<()> {
        non_negative("spring.stiffness", self.stiffness)?;
        non_negative("spring.damping", self.damping)?;
        non_negative("spring.rest_delta", self.rest_delta)?;
        non_negative("spring.rest_speed", self.rest_speed)?;
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(Error::invalid(format!(
                "spring.mass must be positive, got {}",
                self.mass
            )));
        }
        Ok(())
    }
}

/// Layered works scroller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerConfig {
    /// Depth distance between neighbouring layers
    #[serde(default = "default_spacing")]
    pub spacing: f64,
    /// Smallest number of rendered layers
    #[serde(default = "default_min_layers")]
    pub min_layers: usize,
    /// Base layer opacity
    #[serde(default = "default_layer_opacity")]
    pub opacity: f64,
    /// Wheel delta multiplier
    #[serde(default = "default_scroll_sensitivity")]
    pub scroll_sensitivity: f64,
    /// Scene tilt in degrees
    #[serde(default = "default_camera_tilt")]
    pub camera_tilt: f64,
    /// Scene rotation in degrees
    #[serde(default = "default_camera_rotation")]
    pub camera_rotation: f64,
    /// Scale of the farthest layer
    #[serde(default = "default_scale_far")]
    pub scale_far: f64,
    /// Scale of the nearest layer
    #[serde(default = "default_scale_near")]
    pub scale_near: f64,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            spacing: default_spacing(),
            min_layers: default_min_layers(),
            opacity: default_layer_opacity(),
            scroll_sensitivity: default_scroll_sensitivity(),
            camera_tilt: default_camera_tilt(),
            camera_rotation: default_camera_rotation(),
            scale_far: default_scale_far(),
            scale_near: default_scale_near(),
        }
    }
}

impl LayerConfig {
    pub fn validate(&self) -> crate::Result<()> {
        positive("layers.spacing", self.spacing)?;
        if self.min_layers == 0 {
            return Err(Error::invalid("layers.min_layers must be at least 1"));
        }
        unit_interval("layers.opacity", self.opacity)?;
        finite("layers.scroll_sensitivity", self.scroll_sensitivity)?;
        finite("layers.camera_tilt", self.camera_tilt)?;
        finite("layers.camera_rotation", self.camera_rotation)?;
        non_negative("layers.scale_far", self.scale_far)?;
        non_negative("layers.scale_near", self.scale_near)?;
        Ok(())
    }
}

/// Auto-advance mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoPlayMode {
    /// Advance by `speed` units per second, every frame
    #[default]
    Continuous,
    /// Advance one layer spacing per `step_delay_ms`, eased
    Step,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoPlayConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub mode: AutoPlayMode,
    /// Units per second in continuous mode
    #[serde(default = "default_auto_speed")]
    pub speed: f64,
    /// Interval between steps
    #[serde(default = "default_step_delay")]
    pub step_delay_ms: u64,
    /// Duration of one step transition
    #[serde(default = "default_step_duration")]
    pub step_duration_ms: u64,
}

impl Default for AutoPlayConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            mode: AutoPlayMode::default(),
            speed: default_auto_speed(),
            step_delay_ms: default_step_delay(),
            step_duration_ms: default_step_duration(),
        }
    }
}

impl AutoPlayConfig {
    pub fn validate(&self) -> crate::Result<()> {
        finite("auto_play.speed", self.speed)?;
        if self.mode == AutoPlayMode::Step && self.step_delay_ms == 0 {
            return Err(Error::invalid(
                "auto_play.step_delay_ms must be positive in step mode",
            ));
        }
        if self.step_duration_ms > self.step_delay_ms && self.mode == AutoPlayMode::Step {
            tracing::warn!(
                step_delay_ms = self.step_delay_ms,
                step_duration_ms = self.step_duration_ms,
                "Step transition outlasts the step interval; steps will overlap"
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepthOfFieldConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Opacity loss at the edge of the focus window (0-1)
    #[serde(default = "default_opacity_factor")]
    pub opacity_factor: f64,
    /// Blur scale; 0 disables blur
    #[serde(default = "default_blur_factor")]
    pub blur_factor: f64,
    /// Half-width of the focus window as a fraction of total depth
    #[serde(default = "default_focus_range")]
    pub focus_range: f64,
}

impl Default for DepthOfFieldConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            opacity_factor: default_opacity_factor(),
            blur_factor: default_blur_factor(),
            focus_range: default_focus_range(),
        }
    }
}

impl DepthOfFieldConfig {
    pub fn validate(&self) -> crate::Result<()> {
        unit_interval("depth_of_field.opacity_factor", self.opacity_factor)?;
        non_negative("depth_of_field.blur_factor", self.blur_factor)?;
        if !(self.focus_range > 0.0 && self.focus_range < 0.5) {
            return Err(Error::invalid(format!(
                "depth_of_field.focus_range must lie in (0, 0.5), got {}",
                self.focus_range
            )));
        }
        if !self.enabled && self.blur_factor > 0.0 {
            tracing::warn!(
                blur_factor = self.blur_factor,
                "depth_of_field is disabled; blur_factor has no effect"
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarouselConfig {
    /// Width of one gallery card
    #[serde(default = "default_card_width")]
    pub item_width: f64,
    /// Gap between cards
    #[serde(default = "default_card_gap")]
    pub gap: f64,
    /// Section height in viewport heights
    #[serde(default = "default_section_screens")]
    pub section_screens: f64,
    /// Minimum time between two re-measures on resize
    #[serde(default = "default_resize_throttle")]
    pub resize_throttle_ms: u64,
    /// Spring-smooth the page scroll before mapping
    #[serde(default = "default_true")]
    pub smooth_scroll: bool,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            item_width: default_card_width(),
            gap: default_card_gap(),
            section_screens: default_section_screens(),
            resize_throttle_ms: default_resize_throttle(),
            smooth_scroll: default_true(),
        }
    }
}

impl CarouselConfig {
    pub fn validate(&self) -> crate::Result<()> {
        positive("carousel.item_width", self.item_width)?;
        non_negative("carousel.gap", self.gap)?;
        if !(self.section_screens.is_finite() && self.section_screens > 1.0) {
            return Err(Error::invalid(format!(
                "carousel.section_screens must be greater than 1, got {}",
                self.section_screens
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentConfig {
    /// TOML catalogue replacing the built-in gallery/works/cards
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

fn finite(name: &str, value: f64) -> crate::Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::invalid(format!("{name} must be finite, got {value}")))
    }
}

fn non_negative(name: &str, value: f64) -> crate::Result<()> {
    finite(name, value)?;
    if value < 0.0 {
        return Err(Error::invalid(format!("{name} must not be negative, got {value}")));
    }
    Ok(())
}

fn positive(name: &str, value: f64) -> crate::Result<()> {
    finite(name, value)?;
    if value <= 0.0 {
        return Err(Error::invalid(format!("{name} must be positive, got {value}")));
    }
    Ok(())
}

fn unit_interval(name: &str, value: f64) -> crate::Result<()> {
    finite(name, value)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(Error::invalid(format!("{name} must lie in [0, 1], got {value}")));
    }
    Ok(())
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("loggs")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_tick_rate() -> u64 {
    100
}

fn default_animation_fps() -> u32 {
    60
}

fn default_stiffness() -> f64 {
    100.0
}

fn default_damping() -> f64 {
    30.0
}

fn default_mass() -> f64 {
    1.0
}

fn default_rest_delta() -> f64 {
    0.01
}

fn default_rest_speed() -> f64 {
    0.01
}

fn default_spacing() -> f64 {
    150.0
}

fn default_min_layers() -> usize {
    20
}

fn default_layer_opacity() -> f64 {
    0.9
}

fn default_scroll_sensitivity() -> f64 {
    0.5
}

fn default_camera_tilt() -> f64 {
    -25.0
}

fn default_camera_rotation() -> f64 {
    -45.0
}

fn default_scale_far() -> f64 {
    0.6
}

fn default_scale_near() -> f64 {
    1.4
}

fn default_auto_speed() -> f64 {
    30.0
}

fn default_step_delay() -> u64 {
    1000
}

fn default_step_duration() -> u64 {
    500
}

fn default_opacity_factor() -> f64 {
    0.7
}

fn default_blur_factor() -> f64 {
    3.0
}

fn default_focus_range() -> f64 {
    0.3
}

fn default_card_width() -> f64 {
    300.0
}

fn default_card_gap() -> f64 {
    40.0
}

fn default_section_screens() -> f64 {
    3.0 // 300vh sticky section
}

fn default_resize_throttle() -> u64 {
    10
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

    /// Load and validate configuration from `path`, defaulting when it is missing
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config = Self::from_toml(&content)?;
            tracing::info!(path = %path.display(), "Loaded configuration");
            config
        } else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Render configuration as pretty TOML
    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml()?)?;
        tracing::info!(path = %config_path.display(), "Saved configuration");

        Ok(())
    }

    /// Check every section; the first violation wins
    pub fn validate(&self) -> crate::Result<()> {
        self.spring.validate()?;
        self.layers.validate()?;
        self.auto_play.validate()?;
        self.depth_of_field.validate()?;
        self.carousel.validate()?;
        if self.ui.animation_fps == 0 {
            return Err(Error::invalid("ui.animation_fps must be positive"));
        }
        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/loggs/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("loggs")
            .join("config.toml")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Get the log file path used while the TUI owns the terminal
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("loggs.log")
    }

    /// Catalogue path, tilde-expanded
    pub fn catalog_path(&self) -> Option<PathBuf> {
        self.content.catalog_path.as_deref().map(expand_tilde)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.spring.stiffness, 100.0);
        assert_eq!(config.spring.damping, 30.0);
        assert_eq!(config.layers.min_layers, 20);
        assert_eq!(config.auto_play.mode, AutoPlayMode::Continuous);
        assert_eq!(config.ui.start_page, Page::Home);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [layers]
            spacing = 128.0

            [auto_play]
            mode = "step"
            step_delay_ms = 2000

            [ui]
            start_page = "works"
            "#,
        )
        .unwrap();
        assert_eq!(config.layers.spacing, 128.0);
        assert_eq!(config.layers.min_layers, 20);
        assert_eq!(config.auto_play.mode, AutoPlayMode::Step);
        assert_eq!(config.auto_play.step_delay_ms, 2000);
        assert_eq!(config.auto_play.step_duration_ms, 500);
        assert_eq!(config.ui.start_page, Page::Works);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_roundtrip_keeps_values() {
        let mut config = AppConfig::default();
        config.depth_of_field.blur_factor = 1.5;
        let text = config.to_toml().unwrap();
        let back = AppConfig::from_toml(&text).unwrap();
        assert_eq!(back.depth_of_field.blur_factor, 1.5);
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        assert!(matches!(
            AppConfig::from_toml("[layers\nspacing = 1"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_invalid_values_fail_fast() {
        let mut config = AppConfig::default();
        config.depth_of_field.focus_range = 0.5;
        assert!(matches!(config.validate(), Err(Error::InvalidConfiguration(_))));

        let mut config = AppConfig::default();
        config.layers.spacing = 0.0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfiguration(_))));

        let mut config = AppConfig::default();
        config.spring.mass = 0.0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfiguration(_))));

        let mut config = AppConfig::default();
        config.auto_play.mode = AutoPlayMode::Step;
        config.auto_play.step_delay_ms = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_zero_stiffness_is_accepted() {
        let spring = SpringConfig {
            stiffness: 0.0,
            ..SpringConfig::default()
        };
        assert!(spring.validate().is_ok());
    }

    #[test]
    fn test_page_parsing() {
        assert_eq!("Works".parse::<Page>().unwrap(), Page::Works);
        assert!(matches!("gallery".parse::<Page>(), Err(Error::UnknownView(_))));
        assert_eq!(Page::About.next(), Page::Home);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("loggs-missing-config-test.toml");
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.layers.spacing, 150.0);
    }
}
