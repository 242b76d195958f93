//! Coordinator configuration.
//!
//! Everything is optional in the JSON form; missing fields take the defaults
//! below. Durations are given in seconds.
//!
//! ```json
//! {
//!   "viewport": { "width": 1080, "height": 1920 },
//!   "settle": { "mode": "frames", "count": 2 },
//!   "blocked_surfaces": ["main"],
//!   "menu": {
//!     "catalog": {
//!       "profile": { "item_template": "menu_item", "items": [{ "text": "Sign out" }] }
//!     }
//!   }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::geometry::SizeF;
use crate::runtime::{FlyIn, SettleStrategy};

/// Convert seconds to a `Duration`, mapping negative or invalid values to zero.
pub fn seconds(value: f32) -> Duration {
    Duration::try_from_secs_f32(value).unwrap_or(Duration::ZERO)
}

/// Apply the "unset or zero means default" rule to a duration.
pub fn duration_or(requested: Option<Duration>, default: Duration) -> Duration {
    match requested {
        Some(d) if !d.is_zero() => d,
        _ => default,
    }
}

/// Apply the "unset or empty means default" rule to a text.
pub fn text_or<'a>(requested: Option<&'a str>, default: &'a str) -> &'a str {
    match requested {
        Some(t) if !t.is_empty() => t,
        _ => default,
    }
}

/// Top-level configuration of a [`DialogCoordinator`](crate::DialogCoordinator).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DialogConfig {
    /// Reference viewport used for off-screen origins and size limits.
    pub viewport: SizeF,
    pub settle: SettleStrategy,
    /// Background surfaces whose input is blocked while a menu is shown.
    pub blocked_surfaces: Vec<String>,
    pub alert: AlertConfig,
    pub menu: MenuConfig,
    pub toast: ToastConfig,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            viewport: SizeF::new(1080.0, 1920.0),
            settle: SettleStrategy::default(),
            blocked_surfaces: Vec::new(),
            alert: AlertConfig::default(),
            menu: MenuConfig::default(),
            toast: ToastConfig::default(),
        }
    }
}

impl DialogConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: DialogConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.viewport.is_positive() {
            return Err(ConfigError::invalid("viewport", "must be positive"));
        }
        if let SettleStrategy::Frames { count: 0 } = self.settle {
            return Err(ConfigError::invalid("settle.count", "must be at least 1"));
        }

        let templates = [
            ("alert.template", &self.alert.template),
            ("alert.backdrop_template", &self.alert.backdrop_template),
            ("menu.template", &self.menu.template),
            ("menu.backdrop_template", &self.menu.backdrop_template),
            ("toast.template", &self.toast.template),
        ];
        for (field, name) in templates {
            if name.is_empty() {
                return Err(ConfigError::invalid(field, "template name is empty"));
            }
        }

        for (menu_type, content) in &self.menu.catalog {
            if content.item_template.is_empty() {
                return Err(ConfigError::invalid(
                    format!("menu.catalog.{}.item_template", menu_type),
                    "template name is empty",
                ));
            }
        }

        let durations = [
            ("alert.duration", self.alert.duration),
            ("menu.duration", self.menu.duration),
            ("toast.fade_duration", self.toast.fade_duration),
            ("toast.duration", self.toast.duration),
        ];
        for (field, value) in durations {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(field, "must be a non-negative number"));
            }
        }
        Ok(())
    }
}

/// Alert dialog settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub template: String,
    pub backdrop_template: String,
    pub ok_text: String,
    pub cancel_text: String,
    pub fly_in: FlyIn,
    /// Fly-in duration in seconds.
    pub duration: f32,
    /// Smallest dialog size; also the dialog size at `content_size`.
    pub min_size: SizeF,
    pub min_horizontal_margin: f32,
    /// Size of the content area in the unstretched template.
    pub content_size: SizeF,
    pub button_height: f32,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            template: "alert".to_string(),
            backdrop_template: "alert_backdrop".to_string(),
            ok_text: "Ok".to_string(),
            cancel_text: "Cancel".to_string(),
            fly_in: FlyIn::FromBottom,
            duration: 0.5,
            min_size: SizeF::new(600.0, 480.0),
            min_horizontal_margin: 40.0,
            content_size: SizeF::new(520.0, 300.0),
            button_height: 96.0,
        }
    }
}

impl AlertConfig {
    pub fn default_duration(&self) -> Duration {
        seconds(self.duration)
    }

    /// Configured default direction, never [`FlyIn::None`].
    pub fn default_fly_in(&self) -> FlyIn {
        self.fly_in.or(FlyIn::FromBottom)
    }
}

/// A single menu entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MenuItem {
    pub text: String,
    #[serde(default)]
    pub icon: Option<String>,
}

impl MenuItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Catalog entry: the items of one menu type and the template they use.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MenuContent {
    pub item_template: String,
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

impl MenuContent {
    pub fn new(item_template: impl Into<String>, items: Vec<MenuItem>) -> Self {
        Self {
            item_template: item_template.into(),
            items,
        }
    }
}

/// Dropdown menu settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    pub template: String,
    pub backdrop_template: String,
    pub width: f32,
    pub item_height: f32,
    pub arrow_height: f32,
    pub padding_top: f32,
    pub padding_bottom: f32,
    /// Mask reveal duration in seconds.
    pub duration: f32,
    pub show_divider_on_last: bool,
    pub catalog: HashMap<String, MenuContent>,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            template: "menu".to_string(),
            backdrop_template: "menu_backdrop".to_string(),
            width: 360.0,
            item_height: 96.0,
            arrow_height: 24.0,
            padding_top: 16.0,
            padding_bottom: 16.0,
            duration: 0.2,
            show_divider_on_last: false,
            catalog: HashMap::new(),
        }
    }
}

impl MenuConfig {
    pub fn default_duration(&self) -> Duration {
        seconds(self.duration)
    }

    /// Add a catalog entry.
    pub fn with_menu(mut self, menu_type: impl Into<String>, content: MenuContent) -> Self {
        self.catalog.insert(menu_type.into(), content);
        self
    }
}

/// Named toast durations, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ToastPresets {
    pub fast: f32,
    pub normal: f32,
    pub slow: f32,
}

impl Default for ToastPresets {
    fn default() -> Self {
        Self {
            fast: 0.6,
            normal: 1.0,
            slow: 1.5,
        }
    }
}

/// Toast settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToastConfig {
    pub template: String,
    /// Fade in/out duration in seconds.
    pub fade_duration: f32,
    pub background_opacity: f32,
    /// Visible duration in seconds when none is requested.
    pub duration: f32,
    pub horizontal_margin: f32,
    pub padding: SizeF,
    pub presets: ToastPresets,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            template: "toast".to_string(),
            fade_duration: 0.2,
            background_opacity: 0.6,
            duration: 1.0,
            horizontal_margin: 40.0,
            padding: SizeF::new(24.0, 16.0),
            presets: ToastPresets::default(),
        }
    }
}

impl ToastConfig {
    pub fn default_duration(&self) -> Duration {
        seconds(self.duration)
    }

    pub fn fade(&self) -> Duration {
        seconds(self.fade_duration)
    }
}
