use std::env;
use std::time::Duration;

pub const WINDOW_TITLE: &str = "Car drifts around house whole day";

/// Runtime settings for the window and the frame loop.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub title: String,
    pub fullscreen: bool,
    /// Windowed size, used when `fullscreen` is off
    pub window_size: (u32, u32),
    /// Simulation step; every step advances the scene by one tick
    pub tick_interval: Duration,
    /// Upper bound on ticks replayed after a long stall
    pub max_catch_up_ticks: u32,
    pub show_hud: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: WINDOW_TITLE.to_string(),
            fullscreen: true,
            window_size: (1280, 720),
            tick_interval: Duration::from_millis(16),
            max_catch_up_ticks: 8,
            show_hud: false,
        }
    }
}

impl Settings {
    /// Defaults, overridden by `DRIFT_HOUSE_WINDOWED` and `DRIFT_HOUSE_HUD`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        if let Some(v) = lookup("DRIFT_HOUSE_WINDOWED") {
            settings.fullscreen = !is_truthy(&v);
        }
        if let Some(v) = lookup("DRIFT_HOUSE_HUD") {
            settings.show_hud = is_truthy(&v);
        }
        settings
    }
}

fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    !(value == "0" || value.eq_ignore_ascii_case("false"))
}
