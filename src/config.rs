//! Runtime settings.  Defaults reproduce the shipped game; a few environment
//! variables override them for testing on odd terminals.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::components::WeaponKind;

pub const ENV_WIDTH: &str = "CATCUS_WIDTH";
pub const ENV_HEIGHT: &str = "CATCUS_HEIGHT";
pub const ENV_FPS: &str = "CATCUS_FPS";
pub const ENV_WEAPON: &str = "CATCUS_WEAPON";
pub const ENV_LOG: &str = "CATCUS_LOG";

/// Highest frame rate an override may ask for.
pub const MAX_FPS: u32 = 1000;

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    /// Logical screen size in pixels.
    pub width: i32,
    pub height: i32,
    pub fps: u32,
    /// Seconds between automatic power-up spawns.
    pub power_up_interval_secs: u32,
    pub weapon: WeaponKind,
    pub log_file: PathBuf,
}

fn default_log_file() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".catcus_arena.log")
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            fps: 60,
            power_up_interval_secs: 3,
            weapon: WeaponKind::Gun,
            log_file: default_log_file(),
        }
    }
}

impl GameConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`.  Malformed values are logged and ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(width) = parse_var(&lookup, ENV_WIDTH, |w: &i32| *w > 0) {
            self.width = width;
        }
        if let Some(height) = parse_var(&lookup, ENV_HEIGHT, |h: &i32| *h > 0) {
            self.height = height;
        }
        if let Some(fps) = parse_var(&lookup, ENV_FPS, |f: &u32| (1..=MAX_FPS).contains(f)) {
            self.fps = fps;
        }
        if let Some(raw) = lookup(ENV_WEAPON) {
            match raw.parse::<WeaponKind>() {
                Ok(weapon) => self.weapon = weapon,
                Err(err) => warn!(%err, "ignoring {ENV_WEAPON}"),
            }
        }
        if let Some(path) = lookup(ENV_LOG) {
            self.log_file = PathBuf::from(path);
        }
        self
    }

    /// Wall-clock time allotted to one frame.
    pub fn frame_budget(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.fps.max(1)))
    }

    pub fn power_up_interval_frames(&self) -> u32 {
        self.power_up_interval_secs.saturating_mul(self.fps)
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    valid: impl Fn(&T) -> bool,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) if valid(&value) => Some(value),
        _ => {
            warn!(value = %raw, "ignoring malformed {key}");
            None
        }
    }
}
