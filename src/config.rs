//! Tunable game constants, loaded from an optional TOML file.

use color_eyre::{
    Result,
    eyre::{WrapErr, eyre},
};
use ratatui::style::Color;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 800.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub width: f32,
    pub height: f32,
    /// Units per frame while a direction is held
    pub speed: f32,
    /// Frames between shots while fire is held
    pub fire_cooldown_frames: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            width: 10.0,
            height: 20.0,
            speed: 6.0,
            fire_cooldown_frames: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BulletConfig {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
}

impl Default for BulletConfig {
    fn default() -> Self {
        Self {
            width: 4.0,
            height: 10.0,
            speed: 6.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub size: f32,
    pub speed: f32,
    /// A new enemy appears every `spawn_rate` frames
    pub spawn_rate: u64,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            size: 40.0,
            speed: 2.0,
            spawn_rate: 80,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Target time between frames (~60 FPS)
    pub frame_interval_ms: u64,
    /// How long a key press counts as held when the terminal never reports
    /// releases. Must outlast the OS auto-repeat delay (usually 250-500 ms),
    /// otherwise a held key drops out between the first press and the first
    /// repeat.
    pub key_hold_frames: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 16,
            key_hold_frames: 36,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub player: Color,
    pub enemy: Color,
    pub bullet: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            player: Color::White,
            enemy: Color::Red,
            bullet: Color::Yellow,
        }
    }
}

/// Every constant the simulation, renderer and frame driver read.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub surface: SurfaceConfig,
    pub player: PlayerConfig,
    pub bullet: BulletConfig,
    pub enemy: EnemyConfig,
    pub timing: TimingConfig,
    pub palette: Palette,
}

impl GameConfig {
    /// Reads, parses and validates a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("read config {}", path.display()))?;
        Self::from_toml(&text).wrap_err_with(|| format!("load config {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).wrap_err("parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let lengths = [
            ("surface.width", self.surface.width),
            ("surface.height", self.surface.height),
            ("player.width", self.player.width),
            ("player.height", self.player.height),
            ("bullet.width", self.bullet.width),
            ("bullet.height", self.bullet.height),
            ("enemy.size", self.enemy.size),
        ];
        for (field, value) in lengths {
            if !value.is_finite() || value <= 0.0 {
                return Err(eyre!("{field} must be a positive number, got {value}"));
            }
        }

        if !self.player.speed.is_finite() || self.player.speed < 0.0 {
            return Err(eyre!(
                "player.speed must be zero or positive, got {}",
                self.player.speed
            ));
        }

        // Bullets and enemies only leave the surface by moving
        let speeds = [
            ("bullet.speed", self.bullet.speed),
            ("enemy.speed", self.enemy.speed),
        ];
        for (field, value) in speeds {
            if !value.is_finite() || value <= 0.0 {
                return Err(eyre!("{field} must be a positive number, got {value}"));
            }
        }

        if self.enemy.size >= self.surface.width {
            return Err(eyre!(
                "enemy.size ({}) must be smaller than surface.width ({})",
                self.enemy.size,
                self.surface.width
            ));
        }
        if self.player.width > self.surface.width || self.player.height > self.surface.height {
            return Err(eyre!("player does not fit on the surface"));
        }
        if self.enemy.spawn_rate == 0 {
            return Err(eyre!("enemy.spawn_rate must be at least 1"));
        }
        if self.timing.frame_interval_ms == 0 {
            return Err(eyre!("timing.frame_interval_ms must be at least 1"));
        }

        Ok(())
    }
}
