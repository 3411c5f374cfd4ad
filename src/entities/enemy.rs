use super::hitbox::Hitbox;
use crate::config::EnemyConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    /// Enemies are square
    pub size: f32,
    /// Downward speed in units per frame
    pub speed: f32,
}

impl Enemy {
    pub fn new(x: f32, y: f32, config: &EnemyConfig) -> Self {
        Self {
            x,
            y,
            size: config.size,
            speed: config.speed,
        }
    }

    /// New enemy just above the visible area
    pub fn spawn_at(x: f32, config: &EnemyConfig) -> Self {
        Self::new(x, -config.size, config)
    }

    pub fn update(&mut self) {
        self.y += self.speed;
    }

    pub fn is_out_of_bounds(&self, surface_height: f32) -> bool {
        self.y > surface_height
    }

    pub fn hitbox(&self) -> Hitbox {
        Hitbox::new(self.x, self.y, self.size, self.size)
    }
}
