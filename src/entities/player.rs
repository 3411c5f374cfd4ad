use super::bullet::Bullet;
use super::hitbox::Hitbox;
use crate::config::{BulletConfig, GameConfig, PlayerConfig};

#[derive(Debug, Clone)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    /// Frames left before the next shot is allowed
    pub fire_cooldown: u32,
    pub cooldown_frames: u32,
    /// Live bullets, oldest first
    pub bullets: Vec<Bullet>,
}

impl Player {
    pub fn new(x: f32, y: f32, config: &PlayerConfig) -> Self {
        Self {
            x,
            y,
            width: config.width,
            height: config.height,
            speed: config.speed,
            fire_cooldown: 0,
            cooldown_frames: config.fire_cooldown_frames,
            bullets: Vec::new(),
        }
    }

    /// Starting position: a little left of center, near the bottom edge,
    /// pulled onto the surface when it is too small for those offsets
    pub fn spawn(config: &GameConfig) -> Self {
        let max_x = (config.surface.width - config.player.width).max(0.0);
        let max_y = (config.surface.height - config.player.height).max(0.0);
        let x = (config.surface.width / 2.0 - 20.0).clamp(0.0, max_x);
        let y = (config.surface.height - 60.0).clamp(0.0, max_y);
        Self::new(x, y, &config.player)
    }

    // Each move only happens while the player is still short of the edge,
    // and never carries it past the edge.

    pub fn move_left(&mut self, min_x: f32) {
        if self.x > min_x {
            self.x = (self.x - self.speed).max(min_x);
        }
    }

    pub fn move_right(&mut self, max_x: f32) {
        if self.x < max_x {
            self.x = (self.x + self.speed).min(max_x);
        }
    }

    pub fn move_up(&mut self, min_y: f32) {
        if self.y > min_y {
            self.y = (self.y - self.speed).max(min_y);
        }
    }

    pub fn move_down(&mut self, max_y: f32) {
        if self.y < max_y {
            self.y = (self.y + self.speed).min(max_y);
        }
    }

    /// Centers the player on an absolute point. No bounds are applied.
    pub fn center_on(&mut self, x: f32, y: f32) {
        self.x = x - self.width / 2.0;
        self.y = y - self.height / 2.0;
    }

    pub fn can_fire(&self) -> bool {
        self.fire_cooldown == 0
    }

    pub fn reset_cooldown(&mut self) {
        self.fire_cooldown = self.cooldown_frames;
    }

    pub fn update_cooldown(&mut self) {
        if self.fire_cooldown > 0 {
            self.fire_cooldown -= 1;
        }
    }

    /// Fires one bullet from the nose of the ship if the cooldown allows.
    /// Returns true when a bullet was added.
    pub fn try_fire(&mut self, bullet: &BulletConfig) -> bool {
        if !self.can_fire() {
            return false;
        }

        let x = self.x + self.width / 2.0 - bullet.width / 2.0;
        self.bullets.push(Bullet::new(x, self.y, bullet));
        self.reset_cooldown();
        true
    }

    pub fn hitbox(&self) -> Hitbox {
        Hitbox::new(self.x, self.y, self.width, self.height)
    }
}
