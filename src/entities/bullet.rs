use super::hitbox::Hitbox;
use crate::config::BulletConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Upward speed in units per frame
    pub speed: f32,
}

impl Bullet {
    pub fn new(x: f32, y: f32, config: &BulletConfig) -> Self {
        Self {
            x,
            y,
            width: config.width,
            height: config.height,
            speed: config.speed,
        }
    }

    pub fn update(&mut self) {
        self.y -= self.speed;
    }

    /// Bullets leave through the top edge only
    pub fn is_out_of_bounds(&self) -> bool {
        self.y < 0.0
    }

    pub fn hitbox(&self) -> Hitbox {
        Hitbox::new(self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullet_new() {
        let bullet = Bullet::new(10.0, 100.0, &BulletConfig::default());
        assert_eq!(bullet.x, 10.0);
        assert_eq!(bullet.y, 100.0);
        assert_eq!(bullet.width, 4.0);
        assert_eq!(bullet.height, 10.0);
        assert_eq!(bullet.speed, 6.0);
    }

    #[test]
    fn test_bullet_moves_up() {
        let mut bullet = Bullet::new(10.0, 100.0, &BulletConfig::default());
        bullet.update();
        assert_eq!(bullet.y, 94.0);
        assert_eq!(bullet.x, 10.0);
    }

    #[test]
    fn test_bullet_at_zero_is_still_on_screen() {
        let mut bullet = Bullet::new(10.0, 6.0, &BulletConfig::default());
        bullet.update();
        assert_eq!(bullet.y, 0.0);
        assert!(!bullet.is_out_of_bounds());

        bullet.update();
        assert!(bullet.is_out_of_bounds());
    }
}
