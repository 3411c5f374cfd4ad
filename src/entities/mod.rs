mod bullet;
mod enemy;
mod hitbox;
mod player;

// Re-export all public types
pub use bullet::Bullet;
pub use enemy::Enemy;
pub use hitbox::Hitbox;
pub use player::Player;
