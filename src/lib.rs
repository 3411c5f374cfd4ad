// Library exports for testing
pub use app::{FrameDriver, Game, StopHandle};
pub use config::GameConfig;
pub use entities::{Bullet, Enemy, Hitbox, Player};
pub use input::{Control, InputAction, InputManager, InputState};
pub use renderer::{DrawCommand, GameRenderer, RecordingSurface, Surface, TerminalSurface};
pub use simulation::{StepReport, World};

pub mod app;
pub mod config;
pub mod entities;
pub mod input;
pub mod renderer;
pub mod simulation;
