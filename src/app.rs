use color_eyre::Result;
use log::info;
use rand::rngs::StdRng;
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    style::{Color, Style},
    widgets::{Block, Borders},
};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread;
use std::time::{Duration, Instant};

use crate::config::GameConfig;
use crate::input::{InputAction, InputManager, InputState};
use crate::renderer::{GameRenderer, Surface, TerminalSurface};
use crate::simulation::{StepReport, World};

/// One running game: the world plus everything needed to advance and draw it
pub struct Game {
    world: World,
    renderer: GameRenderer,
    rng: StdRng,
}

impl Game {
    pub fn new(config: GameConfig, rng: StdRng) -> Self {
        let renderer = GameRenderer::new(config.palette.clone());
        Self {
            world: World::new(config),
            renderer,
            rng,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Applies a pointer drag: the player jumps there, bounds are not applied
    pub fn move_player_to(&mut self, x: f32, y: f32) {
        self.world.player.center_on(x, y);
    }

    /// One frame: clear, simulate, draw
    pub fn frame<S: Surface + ?Sized>(&mut self, input: &InputState, surface: &mut S) -> StepReport {
        surface.clear_all();
        let report = self.world.step(input, &mut self.rng);
        self.renderer.render(surface, &self.world);
        report
    }
}

/// Cloneable handle that stops a running [`FrameDriver`]
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Runs a [`Game`] once per terminal refresh until stopped
pub struct FrameDriver {
    game: Game,
    input_manager: InputManager,
    frame_interval: Duration,
    stop: StopHandle,
}

impl FrameDriver {
    pub fn new(game: Game, input_manager: InputManager) -> Self {
        let frame_interval = Duration::from_millis(game.world.config.timing.frame_interval_ms);
        Self {
            game,
            input_manager,
            frame_interval,
            stop: StopHandle::default(),
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Run the main loop. Any terminal error ends it.
    pub fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> Result<()> {
        info!("frame loop started");
        while !self.stop.is_stopped() {
            let frame_start = Instant::now();

            self.input_manager.begin_frame();
            let actions = self.input_manager.poll_events()?;
            self.process_actions(&actions);
            if self.stop.is_stopped() {
                break;
            }

            self.draw(terminal)?;

            // Keep roughly one frame per interval without spinning the CPU
            if let Some(rest) = self.frame_interval.checked_sub(frame_start.elapsed()) {
                thread::sleep(rest);
            }
        }
        info!(
            "frame loop stopped after {} frames",
            self.game.world.frame_count
        );
        Ok(())
    }

    /// Steps and draws one frame through the terminal
    pub fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<StepReport> {
        let mut report = StepReport::default();
        let Self {
            game,
            input_manager,
            ..
        } = self;
        terminal.draw(|frame| {
            let viewport = render_border(frame);
            input_manager.set_viewport(viewport);
            let size = (
                game.world.config.surface.width,
                game.world.config.surface.height,
            );
            let mut surface = TerminalSurface::new(frame.buffer_mut(), viewport, size);
            report = game.frame(input_manager.state(), &mut surface);
        })?;
        Ok(report)
    }

    fn process_actions(&mut self, actions: &[InputAction]) {
        for action in actions {
            match *action {
                InputAction::MovePlayerTo { x, y } => self.game.move_player_to(x, y),
                InputAction::Quit => self.stop.stop(),
            }
        }
    }
}

/// Draws the frame border and returns the area left for the surface
fn render_border(frame: &mut Frame) -> ratatui::layout::Rect {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" ←↑↓→ move · z fire · drag to steer · q quit ");
    let inner = block.inner(frame.area());
    frame.render_widget(block, frame.area());
    inner
}
