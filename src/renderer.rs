use ratatui::{buffer::Buffer, layout::Rect, style::Color};

use crate::config::Palette;
use crate::entities::Hitbox;
use crate::simulation::World;

/// A 2D target that can be cleared and filled with solid rectangles.
/// Coordinates are surface units with the origin at the top left.
pub trait Surface {
    fn size(&self) -> (f32, f32);

    fn clear(&mut self, region: Hitbox);

    fn fill_rect(&mut self, rect: Hitbox, color: Color);

    fn clear_all(&mut self) {
        let (width, height) = self.size();
        self.clear(Hitbox::new(0.0, 0.0, width, height));
    }
}

/// Draws the world: player, then enemies, then bullets
pub struct GameRenderer {
    palette: Palette,
}

impl GameRenderer {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    /// Clears the surface and draws every layer. Never touches the world.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S, world: &World) {
        surface.clear_all();
        self.render_player(surface, world);
        self.render_enemies(surface, world);
        self.render_bullets(surface, world);
    }

    fn render_player<S: Surface + ?Sized>(&self, surface: &mut S, world: &World) {
        surface.fill_rect(world.player.hitbox(), self.palette.player);
    }

    fn render_enemies<S: Surface + ?Sized>(&self, surface: &mut S, world: &World) {
        for enemy in &world.enemies {
            surface.fill_rect(enemy.hitbox(), self.palette.enemy);
        }
    }

    fn render_bullets<S: Surface + ?Sized>(&self, surface: &mut S, world: &World) {
        for bullet in &world.player.bullets {
            surface.fill_rect(bullet.hitbox(), self.palette.bullet);
        }
    }
}

/// Scales surface units onto the cells of a ratatui buffer area.
/// Each filled cell is a blank with the fill color as background.
pub struct TerminalSurface<'a> {
    buffer: &'a mut Buffer,
    area: Rect,
    width: f32,
    height: f32,
}

impl<'a> TerminalSurface<'a> {
    pub fn new(buffer: &'a mut Buffer, area: Rect, size: (f32, f32)) -> Self {
        // Never draw outside the buffer
        let area = area.intersection(buffer.area);
        Self {
            buffer,
            area,
            width: size.0,
            height: size.1,
        }
    }

    /// Cell ranges covered by `rect`, clipped to the area. Any partial
    /// overlap with a cell covers the whole cell, so thin shapes stay visible.
    fn cells(&self, rect: Hitbox) -> Option<(std::ops::Range<u16>, std::ops::Range<u16>)> {
        let columns = span(rect.x, rect.width, self.width, self.area.width)?;
        let rows = span(rect.y, rect.height, self.height, self.area.height)?;
        Some((
            self.area.x + columns.start..self.area.x + columns.end,
            self.area.y + rows.start..self.area.y + rows.end,
        ))
    }
}

fn span(start: f32, length: f32, extent: f32, cells: u16) -> Option<std::ops::Range<u16>> {
    if cells == 0 || extent <= 0.0 || length <= 0.0 {
        return None;
    }
    let cells_f = f32::from(cells);
    let first = (start * cells_f / extent).floor().max(0.0);
    let last = ((start + length) * cells_f / extent).ceil().min(cells_f);
    if first >= last {
        return None;
    }
    Some(first as u16..last as u16)
}

impl Surface for TerminalSurface<'_> {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear(&mut self, region: Hitbox) {
        let Some((columns, rows)) = self.cells(region) else {
            return;
        };
        for y in rows {
            for x in columns.clone() {
                if let Some(cell) = self.buffer.cell_mut((x, y)) {
                    cell.reset();
                }
            }
        }
    }

    fn fill_rect(&mut self, rect: Hitbox, color: Color) {
        let Some((columns, rows)) = self.cells(rect) else {
            return;
        };
        for y in rows {
            for x in columns.clone() {
                if let Some(cell) = self.buffer.cell_mut((x, y)) {
                    cell.set_symbol(" ").set_bg(color);
                }
            }
        }
    }
}

/// One call made against a [`RecordingSurface`]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Hitbox),
    Fill(Hitbox, Color),
}

/// Keeps every draw call in order instead of drawing
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingSurface {
    pub width: f32,
    pub height: f32,
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Fills recorded since the most recent full clear
    pub fn visible(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear(_)))
            .map_or(0, |i| i + 1);
        &self.commands[start..]
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear(&mut self, region: Hitbox) {
        self.commands.push(DrawCommand::Clear(region));
    }

    fn fill_rect(&mut self, rect: Hitbox, color: Color) {
        self.commands.push(DrawCommand::Fill(rect, color));
    }
}
