use log::{debug, trace};
use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{Enemy, Player};
use crate::input::InputState;

/// What happened during one call to [`World::step`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    pub fired: bool,
    pub spawned: Option<Enemy>,
    pub bullets_expired: usize,
    pub enemies_expired: usize,
    pub collisions: usize,
}

/// All state that survives from one frame to the next
#[derive(Debug, Clone)]
pub struct World {
    pub config: GameConfig,
    pub player: Player,
    /// Live enemies, oldest first
    pub enemies: Vec<Enemy>,
    pub frame_count: u64,
}

impl World {
    pub fn new(config: GameConfig) -> Self {
        let player = Player::spawn(&config);
        Self {
            config,
            player,
            enemies: Vec::new(),
            frame_count: 0,
        }
    }

    /// Advances the world by one frame
    pub fn step<R: Rng>(&mut self, input: &InputState, rng: &mut R) -> StepReport {
        let mut report = StepReport {
            fired: self.move_player(input),
            ..StepReport::default()
        };
        report.bullets_expired = self.advance_bullets();
        report.spawned = self.spawn_enemies(rng);
        report.enemies_expired = self.advance_enemies();
        report.collisions = self.resolve_collisions();

        if let Some(enemy) = &report.spawned {
            debug!("frame {}: enemy spawned at x={:.1}", self.frame_count, enemy.x);
        }
        if report.collisions > 0 {
            debug!(
                "frame {}: {} bullet(s) hit, {} enemies left",
                self.frame_count,
                report.collisions,
                self.enemies.len()
            );
        }
        trace!(
            "frame {}: player=({:.1}, {:.1}) bullets={} enemies={}",
            self.frame_count,
            self.player.x,
            self.player.y,
            self.player.bullets.len(),
            self.enemies.len()
        );

        report
    }

    /// Moves the player for held directions and fires if allowed
    pub fn move_player(&mut self, input: &InputState) -> bool {
        let max_x = self.config.surface.width - self.player.width;
        let max_y = self.config.surface.height - self.player.height;

        if input.move_left {
            self.player.move_left(0.0);
        }
        if input.move_right {
            self.player.move_right(max_x);
        }
        if input.move_up {
            self.player.move_up(0.0);
        }
        if input.move_down {
            self.player.move_down(max_y);
        }

        let fired = input.fire && self.player.try_fire(&self.config.bullet);

        // Ticks every frame, so the cooldown set by a shot starts draining at once
        self.player.update_cooldown();

        fired
    }

    /// Moves bullets up and drops the ones past the top edge
    pub fn advance_bullets(&mut self) -> usize {
        let before = self.player.bullets.len();
        for bullet in &mut self.player.bullets {
            bullet.update();
        }
        self.player.bullets.retain(|b| !b.is_out_of_bounds());
        before - self.player.bullets.len()
    }

    /// Counts the frame and spawns an enemy on every `spawn_rate`th one
    pub fn spawn_enemies<R: Rng>(&mut self, rng: &mut R) -> Option<Enemy> {
        self.frame_count += 1;
        if !self.frame_count.is_multiple_of(self.config.enemy.spawn_rate) {
            return None;
        }

        let max_x = self.config.surface.width - self.config.enemy.size;
        let x = rng.random_range(0.0..max_x);
        let enemy = Enemy::spawn_at(x, &self.config.enemy);
        self.enemies.push(enemy.clone());
        Some(enemy)
    }

    /// Moves enemies down and drops the ones past the bottom edge
    pub fn advance_enemies(&mut self) -> usize {
        let surface_height = self.config.surface.height;
        let before = self.enemies.len();
        for enemy in &mut self.enemies {
            enemy.update();
        }
        self.enemies.retain(|e| !e.is_out_of_bounds(surface_height));
        before - self.enemies.len()
    }

    /// Removes every bullet/enemy pair that overlaps.
    ///
    /// Bullets are taken oldest first, and each one claims the oldest enemy it
    /// touches that no earlier bullet already claimed. A bullet destroys at
    /// most one enemy and an enemy is destroyed at most once. Returns the
    /// number of pairs removed.
    pub fn resolve_collisions(&mut self) -> usize {
        let mut bullet_hit = vec![false; self.player.bullets.len()];
        let mut enemy_hit = vec![false; self.enemies.len()];
        let mut collisions = 0;

        for (b_idx, bullet) in self.player.bullets.iter().enumerate() {
            let bullet_box = bullet.hitbox();
            let target = self
                .enemies
                .iter()
                .enumerate()
                .find(|(e_idx, enemy)| !enemy_hit[*e_idx] && bullet_box.overlaps(&enemy.hitbox()));

            if let Some((e_idx, _)) = target {
                bullet_hit[b_idx] = true;
                enemy_hit[e_idx] = true;
                collisions += 1;
            }
        }

        if collisions > 0 {
            let mut hits = bullet_hit.into_iter();
            self.player.bullets.retain(|_| !hits.next().unwrap_or(false));
            let mut hits = enemy_hit.into_iter();
            self.enemies.retain(|_| !hits.next().unwrap_or(false));
        }

        collisions
    }
}
