/// Tuning tables for the simulation.
///
/// Every value has a default matching the classic game balance, and every
/// table is `#[serde(default)]` so a JSON file only needs the keys it wants to
/// override.  Times are stored in milliseconds to keep the file format flat.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

// ── Player ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub starting_lives: u32,
    /// Starting horizontal position, percent of field width.
    pub start_x: f32,
    pub min_x: f32,
    pub max_x: f32,
    /// Horizontal step per tick while a direction key is held.
    pub step: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            starting_lives: 3,
            start_x: 50.0,
            min_x: 5.0,
            max_x: 95.0,
            step: 1.2,
        }
    }
}

// ── Bullets ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletTuning {
    /// Upward travel per tick, in pixels.
    pub step: f32,
    /// Backstop lifetime.  Must exceed the time a bullet needs to cross the
    /// field so the top edge is what normally removes it.
    pub lifetime_ms: u64,
}

impl Default for BulletTuning {
    fn default() -> Self {
        Self {
            step: 8.0,
            lifetime_ms: 1500,
        }
    }
}

// ── Enemies & spawner ────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub base_spawn_interval_ms: u64,
    /// Lowest fraction of the base interval the ramp can reach.
    pub min_spawn_factor: f32,
    /// Time over which the spawn interval ramps down to the floor.
    pub spawn_ramp_ms: u64,
    pub base_speed: f32,
    pub level_speed_factor: f32,
    /// Elapsed time that adds one more multiple of the base speed.
    pub speed_ramp_ms: u64,
    /// Maximum downward speed, pixels per tick.
    pub speed_cap: f32,
    /// Backstop lifetime; expiry never costs a life.
    pub lifetime_ms: u64,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            base_spawn_interval_ms: 2000,
            min_spawn_factor: 0.3,
            spawn_ramp_ms: 60_000,
            base_speed: 1.5,
            level_speed_factor: 0.3,
            speed_ramp_ms: 30_000,
            speed_cap: 4.0,
            lifetime_ms: 12_000,
        }
    }
}

// ── Cosmetic effects ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectTuning {
    pub particles_per_explosion: u32,
    /// Particle lifetime in ticks.
    pub particle_life: u32,
    pub particle_min_distance: f32,
    pub particle_max_distance: f32,
    pub explosion_lifetime_ms: u64,
}

impl Default for EffectTuning {
    fn default() -> Self {
        Self {
            particles_per_explosion: 8,
            particle_life: 60,
            particle_min_distance: 50.0,
            particle_max_distance: 100.0,
            explosion_lifetime_ms: 600,
        }
    }
}

// ── Scoring ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTuning {
    pub points_per_kill: u32,
    /// A level is gained each time the score reaches a multiple of this.
    pub level_up_every: u32,
    /// Final scores strictly above this earn the middle message.
    pub good_threshold: u32,
    /// Final scores strictly above this earn the best message.
    pub outstanding_threshold: u32,
}

impl Default for ScoringTuning {
    fn default() -> Self {
        Self {
            points_per_kill: 100,
            level_up_every: 1000,
            good_threshold: 1000,
            outstanding_threshold: 2000,
        }
    }
}

// ── Play-field geometry ──────────────────────────────────────────────────────

/// Pixel dimensions of the play field and of each sprite's bounding box.
/// Horizontal positions are kept in percent and converted through `width`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldGeometry {
    pub width: f32,
    pub height: f32,
    pub player_width: f32,
    pub player_height: f32,
    /// Distance from the bottom edge to the player's top edge.
    pub player_top_offset: f32,
    pub bullet_width: f32,
    pub bullet_height: f32,
    /// Distance from the bottom edge to a freshly fired bullet.
    pub bullet_spawn_offset: f32,
    pub enemy_width: f32,
    pub enemy_height: f32,
    pub enemy_spawn_y: f32,
    /// Enemies whose y passes `height - enemy_bottom_margin` breach the defence.
    pub enemy_bottom_margin: f32,
}

impl Default for FieldGeometry {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            player_width: 50.0,
            player_height: 50.0,
            player_top_offset: 100.0,
            bullet_width: 4.0,
            bullet_height: 15.0,
            bullet_spawn_offset: 110.0,
            enemy_width: 40.0,
            enemy_height: 40.0,
            enemy_spawn_y: -50.0,
            enemy_bottom_margin: 50.0,
        }
    }
}

impl FieldGeometry {
    pub fn player_top(&self) -> f32 {
        self.height - self.player_top_offset
    }

    pub fn bullet_spawn_y(&self) -> f32 {
        self.height - self.bullet_spawn_offset
    }

    pub fn bottom_boundary(&self) -> f32 {
        self.height - self.enemy_bottom_margin
    }

    /// Convert a percent-of-width coordinate to pixels.
    pub fn percent_to_px(&self, x: f32) -> f32 {
        x * self.width / 100.0
    }
}

// ── Top level ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed tick period used by front ends.
    pub tick_interval_ms: u64,
    pub player: PlayerTuning,
    pub bullet: BulletTuning,
    pub enemy: EnemyTuning,
    pub effects: EffectTuning,
    pub scoring: ScoringTuning,
    pub field: FieldGeometry,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 16,
            player: PlayerTuning::default(),
            bullet: BulletTuning::default(),
            enemy: EnemyTuning::default(),
            effects: EffectTuning::default(),
            scoring: ScoringTuning::default(),
            field: FieldGeometry::default(),
        }
    }
}

impl GameConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| GameError::ConfigIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn validate(&self) -> Result<()> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> GameError {
            GameError::InvalidConfig {
                field,
                reason: reason.into(),
            }
        }

        if self.tick_interval_ms == 0 {
            return Err(invalid("tick_interval_ms", "must be positive"));
        }
        let p = &self.player;
        if p.starting_lives == 0 {
            return Err(invalid("player.starting_lives", "must be at least 1"));
        }
        if !(p.min_x < p.max_x) {
            return Err(invalid(
                "player.min_x",
                format!("{} is not below max_x {}", p.min_x, p.max_x),
            ));
        }
        if p.start_x < p.min_x || p.start_x > p.max_x {
            return Err(invalid(
                "player.start_x",
                format!("{} lies outside [{}, {}]", p.start_x, p.min_x, p.max_x),
            ));
        }
        if self.bullet.step <= 0.0 {
            return Err(invalid("bullet.step", "must be positive"));
        }
        let e = &self.enemy;
        if e.base_spawn_interval_ms == 0 {
            return Err(invalid("enemy.base_spawn_interval_ms", "must be positive"));
        }
        if !(e.min_spawn_factor > 0.0 && e.min_spawn_factor <= 1.0) {
            return Err(invalid("enemy.min_spawn_factor", "must be in (0, 1]"));
        }
        if e.spawn_ramp_ms == 0 || e.speed_ramp_ms == 0 {
            return Err(invalid("enemy.spawn_ramp_ms", "ramp durations must be positive"));
        }
        if e.base_speed <= 0.0 || e.level_speed_factor < 0.0 {
            return Err(invalid("enemy.base_speed", "speeds must not be negative"));
        }
        if e.speed_cap < e.base_speed {
            return Err(invalid("enemy.speed_cap", "must be at least base_speed"));
        }
        let fx = &self.effects;
        if fx.particle_min_distance > fx.particle_max_distance {
            return Err(invalid(
                "effects.particle_min_distance",
                "must not exceed particle_max_distance",
            ));
        }
        if self.scoring.points_per_kill == 0 || self.scoring.level_up_every == 0 {
            return Err(invalid("scoring", "points and level step must be positive"));
        }
        let f = &self.field;
        if f.width <= 0.0 || f.height <= 0.0 {
            return Err(invalid("field", "dimensions must be positive"));
        }
        Ok(())
    }
}
