/// All game entity types. Pure data, no game rules.
///
/// Entities hold semantic state only (positions, speeds, expiry times).  Front
/// ends map `EntityId`s to whatever visuals they like.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::config::GameConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntityId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SessionStatus {
    Idle,
    Playing,
    GameOver,
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box in play-field pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    /// Box of the given size whose horizontal centre is `center_x`.
    pub fn centered(center_x: f32, top: f32, width: f32, height: f32) -> Self {
        Rect {
            left: center_x - width / 2.0,
            top,
            right: center_x + width / 2.0,
            bottom: top + height,
        }
    }
}

// ── Projectiles & enemies ─────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub id: EntityId,
    /// Horizontal position, percent of field width.
    pub x: f32,
    /// Top edge, pixels from the top of the field.
    pub y: f32,
    pub expires_at: Instant,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub id: EntityId,
    /// Horizontal position, percent of field width.  Fixed at spawn.
    pub x: f32,
    /// Top edge, pixels from the top of the field.
    pub y: f32,
    /// Downward travel per tick, pixels.
    pub speed: f32,
    pub expires_at: Instant,
}

// ── Cosmetics ────────────────────────────────────────────────────────────────

/// One spark of an explosion burst.  Has no gameplay effect.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub id: EntityId,
    pub origin_x: f32,
    pub origin_y: f32,
    /// Full burst offset in pixels, reached when `life` runs out.
    pub dx: f32,
    pub dy: f32,
    /// Remaining lifetime in ticks.
    pub life: u32,
    pub max_life: u32,
}

impl Particle {
    /// Fraction of the burst travelled so far, 0.0 at birth and 1.0 at death.
    pub fn progress(&self) -> f32 {
        if self.max_life == 0 {
            return 1.0;
        }
        1.0 - self.life as f32 / self.max_life as f32
    }
}

/// The brief flash drawn where something blew up.
#[derive(Clone, Debug, PartialEq)]
pub struct Explosion {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    pub expires_at: Instant,
}

// ── Outcome reporting ────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum FinalTier {
    Base,
    Good,
    Outstanding,
}

impl FinalTier {
    pub fn message(self) -> &'static str {
        match self {
            FinalTier::Base => "You fought bravely, Commander!",
            FinalTier::Good => "Good job defending Earth!",
            FinalTier::Outstanding => "Outstanding performance! Earth is safe!",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FinalReport {
    pub score: u32,
    pub tier: FinalTier,
}

/// Notifications for the UI collaborator, emitted by the most recent command.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum GameEvent {
    SessionStarted,
    Explosion { x: f32, y: f32 },
    EnemyDestroyed { id: EntityId },
    /// An enemy slipped past the bottom boundary.
    EnemyBreached { id: EntityId },
    PlayerHit { id: EntityId },
    LevelUp { level: u32 },
    GameOver(FinalReport),
}

// ── Master session state ──────────────────────────────────────────────────────

/// One play-through.  Cloneable so command handlers can return a new copy
/// without mutating the original.
#[derive(Clone, Debug)]
pub struct GameSession {
    pub config: GameConfig,
    pub status: SessionStatus,
    pub score: u32,
    pub lives: u32,
    pub level: u32,
    /// Horizontal player position, percent of field width.
    pub player_x: f32,
    pub started_at: Instant,
    pub elapsed: Duration,
    pub last_spawn_at: Instant,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub particles: Vec<Particle>,
    pub explosions: Vec<Explosion>,
    /// Events raised by the last command; drained by the front end.
    pub events: Vec<GameEvent>,
    /// Set once, on the transition to `GameOver`.
    pub final_report: Option<FinalReport>,
    pub tick_count: u64,
    pub next_id: u64,
}

impl GameSession {
    pub fn is_playing(&self) -> bool {
        self.status == SessionStatus::Playing
    }

    pub fn alloc_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn player_rect(&self) -> Rect {
        let f = &self.config.field;
        Rect::centered(
            f.percent_to_px(self.player_x),
            f.player_top(),
            f.player_width,
            f.player_height,
        )
    }

    pub fn bullet_rect(&self, bullet: &Bullet) -> Rect {
        let f = &self.config.field;
        Rect::centered(f.percent_to_px(bullet.x), bullet.y, f.bullet_width, f.bullet_height)
    }

    pub fn enemy_rect(&self, enemy: &Enemy) -> Rect {
        let f = &self.config.field;
        Rect::centered(f.percent_to_px(enemy.x), enemy.y, f.enemy_width, f.enemy_height)
    }

    // Removal helpers are no-ops when the entity is already gone.

    pub fn remove_bullet(&mut self, id: EntityId) -> Option<Bullet> {
        let idx = self.bullets.iter().position(|b| b.id == id)?;
        Some(self.bullets.remove(idx))
    }

    pub fn remove_enemy(&mut self, id: EntityId) -> Option<Enemy> {
        let idx = self.enemies.iter().position(|e| e.id == id)?;
        Some(self.enemies.remove(idx))
    }

    pub fn bullet(&self, id: EntityId) -> Option<&Bullet> {
        self.bullets.iter().find(|b| b.id == id)
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }
}
