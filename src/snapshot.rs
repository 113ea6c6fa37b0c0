//! Read-only view of a session for the rendering collaborator.
//!
//! Built after every tick; never modifies the session.  Sprites are keyed by
//! `EntityId` so a front end can keep its own visual per id.

use serde::Serialize;

use crate::compute::format_timer;
use crate::entities::{EntityId, FinalReport, GameEvent, GameSession, SessionStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SpriteKind {
    Bullet,
    Enemy,
    Particle,
    Explosion,
}

/// A live entity's placement: `x` in percent of field width, `y` in pixels.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SpriteView {
    pub id: EntityId,
    pub kind: SpriteKind,
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameView {
    pub status: SessionStatus,
    pub score: u32,
    pub lives: u32,
    pub level: u32,
    /// `mm:ss`
    pub timer: String,
    pub player_x: f32,
    /// Top edge of the player's box, pixels.
    pub player_y: f32,
    pub field_width: f32,
    pub field_height: f32,
    pub sprites: Vec<SpriteView>,
    pub events: Vec<GameEvent>,
    pub final_report: Option<FinalReport>,
}

impl FrameView {
    pub fn sprites_of(&self, kind: SpriteKind) -> impl Iterator<Item = &SpriteView> {
        self.sprites.iter().filter(move |s| s.kind == kind)
    }

    pub fn final_message(&self) -> Option<&'static str> {
        self.final_report.map(|r| r.tier.message())
    }
}

/// Build a complete `FrameView` from the current session.
pub fn build_snapshot(session: &GameSession) -> FrameView {
    let field = &session.config.field;
    let mut sprites = Vec::with_capacity(
        session.bullets.len()
            + session.enemies.len()
            + session.particles.len()
            + session.explosions.len(),
    );

    sprites.extend(session.enemies.iter().map(|e| SpriteView {
        id: e.id,
        kind: SpriteKind::Enemy,
        x: e.x,
        y: e.y,
    }));
    sprites.extend(session.bullets.iter().map(|b| SpriteView {
        id: b.id,
        kind: SpriteKind::Bullet,
        x: b.x,
        y: b.y,
    }));
    sprites.extend(session.explosions.iter().map(|x| SpriteView {
        id: x.id,
        kind: SpriteKind::Explosion,
        x: x.x,
        y: x.y,
    }));
    // Particles drift outward in pixels; convert the horizontal part back to
    // percent so every sprite shares the same units.
    sprites.extend(session.particles.iter().map(|p| {
        let t = p.progress();
        SpriteView {
            id: p.id,
            kind: SpriteKind::Particle,
            x: p.origin_x + p.dx * t * 100.0 / field.width,
            y: p.origin_y + p.dy * t,
        }
    }));

    FrameView {
        status: session.status,
        score: session.score,
        lives: session.lives,
        level: session.level,
        timer: format_timer(session.elapsed),
        player_x: session.player_x,
        player_y: field.player_top(),
        field_width: field.width,
        field_height: field.height,
        sprites,
        events: session.events.clone(),
        final_report: session.final_report,
    }
}
