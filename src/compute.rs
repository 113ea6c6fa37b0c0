/// Game rules.
///
/// Every command takes an immutable reference to the current `GameSession`
/// (plus the current time and, where needed, an RNG handle) and returns a
/// brand-new `GameSession`.  Side effects are limited to the injected RNG and
/// `tracing` output.

use std::f32::consts::TAU;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, info};

use crate::config::{GameConfig, PlayerTuning, ScoringTuning};
use crate::entities::{
    Bullet, EntityId, Enemy, Explosion, FinalReport, FinalTier, GameEvent, GameSession, Particle,
    Rect, SessionStatus,
};
use crate::input::HeldInput;

// ── Difficulty ramps ─────────────────────────────────────────────────────────

/// Effective gap between enemy spawns after `elapsed` of play.  Shrinks
/// linearly from the base interval to its floor over the spawn ramp.
pub fn spawn_interval(config: &GameConfig, elapsed: Duration) -> Duration {
    let e = &config.enemy;
    let ramp = elapsed.as_secs_f64() * 1000.0 / e.spawn_ramp_ms as f64;
    let factor = (1.0 - ramp).max(e.min_spawn_factor as f64);
    Duration::from_secs_f64(e.base_spawn_interval_ms as f64 * factor / 1000.0)
}

/// Downward speed for an enemy spawned at `level` after `elapsed` of play.
pub fn enemy_speed(config: &GameConfig, level: u32, elapsed: Duration) -> f32 {
    let e = &config.enemy;
    let time_ramp = 1.0 + elapsed.as_secs_f64() * 1000.0 / e.speed_ramp_ms as f64;
    let base = e.base_speed as f64 + level as f64 * e.level_speed_factor as f64;
    (base * time_ramp).min(e.speed_cap as f64) as f32
}

// ── Small pure helpers ───────────────────────────────────────────────────────

/// Inclusive AABB overlap: boxes that merely touch collide.
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    !(a.right < b.left || a.left > b.right || a.bottom < b.top || a.top > b.bottom)
}

/// Number of `step` multiples crossed going from `old_score` to `new_score`.
pub fn levels_gained(old_score: u32, new_score: u32, step: u32) -> u32 {
    if step == 0 || new_score <= old_score {
        return 0;
    }
    new_score / step - old_score / step
}

pub fn final_tier(score: u32, scoring: &ScoringTuning) -> FinalTier {
    if score > scoring.outstanding_threshold {
        FinalTier::Outstanding
    } else if score > scoring.good_threshold {
        FinalTier::Good
    } else {
        FinalTier::Base
    }
}

/// `mm:ss` rendering of a play time.
pub fn format_timer(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!("{:02}:{:02}", total / 60, total % 60)
}

pub fn clamp_player_x(x: f32, tuning: &PlayerTuning) -> f32 {
    x.clamp(tuning.min_x, tuning.max_x)
}

// ── Session lifecycle ────────────────────────────────────────────────────────

/// A session waiting on the start screen.
pub fn new_session(config: GameConfig, now: Instant) -> GameSession {
    GameSession {
        status: SessionStatus::Idle,
        score: 0,
        lives: config.player.starting_lives,
        level: 1,
        player_x: config.player.start_x,
        started_at: now,
        elapsed: Duration::ZERO,
        last_spawn_at: now,
        bullets: Vec::new(),
        enemies: Vec::new(),
        particles: Vec::new(),
        explosions: Vec::new(),
        events: Vec::new(),
        final_report: None,
        tick_count: 0,
        next_id: 0,
        config,
    }
}

/// Every field reset and every collection cleared.  Entity ids keep counting
/// so a front end never sees an id reused.
fn fresh_playing(state: &GameSession, now: Instant) -> GameSession {
    let mut next = new_session(state.config.clone(), now);
    next.next_id = state.next_id;
    next.status = SessionStatus::Playing;
    next.events.push(GameEvent::SessionStarted);
    info!(lives = next.lives, "session started");
    next
}

/// Idle / GameOver → Playing.  Ignored mid-game.
pub fn start_game(state: &GameSession, now: Instant) -> GameSession {
    match state.status {
        SessionStatus::Playing => {
            debug!("start ignored: session already running");
            GameSession {
                events: Vec::new(),
                ..state.clone()
            }
        }
        SessionStatus::Idle | SessionStatus::GameOver => fresh_playing(state, now),
    }
}

/// GameOver → Playing.  Ignored in any other state.
pub fn restart_game(state: &GameSession, now: Instant) -> GameSession {
    match state.status {
        SessionStatus::GameOver => fresh_playing(state, now),
        other => {
            debug!(status = ?other, "restart ignored");
            GameSession {
                events: Vec::new(),
                ..state.clone()
            }
        }
    }
}

// ── Discrete input ───────────────────────────────────────────────────────────

/// Fire a bullet from the player's current position.
pub fn fire(state: &GameSession, now: Instant) -> GameSession {
    if !state.is_playing() {
        return state.clone();
    }
    let mut next = state.clone();
    let id = next.alloc_id();
    let lifetime = Duration::from_millis(next.config.bullet.lifetime_ms);
    next.bullets.push(Bullet {
        id,
        x: next.player_x,
        y: next.config.field.bullet_spawn_y(),
        expires_at: now + lifetime,
    });
    next
}

/// Nudge the player by a drag delta already scaled to percent units.
pub fn apply_move_delta(state: &GameSession, delta: f32) -> GameSession {
    if !state.is_playing() || !delta.is_finite() {
        return state.clone();
    }
    GameSession {
        player_x: clamp_player_x(state.player_x + delta, &state.config.player),
        ..state.clone()
    }
}

// ── Per-tick update ──────────────────────────────────────────────────────────

/// Advance the session by one tick.  All randomness comes through `rng` and
/// all time through `now`, so tests stay reproducible.
///
/// Once the session is over, whether before the call or part-way through it,
/// nothing else changes.
pub fn tick(state: &GameSession, input: &HeldInput, now: Instant, rng: &mut impl Rng) -> GameSession {
    let mut next = GameSession {
        events: Vec::new(),
        ..state.clone()
    };
    if !next.is_playing() {
        return next;
    }
    next.tick_count += 1;

    // ── 1. Clock ─────────────────────────────────────────────────────────────
    next.elapsed = now.saturating_duration_since(next.started_at);

    // ── 2. Held movement ─────────────────────────────────────────────────────
    move_player(&mut next, input);

    // ── 3. Bullets ───────────────────────────────────────────────────────────
    advance_bullets(&mut next, now);

    // ── 4. Enemies (may end the session) ─────────────────────────────────────
    advance_enemies(&mut next, now);
    if !next.is_playing() {
        return next;
    }

    // ── 5. Cosmetics ─────────────────────────────────────────────────────────
    advance_effects(&mut next, now);

    // ── 6. Spawner ───────────────────────────────────────────────────────────
    let interval = spawn_interval(&next.config, next.elapsed);
    if now.saturating_duration_since(next.last_spawn_at) > interval {
        spawn_enemy(&mut next, now, rng);
        next.last_spawn_at = now;
    }

    // ── 7. Collisions ────────────────────────────────────────────────────────
    resolve_bullet_hits(&mut next, now, rng);
    resolve_player_hits(&mut next, now, rng);

    next
}

fn move_player(s: &mut GameSession, input: &HeldInput) {
    let step = s.config.player.step;
    if input.left {
        s.player_x -= step;
    }
    if input.right {
        s.player_x += step;
    }
    s.player_x = clamp_player_x(s.player_x, &s.config.player);
}

fn advance_bullets(s: &mut GameSession, now: Instant) {
    let step = s.config.bullet.step;
    s.bullets.retain_mut(|b| {
        b.y -= step;
        b.y >= 0.0 && now < b.expires_at
    });
}

fn advance_enemies(s: &mut GameSession, now: Instant) {
    let boundary = s.config.field.bottom_boundary();
    let mut i = 0;
    while i < s.enemies.len() {
        let enemy = &mut s.enemies[i];
        enemy.y += enemy.speed;

        if enemy.y > boundary {
            let id = enemy.id;
            s.enemies.remove(i);
            debug!(?id, "enemy breached the bottom boundary");
            s.events.push(GameEvent::EnemyBreached { id });
            lose_life(s);
            if !s.is_playing() {
                return;
            }
            continue;
        }

        if now >= enemy.expires_at {
            let id = enemy.id;
            s.enemies.remove(i);
            debug!(?id, "enemy expired");
            continue;
        }

        i += 1;
    }
}

fn advance_effects(s: &mut GameSession, now: Instant) {
    s.particles.retain_mut(|p| {
        p.life = p.life.saturating_sub(1);
        p.life > 0
    });
    s.explosions.retain(|x| now < x.expires_at);
}

/// Put one enemy at a uniformly random column at the top of the field.
pub fn spawn_enemy(s: &mut GameSession, now: Instant, rng: &mut impl Rng) -> EntityId {
    let x = rng.gen_range(s.config.player.min_x..=s.config.player.max_x);
    let speed = enemy_speed(&s.config, s.level, s.elapsed);
    let id = s.alloc_id();
    s.enemies.push(Enemy {
        id,
        x,
        y: s.config.field.enemy_spawn_y,
        speed,
        expires_at: now + Duration::from_millis(s.config.enemy.lifetime_ms),
    });
    debug!(?id, x, speed, "enemy spawned");
    id
}

fn resolve_bullet_hits(s: &mut GameSession, now: Instant, rng: &mut impl Rng) {
    let bullet_ids: Vec<EntityId> = s.bullets.iter().map(|b| b.id).collect();
    for bullet_id in bullet_ids {
        let Some(bullet) = s.bullet(bullet_id) else { continue };
        let bullet_rect = s.bullet_rect(bullet);
        // A bullet takes out at most one enemy: the first it overlaps.
        let hit = s
            .enemies
            .iter()
            .find(|e| rects_overlap(&bullet_rect, &s.enemy_rect(e)))
            .map(|e| e.id);
        let Some(enemy_id) = hit else { continue };

        s.remove_bullet(bullet_id);
        let Some(enemy) = s.remove_enemy(enemy_id) else { continue };
        explode(s, enemy.x, enemy.y, now, rng);
        s.events.push(GameEvent::EnemyDestroyed { id: enemy.id });
        award_kill(s);
    }
}

fn resolve_player_hits(s: &mut GameSession, now: Instant, rng: &mut impl Rng) {
    let player_rect = s.player_rect();
    let rammers: Vec<EntityId> = s
        .enemies
        .iter()
        .filter(|e| rects_overlap(&player_rect, &s.enemy_rect(e)))
        .map(|e| e.id)
        .collect();

    for id in rammers {
        if s.remove_enemy(id).is_none() {
            continue;
        }
        let (px, py) = (s.player_x, s.config.field.player_top());
        explode(s, px, py, now, rng);
        debug!(?id, "enemy rammed the player");
        s.events.push(GameEvent::PlayerHit { id });
        lose_life(s);
        if !s.is_playing() {
            return;
        }
    }
}

fn award_kill(s: &mut GameSession) {
    let old = s.score;
    s.score = old.saturating_add(s.config.scoring.points_per_kill);
    let gained = levels_gained(old, s.score, s.config.scoring.level_up_every);
    if gained > 0 {
        s.level += gained;
        info!(level = s.level, score = s.score, "level up");
        s.events.push(GameEvent::LevelUp { level: s.level });
    }
}

fn lose_life(s: &mut GameSession) {
    s.lives = s.lives.saturating_sub(1);
    if s.lives == 0 {
        end_session(s);
    }
}

fn end_session(s: &mut GameSession) {
    let report = FinalReport {
        score: s.score,
        tier: final_tier(s.score, &s.config.scoring),
    };
    s.status = SessionStatus::GameOver;
    s.final_report = Some(report);
    s.events.push(GameEvent::GameOver(report));
    info!(
        score = s.score,
        level = s.level,
        elapsed = %format_timer(s.elapsed),
        "game over"
    );
}

/// Flash plus a burst of particles at (`x` percent, `y` pixels).
fn explode(s: &mut GameSession, x: f32, y: f32, now: Instant, rng: &mut impl Rng) {
    let fx = s.config.effects.clone();
    let id = s.alloc_id();
    s.explosions.push(Explosion {
        id,
        x,
        y,
        expires_at: now + Duration::from_millis(fx.explosion_lifetime_ms),
    });
    s.events.push(GameEvent::Explosion { x, y });

    for _ in 0..fx.particles_per_explosion {
        let angle = rng.gen::<f32>() * TAU;
        let distance = fx.particle_min_distance
            + rng.gen::<f32>() * (fx.particle_max_distance - fx.particle_min_distance);
        let id = s.alloc_id();
        s.particles.push(Particle {
            id,
            origin_x: x,
            origin_y: y,
            dx: angle.cos() * distance,
            dy: angle.sin() * distance,
            life: fx.particle_life,
            max_life: fx.particle_life,
        });
    }
}
