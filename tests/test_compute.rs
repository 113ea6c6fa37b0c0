use std::time::{Duration, Instant};

use cosmic_defender::compute::*;
use cosmic_defender::config::GameConfig;
use cosmic_defender::entities::*;
use cosmic_defender::input::HeldInput;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Default tuning with the spawner pushed far into the future, so tests
/// place every enemy themselves.
fn quiet_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.enemy.base_spawn_interval_ms = 10_000_000;
    config
}

fn playing(config: GameConfig) -> (GameSession, Instant) {
    let t0 = Instant::now();
    let s = start_game(&new_session(config, t0), t0);
    (s, t0)
}

/// Time of the `n`th 16 ms tick after `t0`.
fn at(t0: Instant, n: u64) -> Instant {
    t0 + Duration::from_millis(16 * n)
}

fn place_enemy(s: &mut GameSession, x: f32, y: f32, speed: f32, t0: Instant) -> EntityId {
    let id = s.alloc_id();
    s.enemies.push(Enemy {
        id,
        x,
        y,
        speed,
        expires_at: t0 + Duration::from_secs(12),
    });
    id
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn still() -> HeldInput {
    HeldInput::none()
}

// ── lifecycle ─────────────────────────────────────────────────────────────────

#[test]
fn new_session_waits_on_start_screen() {
    let s = new_session(GameConfig::default(), Instant::now());
    assert_eq!(s.status, SessionStatus::Idle);
    assert_eq!(s.lives, 3);
    assert_eq!(s.level, 1);
    assert_eq!(s.score, 0);
    assert_eq!(s.player_x, 50.0);
}

#[test]
fn start_game_resets_everything() {
    let (s, _) = playing(quiet_config());
    assert_eq!(s.status, SessionStatus::Playing);
    assert!(s.bullets.is_empty());
    assert!(s.enemies.is_empty());
    assert!(s.particles.is_empty());
    assert_eq!(s.events, vec![GameEvent::SessionStarted]);
    assert!(s.final_report.is_none());
}

#[test]
fn start_is_ignored_mid_game() {
    let (mut s, t0) = playing(quiet_config());
    s.score = 700;
    let s2 = start_game(&s, at(t0, 5));
    assert_eq!(s2.score, 700);
    assert_eq!(s2.status, SessionStatus::Playing);
}

#[test]
fn restart_only_from_game_over() {
    let (mut s, t0) = playing(quiet_config());
    s.score = 300;
    let ignored = restart_game(&s, at(t0, 1));
    assert_eq!(ignored.score, 300);

    let idle = new_session(quiet_config(), t0);
    assert_eq!(restart_game(&idle, t0).status, SessionStatus::Idle);

    s.status = SessionStatus::GameOver;
    s.lives = 0;
    place_enemy(&mut s, 30.0, 10.0, 1.0, t0);
    let fresh = restart_game(&s, at(t0, 2));
    assert_eq!(fresh.status, SessionStatus::Playing);
    assert_eq!(fresh.score, 0);
    assert_eq!(fresh.lives, 3);
    assert_eq!(fresh.level, 1);
    assert!(fresh.enemies.is_empty());
    assert!(fresh.final_report.is_none());
}

#[test]
fn start_from_game_over_begins_a_fresh_session() {
    let (mut s, t0) = playing(quiet_config());
    s.lives = 1;
    s.score = 1400;
    s.level = 2;
    place_enemy(&mut s, 50.0, 470.0, 1.0, t0);
    s = tick(&s, &still(), at(t0, 1), &mut seeded_rng());
    assert_eq!(s.status, SessionStatus::GameOver);
    assert!(s.final_report.is_some());

    let fresh = start_game(&s, at(t0, 2));
    assert_eq!(fresh.status, SessionStatus::Playing);
    assert_eq!((fresh.score, fresh.lives, fresh.level), (0, 3, 1));
    assert_eq!(fresh.player_x, 50.0);
    assert_eq!(fresh.elapsed, Duration::ZERO);
    assert!(fresh.bullets.is_empty());
    assert!(fresh.enemies.is_empty());
    assert!(fresh.particles.is_empty());
    assert!(fresh.explosions.is_empty());
    assert!(fresh.final_report.is_none());
    assert_eq!(fresh.events, vec![GameEvent::SessionStarted]);
}

#[test]
fn restart_does_not_reuse_entity_ids() {
    let (mut s, t0) = playing(quiet_config());
    let old = place_enemy(&mut s, 30.0, 10.0, 1.0, t0);
    s.status = SessionStatus::GameOver;
    let mut fresh = restart_game(&s, t0);
    assert!(fresh.alloc_id() > old);
}

#[test]
fn tick_does_nothing_unless_playing() {
    let t0 = Instant::now();
    let idle = new_session(quiet_config(), t0);
    let s2 = tick(&idle, &HeldInput::left(), at(t0, 1), &mut seeded_rng());
    assert_eq!(s2.status, SessionStatus::Idle);
    assert_eq!(s2.player_x, 50.0);
    assert_eq!(s2.tick_count, 0);
}

#[test]
fn tick_tracks_elapsed_time() {
    let (s, t0) = playing(quiet_config());
    let s2 = tick(&s, &still(), t0 + Duration::from_millis(1500), &mut seeded_rng());
    assert_eq!(s2.elapsed, Duration::from_millis(1500));
    assert_eq!(s2.tick_count, 1);
}

// ── movement ──────────────────────────────────────────────────────────────────

#[test]
fn held_left_moves_by_fixed_step() {
    let (s, t0) = playing(quiet_config());
    let s2 = tick(&s, &HeldInput::left(), at(t0, 1), &mut seeded_rng());
    assert!((s2.player_x - 48.8).abs() < 1e-4);
    let s3 = tick(&s2, &HeldInput::right(), at(t0, 2), &mut seeded_rng());
    assert!((s3.player_x - 50.0).abs() < 1e-4);
}

#[test]
fn both_directions_cancel_out() {
    let (s, t0) = playing(quiet_config());
    let both = HeldInput { left: true, right: true };
    let s2 = tick(&s, &both, at(t0, 1), &mut seeded_rng());
    assert!((s2.player_x - 50.0).abs() < 1e-4);
}

#[test]
fn player_stays_inside_bounds_under_held_input() {
    let (mut s, t0) = playing(quiet_config());
    let mut rng = seeded_rng();
    for n in 1..=200 {
        s = tick(&s, &HeldInput::left(), at(t0, n), &mut rng);
        assert!(s.player_x >= 5.0);
    }
    assert_eq!(s.player_x, 5.0);
    for n in 201..=400 {
        s = tick(&s, &HeldInput::right(), at(t0, n), &mut rng);
        assert!(s.player_x <= 95.0);
    }
    assert_eq!(s.player_x, 95.0);
}

#[test]
fn move_delta_is_clamped() {
    let (s, _) = playing(quiet_config());
    assert_eq!(apply_move_delta(&s, 1_000.0).player_x, 95.0);
    assert_eq!(apply_move_delta(&s, -1_000.0).player_x, 5.0);
    assert!((apply_move_delta(&s, 3.5).player_x - 53.5).abs() < 1e-4);
}

#[test]
fn move_delta_ignores_garbage_and_idle_sessions() {
    let (s, t0) = playing(quiet_config());
    assert_eq!(apply_move_delta(&s, f32::NAN).player_x, 50.0);
    let idle = new_session(quiet_config(), t0);
    assert_eq!(apply_move_delta(&idle, 10.0).player_x, 50.0);
}

// ── bullets ───────────────────────────────────────────────────────────────────

#[test]
fn fire_spawns_bullet_at_player() {
    let (mut s, t0) = playing(quiet_config());
    s.player_x = 30.0;
    let s2 = fire(&s, t0);
    assert_eq!(s2.bullets.len(), 1);
    assert_eq!(s2.bullets[0].x, 30.0);
    assert_eq!(s2.bullets[0].y, 490.0); // height - 110
    assert_eq!(s2.bullets[0].expires_at, t0 + Duration::from_millis(1500));
}

#[test]
fn fire_is_ignored_when_not_playing() {
    let t0 = Instant::now();
    let idle = new_session(quiet_config(), t0);
    assert!(fire(&idle, t0).bullets.is_empty());

    let (mut over, _) = playing(quiet_config());
    over.status = SessionStatus::GameOver;
    assert!(fire(&over, t0).bullets.is_empty());
}

#[test]
fn bullets_climb_eight_pixels_per_tick() {
    let (s, t0) = playing(quiet_config());
    let s = fire(&s, t0);
    let s2 = tick(&s, &still(), at(t0, 1), &mut seeded_rng());
    assert_eq!(s2.bullets[0].y, 482.0);
}

#[test]
fn bullets_leaving_the_top_are_removed() {
    let (mut s, t0) = playing(quiet_config());
    let keep = s.alloc_id();
    let gone = s.alloc_id();
    let expires_at = t0 + Duration::from_secs(5);
    s.bullets.push(Bullet { id: keep, x: 40.0, y: 8.0, expires_at });
    s.bullets.push(Bullet { id: gone, x: 60.0, y: 7.0, expires_at });
    let s2 = tick(&s, &still(), at(t0, 1), &mut seeded_rng());
    assert_eq!(s2.bullets.len(), 1);
    assert_eq!(s2.bullets[0].id, keep);
    assert_eq!(s2.bullets[0].y, 0.0);
}

#[test]
fn bullets_expire_after_their_lifetime() {
    let (s, t0) = playing(quiet_config());
    let s = fire(&s, t0);
    let s2 = tick(&s, &still(), t0 + Duration::from_millis(1499), &mut seeded_rng());
    assert_eq!(s2.bullets.len(), 1);
    let s3 = tick(&s2, &still(), t0 + Duration::from_millis(1500), &mut seeded_rng());
    assert!(s3.bullets.is_empty());
}

#[test]
fn fired_bullet_crosses_the_whole_field() {
    let (s, t0) = playing(quiet_config());
    let mut s = fire(&s, t0);
    let id = s.bullets[0].id;
    let mut rng = seeded_rng();

    // 490 px at 8 px per tick: still on the field at tick 61 (y = 2)
    for n in 1..=61 {
        s = tick(&s, &still(), at(t0, n), &mut rng);
    }
    assert_eq!(s.bullet(id).map(|b| b.y), Some(2.0));

    s = tick(&s, &still(), at(t0, 62), &mut rng);
    assert!(s.bullet(id).is_none());
    // Removed by the top edge, well before its lifetime runs out
    assert!(at(t0, 62) < t0 + Duration::from_millis(s.config.bullet.lifetime_ms));
}

#[test]
fn bullet_reaches_enemy_near_the_top() {
    let (s, t0) = playing(quiet_config());
    let mut s = fire(&s, t0);
    let enemy = place_enemy(&mut s, 50.0, -50.0, 1.8, t0);
    let mut rng = seeded_rng();

    let mut n = 0;
    while s.enemy(enemy).is_some() && n < 100 {
        n += 1;
        s = tick(&s, &still(), at(t0, n), &mut rng);
    }
    // Bullet top 74 px meets the enemy's bottom edge (43.6 + 40) on tick 52
    assert_eq!(n, 52);
    assert_eq!(s.score, 100);
    assert!(s.bullets.is_empty());
    assert!(s.events.contains(&GameEvent::EnemyDestroyed { id: enemy }));
}

// ── enemies ───────────────────────────────────────────────────────────────────

#[test]
fn enemy_falls_and_breaches_the_bottom() {
    let (mut s, t0) = playing(quiet_config());
    s.player_x = 5.0; // out of the enemy's column
    let id = place_enemy(&mut s, 50.0, 0.0, 2.0, t0);
    let mut rng = seeded_rng();

    s = tick(&s, &still(), at(t0, 1), &mut rng);
    assert_eq!(s.enemy(id).map(|e| e.y), Some(2.0));
    assert_eq!(s.lives, 3);

    let mut n = 1;
    while s.enemy(id).is_some() {
        n += 1;
        s = tick(&s, &still(), at(t0, n), &mut rng);
        assert!(n < 1_000, "enemy never left the field");
    }
    assert!(s.events.contains(&GameEvent::EnemyBreached { id }));
    assert_eq!(s.lives, 2);
    assert_eq!(s.score, 0);
    assert_eq!(s.status, SessionStatus::Playing);
}

#[test]
fn enemy_expiry_costs_no_life() {
    let (mut s, t0) = playing(quiet_config());
    let id = s.alloc_id();
    s.enemies.push(Enemy {
        id,
        x: 20.0,
        y: 100.0,
        speed: 0.0,
        expires_at: t0 + Duration::from_secs(1),
    });
    let s2 = tick(&s, &still(), t0 + Duration::from_millis(999), &mut seeded_rng());
    assert!(s2.enemy(id).is_some());
    let s3 = tick(&s2, &still(), t0 + Duration::from_secs(1), &mut seeded_rng());
    assert!(s3.enemy(id).is_none());
    assert_eq!(s3.lives, 3);
    assert!(s3.events.is_empty());
}

#[test]
fn last_breach_ends_the_session_mid_tick() {
    let (mut s, t0) = playing(quiet_config());
    s.lives = 1;
    s.score = 400;
    place_enemy(&mut s, 20.0, 549.0, 2.0, t0);
    let survivor = place_enemy(&mut s, 80.0, 549.0, 2.0, t0);
    let s2 = tick(&s, &still(), at(t0, 1), &mut seeded_rng());

    assert_eq!(s2.status, SessionStatus::GameOver);
    assert_eq!(s2.lives, 0);
    // Processing stops at the first fatal breach.
    assert_eq!(s2.enemy(survivor).map(|e| e.y), Some(549.0));
    let breaches = s2
        .events
        .iter()
        .filter(|e| matches!(e, GameEvent::EnemyBreached { .. }))
        .count();
    assert_eq!(breaches, 1);
    assert_eq!(
        s2.final_report,
        Some(FinalReport { score: 400, tier: FinalTier::Base })
    );
}

// ── spawner ───────────────────────────────────────────────────────────────────

#[test]
fn first_enemy_waits_for_one_interval() {
    let (s, t0) = playing(GameConfig::default());
    let mut rng = seeded_rng();
    let early = tick(&s, &still(), t0 + Duration::from_millis(100), &mut rng);
    assert!(early.enemies.is_empty());

    let later = tick(&early, &still(), t0 + Duration::from_millis(2100), &mut rng);
    assert_eq!(later.enemies.len(), 1);
    let e = &later.enemies[0];
    assert!(e.x >= 5.0 && e.x <= 95.0);
    assert_eq!(e.y, -50.0);
    assert_eq!(later.last_spawn_at, t0 + Duration::from_millis(2100));
}

#[test]
fn spawner_emits_one_enemy_per_interval() {
    let (mut s, t0) = playing(GameConfig::default());
    let mut rng = seeded_rng();
    // 10 s of play: intervals shrink from 2000 ms, so expect 4 to 6 spawns.
    let mut spawned = 0;
    for n in 1..=625 {
        let before = s.next_id;
        s = tick(&s, &still(), at(t0, n), &mut rng);
        let new_enemies = s.enemies.iter().filter(|e| e.id.0 >= before).count();
        assert!(new_enemies <= 1);
        spawned += new_enemies;
    }
    assert!((4..=6).contains(&spawned), "spawned {spawned}");
}

#[test]
fn spawn_interval_ramps_down_to_floor() {
    let config = GameConfig::default();
    assert_eq!(spawn_interval(&config, Duration::ZERO), Duration::from_millis(2000));
    assert_eq!(
        spawn_interval(&config, Duration::from_secs(30)),
        Duration::from_millis(1000)
    );
    let floor = spawn_interval(&config, Duration::from_secs(300));
    assert!((floor.as_secs_f64() - 0.6).abs() < 1e-6);

    let mut previous = spawn_interval(&config, Duration::ZERO);
    for ms in (0..120_000).step_by(250) {
        let current = spawn_interval(&config, Duration::from_millis(ms));
        assert!(current <= previous);
        assert!(current.as_secs_f64() >= 0.6 - 1e-6);
        previous = current;
    }
}

#[test]
fn enemy_speed_grows_with_level_and_time() {
    let config = GameConfig::default();
    assert!((enemy_speed(&config, 1, Duration::ZERO) - 1.8).abs() < 1e-5);
    assert!((enemy_speed(&config, 1, Duration::from_secs(30)) - 3.6).abs() < 1e-5);
    assert_eq!(enemy_speed(&config, 50, Duration::ZERO), 4.0);

    for level in 1..20 {
        let mut previous = 0.0;
        for secs in 0..180 {
            let v = enemy_speed(&config, level, Duration::from_secs(secs));
            assert!(v >= previous);
            assert!(v <= 4.0);
            assert!(v >= enemy_speed(&config, level - 1, Duration::from_secs(secs)));
            previous = v;
        }
    }
}

// ── collisions ────────────────────────────────────────────────────────────────

#[test]
fn collision_test_is_inclusive_and_symmetric() {
    let a = Rect { left: 0.0, top: 0.0, right: 10.0, bottom: 10.0 };
    let touching = Rect { left: 10.0, top: 10.0, right: 20.0, bottom: 20.0 };
    let apart = Rect { left: 10.5, top: 0.0, right: 20.0, bottom: 10.0 };
    let inside = Rect { left: 2.0, top: 2.0, right: 4.0, bottom: 4.0 };

    assert!(rects_overlap(&a, &touching));
    assert!(rects_overlap(&touching, &a));
    assert!(rects_overlap(&a, &inside));
    assert!(rects_overlap(&inside, &a));
    assert!(!rects_overlap(&a, &apart));
    assert!(!rects_overlap(&apart, &a));
}

#[test]
fn bullet_destroys_enemy_for_one_hundred_points() {
    let (s, t0) = playing(quiet_config());
    let mut s = fire(&s, t0);
    let bullet = s.bullets[0].id;
    let enemy = place_enemy(&mut s, 50.0, 450.0, 1.0, t0);

    let s2 = tick(&s, &still(), at(t0, 1), &mut seeded_rng());
    assert!(s2.bullet(bullet).is_none());
    assert!(s2.enemy(enemy).is_none());
    assert_eq!(s2.score, 100);
    assert_eq!(s2.lives, 3);
    assert_eq!(s2.particles.len(), 8);
    assert_eq!(s2.explosions.len(), 1);
    assert!(s2.events.contains(&GameEvent::EnemyDestroyed { id: enemy }));
    assert!(s2
        .events
        .contains(&GameEvent::Explosion { x: 50.0, y: 451.0 }));
}

#[test]
fn bullet_passes_beside_enemy() {
    let (s, t0) = playing(quiet_config());
    let mut s = fire(&s, t0); // bullet at 400 px across
    place_enemy(&mut s, 60.0, 450.0, 1.0, t0); // 480 ± 20 px
    let s2 = tick(&s, &still(), at(t0, 1), &mut seeded_rng());
    assert_eq!(s2.bullets.len(), 1);
    assert_eq!(s2.enemies.len(), 1);
    assert_eq!(s2.score, 0);
}

#[test]
fn one_bullet_kills_only_one_enemy() {
    let (s, t0) = playing(quiet_config());
    let mut s = fire(&s, t0);
    place_enemy(&mut s, 50.0, 450.0, 1.0, t0);
    place_enemy(&mut s, 51.0, 455.0, 1.0, t0);
    let s2 = tick(&s, &still(), at(t0, 1), &mut seeded_rng());
    assert_eq!(s2.score, 100);
    assert_eq!(s2.enemies.len(), 1);
}

#[test]
fn second_bullet_on_a_dead_enemy_survives() {
    let (mut s, t0) = playing(quiet_config());
    let enemy = place_enemy(&mut s, 50.0, 100.0, 0.0, t0);
    let expires_at = t0 + Duration::from_secs(5);
    let first = s.alloc_id();
    let second = s.alloc_id();
    s.bullets.push(Bullet { id: first, x: 50.0, y: 120.0, expires_at });
    s.bullets.push(Bullet { id: second, x: 51.0, y: 125.0, expires_at });

    let s2 = tick(&s, &still(), at(t0, 1), &mut seeded_rng());
    assert_eq!(s2.score, 100);
    assert!(s2.enemy(enemy).is_none());
    assert!(s2.bullet(first).is_none());
    assert_eq!(s2.bullet(second).map(|b| b.y), Some(117.0));
    assert_eq!(
        s2.events
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemyDestroyed { .. }))
            .count(),
        1
    );
}

#[test]
fn enemy_ramming_player_costs_a_life() {
    let (mut s, t0) = playing(quiet_config());
    let id = place_enemy(&mut s, 50.0, 470.0, 1.0, t0);
    let s2 = tick(&s, &still(), at(t0, 1), &mut seeded_rng());
    assert!(s2.enemy(id).is_none());
    assert_eq!(s2.lives, 2);
    assert_eq!(s2.score, 0);
    assert!(s2.events.contains(&GameEvent::PlayerHit { id }));
    assert_eq!(s2.explosions[0].x, 50.0);
    assert_eq!(s2.explosions[0].y, 500.0);
}

#[test]
fn last_life_lost_to_ramming_freezes_the_session() {
    let (mut s, t0) = playing(quiet_config());
    s.lives = 1;
    s.score = 1500;
    place_enemy(&mut s, 50.0, 470.0, 1.0, t0);
    let over = tick(&s, &still(), at(t0, 1), &mut seeded_rng());

    assert_eq!(over.status, SessionStatus::GameOver);
    assert_eq!(over.lives, 0);
    let report = over.final_report.expect("final report");
    assert_eq!(report.score, 1500);
    assert_eq!(report.tier, FinalTier::Good);
    assert!(over.events.contains(&GameEvent::GameOver(report)));

    // Nothing moves afterwards.
    let mut frozen = fire(&over, at(t0, 2));
    place_enemy(&mut frozen, 50.0, 100.0, 3.0, t0);
    let later = tick(&frozen, &HeldInput::left(), at(t0, 3), &mut seeded_rng());
    assert_eq!(later.score, 1500);
    assert_eq!(later.player_x, 50.0);
    assert_eq!(later.enemies[0].y, 100.0);
    assert!(later.bullets.is_empty());
}

// ── scoring & levels ──────────────────────────────────────────────────────────

#[test]
fn reaching_a_thousand_levels_up_once() {
    let (s, t0) = playing(quiet_config());
    let mut s = fire(&s, t0);
    s.score = 900;
    place_enemy(&mut s, 50.0, 450.0, 1.0, t0);
    let s2 = tick(&s, &still(), at(t0, 1), &mut seeded_rng());
    assert_eq!(s2.score, 1000);
    assert_eq!(s2.level, 2);
    assert!(s2.events.contains(&GameEvent::LevelUp { level: 2 }));

    let mut s3 = fire(&s2, at(t0, 1));
    place_enemy(&mut s3, 50.0, 450.0, 1.0, t0);
    let s4 = tick(&s3, &still(), at(t0, 2), &mut seeded_rng());
    assert_eq!(s4.score, 1100);
    assert_eq!(s4.level, 2);
}

#[test]
fn levels_gained_counts_exact_multiples() {
    assert_eq!(levels_gained(900, 1000, 1000), 1);
    assert_eq!(levels_gained(1000, 1100, 1000), 0);
    assert_eq!(levels_gained(1000, 2100, 1000), 1);
    assert_eq!(levels_gained(900, 2100, 1000), 2);
    assert_eq!(levels_gained(0, 999, 1000), 0);
    assert_eq!(levels_gained(500, 400, 1000), 0);
}

#[test]
fn final_tier_thresholds_are_strict() {
    let scoring = GameConfig::default().scoring;
    assert_eq!(final_tier(0, &scoring), FinalTier::Base);
    assert_eq!(final_tier(1000, &scoring), FinalTier::Base);
    assert_eq!(final_tier(1100, &scoring), FinalTier::Good);
    assert_eq!(final_tier(2000, &scoring), FinalTier::Good);
    assert_eq!(final_tier(2100, &scoring), FinalTier::Outstanding);
}

// ── cosmetics ─────────────────────────────────────────────────────────────────

#[test]
fn particles_fade_after_sixty_ticks() {
    let (s, t0) = playing(quiet_config());
    let mut s = fire(&s, t0);
    place_enemy(&mut s, 50.0, 450.0, 1.0, t0);
    let mut rng = seeded_rng();
    s = tick(&s, &still(), at(t0, 1), &mut rng);
    assert_eq!(s.particles.len(), 8);
    assert!(s.particles.iter().all(|p| p.life == 60));

    for n in 2..=60 {
        s = tick(&s, &still(), at(t0, n), &mut rng);
    }
    assert_eq!(s.particles.len(), 8);
    assert!(s.explosions.is_empty());

    s = tick(&s, &still(), at(t0, 61), &mut rng);
    assert!(s.particles.is_empty());
}

#[test]
fn particle_bursts_stay_within_distance_band() {
    let (s, t0) = playing(quiet_config());
    let mut s = fire(&s, t0);
    place_enemy(&mut s, 50.0, 450.0, 1.0, t0);
    let s2 = tick(&s, &still(), at(t0, 1), &mut StdRng::seed_from_u64(7));
    for p in &s2.particles {
        let d = (p.dx * p.dx + p.dy * p.dy).sqrt();
        assert!((50.0 - 1e-3..=100.0 + 1e-3).contains(&d), "distance {d}");
    }
}

// ── timer ─────────────────────────────────────────────────────────────────────

#[test]
fn timer_formats_minutes_and_seconds() {
    assert_eq!(format_timer(Duration::ZERO), "00:00");
    assert_eq!(format_timer(Duration::from_millis(59_999)), "00:59");
    assert_eq!(format_timer(Duration::from_millis(61_500)), "01:01");
    assert_eq!(format_timer(Duration::from_secs(600)), "10:00");
}

// ── whole-session invariants ─────────────────────────────────────────────────

#[test]
fn random_play_keeps_invariants() {
    let (mut s, t0) = playing(GameConfig::default());
    let mut sim_rng = seeded_rng();
    let mut input_rng = StdRng::seed_from_u64(99);

    for n in 1..=5_000 {
        let now = at(t0, n);
        if input_rng.gen_bool(0.15) {
            s = fire(&s, now);
        }
        if input_rng.gen_bool(0.02) {
            s = apply_move_delta(&s, input_rng.gen_range(-80.0..80.0));
        }
        let input = HeldInput {
            left: input_rng.gen_bool(0.3),
            right: input_rng.gen_bool(0.3),
        };

        let before = s.clone();
        s = tick(&s, &input, now, &mut sim_rng);

        assert!(s.player_x >= 5.0 && s.player_x <= 95.0);
        assert!(s.score >= before.score);
        assert!(s.level >= before.level);
        assert!(s.lives <= before.lives);
        assert_eq!(s.lives == 0, s.status == SessionStatus::GameOver);

        let kills = s
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemyDestroyed { .. }))
            .count() as u32;
        assert_eq!(s.score - before.score, 100 * kills);
        assert_eq!(s.level, 1 + s.score / 1000);

        if !s.is_playing() {
            break;
        }
    }
}
