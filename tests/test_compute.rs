mod common;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use common::{enemy_at, make_game, seeded_rng, DrawCall, RecordingSurface};
use parallax_shooter::compute::*;
use parallax_shooter::config::GameConfig;
use parallax_shooter::entities::{Player, Projectile};
use parallax_shooter::input::{InputSnapshot, Key, KeySet};
use parallax_shooter::surface::ImageId;

fn idle() -> InputSnapshot {
    InputSnapshot::idle()
}

/// A stationary enemy well in front of the player, and a way to shoot it.
fn game_with_target() -> Game {
    let mut game = make_game();
    game.enemies.push(enemy_at(600.0, 100.0, 0.0));
    game
}

fn projectile_into_target(game: &mut Game) {
    game.player.projectiles.push(Projectile::new(610.0, 150.0));
}

// ── Game::new ─────────────────────────────────────────────────────────────────

#[test]
fn new_game_uses_config_defaults() {
    let g = make_game();
    assert_eq!((g.width, g.height), (1200.0, 500.0));
    assert_eq!(g.score, 0);
    assert_eq!(g.winning_score, 100);
    assert_eq!(g.time_limit, 600_000.0);
    assert_eq!(g.ammo, 20);
    assert_eq!(g.max_ammo, 50);
    assert!(g.debug);
    assert_eq!(g.status, GameStatus::Playing);
    assert!(g.enemies.is_empty());
    assert!(g.end_reason.is_none());
}

#[test]
fn initial_ammo_never_exceeds_max() {
    let config = GameConfig {
        initial_ammo: 80,
        ..GameConfig::default()
    };
    assert_eq!(Game::new(config).ammo, 50);
}

// ── Idempotence ──────────────────────────────────────────────────────────────

#[test]
fn zero_delta_update_changes_nothing() {
    let mut rng = seeded_rng();
    let mut g = game_with_target();
    g.player.projectiles.push(Projectile::new(300.0, 20.0));
    let before = g.clone();

    g.update(0.0, &idle(), &mut rng);

    assert_eq!(g.player, before.player);
    assert_eq!(g.background, before.background);
    assert_eq!(g.enemies, before.enemies);
    assert_eq!(g.game_time, before.game_time);
    assert_eq!(g.ammo_timer, before.ammo_timer);
    assert_eq!(g.enemy_timer, before.enemy_timer);
    assert_eq!(g.ammo, before.ammo);
    assert_eq!(g.score, before.score);
}

// ── Timers & state machine ───────────────────────────────────────────────────

#[test]
fn game_time_accumulates_delta() {
    let mut rng = seeded_rng();
    let mut g = make_game();
    g.update(16.0, &idle(), &mut rng);
    g.update(17.0, &idle(), &mut rng);
    assert_eq!(g.game_time, 33.0);
}

#[test]
fn reaching_the_time_limit_exactly_is_not_over() {
    let mut rng = seeded_rng();
    let mut g = make_game();
    g.game_time = g.time_limit - 16.0;
    g.update(16.0, &idle(), &mut rng);
    assert!(!g.is_over());
}

#[test]
fn exceeding_the_time_limit_ends_the_game_for_good() {
    let mut rng = seeded_rng();
    let mut g = make_game();
    g.game_time = g.time_limit;
    g.update(1.0, &idle(), &mut rng);
    assert!(g.is_over());
    assert_eq!(g.end_reason, Some(EndReason::TimeLimit));
    assert_eq!(g.game_time, g.time_limit + 1.0);

    // Even if time were wound back, the game stays over.
    g.game_time = 0.0;
    g.update(16.0, &idle(), &mut rng);
    assert!(g.is_over());
    assert_eq!(g.game_time, 0.0); // no longer accumulating
}

#[test]
fn ammo_refills_once_interval_is_exceeded() {
    let mut rng = seeded_rng();
    let mut g = make_game();
    g.ammo_timer = 201.0;
    g.update(16.0, &idle(), &mut rng);
    assert_eq!(g.ammo, 21);
    assert_eq!(g.ammo_timer, 0.0);
    g.update(16.0, &idle(), &mut rng);
    assert_eq!(g.ammo, 21);
    assert_eq!(g.ammo_timer, 16.0);
}

#[test]
fn ammo_capped_at_max() {
    let mut rng = seeded_rng();
    let mut g = make_game();
    g.ammo = g.max_ammo;
    g.ammo_timer = 500.0;
    g.update(16.0, &idle(), &mut rng);
    assert_eq!(g.ammo, g.max_ammo);
    assert_eq!(g.ammo_timer, 0.0);
}

#[test]
fn enemy_spawns_when_timer_exceeded() {
    let mut rng = seeded_rng();
    let mut g = make_game();
    g.enemy_timer = 1001.0;
    g.update(16.0, &idle(), &mut rng);
    assert_eq!(g.enemies.len(), 1);
    assert_eq!(g.enemy_timer, 0.0);
    // Spawned after the enemy pass, so it has not moved yet.
    assert_eq!(g.enemies[0].x, g.width);
}

#[test]
fn no_spawns_once_over() {
    let mut rng = seeded_rng();
    let mut g = make_game();
    g.status = GameStatus::Over;
    g.enemy_timer = 1001.0;
    g.update(16.0, &idle(), &mut rng);
    assert!(g.enemies.is_empty());
    assert_eq!(g.enemy_timer, 1017.0);
}

#[test]
fn enemies_keep_arriving_during_play() {
    let mut rng = seeded_rng();
    let mut g = make_game();
    for _ in 0..300 {
        g.update(16.0, &idle(), &mut rng);
    }
    assert!(!g.enemies.is_empty());
}

// ── Input ────────────────────────────────────────────────────────────────────

#[test]
fn fire_actions_spend_ammo() {
    let mut rng = seeded_rng();
    let mut g = make_game();
    g.update(0.0, &InputSnapshot::firing(3), &mut rng);
    assert_eq!(g.ammo, 17);
    assert_eq!(g.player.projectiles.len(), 3);
}

#[test]
fn fire_without_ammo_is_silent() {
    let mut rng = seeded_rng();
    let mut g = make_game();
    g.ammo = 0;
    g.update(0.0, &InputSnapshot::firing(2), &mut rng);
    assert_eq!(g.ammo, 0);
    assert!(g.player.projectiles.is_empty());
}

#[test]
fn debug_toggles_by_parity() {
    let mut rng = seeded_rng();
    let mut g = make_game();
    let once = InputSnapshot {
        debug_toggles: 1,
        ..InputSnapshot::idle()
    };
    let twice = InputSnapshot {
        debug_toggles: 2,
        ..InputSnapshot::idle()
    };
    g.update(0.0, &once, &mut rng);
    assert!(!g.debug);
    g.update(0.0, &twice, &mut rng);
    assert!(!g.debug);
    g.update(0.0, &once, &mut rng);
    assert!(g.debug);
}

#[test]
fn held_keys_drive_the_player() {
    let mut rng = seeded_rng();
    let mut g = make_game();
    g.update(NOMINAL_FRAME_MS, &InputSnapshot::holding(Key::Down), &mut rng);
    assert!((g.player.y - 102.0).abs() < 1e-9);
    assert!(g.keys.contains(Key::Down));
}

// ── Collisions & scoring ─────────────────────────────────────────────────────

#[test]
fn enemy_killed_by_fifth_projectile() {
    let mut rng = seeded_rng();
    let mut g = game_with_target();

    for hit in 1..=4 {
        projectile_into_target(&mut g);
        g.update(0.0, &idle(), &mut rng);
        assert_eq!(g.enemies.len(), 1, "still alive after hit {}", hit);
        assert_eq!(g.enemies[0].lives, 5 - hit);
        assert_eq!(g.score, 0);
    }

    projectile_into_target(&mut g);
    g.update(0.0, &idle(), &mut rng);
    assert!(g.enemies.is_empty());
    assert_eq!(g.score, 5);
}

#[test]
fn projectile_consumed_by_hit() {
    let mut rng = seeded_rng();
    let mut g = game_with_target();
    projectile_into_target(&mut g);
    g.update(0.0, &idle(), &mut rng);
    assert!(g.player.projectiles[0].marked_for_deletion);
    // Swept by the player's next update.
    g.update(0.0, &idle(), &mut rng);
    assert!(g.player.projectiles.is_empty());
}

#[test]
fn winning_kill_ends_the_game() {
    let mut rng = seeded_rng();
    let mut g = game_with_target();
    g.score = 99;
    g.enemies[0].lives = 1;
    projectile_into_target(&mut g);
    g.update(0.0, &idle(), &mut rng);

    assert_eq!(g.score, 104);
    assert!(g.is_over());
    assert!(g.has_won());
    assert_eq!(g.end_reason, Some(EndReason::WinningScore));
}

#[test]
fn kills_after_game_over_do_not_score() {
    let mut rng = seeded_rng();
    let mut g = game_with_target();
    g.status = GameStatus::Over;
    g.enemies[0].lives = 1;
    projectile_into_target(&mut g);
    g.update(0.0, &idle(), &mut rng);
    assert!(g.enemies.is_empty());
    assert_eq!(g.score, 0);
}

#[test]
fn touching_the_player_costs_the_enemy_score() {
    let mut rng = seeded_rng();
    let mut g = make_game();
    g.enemies.push(enemy_at(50.0, 150.0, 0.0));
    g.update(0.0, &idle(), &mut rng);
    assert!(g.enemies.is_empty());
    assert_eq!(g.score, -5);
    assert!(!g.is_over()); // negative score is not a loss condition
}

#[test]
fn rammed_enemy_absorbs_shots_without_scoring() {
    let mut rng = seeded_rng();
    let mut g = make_game();
    let mut enemy = enemy_at(50.0, 150.0, 0.0);
    enemy.lives = 1;
    g.enemies.push(enemy);
    g.player.projectiles.push(Projectile::new(200.0, 200.0));

    g.update(0.0, &idle(), &mut rng);

    assert_eq!(g.score, -5);
    assert!(g.enemies.is_empty());
    assert!(g.player.projectiles[0].marked_for_deletion);
}

#[test]
fn enemies_off_screen_are_swept_the_same_frame() {
    let mut rng = seeded_rng();
    let mut g = make_game();
    let far_left = enemy_at(-228.0, 100.0, -1.0);
    g.enemies.push(far_left);
    g.update(NOMINAL_FRAME_MS, &idle(), &mut rng);
    assert!(g.enemies.is_empty());
    assert_eq!(g.score, 0);
}

// ── Long frames ──────────────────────────────────────────────────────────────

#[test]
fn long_frame_still_hits_enemy_in_the_path() {
    let mut rng = seeded_rng();
    let mut g = make_game();
    g.enemies.push(enemy_at(400.0, 100.0, 0.0));
    g.player.projectiles.push(Projectile::new(300.0, 150.0));

    g.update(3000.0, &idle(), &mut rng);

    assert_eq!(g.enemies.len(), 1);
    assert_eq!(g.enemies[0].lives, 4);
    assert!(g.player.projectiles.is_empty());
}

#[test]
fn long_frame_motion_is_capped_but_time_is_not() {
    let mut rng = seeded_rng();
    let mut g = make_game();
    g.player.projectiles.push(Projectile::new(100.0, 20.0));

    g.update(10_000.0, &idle(), &mut rng);

    let travelled = MAX_FRAME_MS / NOMINAL_FRAME_MS * 3.0;
    assert!((g.player.projectiles[0].x - (100.0 + travelled)).abs() < 1e-6);
    assert_eq!(g.game_time, 10_000.0);
}

#[test]
fn split_frames_match_one_nominal_frame_each() {
    let mut rng = seeded_rng();
    let mut whole = make_game();
    let mut split = make_game();
    whole.player.projectiles.push(Projectile::new(100.0, 20.0));
    split.player.projectiles.push(Projectile::new(100.0, 20.0));

    whole.update(NOMINAL_FRAME_MS * 4.0, &idle(), &mut rng);
    for _ in 0..4 {
        split.update(NOMINAL_FRAME_MS, &idle(), &mut rng);
    }

    assert!((whole.player.projectiles[0].x - split.player.projectiles[0].x).abs() < 1e-9);
    assert_eq!(whole.player.frame_x, split.player.frame_x);
}

#[test]
fn invariants_hold_under_random_play() {
    let mut rng = seeded_rng();
    let mut input_rng = StdRng::seed_from_u64(7);
    let mut g = make_game();
    let (top, bottom) = Player::vertical_bounds(g.height);
    let mut was_over = false;

    for _ in 0..5000 {
        let mut held = KeySet::new();
        match input_rng.gen_range(0..3) {
            0 => held.press(Key::Up),
            1 => held.press(Key::Down),
            _ => {}
        }
        let snapshot = InputSnapshot {
            held,
            shots: input_rng.gen_range(0..2),
            debug_toggles: 0,
        };
        let dt = input_rng.gen_range(0.0..40.0);
        g.update(dt, &snapshot, &mut rng);

        assert!(g.player.y >= top && g.player.y <= bottom);
        assert!(g.ammo <= g.max_ammo);
        assert!(g.enemies.iter().all(|e| !e.marked_for_deletion));
        if was_over {
            assert!(g.is_over());
        }
        was_over = g.is_over();
    }
}

// ── Draw ─────────────────────────────────────────────────────────────────────

#[test]
fn draw_composes_back_to_front() {
    let mut g = game_with_target();
    g.player.projectiles.push(Projectile::new(300.0, 20.0));
    let mut s = RecordingSurface::new();
    g.draw(&mut s).unwrap();

    assert_eq!(
        s.images(),
        vec![
            ImageId::Layer1,
            ImageId::Layer1,
            ImageId::Layer2,
            ImageId::Layer2,
            ImageId::Layer3,
            ImageId::Layer3,
            ImageId::Player,
            ImageId::Projectile,
            ImageId::Angler1,
            ImageId::Layer4,
            ImageId::Layer4,
        ]
    );

    let position = |pred: &dyn Fn(&DrawCall) -> bool| {
        s.calls.iter().position(|c| pred(c)).expect("call not recorded")
    };
    let projectile = position(&|c| matches!(c, DrawCall::Image(ImageId::Projectile, ..)));
    let hud = position(&|c| matches!(c, DrawCall::Text(t, ..) if t == "Score: 0"));
    let enemy = position(&|c| matches!(c, DrawCall::SubImage(ImageId::Angler1, ..)));
    assert!(projectile < hud && hud < enemy);
    assert_eq!(s.styles.depth(), 0);
}

#[test]
fn debug_overlay_follows_flag() {
    let mut g = game_with_target();
    let mut with_debug = RecordingSurface::new();
    g.draw(&mut with_debug).unwrap();
    assert_eq!(with_debug.stroke_rects(), 2);

    g.toggle_debug();
    let mut without = RecordingSurface::new();
    g.draw(&mut without).unwrap();
    assert_eq!(without.stroke_rects(), 0);
}
