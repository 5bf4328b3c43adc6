use super::*;
use crate::math::Vec2;
use crate::particles::Rgb;
use crate::random::{Lcg, SequenceRandom};
use crate::render::{DrawCommand, RecordingSurface};

type TestEngine<R> = FireworksEngine<RecordingSurface, R, ManualScheduler>;

fn engine_with<R: RandomSource>(rng: R) -> TestEngine<R> {
    FireworksEngine::new(
        RecordingSurface::new(800.0, 600.0),
        rng,
        ManualScheduler::new(),
        FireworksConfig::default(),
    )
}

fn rocket(y: f64, target_y: f64, speed: f64, scale: f64) -> Projectile {
    Projectile::new(Vec2::new(400.0, y), target_y, speed, Rgb::new(220, 60, 40), scale)
}

fn assert_stopped<R: RandomSource>(engine: &TestEngine<R>) {
    assert!(engine.projectiles().is_empty());
    assert!(engine.fragments().is_empty());
    assert_eq!(engine.frame_handle(), None);
    assert_eq!(engine.spawn_handle(), None);
    assert!(!engine.is_visible());
    assert!(!engine.is_running());
    assert!(!engine.surface().is_visible());
    assert_eq!(engine.surface().commands(), &[DrawCommand::Clear]);
    assert!(!engine.scheduler().frame_pending());
    assert!(engine.scheduler().pending_timer(TimerKind::Spawn).is_none());
}

#[test]
fn test_new_engine_is_sized_and_hidden() {
    let engine = engine_with(Lcg::default());
    assert_eq!(engine.size(), (800.0, 600.0));
    assert_eq!(engine.surface().size(), (800.0, 600.0));
    assert!(!engine.is_visible());
    assert!(!engine.is_active());
    assert_eq!(engine.frame_handle(), None);
    assert_eq!(engine.spawn_handle(), None);
}

#[test]
fn test_missing_viewport_is_ignored() {
    let mut engine = FireworksEngine::new(
        RecordingSurface::detached(),
        Lcg::default(),
        ManualScheduler::new(),
        FireworksConfig::default(),
    );
    assert_eq!(engine.size(), (0.0, 0.0));
    engine.resize();
    assert_eq!(engine.size(), (0.0, 0.0));
}

#[test]
fn test_start_arms_both_schedules() {
    let mut engine = engine_with(SequenceRandom::constant(0.5));
    engine.start();

    assert!(engine.frame_handle().is_some());
    assert!(engine.spawn_handle().is_some());
    assert!(engine.is_visible());
    assert!(engine.surface().is_visible());
    assert!(engine.scheduler().frame_pending());

    let spawn = engine.scheduler().pending_timer(TimerKind::Spawn).unwrap();
    assert_eq!(Some(spawn.handle), engine.spawn_handle());
    assert_eq!(spawn.delay_ms, 375);
}

#[test]
fn test_restart_replaces_stale_schedules() {
    let mut engine = engine_with(Lcg::new(8));
    engine.set_active(true);
    engine.launch();
    let first_spawn = engine.spawn_handle();

    engine.start();

    assert!(engine.projectiles().is_empty());
    assert_ne!(engine.spawn_handle(), first_spawn);
    let spawns = engine
        .scheduler()
        .pending_timers()
        .iter()
        .filter(|t| t.kind == TimerKind::Spawn)
        .count();
    assert_eq!(spawns, 1);
    assert!(engine.scheduler().frame_pending());
}

#[test]
fn test_stop_is_idempotent() {
    let mut engine = engine_with(Lcg::new(21));
    engine.set_active(true);
    for _ in 0..3 {
        engine.launch();
    }
    engine.launch_projectile(rocket(110.0, 100.0, 10.0, 1.0));
    engine.step_frame();
    assert!(!engine.fragments().is_empty());

    engine.stop();
    assert_stopped(&engine);

    engine.stop();
    assert_stopped(&engine);
}

#[test]
fn test_stop_before_start_is_safe() {
    let mut engine = engine_with(Lcg::default());
    engine.stop();
    engine.stop();
    assert_stopped(&engine);
}

#[test]
fn test_animate_stops_when_inactive() {
    let mut engine = engine_with(Lcg::new(4));
    // Started but never activated, like a theme switched off between checks
    engine.start();
    engine.launch();
    engine.launch_projectile(rocket(105.0, 100.0, 10.0, 1.0));
    let requested = engine.scheduler().frames_requested();

    engine.animate();

    assert_stopped(&engine);
    assert_eq!(engine.scheduler().frames_requested(), requested);
}

#[test]
fn test_pending_frame_stops_after_deactivation() {
    let mut engine = engine_with(Lcg::new(4));
    engine.start();
    assert!(engine.step_frame());
    assert_stopped(&engine);
    assert!(!engine.step_frame());
}

#[test]
fn test_launch_to_explosion() {
    let mut engine = engine_with(Lcg::new(77));
    engine.set_active(true);
    engine.launch_projectile(rocket(500.0, 100.0, 10.0, 1.0));

    for tick in 1..40 {
        assert!(engine.step_frame());
        assert_eq!(engine.projectiles().len(), 1, "tick {}", tick);
        assert!(engine.fragments().is_empty(), "tick {}", tick);
    }
    assert!((engine.projectiles()[0].position.y - 110.0).abs() < 1e-9);

    assert!(engine.step_frame());
    assert!(engine.projectiles().is_empty());
    assert!(!engine.fragments().is_empty());

    // The burst sparks already moved once on the frame they were born
    for f in engine.fragments() {
        assert!(f.life < 1.0);
        assert!(f.life > 0.0);
    }
}

#[test]
fn test_burst_frame_draws_only_survivors() {
    let mut engine = engine_with(Lcg::new(5));
    engine.set_active(true);
    engine.launch_projectile(rocket(300.0, 100.0, 10.0, 1.0));

    engine.step_frame();
    // Trail plus head for the climbing rocket
    assert_eq!(engine.surface().commands()[0], DrawCommand::Clear);
    assert_eq!(engine.surface().polyline_count(), 1);
    assert_eq!(engine.surface().circle_count(), 1);

    engine.launch_projectile(rocket(105.0, 100.0, 10.0, 1.0));
    engine.step_frame();
    // The bursting rocket is not drawn; its sparks are
    assert_eq!(engine.surface().polyline_count(), 1);
    assert_eq!(engine.surface().circle_count(), 1 + engine.fragments().len());
}

#[test]
fn test_rocket_draw_style() {
    let mut engine = engine_with(Lcg::new(5));
    engine.set_active(true);
    engine.launch_projectile(rocket(300.0, 100.0, 10.0, 2.0));
    engine.step_frame();

    let commands = engine.surface().commands();
    match &commands[1] {
        DrawCommand::Polyline { points, width, color } => {
            assert_eq!(points, &vec![Vec2::new(400.0, 290.0)]);
            assert_eq!(*width, 4.0);
            assert_eq!(color.alpha, 0.9);
            assert_eq!(color.rgb, Rgb::new(220, 60, 40));
        }
        other => panic!("expected trail, got {:?}", other),
    }
    match &commands[2] {
        DrawCommand::Circle { center, radius, color } => {
            assert_eq!(*center, Vec2::new(400.0, 290.0));
            assert_eq!(*radius, 6.0);
            assert_eq!(color.alpha, 1.0);
        }
        other => panic!("expected head, got {:?}", other),
    }
}

#[test]
fn test_trail_bounded_across_frames() {
    let mut engine = engine_with(Lcg::new(2));
    engine.set_active(true);
    engine.launch_projectile(rocket(10_000.0, 0.0, 8.0, 1.0));
    for _ in 0..200 {
        engine.step_frame();
        assert!(engine.projectiles()[0].trail().len() <= 5);
    }
}

#[test]
fn test_fragments_fade_out_and_leave() {
    let mut engine = engine_with(Lcg::new(9));
    engine.set_active(true);
    engine.launch_projectile(rocket(105.0, 100.0, 10.0, 1.0));
    engine.step_frame();
    assert!(!engine.fragments().is_empty());

    let mut frames = 0;
    while !engine.fragments().is_empty() {
        engine.step_frame();
        frames += 1;
        for f in engine.fragments() {
            assert!(f.life > 0.0 && f.life <= 1.0);
            assert!(f.alpha() > 0.0);
        }
        // Slowest decay is 0.015, so 1.0 runs out within 67 frames
        assert!(frames <= 67);
    }
}

#[test]
fn test_drawn_fragment_alpha_matches_life() {
    let mut engine = engine_with(Lcg::new(9));
    engine.set_active(true);
    engine.launch_projectile(rocket(105.0, 100.0, 10.0, 1.0));
    engine.step_frame();

    let lives: Vec<f64> = engine.fragments().iter().map(|f| f.life).collect();
    let alphas: Vec<f64> = engine
        .surface()
        .commands()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Circle { color, .. } => Some(color.alpha),
            _ => None,
        })
        .collect();
    assert_eq!(lives, alphas);
}

#[test]
fn test_explode_scales_with_rocket_size() {
    for draw in [0.0, 0.5, 0.999_999] {
        let mut small = engine_with(SequenceRandom::constant(draw));
        small.explode(&rocket(100.0, 100.0, 10.0, 0.5));

        let mut large = engine_with(SequenceRandom::constant(draw));
        large.explode(&rocket(100.0, 100.0, 10.0, 2.0));

        assert!(large.fragments().len() > small.fragments().len());
    }

    // Whole ranges are disjoint: 0.5 gives [25, 39], 2.0 gives [100, 159]
    let mut small_max = engine_with(SequenceRandom::constant(0.999_999));
    small_max.explode(&rocket(100.0, 100.0, 10.0, 0.5));
    let mut large_min = engine_with(SequenceRandom::constant(0.0));
    large_min.explode(&rocket(100.0, 100.0, 10.0, 2.0));
    assert_eq!(small_max.fragments().len(), 39);
    assert_eq!(large_min.fragments().len(), 100);
}

#[test]
fn test_update_projectile_couples_burst() {
    let mut engine = engine_with(Lcg::new(1));
    let mut p = rocket(110.0, 100.0, 10.0, 1.0);

    assert!(!engine.update_projectile(&mut p));
    assert!(!engine.fragments().is_empty());
}

#[test]
fn test_update_fragment_uses_config_physics() {
    let engine = engine_with(Lcg::new(1));
    let mut f = Fragment::new(Vec2::ZERO, Vec2::new(1.0, 0.0), 0.5, 2.0, Rgb::WHITE);

    assert!(engine.update_fragment(&mut f));
    assert!((f.velocity.y - 0.1 * 0.98).abs() < 1e-12);
    assert!(!engine.update_fragment(&mut f));
}

#[test]
fn test_spawn_timer_launches_and_rearms() {
    let mut engine = engine_with(SequenceRandom::constant(0.5));
    engine.set_active(true);
    let first = engine.spawn_handle();

    assert!(engine.fire_timer(TimerKind::Spawn));

    assert_eq!(engine.projectiles().len(), 1);
    let p = &engine.projectiles()[0];
    assert_eq!(p.position, Vec2::new(400.0, 600.0));
    assert!((p.target_y - 150.0).abs() < 1e-9);
    assert!((p.speed - 10.0).abs() < 1e-9);
    assert!((p.scale - 1.25).abs() < 1e-9);

    let next = engine.scheduler().pending_timer(TimerKind::Spawn).unwrap();
    assert_ne!(Some(next.handle), first);
    assert_eq!(engine.spawn_handle(), Some(next.handle));
}

#[test]
fn test_spawn_delay_rerolled_each_time() {
    let mut engine = engine_with(Lcg::new(31));
    engine.set_active(true);

    let mut delays = Vec::new();
    for _ in 0..20 {
        let pending = engine.scheduler().pending_timer(TimerKind::Spawn).unwrap();
        assert!((250..=500).contains(&pending.delay_ms));
        delays.push(pending.delay_ms);
        engine.fire_timer(TimerKind::Spawn);
    }
    delays.sort_unstable();
    delays.dedup();
    assert!(delays.len() > 1);
    assert_eq!(engine.projectiles().len(), 20);
}

#[test]
fn test_spawn_timer_self_cancels_when_inactive() {
    let mut engine = engine_with(Lcg::new(12));
    engine.start();
    assert!(engine.spawn_handle().is_some());

    assert!(engine.fire_timer(TimerKind::Spawn));

    assert!(engine.projectiles().is_empty());
    assert_eq!(engine.spawn_handle(), None);
    assert!(engine.scheduler().pending_timer(TimerKind::Spawn).is_none());
}

#[test]
fn test_set_active_twice_keeps_running_engine() {
    let mut engine = engine_with(Lcg::new(3));
    engine.set_active(true);
    engine.launch();
    let frame = engine.frame_handle();
    let spawn = engine.spawn_handle();

    engine.set_active(true);

    assert_eq!(engine.frame_handle(), frame);
    assert_eq!(engine.spawn_handle(), spawn);
    assert_eq!(engine.projectiles().len(), 1);
}

#[test]
fn test_set_active_false_stops() {
    let mut engine = engine_with(Lcg::new(3));
    engine.set_active(true);
    engine.launch();
    engine.step_frame();

    engine.set_active(false);

    assert!(!engine.is_active());
    assert_stopped(&engine);
}

#[test]
fn test_reactivation_starts_fresh() {
    let mut engine = engine_with(Lcg::new(3));
    engine.set_active(true);
    engine.set_active(false);
    engine.set_active(true);

    assert!(engine.is_running());
    assert!(engine.frame_handle().is_some());
    assert!(engine.spawn_handle().is_some());
}

#[test]
fn test_resize_is_debounced() {
    let mut engine = engine_with(Lcg::default());
    engine.surface_mut().set_viewport(1024.0, 768.0);

    for _ in 0..5 {
        engine.on_viewport_resize();
    }

    let resizes: Vec<_> = engine
        .scheduler()
        .pending_timers()
        .iter()
        .filter(|t| t.kind == TimerKind::Resize)
        .collect();
    assert_eq!(resizes.len(), 1);
    assert_eq!(resizes[0].delay_ms, 150);
    assert_eq!(engine.size(), (800.0, 600.0));

    assert!(engine.fire_timer(TimerKind::Resize));
    assert_eq!(engine.size(), (1024.0, 768.0));
    assert_eq!(engine.surface().size(), (1024.0, 768.0));
    assert!(!engine.fire_timer(TimerKind::Resize));
}

#[test]
fn test_resize_keeps_running_schedules() {
    let mut engine = engine_with(Lcg::default());
    engine.set_active(true);
    engine.surface_mut().set_viewport(320.0, 240.0);
    engine.on_viewport_resize();
    engine.fire_timer(TimerKind::Resize);

    assert!(engine.is_running());
    engine.fire_timer(TimerKind::Spawn);
    assert_eq!(engine.projectiles()[0].position.y, 240.0);
}

#[test]
fn test_teardown_drops_pending_resize() {
    let mut engine = engine_with(Lcg::default());
    engine.set_active(true);
    engine.on_viewport_resize();

    engine.teardown();

    assert_stopped(&engine);
    assert!(engine.scheduler().pending_timers().is_empty());
}

#[test]
fn test_custom_config_flows_through() {
    let mut config = FireworksConfig::default();
    config.launch.trail_length = 2;
    config.resize_debounce_ms = 40;

    let mut engine = FireworksEngine::new(
        RecordingSurface::new(800.0, 600.0),
        Lcg::new(6),
        ManualScheduler::new(),
        config,
    );
    engine.set_active(true);
    engine.launch_projectile(rocket(1000.0, 0.0, 10.0, 1.0));
    for _ in 0..10 {
        engine.step_frame();
    }
    assert_eq!(engine.projectiles()[0].trail().len(), 2);

    engine.on_viewport_resize();
    assert_eq!(
        engine.scheduler().pending_timer(TimerKind::Resize).unwrap().delay_ms,
        40
    );
}

#[test]
fn test_theme_classes_toggle_engine() {
    let mut engine = engine_with(Lcg::new(14));

    engine.apply_theme_classes("theme-default");
    assert!(!engine.is_running());

    engine.apply_theme_classes("vietnam-jungle-theme theme-july4");
    assert!(engine.is_active());
    assert!(engine.is_running());

    engine.apply_theme_classes("theme-christmas");
    assert!(!engine.is_active());
    assert_stopped(&engine);
}
