use faceplate_core::*;
use faceplate_ui::*;

fn window() -> (Window, ManualClock) {
    let _ = env_logger::builder().is_test(true).try_init();
    let clock = ManualClock::default();
    (Window::with_clock(Size::new(100.0, 100.0), clock.clone()), clock)
}

/// Runs frames of 16ms for `ms` milliseconds.
fn run_for(window: &mut Window, clock: &ManualClock, ms: u64) {
    let mut elapsed = 0;
    while elapsed < ms {
        clock.advance_ms(16);
        window.animate();
        elapsed += 16;
    }
}

#[test]
fn test_peak_hold_then_decay_to_latest_value() {
    let (mut window, clock) = window();
    let id = window.insert(DbVuMeter::with_range(0.0, 1.0));
    window.set_root(id).unwrap();
    let meter = |w: &Window| -> f32 { w.widget::<DbVuMeter>(id).unwrap().hold_value() };
    let set = |w: &Window, v: f32| w.widget::<DbVuMeter>(id).unwrap().value.set(v);

    set(&window, 0.2);
    set(&window, 0.8);
    assert_eq!(meter(&window), 0.8);
    set(&window, 0.3);
    assert_eq!(meter(&window), 0.8);

    // Plateau.
    run_for(&mut window, &clock, 1900);
    assert_eq!(meter(&window), 0.8);

    // Then one full range per second.
    run_for(&mut window, &clock, 300);
    let falling = meter(&window);
    assert!(falling < 0.8 && falling > 0.3);

    run_for(&mut window, &clock, 1000);
    assert_eq!(meter(&window), 0.3);
    assert!(!window.widget::<DbVuMeter>(id).unwrap().is_animating());
    assert_eq!(window.animator().pending(), 0);
    assert_eq!(window.animate(), 0);
}

#[test]
fn test_rising_value_restarts_the_hold() {
    let (mut window, clock) = window();
    let id = window.insert(DbVuMeter::with_range(0.0, 1.0));
    window.set_root(id).unwrap();
    let m = |w: &Window| -> f32 { w.widget::<DbVuMeter>(id).unwrap().hold_value() };

    window.widget::<DbVuMeter>(id).unwrap().value.set(0.9);
    window.widget::<DbVuMeter>(id).unwrap().value.set(0.0);
    run_for(&mut window, &clock, 2400);
    let decaying = m(&window);
    assert!(decaying < 0.9);

    // Live value overtakes the falling marker.
    window.widget::<DbVuMeter>(id).unwrap().value.set(0.95);
    assert_eq!(m(&window), 0.95);
    run_for(&mut window, &clock, 1500);
    assert_eq!(m(&window), 0.95);
}

#[test]
fn test_unmounted_meter_tracks_value() {
    let (mut window, _) = window();
    let id = window.insert(DbVuMeter::new());
    let meter = window.widget::<DbVuMeter>(id).unwrap();
    meter.value.set(-3.0);
    assert_eq!(meter.hold_value(), -3.0);
    meter.value.set(-20.0);
    assert_eq!(meter.hold_value(), -20.0);
    assert_eq!(window.animator().pending(), 0);
}

#[test]
fn test_mount_resets_hold_to_value() {
    let (mut window, _) = window();
    let root = window.insert(Panel::with_style(Style::new().stretch()));
    window.set_root(root).unwrap();
    let id = window.add(root, DbVuMeter::new()).unwrap();
    window.widget::<DbVuMeter>(id).unwrap().value.set(0.0);
    window.widget::<DbVuMeter>(id).unwrap().value.set(-40.0);
    assert_eq!(window.widget::<DbVuMeter>(id).unwrap().hold_value(), 0.0);

    let other = window.insert(Panel::new());
    window.set_root(other).unwrap();
    window.set_root(root).unwrap();
    assert_eq!(window.widget::<DbVuMeter>(id).unwrap().hold_value(), -40.0);
    assert!(!window.widget::<DbVuMeter>(id).unwrap().is_animating());
}

#[test]
fn test_unmount_cancels_hold_animation() {
    let (mut window, _) = window();
    let root = window.insert(Panel::with_style(Style::new().stretch()));
    window.set_root(root).unwrap();
    let id = window.add(root, DbVuMeter::new()).unwrap();
    window.widget::<DbVuMeter>(id).unwrap().value.set(0.0);
    assert_eq!(window.animator().pending(), 1);

    window.remove(id).unwrap();
    assert_eq!(window.animator().pending(), 0);
}

#[test]
fn test_stereo_channels_share_one_callback() {
    let (mut window, clock) = window();
    let id = window.insert(StereoDbVuMeter::with_range(0.0, 1.0));
    window.set_root(id).unwrap();
    {
        let m = window.widget::<StereoDbVuMeter>(id).unwrap();
        m.value.set(0.8);
        m.value.set(0.1);
        m.right_value.set(0.5);
        m.right_value.set(0.4);
    }
    assert_eq!(window.animator().pending(), 1);

    // Right settles after 2.1s, left keeps going until 2.7s.
    run_for(&mut window, &clock, 2300);
    {
        let m = window.widget::<StereoDbVuMeter>(id).unwrap();
        assert_eq!(m.right_hold_value(), 0.4);
        assert!(m.hold_value() > 0.1);
        assert!(m.is_animating());
    }
    run_for(&mut window, &clock, 600);
    let m = window.widget::<StereoDbVuMeter>(id).unwrap();
    assert_eq!(m.hold_value(), 0.1);
    assert!(!m.is_animating());
    assert_eq!(window.animator().pending(), 0);
}

#[test]
fn test_db_meter_draws_telltale() {
    let (mut window, _) = window();
    let id = window.insert(DbVuMeter::new());
    window.set_root(id).unwrap();
    window.widget::<DbVuMeter>(id).unwrap().value.set(0.0);
    window.widget::<DbVuMeter>(id).unwrap().value.set(-30.0);

    let mut scene = Scene::new();
    window.draw(&mut scene);
    let s = window.theme().db_vu;
    // The bar at -30 dB is all green; the marker at 0 dB sits in the yellow band.
    let yellow = scene.fills_with(s.yellow);
    assert_eq!(yellow.len(), 1);
    assert!((yellow[0].h - 2.0).abs() < 1e-3);
    assert!(!scene.fills_with(s.tick_color).is_empty());
}
