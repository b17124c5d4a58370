#[cfg(test)]
mod tests {
    use crate::*;
    use faceplate_core::*;

    fn window(w: f32, h: f32) -> (Window, ManualClock) {
        let clock = ManualClock::default();
        (Window::with_clock(Size::new(w, h), clock.clone()), clock)
    }

    fn root_panel(window: &mut Window, style: Style) -> WidgetId {
        let root = window.insert(Panel::with_style(style));
        window.set_root(root).unwrap();
        root
    }

    fn bounds(window: &Window, id: WidgetId) -> Rect {
        window.layout(id).unwrap().screen_bounds
    }

    #[test]
    fn test_fixed_size_child_with_margin() {
        let (mut window, _) = window(200.0, 100.0);
        let root = root_panel(&mut window, Style::new().stretch());
        let child = window
            .add(
                root,
                Panel::with_style(Style::new().size(40.0, 20.0).margin(Thickness::all(1.0))),
            )
            .unwrap();
        window.update_layout();

        assert_eq!(bounds(&window, root), Rect::new(0.0, 0.0, 200.0, 100.0));
        assert_eq!(window.layout(child).unwrap().measured, Size::new(42.0, 22.0));
        assert_eq!(bounds(&window, child), Rect::new(1.0, 1.0, 40.0, 20.0));
    }

    #[test]
    fn test_padding_offsets_children() {
        let (mut window, _) = window(200.0, 100.0);
        let root = root_panel(&mut window, Style::new().stretch().padding(Thickness::all(10.0)));
        let child = window
            .add(root, Panel::with_style(Style::new().stretch()))
            .unwrap();
        window.update_layout();

        assert_eq!(bounds(&window, child), Rect::new(10.0, 10.0, 180.0, 80.0));
        assert_eq!(window.layout(root).unwrap().client_size, Size::new(180.0, 80.0));
    }

    #[test]
    fn test_alignment() {
        let (mut window, _) = window(200.0, 100.0);
        let root = root_panel(&mut window, Style::new().stretch());
        let centered = window
            .add(
                root,
                Panel::with_style(
                    Style::new()
                        .size(40.0, 20.0)
                        .align(Alignment::Center, Alignment::Center),
                ),
            )
            .unwrap();
        let end = window
            .add(
                root,
                Panel::with_style(Style::new().size(40.0, 20.0).align(Alignment::End, Alignment::End)),
            )
            .unwrap();
        window.update_layout();

        assert_eq!(bounds(&window, centered), Rect::new(80.0, 40.0, 40.0, 20.0));
        assert_eq!(bounds(&window, end), Rect::new(160.0, 80.0, 40.0, 20.0));
    }

    #[test]
    fn test_min_max_clamp() {
        let (mut window, _) = window(200.0, 100.0);
        let root = root_panel(&mut window, Style::new().stretch());
        let child = window
            .add(
                root,
                Panel::with_style(Style::new().stretch().max_width(120.0).min_height(150.0)),
            )
            .unwrap();
        window.update_layout();

        // min height still can't exceed what the parent has available.
        assert_eq!(window.layout(child).unwrap().measured, Size::new(120.0, 100.0));
    }

    #[test]
    fn test_collapsed_child_measures_zero() {
        let (mut window, _) = window(200.0, 100.0);
        let root = root_panel(&mut window, Style::new().stretch());
        let child = window
            .add(
                root,
                Panel::with_style(Style::new().size(40.0, 20.0).visibility(Visibility::Collapsed)),
            )
            .unwrap();
        window.update_layout();

        assert_eq!(window.layout(child).unwrap().measured, Size::ZERO);
        assert!(window.hit_test(Vec2::new(5.0, 5.0)).ends_with(&[root]));
    }

    #[test]
    fn test_zero_size_root_falls_back() {
        let (mut window, _) = window(200.0, 100.0);
        let root = root_panel(&mut window, Style::new());
        window.update_layout();

        assert_eq!(bounds(&window, root), Rect::new(0.0, 0.0, DEFAULT_EXTENT, DEFAULT_EXTENT));
    }

    #[test]
    fn test_layout_runs_only_when_invalid() {
        let (mut window, _) = window(200.0, 100.0);
        let root = root_panel(&mut window, Style::new().stretch());
        let child = window.add(root, Panel::new()).unwrap();

        assert!(window.update_layout());
        let passes = window.stats().layout_passes;
        assert!(!window.update_layout());
        assert_eq!(window.stats().layout_passes, passes);

        // A child style change climbs to the root.
        window
            .set_style(child, Style::new().size(10.0, 10.0))
            .unwrap();
        assert!(window.update_layout());
        assert_eq!(window.stats().layout_passes, passes + 1);

        window.set_size(Size::new(300.0, 100.0));
        window.update_layout();
        assert_eq!(bounds(&window, root).w, 300.0);
    }

    #[test]
    fn test_tree_errors() {
        let (mut window, _) = window(200.0, 100.0);
        let root = root_panel(&mut window, Style::new().stretch());
        let a = window.add(root, Panel::new()).unwrap();

        assert!(matches!(
            window.append_child(root, a),
            Err(Error::AlreadyParented(id)) if id == a
        ));
        let b = window.insert(Panel::new());
        window.append_child(a, b).unwrap();
        window.remove(a).unwrap();
        assert!(!window.contains(b));
        assert!(matches!(window.remove(b), Err(Error::UnknownWidget(_))));
        assert!(matches!(
            window.widget::<VuMeter>(root),
            Err(Error::WrongWidgetType { .. })
        ));
    }

    #[test]
    fn test_mount_follows_root() {
        let (mut window, _) = window(200.0, 100.0);
        let detached = window.insert(Panel::new());
        let child = window.add(detached, Panel::new()).unwrap();
        assert!(!window.is_mounted(child));

        window.set_root(detached).unwrap();
        assert!(window.is_mounted(detached));
        assert!(window.is_mounted(child));

        let other = window.insert(Panel::new());
        window.set_root(other).unwrap();
        assert!(!window.is_mounted(child));
    }

    #[test]
    fn test_callback_cancelled_earlier_in_the_frame_does_not_run() {
        use std::cell::Cell;
        use std::rc::Rc;

        let (mut window, _) = window(100.0, 100.0);
        let root = root_panel(&mut window, Style::new().stretch());
        let a = window.add(root, Panel::new()).unwrap();
        let b = window.add(root, Panel::new()).unwrap();
        let animator = window.animator();

        let b_handle = Rc::new(Cell::new(AnimationHandle::INVALID));
        let cancelled = Rc::new(Cell::new(false));
        let b_ran = Rc::new(Cell::new(false));
        {
            let (b_handle, cancelled) = (b_handle.clone(), cancelled.clone());
            animator.request::<Panel>(a, move |_, cx, _| {
                let mut h = b_handle.get();
                cancelled.set(cx.cancel_animation_callback(&mut h));
                b_handle.set(h);
            });
        }
        let ran = b_ran.clone();
        b_handle.set(animator.request::<Panel>(b, move |_, _, _| ran.set(true)));

        assert_eq!(window.animate(), 1);
        assert!(cancelled.get());
        assert!(!b_ran.get());
        assert!(!b_handle.get().is_valid());
        assert_eq!(animator.pending(), 0);
    }

    #[test]
    fn test_flubber_factor() {
        assert_eq!(compute_flubber_factor(0.0), 1.0);
        for x in [1.0, 40.0, 80.0, 400.0, 900.0] {
            let f = compute_flubber_factor(x);
            assert!(f > 0.0 && f < 1.0);
            assert_eq!(compute_flubber_factor(-x), -f);
        }
        assert!(compute_flubber_factor(10.0) > compute_flubber_factor(100.0));
        assert!((compute_flubber_factor(900.0) - 0.882).abs() < 0.001);
        assert_eq!(compute_flubber_factor(5000.0), compute_flubber_factor(900.0));
    }

    #[test]
    fn test_thumb_rect_orientations_agree() {
        let v = thumb_rect(
            Orientation::Vertical,
            Rect::new(0.0, 0.0, 8.0, 100.0),
            50.0,
            100.0,
            0.0,
        );
        assert_eq!(v, Rect::new(0.0, 0.0, 8.0, 54.0));

        let h = thumb_rect(
            Orientation::Horizontal,
            Rect::new(0.0, 0.0, 100.0, 8.0),
            50.0,
            100.0,
            0.0,
        );
        assert_eq!(h, Rect::new(0.0, 0.0, 54.0, 8.0));

        let end = thumb_rect(
            Orientation::Vertical,
            Rect::new(0.0, 0.0, 8.0, 100.0),
            50.0,
            100.0,
            50.0,
        );
        assert_eq!(end.bottom(), 100.0);
        assert_eq!(
            thumb_rect(Orientation::Vertical, Rect::new(0.0, 0.0, 8.0, 100.0), 1.0, 0.0, 0.0),
            Rect::default()
        );
    }

    #[test]
    fn test_thumb_keeps_full_size_past_the_maximum_offset() {
        let client = Rect::new(0.0, 0.0, 8.0, 100.0);
        let at_max = thumb_rect(Orientation::Vertical, client, 50.0, 100.0, 50.0);
        // Document shrank, offset not clamped yet.
        let past = thumb_rect(Orientation::Vertical, client, 50.0, 100.0, 80.0);
        assert_eq!(past, at_max);
        assert_eq!(past.h, 54.0);

        let client = Rect::new(0.0, 0.0, 100.0, 8.0);
        let at_max = thumb_rect(Orientation::Horizontal, client, 50.0, 100.0, 50.0);
        let past = thumb_rect(Orientation::Horizontal, client, 50.0, 100.0, 80.0);
        assert_eq!(past, at_max);
    }

    #[test]
    fn test_track_rect() {
        let t = track_rect(Orientation::Vertical, Rect::new(0.0, 0.0, 8.0, 100.0));
        assert_eq!(t, Rect::new(0.0, 4.0, 8.0, 92.0));
        let t = track_rect(Orientation::Horizontal, Rect::new(0.0, 0.0, 100.0, 8.0));
        assert_eq!(t, Rect::new(4.0, 0.0, 92.0, 8.0));
    }

    #[test]
    fn test_value_to_client_clamps_and_is_monotonic() {
        let rect = Rect::new(0.0, 10.0, 4.0, 100.0);
        assert_eq!(value_to_client(1.0, 0.0, 1.0, rect), 10.0);
        assert_eq!(value_to_client(0.0, 0.0, 1.0, rect), 110.0);
        assert_eq!(value_to_client(2.0, 0.0, 1.0, rect), 10.0);
        assert_eq!(value_to_client(-1.0, 0.0, 1.0, rect), 110.0);
        assert_eq!(value_to_client(0.5, 0.0, 1.0, rect), 60.0);

        let mut last = f32::INFINITY;
        for i in -20..=120 {
            let y = value_to_client(i as f32 / 100.0, 0.0, 1.0, rect);
            assert!(y <= last);
            assert!((rect.top()..=rect.bottom()).contains(&y));
            last = y;
        }
    }

    fn draw(value: f32, min: f32, max: f32, rect: Rect, settings: &VuSettings) -> Scene {
        let mut scene = Scene::new();
        draw_vu(&mut scene, value, min, max, rect, settings);
        scene
    }

    // -60..+4 over 64px: one pixel per dB, 0 dB at y = 4.
    const DB_MIN: f32 = -60.0;
    const DB_MAX: f32 = 4.0;

    fn db_rect(w: f32) -> Rect {
        Rect::new(0.0, 0.0, w, 64.0)
    }

    #[test]
    fn test_db_meter_bands() {
        let s = VuSettings::db();

        let scene = draw(3.0, DB_MIN, DB_MAX, db_rect(4.0), &s);
        assert_eq!(scene.fills_with(s.green), vec![Rect::new(0.0, 16.0, 4.0, 48.0)]);
        assert_eq!(scene.fills_with(s.yellow), vec![Rect::new(0.0, 4.0, 4.0, 12.0)]);
        assert_eq!(scene.fills_with(s.red), vec![Rect::new(0.0, 1.0, 4.0, 3.0)]);

        let scene = draw(-6.0, DB_MIN, DB_MAX, db_rect(4.0), &s);
        assert_eq!(scene.fills_with(s.yellow), vec![Rect::new(0.0, 10.0, 4.0, 6.0)]);
        assert!(scene.fills_with(s.red).is_empty());

        let scene = draw(-30.0, DB_MIN, DB_MAX, db_rect(4.0), &s);
        assert_eq!(scene.fill_count(), 1);
        assert_eq!(scene.fills_with(s.green), vec![Rect::new(0.0, 34.0, 4.0, 30.0)]);
    }

    #[test]
    fn test_meter_always_shows_a_pixel() {
        let s = VuSettings::db();
        let scene = draw(-100.0, DB_MIN, DB_MAX, db_rect(4.0), &s);
        assert_eq!(scene.fills_with(s.green), vec![Rect::new(0.0, 63.0, 4.0, 1.0)]);
    }

    #[test]
    fn test_red_level_alone_cascades_to_yellow() {
        let s = VuSettings {
            red_level: Some(0.5),
            ..VuSettings::default()
        };
        let scene = draw(0.75, 0.0, 1.0, Rect::new(0.0, 0.0, 4.0, 100.0), &s);
        assert_eq!(scene.fills_with(s.green), vec![Rect::new(0.0, 50.0, 4.0, 50.0)]);
        assert_eq!(scene.fills_with(s.red), vec![Rect::new(0.0, 25.0, 4.0, 25.0)]);
    }

    #[test]
    fn test_bipolar_meter() {
        let s = VuSettings::default();
        let rect = Rect::new(0.0, 0.0, 4.0, 100.0);

        let up = draw(0.5, -1.0, 1.0, rect, &s);
        assert_eq!(up.fills_with(s.green), vec![Rect::new(0.0, 25.0, 4.0, 25.0)]);
        let down = draw(-0.5, -1.0, 1.0, rect, &s);
        assert_eq!(down.fills_with(s.green), vec![Rect::new(0.0, 50.0, 4.0, 25.0)]);
        let zero = draw(0.0, -1.0, 1.0, rect, &s);
        assert_eq!(zero.fills_with(s.green), vec![Rect::new(0.0, 50.0, 4.0, 1.0)]);
    }

    #[test]
    fn test_degenerate_meter_draws_nothing() {
        let s = VuSettings::db();
        assert_eq!(draw(0.0, 1.0, 1.0, Rect::new(0.0, 0.0, 4.0, 66.0), &s).fill_count(), 0);
        assert_eq!(draw(0.0, -60.0, 6.0, Rect::default(), &s).fill_count(), 0);
    }

    #[test]
    fn test_ticks_spread_out_on_short_meters() {
        let s = VuSettings::db();
        let mut scene = Scene::new();
        draw_ticks(&mut scene, DB_MIN, DB_MAX, &s, db_rect(10.0), s.tick_color);
        assert_eq!(scene.fills_with(s.tick_color), vec![Rect::new(0.0, 4.0, 4.0, 1.0)]);
        // zero tick plus -6, -12, ... -54
        assert_eq!(scene.fill_count(), 10);

        // At half the height 6 dB is 3px apart, so ticks double to 12 dB.
        let mut scene = Scene::new();
        draw_ticks(
            &mut scene,
            DB_MIN,
            DB_MAX,
            &s,
            Rect::new(0.0, 0.0, 10.0, 32.0),
            s.tick_color,
        );
        assert_eq!(scene.fill_count(), 5);
    }

    #[test]
    fn test_telltale() {
        let s = VuSettings::db();
        let bar = db_rect(4.0);

        let mut scene = Scene::new();
        draw_telltale(&mut scene, 3.0, -30.0, DB_MIN, DB_MAX, &s, bar);
        assert_eq!(scene.fills_with(s.red), vec![Rect::new(0.0, 1.0, 4.0, 2.0)]);

        let mut scene = Scene::new();
        draw_telltale(&mut scene, -6.0, -30.0, DB_MIN, DB_MAX, &s, bar);
        assert_eq!(scene.fills_with(s.yellow).len(), 1);

        // Too close to the bar to show.
        let mut scene = Scene::new();
        draw_telltale(&mut scene, -29.5, -30.0, DB_MIN, DB_MAX, &s, bar);
        assert_eq!(scene.fill_count(), 0);
    }

    #[test]
    fn test_meter_widget_draws_in_its_client_area() {
        let (mut window, _) = window(100.0, 100.0);
        let root = root_panel(&mut window, Style::new().stretch());
        let meter = window.add(root, VuMeter::new()).unwrap();
        window.widget::<VuMeter>(meter).unwrap().value.set(1.0);

        let mut scene = Scene::new();
        window.draw(&mut scene);
        // 8x52 box at (1,1), padded by 2.
        let green = window.theme().vu.green;
        assert_eq!(scene.fills_with(green), vec![Rect::new(3.0, 3.0, 4.0, 48.0)]);
    }

    #[test]
    fn test_meter_value_marks_redraw() {
        let (mut window, _) = window(100.0, 100.0);
        let meter = window.insert(VuMeter::new());
        window.set_root(meter).unwrap();
        let mut scene = Scene::new();
        window.draw(&mut scene);
        assert!(!window.needs_redraw());

        window.widget::<VuMeter>(meter).unwrap().value.set(0.25);
        assert!(window.needs_redraw());
    }

    #[test]
    fn test_stereo_meters_split_bars() {
        let (mut window, _) = window(100.0, 100.0);
        let meter = window.insert(StereoVuMeter::new());
        window.set_root(meter).unwrap();
        {
            let m = window.widget::<StereoVuMeter>(meter).unwrap();
            m.value.set(1.0);
            m.right_value.set(0.5);
        }
        let mut scene = Scene::new();
        window.draw(&mut scene);
        let green = window.theme().vu.green;
        let bars = scene.fills_with(green);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].w, 4.0);
        assert_eq!(bars[1].x - bars[0].x, 6.0);
        assert!(bars[1].h < bars[0].h);
    }
}
