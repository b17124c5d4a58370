#[cfg(test)]
mod tests {
    use std::time::Duration;

    use faceplate_core::*;
    use faceplate_ui::*;

    use crate::*;

    #[test]
    fn test_fps_is_smoothed() {
        let mut hud = Hud::new();
        let t0 = web_time::Instant::now();
        hud.record_frame(t0);
        assert_eq!(hud.fps(), 0.0);
        hud.record_frame(t0 + Duration::from_millis(10));
        assert!((hud.fps() - 100.0).abs() < 0.5);
        hud.record_frame(t0 + Duration::from_millis(30));
        // 0.8 * 100 + 0.2 * 50
        assert!((hud.fps() - 90.0).abs() < 0.5);
        assert_eq!(hud.frame_count(), 3);
    }

    #[test]
    fn test_summary_includes_metrics() {
        let mut hud = Hud::new();
        assert!(!hud.summary().contains("nodes"));
        hud.metrics = Some(Metrics {
            scene_nodes: 7,
            ..Default::default()
        });
        assert!(hud.summary().contains("nodes: 7"));
    }

    #[test]
    fn test_overlay_outlines_hovered_rect() {
        let mut hud = Hud::new();
        let mut scene = Scene::new();
        hud.overlay(&mut scene);
        assert_eq!(scene.fill_count(), 0);

        hud.set_hovered(Some(Rect::new(10.0, 10.0, 20.0, 20.0)));
        hud.overlay(&mut scene);
        let edges = scene.fills_with(hud.outline_color);
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[0], Rect::new(10.0, 10.0, 20.0, 2.0));
        assert_eq!(edges[3], Rect::new(28.0, 12.0, 2.0, 16.0));
    }

    #[test]
    fn test_inspector_tracks_topmost_widget() {
        let mut window = Window::with_clock(Size::new(100.0, 100.0), ManualClock::default());
        let root = window.insert(Panel::with_style(Style::new().stretch()));
        window.set_root(root).unwrap();
        window
            .add(
                root,
                Panel::with_style(
                    Style::new()
                        .size(40.0, 40.0)
                        .align(Alignment::Center, Alignment::Center),
                ),
            )
            .unwrap();
        window.update_layout();

        let mut inspector = Inspector::new();
        let mut scene = Scene::new();
        inspector.frame(&window, Some(Vec2::new(5.0, 5.0)), &mut scene);
        assert_eq!(inspector.hud.hovered, None);

        inspector.hud.toggle_inspector();
        inspector.frame(&window, Some(Vec2::new(50.0, 50.0)), &mut scene);
        assert_eq!(
            inspector.hud.hovered,
            Some(Rect::new(30.0, 30.0, 40.0, 40.0))
        );
        assert_eq!(inspector.hud.frame_count(), 2);
    }

    #[test]
    fn test_dump_tree_indents_children() {
        let mut window = Window::new(Size::new(100.0, 100.0));
        assert_eq!(dump_tree(&window), "");
        let id = ScrollContainer::new().insert(&mut window).unwrap();
        window.set_root(id).unwrap();
        window.update_layout();

        let dump = dump_tree(&window);
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ScrollContainer [0 0 100x100]"));
        assert!(lines[1].starts_with("  HorizontalScrollBar"));
        assert!(lines[2].starts_with("  VerticalScrollBar"));
    }
}
