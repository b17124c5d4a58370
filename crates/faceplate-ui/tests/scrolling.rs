use faceplate_core::*;
use faceplate_ui::*;

struct Fixture {
    window: Window,
    clock: ManualClock,
    container: WidgetId,
    content: WidgetId,
}

/// 100x100 window scrolled over 100-wide content of the given height.
fn fixture(container: ScrollContainer, content_height: f32) -> Fixture {
    fixture_sized(container, Size::new(100.0, content_height))
}

fn fixture_sized(container: ScrollContainer, content: Size) -> Fixture {
    let _ = env_logger::builder().is_test(true).try_init();
    let clock = ManualClock::default();
    let mut window = Window::with_clock(Size::new(100.0, 100.0), clock.clone());
    let id = container.insert(&mut window).unwrap();
    window.set_root(id).unwrap();
    let content = ScrollContainer::set_content(
        &mut window,
        id,
        Panel::with_style(Style::new().size(content.width, content.height)),
    )
    .unwrap();
    window.update_layout();
    Fixture {
        window,
        clock,
        container: id,
        content,
    }
}

impl Fixture {
    fn container(&self) -> &ScrollContainer {
        self.window.widget::<ScrollContainer>(self.container).unwrap()
    }

    fn vertical_bar(&self) -> WidgetId {
        self.container().vertical_scroll_bar().unwrap()
    }

    fn bar(&self) -> &ScrollBar {
        self.window.widget::<ScrollBar>(self.vertical_bar()).unwrap()
    }

    fn horizontal_bar(&self) -> WidgetId {
        self.container().horizontal_scroll_bar().unwrap()
    }

    fn horizontal_offset(&self) -> f32 {
        self.container().horizontal_scroll_offset.get()
    }

    fn offset(&self) -> f32 {
        self.container().vertical_scroll_offset.get()
    }

    /// Runs frames of 16ms for `ms` milliseconds.
    fn run_for(&mut self, ms: u64) {
        let mut elapsed = 0;
        while elapsed < ms {
            self.clock.advance_ms(16);
            self.window.animate();
            elapsed += 16;
        }
    }

    /// Hovers `at` until the bar under it is fully expanded.
    fn expand_at(&mut self, at: Vec2) {
        self.window.dispatch_pointer_move(at, Modifiers::empty());
        self.run_for(160);
    }

    fn drag(&mut self, from: Vec2, to: Vec2) {
        self.window.dispatch_pointer_down(from, Modifiers::empty());
        self.window.dispatch_pointer_move(to, Modifiers::empty());
    }

    /// Fills of the frame with their corner radii, in paint order.
    fn draw_fills(&mut self) -> Vec<(Rect, RoundCorners)> {
        let mut scene = Scene::new();
        self.window.draw(&mut scene);
        scene
            .nodes
            .iter()
            .filter_map(|n| match n {
                SceneNode::Fill { rect, corners, .. } => Some((*rect, *corners)),
                _ => None,
            })
            .collect()
    }

    /// The bar's thumb is the last thing drawn.
    fn drawn_thumb(&mut self) -> Rect {
        self.draw_fills().last().unwrap().0
    }

    fn click(&mut self, at: Vec2) {
        self.window.dispatch_pointer_move(at, Modifiers::empty());
        self.window.dispatch_pointer_down(at, Modifiers::empty());
        self.window.dispatch_pointer_up(at, Modifiers::empty());
    }
}

#[test]
fn test_document_and_window_sizes_reach_the_bars() {
    let f = fixture(ScrollContainer::new(), 300.0);
    let sc = f.container();
    assert_eq!(sc.vertical_window_size.get(), 100.0);
    assert_eq!(sc.vertical_document_size.get(), 300.0);
    assert_eq!(sc.maximum_vertical_scroll_offset.get(), 200.0);
    assert_eq!(sc.maximum_horizontal_scroll_offset.get(), 0.0);

    let bar = f.bar();
    assert_eq!(bar.window_size.get(), 100.0);
    assert_eq!(bar.document_size.get(), 300.0);
}

#[test]
fn test_both_bars_leave_the_corner_free() {
    let f = fixture(ScrollContainer::new(), 300.0);
    let h = f.container().horizontal_scroll_bar().unwrap();
    let v = f.vertical_bar();
    assert_eq!(
        f.window.layout(v).unwrap().screen_bounds,
        Rect::new(84.0, 0.0, 16.0, 84.0)
    );
    assert_eq!(
        f.window.layout(h).unwrap().screen_bounds,
        Rect::new(0.0, 84.0, 84.0, 16.0)
    );
}

#[test]
fn test_disabled_axis_collapses_its_bar() {
    let mut f = fixture(ScrollContainer::new().vertical_only(), 300.0);
    let h = f.container().horizontal_scroll_bar().unwrap();
    assert_eq!(f.window.layout(h).unwrap().measured, Size::ZERO);
    assert_eq!(
        f.window.layout(f.vertical_bar()).unwrap().screen_bounds,
        Rect::new(84.0, 0.0, 16.0, 100.0)
    );

    f.container().horizontal_scroll_enabled.set(true);
    f.window.update_layout();
    assert_eq!(f.window.layout(h).unwrap().screen_bounds.h, 16.0);
}

#[test]
fn test_wheel_saturates_at_maximum() {
    let mut f = fixture(ScrollContainer::new(), 300.0);
    let at = Vec2::new(50.0, 50.0);

    assert!(f.window.dispatch_scroll_wheel(at, ScrollDirection::Down, Modifiers::empty()));
    assert_eq!(f.offset(), 24.0);
    for _ in 0..10 {
        f.window
            .dispatch_scroll_wheel(at, ScrollDirection::Down, Modifiers::empty());
        assert!(f.offset() <= 200.0);
    }
    assert_eq!(f.offset(), 200.0);
    assert_eq!(f.bar().scroll_offset.get(), 200.0);

    f.window
        .dispatch_scroll_wheel(at, ScrollDirection::Up, Modifiers::empty());
    assert_eq!(f.offset(), 176.0);

    // Nothing to scroll horizontally: the offset stays pinned at 0.
    f.window
        .dispatch_scroll_wheel(at, ScrollDirection::Right, Modifiers::empty());
    assert_eq!(f.container().horizontal_scroll_offset.get(), 0.0);
}

#[test]
fn test_offset_change_repositions_without_measuring() {
    let mut f = fixture(ScrollContainer::new(), 300.0);
    let before = f.window.stats();

    f.container().vertical_scroll_offset.set(50.0);
    assert!(f.window.update_layout());

    let after = f.window.stats();
    assert_eq!(after.measure_calls, before.measure_calls);
    assert_eq!(after.layout_passes, before.layout_passes);
    assert!(after.reposition_passes > before.reposition_passes);
    assert_eq!(f.window.layout(f.content).unwrap().screen_bounds.y, -50.0);
    assert_eq!(f.window.layout(f.content).unwrap().bounds.y, -50.0);
}

#[test]
fn test_shrinking_content_clamps_the_offset() {
    let mut f = fixture(ScrollContainer::new(), 300.0);
    f.container().vertical_scroll_offset.set(200.0);
    f.window.update_layout();

    f.window
        .set_style(f.content, Style::new().size(100.0, 150.0))
        .unwrap();
    f.window.update_layout();
    assert_eq!(f.offset(), 50.0);
    assert_eq!(f.window.layout(f.content).unwrap().bounds.y, -50.0);
}

#[test]
fn test_keyboard_navigation() {
    let mut f = fixture(ScrollContainer::new(), 1000.0);
    assert!(f.window.set_focus(Some(f.container)));

    let key = |k: Key| KeyEvent::new(k);
    assert!(f.window.dispatch_key_down(&key(Key::ArrowDown)));
    assert_eq!(f.offset(), 16.0);
    // Page is the viewport less 32px.
    f.window.dispatch_key_down(&key(Key::PageDown));
    assert_eq!(f.offset(), 84.0);
    f.window.dispatch_key_down(&key(Key::End));
    assert_eq!(f.offset(), 900.0);
    f.window.dispatch_key_down(&key(Key::PageDown));
    assert_eq!(f.offset(), 900.0);
    f.window.dispatch_key_down(&KeyEvent::from_keysym(0xff95, Modifiers::empty()));
    assert_eq!(f.offset(), 0.0);

    // Shift moves the horizontal axis, which has nowhere to go here.
    assert!(f.window.dispatch_key_down(&key(Key::ArrowDown).with_modifiers(Modifiers::SHIFT)));
    assert_eq!(f.offset(), 0.0);
    assert!(!f.window.dispatch_key_down(&key(Key::Tab)));
}

#[test]
fn test_track_click_recenters_window() {
    let mut f = fixture(ScrollContainer::new().vertical_only(), 1000.0);
    // Bar client is (88, 4, 8, 92); its track runs from y=8 to y=92.
    f.click(Vec2::new(92.0, 50.0));

    assert_eq!(f.offset(), 450.0);
    assert_eq!(f.window.capture(), None);
}

#[test]
fn test_drag_moves_offset_and_overscroll_springs_back() {
    let mut f = fixture(ScrollContainer::new().vertical_only(), 1000.0);
    let start = Vec2::new(92.0, 10.0);
    f.window.dispatch_pointer_move(start, Modifiers::empty());
    f.window.dispatch_pointer_down(start, Modifiers::empty());
    assert_eq!(f.window.capture(), Some(f.vertical_bar()));
    assert_eq!(f.bar().state(), ScrollBarState::Dragging);

    // 84px of track spans the whole document.
    f.window
        .dispatch_pointer_move(Vec2::new(92.0, 31.0), Modifiers::empty());
    assert!((f.offset() - 250.0).abs() < 0.01);

    // Dragging past the top clamps the offset and records overscroll.
    f.window
        .dispatch_pointer_move(Vec2::new(92.0, -11.0), Modifiers::empty());
    assert_eq!(f.offset(), 0.0);
    assert!((f.bar().overscroll() + 250.0).abs() < 0.01);
    assert!(f.bar().flubber_factor() < 0.0);

    f.window
        .dispatch_pointer_up(Vec2::new(92.0, -11.0), Modifiers::empty());
    assert_eq!(f.bar().overscroll(), 0.0);
    assert_eq!(f.window.capture(), None);

    f.run_for(100);
    // Springing back: still anchored at the top, but less squashed.
    let mid = f.bar().flubber_factor();
    assert!(mid < 0.0);
    assert!(mid.abs() > compute_flubber_factor(-250.0).abs());
    f.run_for(100);
    assert_eq!(f.bar().flubber_factor(), 1.0);
    assert!(f.offset() >= 0.0 && f.offset() <= 900.0);
}

#[test]
fn test_small_press_movement_is_still_a_click() {
    let mut f = fixture(ScrollContainer::new().vertical_only(), 1000.0);
    let at = Vec2::new(92.0, 50.0);
    f.window.dispatch_pointer_move(at, Modifiers::empty());
    f.window.dispatch_pointer_down(at, Modifiers::empty());
    f.window
        .dispatch_pointer_move(Vec2::new(92.0, 51.0), Modifiers::empty());
    assert_eq!(f.offset(), 0.0);
    f.window
        .dispatch_pointer_up(Vec2::new(92.0, 51.0), Modifiers::empty());
    // (51 - 8) / 84 of the document, less half a window.
    assert_eq!(f.offset(), 462.0);
}

#[test]
fn test_hover_expands_then_holds_then_collapses() {
    let mut f = fixture(ScrollContainer::new().vertical_only(), 1000.0);
    f.window
        .dispatch_pointer_move(Vec2::new(92.0, 50.0), Modifiers::empty());
    assert_eq!(f.bar().state(), ScrollBarState::Hovering);
    assert!(f.window.wants_animation_frame());

    f.run_for(160);
    assert_eq!(f.bar().animation_value(), 1.0);
    assert!(!f.window.wants_animation_frame());

    f.window
        .dispatch_pointer_move(Vec2::new(20.0, 50.0), Modifiers::empty());
    assert_eq!(f.bar().state(), ScrollBarState::Idle);
    f.run_for(500);
    assert_eq!(f.bar().animation_value(), 1.0);

    f.run_for(800);
    assert_eq!(f.bar().animation_value(), 0.0);
    assert!(!f.window.wants_animation_frame());
}

#[test]
fn test_unmount_cancels_scrollbar_animation() {
    let mut f = fixture(ScrollContainer::new().vertical_only(), 1000.0);
    f.window
        .dispatch_pointer_move(Vec2::new(92.0, 50.0), Modifiers::empty());
    f.run_for(48);
    assert!(f.bar().is_animating());
    assert_eq!(f.window.animator().pending(), 1);

    let other = f.window.insert(Panel::new());
    f.window.set_root(other).unwrap();

    assert!(!f.bar().is_animating());
    assert_eq!(f.bar().animation_value(), 0.0);
    assert_eq!(f.bar().flubber_factor(), 1.0);
    assert_eq!(f.window.animator().pending(), 0);
    assert_eq!(f.window.animate(), 0);
}

#[test]
fn test_draw_clips_content_and_draws_bars() {
    let mut f = fixture(ScrollContainer::new().vertical_only(), 1000.0);
    let mut scene = Scene::new();
    f.window.draw(&mut scene);
    assert!(
        scene
            .nodes
            .iter()
            .any(|n| matches!(n, SceneNode::PushClip { .. }))
    );
    // Collapsed track and thumb.
    assert!(scene.fill_count() >= 2);
    assert!(!f.window.needs_redraw());
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn test_overscroll_past_the_end_squashes_thumb_toward_the_bottom() {
    let mut f = fixture(ScrollContainer::new().vertical_only(), 1000.0);
    f.expand_at(Vec2::new(92.0, 10.0));
    assert_eq!(f.bar().animation_value(), 1.0);

    // 105px of drag is 1250 of document: 350 past the maximum.
    f.drag(Vec2::new(92.0, 10.0), Vec2::new(92.0, 115.0));
    assert_eq!(f.offset(), 900.0);
    assert!(close(f.bar().overscroll(), 350.0));
    let factor = f.bar().flubber_factor();
    assert!(close(factor, compute_flubber_factor(350.0)));
    assert!(factor > 0.0 && factor < 1.0);

    // Bar client in window coordinates is (88, 4, 8, 92).
    let resting = thumb_rect(
        Orientation::Vertical,
        Rect::new(88.0, 4.0, 8.0, 92.0),
        100.0,
        1000.0,
        900.0,
    );
    let thumb = f.drawn_thumb();
    assert!(close(thumb.bottom(), resting.bottom()));
    assert!(close(thumb.h, resting.h * factor));
    assert_eq!(thumb.x, resting.x);
    assert_eq!(thumb.w, resting.w);
}

#[test]
fn test_overscroll_before_the_start_squashes_thumb_toward_the_top() {
    let mut f = fixture(ScrollContainer::new().vertical_only(), 1000.0);
    f.expand_at(Vec2::new(92.0, 50.0));

    f.drag(Vec2::new(92.0, 50.0), Vec2::new(92.0, -13.0));
    assert_eq!(f.offset(), 0.0);
    assert!(close(f.bar().overscroll(), -750.0));
    let factor = f.bar().flubber_factor();
    assert!(close(factor, compute_flubber_factor(-750.0)));
    assert!(factor < 0.0);

    let resting = thumb_rect(
        Orientation::Vertical,
        Rect::new(88.0, 4.0, 8.0, 92.0),
        100.0,
        1000.0,
        0.0,
    );
    let thumb = f.drawn_thumb();
    assert!(close(thumb.top(), resting.top()));
    assert!(close(thumb.h, resting.h * factor.abs()));
    assert_eq!(thumb.w, resting.w);
}

#[test]
fn test_horizontal_bar_click_and_drag() {
    let mut f = fixture_sized(
        ScrollContainer::new().horizontal_only(),
        Size::new(1000.0, 100.0),
    );
    assert_eq!(
        f.window.layout(f.horizontal_bar()).unwrap().screen_bounds,
        Rect::new(0.0, 84.0, 100.0, 16.0)
    );

    // Bar client is (4, 88, 92, 8); its track runs from x=8 to x=92.
    f.click(Vec2::new(50.0, 92.0));
    assert_eq!(f.horizontal_offset(), 450.0);
    assert_eq!(f.offset(), 0.0);

    f.container().horizontal_scroll_offset.set(0.0);
    f.window
        .dispatch_pointer_move(Vec2::new(10.0, 92.0), Modifiers::empty());
    f.drag(Vec2::new(10.0, 92.0), Vec2::new(31.0, 92.0));
    assert!(close(f.horizontal_offset(), 250.0));
    f.window
        .dispatch_pointer_up(Vec2::new(31.0, 92.0), Modifiers::empty());
    assert_eq!(f.window.capture(), None);
}

#[test]
fn test_horizontal_overscroll_squashes_thumb_toward_the_right() {
    let mut f = fixture_sized(
        ScrollContainer::new().horizontal_only(),
        Size::new(1000.0, 100.0),
    );
    f.expand_at(Vec2::new(10.0, 92.0));

    f.drag(Vec2::new(10.0, 92.0), Vec2::new(115.0, 92.0));
    assert_eq!(f.horizontal_offset(), 900.0);
    let factor = f.window.widget::<ScrollBar>(f.horizontal_bar()).unwrap().flubber_factor();
    assert!(close(factor, compute_flubber_factor(350.0)));

    let resting = thumb_rect(
        Orientation::Horizontal,
        Rect::new(4.0, 88.0, 92.0, 8.0),
        100.0,
        1000.0,
        900.0,
    );
    let thumb = f.drawn_thumb();
    assert!(close(thumb.right(), resting.right()));
    assert!(close(thumb.w, resting.w * factor));
    // Only the scrolling axis is squashed.
    assert_eq!(thumb.y, resting.y);
    assert_eq!(thumb.h, resting.h);
}

#[test]
fn test_track_uses_the_bar_style_corners() {
    let mut f = fixture(ScrollContainer::new().vertical_only(), 1000.0);
    let bar = f.vertical_bar();
    let style = f.window.style(bar).unwrap();
    f.window
        .set_style(bar, style.round_corners(RoundCorners::all(3.0)))
        .unwrap();

    let fills = f.draw_fills();
    let (_, track_corners) = fills[fills.len() - 2];
    assert_eq!(track_corners, RoundCorners::all(3.0));
}
