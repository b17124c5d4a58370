use faceplate_core::*;
use faceplate_devtools::{Inspector, Metrics, log_tree};
use faceplate_ui::*;
use web_time::Instant;

const FRAME_MS: u64 = 16;
const FRAMES: u64 = 600;

/// Fake program material: a slow swell with a transient every second.
fn level(frame: u64, phase: f32) -> f32 {
    let t = frame as f32 * FRAME_MS as f32 / 1000.0;
    let swell = -30.0 + 18.0 * (t * 1.3 + phase).sin();
    if frame % 60 < 3 { 3.0 } else { swell }
}

fn with_margin(window: &mut Window, id: WidgetId, margin: Thickness) -> anyhow::Result<()> {
    let style = window.style(id).unwrap_or_default().margin(margin);
    window.set_style(id, style)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let clock = ManualClock::default();
    let mut window = Window::with_clock(Size::new(320.0, 200.0), clock.clone());

    let root = window.insert(Panel::with_style(
        Style::new().stretch().background(Color::from_hex("#1E1E1E")),
    ));
    window.set_root(root)?;

    let stereo = window.add(root, StereoDbVuMeter::new())?;
    with_margin(&mut window, stereo, Thickness::new(8.0, 8.0, 0.0, 0.0))?;
    let mono = window.add(root, DbVuMeter::new())?;
    with_margin(&mut window, mono, Thickness::new(40.0, 8.0, 0.0, 0.0))?;
    let plain = window.add(root, VuMeter::new())?;
    with_margin(&mut window, plain, Thickness::new(72.0, 8.0, 0.0, 0.0))?;

    let scroller = ScrollContainer::new().vertical_only().insert(&mut window)?;
    window.append_child(root, scroller)?;
    window.set_style(
        scroller,
        Style::new()
            .size(140.0, 180.0)
            .margin(Thickness::all(10.0))
            .align(Alignment::End, Alignment::Start),
    )?;
    ScrollContainer::set_content(
        &mut window,
        scroller,
        Panel::with_style(
            Style::new()
                .size(120.0, 640.0)
                .background(Color::from_hex("#2D2D30")),
        ),
    )?;

    let mut inspector = Inspector::new();
    inspector.hud.toggle_inspector();
    let mut scene = Scene::new();
    window.update_layout();
    let bounds = window.layout(scroller).map(|l| l.screen_bounds);
    let pointer = bounds.map(|b| Vec2::new(b.x + b.w / 2.0, b.y + b.h / 2.0));

    for frame in 0..FRAMES {
        clock.advance_ms(FRAME_MS);

        window.widget::<StereoDbVuMeter>(stereo)?.value.set(level(frame, 0.0));
        window
            .widget::<StereoDbVuMeter>(stereo)?
            .right_value
            .set(level(frame, 0.7));
        window.widget::<DbVuMeter>(mono)?.value.set(level(frame, 1.9));
        window
            .widget::<VuMeter>(plain)?
            .value
            .set((frame % 100) as f32 / 100.0);

        if frame % 45 == 0
            && let Some(p) = pointer
        {
            window.dispatch_scroll_wheel(p, ScrollDirection::Down, Modifiers::empty());
        }

        let started = Instant::now();
        window.update_layout();
        let layout_ms = started.elapsed().as_secs_f32() * 1000.0;
        window.animate();

        if window.needs_redraw() {
            scene.clear();
            window.draw(&mut scene);
        }
        inspector.frame(&window, pointer, &mut scene);
        inspector.hud.metrics = Some(Metrics {
            layout_ms,
            scene_nodes: scene.nodes.len(),
            pending_animations: window.animator().pending(),
            layout: window.stats(),
        });

        if frame % 120 == 0 {
            log::info!("{}", inspector.hud.summary());
        }
    }

    log_tree(&window);
    let offset = window
        .widget::<ScrollContainer>(scroller)?
        .vertical_scroll_offset
        .get();
    let meter = window.widget::<StereoDbVuMeter>(stereo)?;
    log::info!(
        "done: hold {:.1}/{:.1} dB, scroll offset {offset}",
        meter.hold_value(),
        meter.right_hold_value()
    );
    Ok(())
}
