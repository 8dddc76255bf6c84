//! The mountable decorative layer
//!
//! A `Stage` owns the crystal scene and the cursor, each behind its own
//! boundary, and drives them from host events and frame callbacks.

use atelier_core::{Color, Vec2};
use atelier_cursor::CursorSystem;
use atelier_particles::{CrystalPhase, CrystalSystem};
use atelier_render::{Capability, FallbackPanel, FrameInput, Painter, Surface};
use atelier_runtime::{
    EventKind, FrameClock, FrameHandle, FrameInfo, Host, InputEvent, Key, ListenerHandle,
    PointerState, PresentationHints, Viewport,
};
use serde::Serialize;

use crate::boundary::SystemBoundary;
use crate::config::StageConfig;

/// Event kinds the stage listens for while running
const LISTENED: [EventKind; 9] = [
    EventKind::PointerMove,
    EventKind::PointerDown,
    EventKind::PointerUp,
    EventKind::Click,
    EventKind::PointerOver,
    EventKind::PointerLeave,
    EventKind::PointerEnter,
    EventKind::Scroll,
    EventKind::Resize,
];

#[derive(Debug, Clone, PartialEq)]
pub enum StageState {
    /// Created, not mounted yet
    Idle,
    Running,
    /// No rendering capability; the static panel is shown instead
    Fallback(FallbackPanel),
    Disabled,
    Unmounted,
}

impl StageState {
    pub fn name(&self) -> &'static str {
        match self {
            StageState::Idle => "idle",
            StageState::Running => "running",
            StageState::Fallback(_) => "fallback",
            StageState::Disabled => "disabled",
            StageState::Unmounted => "unmounted",
        }
    }
}

/// Crystal counts per lifecycle phase
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PhaseCounts {
    pub forming: usize,
    pub active: usize,
    pub transforming: usize,
    pub dormant: usize,
}

/// Snapshot of a stage for reports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageSummary {
    pub state: String,
    pub frames: u64,
    pub elapsed: f64,
    pub crystals: PhaseCounts,
    pub bubbles: usize,
    pub meshes: usize,
    pub ambient: usize,
    pub trail_points: usize,
    pub ink_strokes: usize,
    pub tripped: Vec<String>,
    pub presentation: PresentationHints,
}

pub struct Stage {
    config: StageConfig,
    state: StageState,
    capability: Option<Capability>,
    clock: FrameClock,
    viewport: Viewport,
    pointer: PointerState,
    pointer_over_clickable: bool,
    crystals: SystemBoundary<CrystalSystem>,
    cursor: SystemBoundary<CursorSystem>,
    listeners: Vec<ListenerHandle>,
    pending_frame: Option<FrameHandle>,
    painter: Painter,
}

impl Stage {
    pub fn new(config: StageConfig) -> Self {
        let crystals = CrystalSystem::new(config.scene(), config.seed);
        let cursor = CursorSystem::new(config.cursor.clone(), config.seed.wrapping_add(1));
        Self {
            viewport: config.render.viewport(),
            painter: Painter::new(config.render.fog),
            crystals: SystemBoundary::new(crystals),
            cursor: SystemBoundary::new(cursor),
            config,
            state: StageState::Idle,
            capability: None,
            clock: FrameClock::new(),
            pointer: PointerState::new(),
            pointer_over_clickable: false,
            listeners: Vec::new(),
            pending_frame: None,
        }
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    pub fn state(&self) -> &StageState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == StageState::Running
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn crystals(&self) -> &SystemBoundary<CrystalSystem> {
        &self.crystals
    }

    pub fn cursor(&self) -> &SystemBoundary<CursorSystem> {
        &self.cursor
    }

    fn frame_info(&self) -> FrameInfo {
        FrameInfo::new(self.clock.elapsed, self.clock.fixed_step, self.clock.frame, self.viewport)
    }

    /// Attach to `host`. Does nothing while disabled; shows the fallback
    /// panel when `capability` is unavailable.
    pub fn mount<H: Host + ?Sized>(&mut self, host: &mut H, capability: &Capability) -> &StageState {
        self.capability = Some(capability.clone());
        if self.state == StageState::Running {
            return &self.state;
        }
        if self.config.disabled {
            log::info!("Stage disabled; not mounting");
            self.state = StageState::Disabled;
            return &self.state;
        }
        if let Capability::Unavailable { reason } = capability {
            log::warn!("Showing fallback panel: {reason}");
            self.state = StageState::Fallback(FallbackPanel::new(reason.clone()));
            return &self.state;
        }

        self.clock.reset();
        self.pointer = PointerState::new();
        self.pointer_over_clickable = false;
        let info = self.frame_info();
        self.crystals.initialize(&info);
        self.cursor.get_mut().set_disabled(false);
        self.cursor.initialize(&info);

        self.listeners = LISTENED.iter().map(|kind| host.add_listener(*kind)).collect();
        self.pending_frame = Some(host.request_frame());
        self.state = StageState::Running;
        log::info!(
            "Stage mounted at {}x{} ({} listeners)",
            self.viewport.pixel_width(),
            self.viewport.pixel_height(),
            self.listeners.len()
        );
        &self.state
    }

    /// Run one granted frame: dispatch `events`, advance the clock, update
    /// both systems and request the next frame.
    pub fn frame<H: Host + ?Sized>(&mut self, host: &mut H, events: &[InputEvent]) {
        if !self.is_running() {
            return;
        }
        // the granted callback is spent; drop any stale request
        if let Some(handle) = self.pending_frame.take() {
            host.cancel_frame(handle);
        }

        for event in events {
            self.dispatch(event);
        }

        self.clock.advance();
        let info = self.frame_info();
        self.crystals.update(&info);
        self.cursor.update(&info);
        self.pointer.end_frame();

        self.pending_frame = Some(host.request_frame());
    }

    fn dispatch(&mut self, event: &InputEvent) {
        match event {
            InputEvent::Resize {
                width,
                height,
                device_pixel_ratio,
            } => {
                self.viewport.resize(*width, *height, *device_pixel_ratio);
                log::debug!(
                    "Viewport resized to {}x{}",
                    self.viewport.pixel_width(),
                    self.viewport.pixel_height()
                );
            }
            InputEvent::PointerOver { target } => {
                self.pointer_over_clickable = target.is_interactive();
            }
            InputEvent::PointerLeave => self.pointer_over_clickable = false,
            InputEvent::Key { key: Key::Escape } => {
                // belongs to modal dialogs elsewhere on the page
                return;
            }
            _ => {}
        }
        self.pointer.process(event);

        let info = self.frame_info();
        self.crystals.handle_event(event, &info);
        self.cursor.handle_event(event, &info);
    }

    /// Turn the layer off or back on. Turning it off tears everything down.
    pub fn set_disabled<H: Host + ?Sized>(&mut self, host: &mut H, disabled: bool) {
        if disabled == self.config.disabled {
            return;
        }
        self.config.disabled = disabled;
        if disabled {
            self.teardown(host);
            self.cursor.get_mut().set_disabled(true);
            self.state = StageState::Disabled;
            log::info!("Stage disabled");
        } else if let Some(capability) = self.capability.clone() {
            self.state = StageState::Idle;
            self.mount(host, &capability);
        } else {
            self.state = StageState::Idle;
        }
    }

    /// Detach from `host` and release every resource
    pub fn unmount<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.teardown(host);
        self.state = StageState::Unmounted;
        log::info!("Stage unmounted after {} frames", self.clock.frame);
    }

    fn teardown<H: Host + ?Sized>(&mut self, host: &mut H) {
        for handle in self.listeners.drain(..) {
            host.remove_listener(handle);
        }
        if let Some(handle) = self.pending_frame.take() {
            host.cancel_frame(handle);
        }
        if self.state == StageState::Running {
            self.crystals.release();
            self.cursor.release();
        }
    }

    /// Side effects the embedding page should apply
    pub fn presentation(&self) -> PresentationHints {
        if !self.is_running() {
            return PresentationHints::default();
        }
        let cursor = self.cursor.healthy();
        let crystal_hover = self.crystals.healthy().is_some_and(CrystalSystem::is_hovering);
        PresentationHints {
            hide_host_cursor: cursor.is_some_and(|c| !c.is_disabled() && c.state().visible),
            pointer_cursor: self.pointer_over_clickable
                || crystal_hover
                || cursor.is_some_and(|c| c.state().hovering),
        }
    }

    /// Where crystal `index` appears on screen, in CSS pixels
    pub fn crystal_screen_position(&self, index: usize) -> Option<Vec2> {
        self.crystals
            .healthy()?
            .crystal_screen_position(index, &self.viewport)
    }

    /// Names of systems whose boundary has tripped
    pub fn tripped(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.crystals.is_tripped() {
            names.push("crystals");
        }
        if self.cursor.is_tripped() {
            names.push("cursor");
        }
        names
    }

    /// Clear and paint the current frame
    pub fn paint<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        surface.resize(self.viewport.pixel_width(), self.viewport.pixel_height());
        match &self.state {
            StageState::Fallback(panel) => panel.paint(surface),
            StageState::Running => {
                let cursor_frame = self.cursor.healthy().and_then(CursorSystem::frame);
                let tripped = self.tripped();
                let input = FrameInput {
                    time: self.clock.elapsed,
                    device_pixel_ratio: self.viewport.device_pixel_ratio,
                    crystals: self.crystals.healthy(),
                    cursor: cursor_frame.as_ref(),
                    tripped: &tripped,
                };
                self.painter.paint(surface, &input);
            }
            _ => surface.clear(Color::TRANSPARENT),
        }
    }

    pub fn summary(&self) -> StageSummary {
        let mut crystals = PhaseCounts::default();
        let mut bubbles = 0;
        let mut meshes = 0;
        let mut ambient = 0;
        if let Some(field) = self.crystals.get().field() {
            for crystal in field.crystals() {
                match crystal.phase {
                    CrystalPhase::Forming { .. } => crystals.forming += 1,
                    CrystalPhase::Active => crystals.active += 1,
                    CrystalPhase::Transforming { .. } => crystals.transforming += 1,
                    CrystalPhase::Dormant { .. } => crystals.dormant += 1,
                }
            }
            bubbles = field.live_bubbles();
            meshes = field.geometry().live_count();
        }
        if let Some(pool) = self.crystals.get().ambient() {
            ambient = pool.len();
        }
        let cursor = self.cursor.get().state();
        StageSummary {
            state: self.state.name().to_string(),
            frames: self.clock.frame,
            elapsed: self.clock.elapsed,
            crystals,
            bubbles,
            meshes,
            ambient,
            trail_points: cursor.trail.len(),
            ink_strokes: cursor.ink.strokes().len(),
            tripped: self.tripped().into_iter().map(str::to_string).collect(),
            presentation: self.presentation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_core::Rect;
    use atelier_render::{Canvas, RecordingSurface};
    use atelier_runtime::{HeadlessHost, TargetInfo};

    fn mounted(config: StageConfig) -> (Stage, HeadlessHost) {
        let mut host = HeadlessHost::new();
        let mut stage = Stage::new(config);
        stage.mount(&mut host, &Capability::software());
        (stage, host)
    }

    /// Grant the pending frame and run it with whatever the host queued
    fn step(stage: &mut Stage, host: &mut HeadlessHost) {
        host.take_frame();
        let events = host.drain_events();
        stage.frame(host, &events);
    }

    fn advance(stage: &mut Stage, host: &mut HeadlessHost, frames: usize) {
        for _ in 0..frames {
            step(stage, host);
        }
    }

    /// A crystal whose own centre ray picks it, with that screen position
    fn front_crystal(stage: &Stage) -> (usize, Vec2) {
        let system = stage.crystals().get();
        let field = system.field().unwrap();
        let (w, h) = (
            stage.viewport().css_width.round() as u32,
            stage.viewport().css_height.round() as u32,
        );
        (0..field.crystals().len())
            .find_map(|i| {
                let p = stage.crystal_screen_position(i)?;
                let ray = system.camera().screen_ray(p.x, p.y, w, h);
                (field.pick(&ray) == Some(i)).then_some((i, p))
            })
            .unwrap()
    }

    fn phase(stage: &Stage, index: usize) -> CrystalPhase {
        stage.crystals().get().field().unwrap().crystals()[index].phase
    }

    /// Click crystal `index` at each scripted time (ms), one frame apart or
    /// more, and return after the frame holding the last click.
    fn click_at(stage: &mut Stage, host: &mut HeadlessHost, index: usize, times: &[f64]) {
        for &t in times {
            while stage.clock().elapsed_ms() + 1e-6 < t {
                step(stage, host);
            }
            let p = stage.crystal_screen_position(index).unwrap();
            assert!(host.emit(InputEvent::click(p.x, p.y, t)));
            step(stage, host);
        }
    }

    #[test]
    fn mount_registers_listeners_and_one_frame() {
        let (mut stage, mut host) = mounted(StageConfig::default());
        assert!(stage.is_running());
        assert_eq!(host.active_listeners(), LISTENED.len());
        assert_eq!(host.pending_frames(), 1);
        assert!(!host.is_listening(EventKind::Key));

        advance(&mut stage, &mut host, 10);
        assert_eq!(host.pending_frames(), 1);
        assert_eq!(stage.clock().frame, 10);
    }

    #[test]
    fn disabled_config_mounts_nothing() {
        let config = StageConfig {
            disabled: true,
            ..StageConfig::default()
        };
        let (mut stage, mut host) = mounted(config);
        assert_eq!(stage.state(), &StageState::Disabled);
        assert_eq!(host.active_listeners(), 0);
        assert_eq!(host.pending_frames(), 0);
        step(&mut stage, &mut host);
        assert_eq!(stage.clock().frame, 0);
        assert!(!stage.presentation().hide_host_cursor);
    }

    #[test]
    fn disabling_tears_everything_down() {
        let (mut stage, mut host) = mounted(StageConfig::default());
        advance(&mut stage, &mut host, 5);
        assert_eq!(stage.summary().meshes, 24);

        stage.set_disabled(&mut host, true);
        assert_eq!(host.active_listeners(), 0);
        assert_eq!(host.pending_frames(), 0);
        assert_eq!(stage.summary().meshes, 0);
        assert!(stage.cursor().get().is_disabled());

        stage.set_disabled(&mut host, false);
        assert!(stage.is_running());
        assert_eq!(host.active_listeners(), LISTENED.len());
        assert_eq!(stage.summary().meshes, 24);
    }

    #[test]
    fn unmount_leaves_no_listeners_or_frames() {
        let (mut stage, mut host) = mounted(StageConfig::default());
        host.emit(InputEvent::pointer_move(100.0, 100.0, 0.0));
        advance(&mut stage, &mut host, 30);
        stage.unmount(&mut host);
        assert_eq!(stage.state(), &StageState::Unmounted);
        assert_eq!(host.active_listeners(), 0);
        assert_eq!(host.pending_frames(), 0);
        assert_eq!(stage.summary().meshes, 0);
        assert!(!host.emit(InputEvent::pointer_move(1.0, 1.0, 600.0)));
    }

    #[test]
    fn unavailable_capability_shows_fallback() {
        let mut host = HeadlessHost::new();
        let mut stage = Stage::new(StageConfig::default());
        let state = stage.mount(
            &mut host,
            &Capability::Unavailable {
                reason: "no adapter".to_string(),
            },
        );
        match state {
            StageState::Fallback(panel) => {
                assert_eq!(panel.title, "Experience Unavailable");
                assert_eq!(panel.reason, "no adapter");
            }
            other => panic!("expected fallback, got {other:?}"),
        }
        assert_eq!(host.active_listeners(), 0);
        assert_eq!(host.pending_frames(), 0);

        let mut surface = RecordingSurface::new(1, 1);
        stage.paint(&mut surface);
        assert_eq!(surface.clears, 1);
        assert_eq!(surface.size(), (1280, 720));
    }

    #[test]
    fn three_quick_clicks_transform() {
        let (mut stage, mut host) = mounted(StageConfig::default());
        let (index, _) = front_crystal(&stage);
        click_at(&mut stage, &mut host, index, &[0.0, 300.0, 600.0]);
        assert!(stage.clock().elapsed_ms() >= 601.0);

        assert!(matches!(phase(&stage, index), CrystalPhase::Transforming { .. }));
        let field = stage.crystals().get().field().unwrap();
        let owned = field.crystals()[index].bubbles.len();
        assert!((50..=75).contains(&owned));
        assert_eq!(stage.summary().crystals.transforming, 1);
    }

    #[test]
    fn slow_clicks_do_not_transform() {
        let (mut stage, mut host) = mounted(StageConfig::default());
        let (index, _) = front_crystal(&stage);
        click_at(&mut stage, &mut host, index, &[0.0, 1200.0, 1500.0]);
        assert_eq!(phase(&stage, index), CrystalPhase::Active);
        assert_eq!(stage.crystals().get().field().unwrap().crystals()[index].click_count(), 2);
        assert_eq!(stage.summary().bubbles, 0);
    }

    #[test]
    fn transformed_crystal_respawns_after_delay() {
        let (mut stage, mut host) = mounted(StageConfig::default());
        let (index, _) = front_crystal(&stage);
        let before = stage.crystals().get().field().unwrap().crystals()[index].color_index;
        click_at(&mut stage, &mut host, index, &[0.0, 100.0, 200.0]);

        // transform (4 s) plus respawn delay (6 s) is 625 frames
        advance(&mut stage, &mut host, 615);
        assert!(!phase(&stage, index).is_visible());

        advance(&mut stage, &mut host, 25);
        assert!(matches!(phase(&stage, index), CrystalPhase::Forming { .. }));
        let field = stage.crystals().get().field().unwrap();
        let crystal = &field.crystals()[index];
        assert!(crystal.current_scale > 0.0);
        assert_ne!(crystal.color_index, before);
        assert_eq!(field.geometry().live_count(), 24);
    }

    #[test]
    fn hover_and_link_drive_presentation() {
        let (mut stage, mut host) = mounted(StageConfig::default());
        advance(&mut stage, &mut host, 2);
        let hints = stage.presentation();
        assert!(hints.hide_host_cursor);
        assert!(!hints.pointer_cursor);

        let link = TargetInfo::new("a").with_bounds(Rect::new(10.0, 10.0, 50.0, 20.0));
        host.emit(InputEvent::PointerOver { target: link });
        step(&mut stage, &mut host);
        assert!(stage.presentation().pointer_cursor);

        host.emit(InputEvent::PointerLeave);
        step(&mut stage, &mut host);
        let hints = stage.presentation();
        assert!(!hints.pointer_cursor);
        assert!(!hints.hide_host_cursor);
    }

    #[test]
    fn resize_rederives_pixel_size() {
        let (mut stage, mut host) = mounted(StageConfig::default());
        host.emit(InputEvent::Resize {
            width: 800.0,
            height: 600.0,
            device_pixel_ratio: 3.0,
        });
        step(&mut stage, &mut host);
        assert_eq!(stage.viewport().pixel_width(), 1600);
        assert_eq!(stage.viewport().pixel_height(), 1200);

        let mut surface = RecordingSurface::new(1, 1);
        stage.paint(&mut surface);
        assert_eq!(surface.size(), (1600, 1200));
    }

    #[test]
    fn every_painted_frame_clears_once() {
        let (mut stage, mut host) = mounted(StageConfig::default());
        let mut surface = RecordingSurface::new(1280, 720);
        for _ in 0..5 {
            step(&mut stage, &mut host);
            stage.paint(&mut surface);
        }
        assert_eq!(surface.clears, 5);
        assert!(surface.triangles > 0);
    }

    #[test]
    fn failing_system_is_isolated() {
        let mut config = StageConfig::default();
        config.crystals.transform_duration = 0.0;
        let (mut stage, mut host) = mounted(config);
        assert!(stage.crystals().is_tripped());
        assert!(!stage.cursor().is_tripped());

        host.emit(InputEvent::pointer_move(200.0, 200.0, 0.0));
        advance(&mut stage, &mut host, 3);
        assert!(stage.is_running());
        assert_eq!(stage.tripped(), vec!["crystals"]);
        assert_eq!(stage.summary().tripped, vec!["crystals".to_string()]);
        assert!(stage.crystal_screen_position(0).is_none());

        let mut canvas = Canvas::new(1, 1);
        stage.paint(&mut canvas);
        assert_eq!(canvas.pixel(12, 12), Some(Color::RED));
    }

    #[test]
    fn unmount_releases_geometry_of_tripped_system() {
        let (mut stage, mut host) = mounted(StageConfig::default());
        step(&mut stage, &mut host);
        assert!(stage.summary().meshes > 0);

        stage.crystals.trip("lost context");
        assert_eq!(stage.tripped(), vec!["crystals"]);
        stage.unmount(&mut host);
        let summary = stage.summary();
        assert_eq!(summary.meshes, 0);
        assert_eq!(summary.bubbles, 0);
    }

    #[test]
    fn escape_is_not_consumed() {
        let (mut stage, mut host) = mounted(StageConfig::default());
        assert!(!host.emit(InputEvent::Key { key: Key::Escape }));
        stage.frame(&mut host, &[InputEvent::Key { key: Key::Escape }]);
        assert!(stage.is_running());
    }

    #[test]
    fn summary_serializes() {
        let (mut stage, mut host) = mounted(StageConfig::default());
        advance(&mut stage, &mut host, 3);
        let summary = stage.summary();
        assert_eq!(summary.state, "running");
        assert_eq!(summary.frames, 3);
        assert_eq!(summary.crystals.active, 12);
        assert_eq!(summary.ambient, 25);
    }
}
