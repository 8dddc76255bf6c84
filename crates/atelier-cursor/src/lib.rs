//! Atelier Cursor - pointer-follow decoration
//!
//! A spring-smoothed follower disc with a decaying trail, magnetic pull
//! toward links and buttons, themed styling, and (in the watercolor theme)
//! ink strokes drawn while the button is held.

pub mod config;
pub mod ink;
pub mod magnetic;
pub mod ribbon;
pub mod spring;
pub mod theme;
pub mod trail;
pub mod velocity;

use atelier_core::{Color, Result, SeededRng, Vec2};
use atelier_runtime::{FrameInfo, InputEvent, RuntimeSystem};
use serde::Serialize;

pub use config::{CursorConfig, SpringConfig, Theme};
pub use ink::{InkCanvas, InkStroke, StrokePoint};
pub use ribbon::{ribbon, RibbonSegment};
pub use spring::{Spring, Spring2};
pub use theme::{theme_style, ThemeStyle};
pub use trail::{Trail, TrailPoint};
pub use velocity::VelocityTracker;

/// Ring scale while hovering an interactive element
const RING_HOVER_SCALE: f32 = 1.5;

/// A finished stroke ready to paint
#[derive(Debug, Clone, Serialize)]
pub struct StrokeRibbon {
    pub id: u64,
    pub color: Color,
    pub segments: Vec<RibbonSegment>,
    /// Centre line, drawn on top of the ribbon
    pub spine: Vec<Vec2>,
    pub width: f32,
}

/// Everything the painter needs for one cursor frame
#[derive(Debug, Clone, Serialize)]
pub struct CursorFrame {
    pub visible: bool,
    pub hovering: bool,
    pub pressed: bool,
    /// Pointer position after magnetic pull
    pub pointer: Vec2,
    /// Spring-smoothed position of the disc and ring
    pub follower: Vec2,
    pub heading: f32,
    pub speed: f32,
    pub pressure: f32,
    pub size: f32,
    pub ring_size: f32,
    pub scale: f32,
    pub ring_scale: f32,
    pub rotation: f32,
    pub ring_rotation: f32,
    pub opacity: f32,
    pub color: Color,
    pub accent: Color,
    pub style: ThemeStyle,
    pub trail: Vec<TrailPoint>,
    pub strokes: Vec<StrokeRibbon>,
    pub current_stroke: Vec<Vec2>,
}

/// Mutable cursor state, driven by input events and frames
pub struct CursorState {
    pub pointer: Vec2,
    pub follower: Spring2,
    pub scale: Spring,
    pub ring_scale: Spring,
    pub velocity: VelocityTracker,
    pub hovering: bool,
    pub pressed: bool,
    pub visible: bool,
    pub magnetic: Option<Vec2>,
    pub pressure: f32,
    pub trail: Trail,
    pub ink: InkCanvas,
    /// Internal clock, advanced 16 ms per frame
    pub time_ms: f64,
    last_move_ms: Option<f64>,
}

impl CursorState {
    pub fn new(config: &CursorConfig) -> Self {
        let ring_spring = SpringConfig {
            stiffness: 300.0,
            damping: 20.0,
            mass: 1.0,
        };
        Self {
            pointer: Vec2::ZERO,
            follower: Spring2::new(Vec2::ZERO, config.follower),
            scale: Spring::new(1.0, config.scale_spring),
            ring_scale: Spring::new(1.0, ring_spring),
            velocity: VelocityTracker::new(),
            hovering: false,
            pressed: false,
            visible: true,
            magnetic: None,
            pressure: 1.0,
            trail: Trail::new(config.trail_capacity()),
            ink: InkCanvas::new(),
            time_ms: 0.0,
            last_move_ms: None,
        }
    }
}

/// The cursor decoration as a runtime system
pub struct CursorSystem {
    config: CursorConfig,
    color: Color,
    accent: Color,
    state: CursorState,
    rng: SeededRng,
    disabled: bool,
}

impl CursorSystem {
    pub fn new(config: CursorConfig, seed: u32) -> Self {
        let state = CursorState::new(&config);
        Self {
            color: config.primary().unwrap_or_default(),
            accent: config.accent().unwrap_or_default(),
            config,
            state,
            rng: SeededRng::new(seed),
            disabled: false,
        }
    }

    pub fn config(&self) -> &CursorConfig {
        &self.config
    }

    pub fn state(&self) -> &CursorState {
        &self.state
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// A disabled cursor ignores events and frames and paints nothing
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled {
            self.state.trail.clear();
            self.state.ink.clear();
        }
    }

    fn on_move(&mut self, x: f32, y: f32, movement: f32, time_ms: f64) {
        if let Some(last) = self.state.last_move_ms {
            if time_ms - last < self.config.throttle_ms {
                return;
            }
        }
        self.state.last_move_ms = Some(time_ms);

        let state = &mut self.state;
        state.pressure = (movement * 0.1 + 0.3).min(1.0);
        let raw = Vec2::new(x, y);
        let p = magnetic::apply(raw, state.magnetic, self.config.magnetic_strength, state.time_ms);
        state.pointer = p;
        state.velocity.sample(raw, time_ms);
        state.follower.set_target(p);
        state.trail.push(p, movement, state.time_ms, &mut self.rng);

        if self.config.theme.records_ink() && state.pressed {
            state
                .ink
                .add_point(p, state.pressure, state.time_ms, self.config.min_stroke_distance);
        }
    }

    fn on_down(&mut self, x: f32, y: f32) {
        let state = &mut self.state;
        state.pressed = true;
        if self.config.theme.records_ink() {
            let p = magnetic::apply(
                Vec2::new(x, y),
                state.magnetic,
                self.config.magnetic_strength,
                state.time_ms,
            );
            state.ink.begin(p, state.time_ms);
        }
    }

    fn on_up(&mut self) {
        self.state.pressed = false;
        if self.config.theme.records_ink() {
            self.state.ink.complete(self.state.time_ms, &mut self.rng);
        }
    }

    fn scale_target(&self) -> f32 {
        if self.state.pressed {
            self.config.click_scale
        } else if self.state.hovering {
            self.config.hover_scale
        } else {
            1.0
        }
    }

    /// Snapshot for painting. `None` while disabled or outside the window.
    pub fn frame(&self) -> Option<CursorFrame> {
        if self.disabled || !self.state.visible {
            return None;
        }
        let state = &self.state;
        let heading = state.velocity.heading();
        let strokes = state
            .ink
            .strokes()
            .iter()
            .map(|stroke| StrokeRibbon {
                id: stroke.id,
                color: stroke.color,
                segments: ribbon(&stroke.points, 1.0, stroke.age_ms(state.time_ms)),
                spine: stroke.points.iter().map(|p| p.position).collect(),
                width: stroke.points.first().map_or(2.0, |p| (p.pressure * 4.0).max(1.0)),
            })
            .collect();

        Some(CursorFrame {
            visible: state.visible,
            hovering: state.hovering,
            pressed: state.pressed,
            pointer: state.pointer,
            follower: state.follower.value(),
            heading,
            speed: state.velocity.speed(),
            pressure: state.pressure,
            size: self.config.size,
            ring_size: self.config.ring_size,
            scale: state.scale.value.max(0.0),
            ring_scale: state.ring_scale.value.max(0.0),
            rotation: heading * 0.3,
            ring_rotation: heading * 0.5,
            opacity: self.config.opacity,
            color: self.color,
            accent: self.accent,
            style: theme_style(
                self.config.theme,
                state.time_ms,
                heading,
                state.pointer,
                self.color,
                self.accent,
            ),
            trail: state.trail.points().to_vec(),
            strokes,
            current_stroke: state.ink.current().iter().map(|p| p.position).collect(),
        })
    }
}

impl RuntimeSystem for CursorSystem {
    fn initialize(&mut self, frame: &FrameInfo) -> Result<()> {
        self.config.validate()?;
        self.color = self.config.primary()?;
        self.accent = self.config.accent()?;
        self.state = CursorState::new(&self.config);
        let center = Vec2::new(frame.viewport.css_width * 0.5, frame.viewport.css_height * 0.5);
        self.state.pointer = center;
        self.state.follower.snap(center);
        log::info!(
            "cursor ready: theme {}, trail capacity {}",
            self.config.theme,
            self.config.trail_capacity()
        );
        Ok(())
    }

    fn handle_event(&mut self, event: &InputEvent, _frame: &FrameInfo) -> Result<()> {
        if self.disabled {
            return Ok(());
        }
        match event {
            InputEvent::PointerMove {
                x,
                y,
                movement_x,
                movement_y,
                time_ms,
            } => {
                let movement = (movement_x * movement_x + movement_y * movement_y).sqrt();
                self.on_move(*x, *y, movement, *time_ms);
            }
            InputEvent::PointerDown { x, y, .. } => self.on_down(*x, *y),
            InputEvent::PointerUp { .. } => self.on_up(),
            InputEvent::PointerOver { target } => {
                self.state.hovering = target.is_interactive();
                self.state.magnetic = magnetic::magnetic_center(target);
            }
            InputEvent::PointerLeave => {
                self.state.visible = false;
                self.state.hovering = false;
                self.state.magnetic = None;
            }
            InputEvent::PointerEnter => self.state.visible = true,
            InputEvent::Scroll => {
                self.state.trail.clear();
                if self.config.theme.records_ink() {
                    self.state.ink.complete(self.state.time_ms, &mut self.rng);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn update(&mut self, frame: &FrameInfo) -> Result<()> {
        if self.disabled {
            return Ok(());
        }
        let dt = frame.dt;
        self.state.time_ms += dt as f64 * 1000.0;

        let scale_target = self.scale_target();
        let state = &mut self.state;
        state.follower.step(dt);
        state.scale.set_target(scale_target);
        state.scale.step(dt);
        state
            .ring_scale
            .set_target(if state.hovering { RING_HOVER_SCALE } else { 1.0 });
        state.ring_scale.step(dt);
        state.velocity.end_frame();
        state.trail.tick(&mut self.rng);
        state.ink.maybe_prune(
            state.time_ms,
            self.config.stroke_prune_interval_ms,
            self.config.stroke_max_age_ms,
        );
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        self.state.trail.clear();
        self.state.ink.clear();
        log::info!("cursor shut down");
        Ok(())
    }

    fn name(&self) -> &str {
        "cursor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_core::Rect;
    use atelier_runtime::{TargetInfo, Viewport};

    fn info(n: u64) -> FrameInfo {
        FrameInfo::new(n as f64 * 0.016, 0.016, n, Viewport::default())
    }

    fn system(theme: Theme) -> CursorSystem {
        let config = CursorConfig {
            theme,
            ..CursorConfig::default()
        };
        let mut system = CursorSystem::new(config, 9);
        system.initialize(&info(0)).unwrap();
        system
    }

    fn move_to(x: f32, y: f32, time_ms: f64) -> InputEvent {
        InputEvent::PointerMove {
            x,
            y,
            movement_x: 6.0,
            movement_y: 8.0,
            time_ms,
        }
    }

    #[test]
    fn follower_chases_pointer() {
        let mut cursor = system(Theme::Premium);
        cursor.handle_event(&move_to(100.0, 100.0, 0.0), &info(0)).unwrap();
        for n in 1..=60 {
            cursor.update(&info(n)).unwrap();
        }
        let frame = cursor.frame().unwrap();
        assert!(frame.follower.distance(&Vec2::new(100.0, 100.0)) < 0.5);
        assert!((frame.pressure - 1.0).abs() < 1e-6);
    }

    #[test]
    fn moves_inside_throttle_window_are_dropped() {
        let mut cursor = system(Theme::Premium);
        cursor.handle_event(&move_to(10.0, 10.0, 100.0), &info(0)).unwrap();
        cursor.handle_event(&move_to(20.0, 20.0, 105.0), &info(0)).unwrap();
        assert_eq!(cursor.state().pointer, Vec2::new(10.0, 10.0));
        assert_eq!(cursor.state().trail.len(), 1);
        cursor.handle_event(&move_to(30.0, 30.0, 111.0), &info(0)).unwrap();
        assert_eq!(cursor.state().pointer, Vec2::new(30.0, 30.0));
    }

    #[test]
    fn trail_bounded_by_twice_particle_count() {
        let mut cursor = system(Theme::Aurora);
        for n in 0..300u64 {
            let t = n as f64 * 16.0;
            cursor
                .handle_event(&move_to(n as f32, (n as f32 * 0.1).sin() * 50.0, t), &info(n))
                .unwrap();
            cursor.update(&info(n)).unwrap();
            assert!(cursor.state().trail.len() <= 32);
        }
    }

    #[test]
    fn hover_and_click_drive_scale_targets() {
        let mut cursor = system(Theme::Premium);
        let link = TargetInfo::new("a").with_bounds(Rect::new(0.0, 0.0, 40.0, 20.0));
        cursor
            .handle_event(&InputEvent::PointerOver { target: link }, &info(0))
            .unwrap();
        assert!(cursor.state().hovering);
        assert_eq!(cursor.state().magnetic, Some(Vec2::new(20.0, 10.0)));
        for n in 1..=120 {
            cursor.update(&info(n)).unwrap();
        }
        assert!((cursor.frame().unwrap().scale - 2.8).abs() < 0.05);
        assert!((cursor.frame().unwrap().ring_scale - 1.5).abs() < 0.05);

        cursor
            .handle_event(
                &InputEvent::PointerDown {
                    x: 5.0,
                    y: 5.0,
                    button: 0,
                    time_ms: 0.0,
                },
                &info(0),
            )
            .unwrap();
        for n in 121..=240 {
            cursor.update(&info(n)).unwrap();
        }
        assert!((cursor.frame().unwrap().scale - 0.6).abs() < 0.05);
    }

    #[test]
    fn watercolor_records_strokes() {
        let mut cursor = system(Theme::Watercolor);
        cursor
            .handle_event(
                &InputEvent::PointerDown {
                    x: 0.0,
                    y: 0.0,
                    button: 0,
                    time_ms: 0.0,
                },
                &info(0),
            )
            .unwrap();
        for i in 1..30 {
            let x = i as f32 * 2.0;
            cursor.handle_event(&move_to(x, 0.0, i as f64 * 16.0), &info(i)).unwrap();
        }
        cursor
            .handle_event(
                &InputEvent::PointerUp {
                    x: 58.0,
                    y: 0.0,
                    button: 0,
                    time_ms: 500.0,
                },
                &info(30),
            )
            .unwrap();

        let strokes = cursor.state().ink.strokes();
        assert_eq!(strokes.len(), 1);
        for pair in strokes[0].points.windows(2) {
            assert!(pair[0].position.distance(&pair[1].position) >= 3.0);
        }
        let frame = cursor.frame().unwrap();
        assert_eq!(frame.strokes.len(), 1);
        assert!(!frame.strokes[0].segments.is_empty());
        assert!(frame.current_stroke.is_empty());
    }

    #[test]
    fn other_themes_never_record_ink() {
        let mut cursor = system(Theme::Cosmic);
        cursor
            .handle_event(
                &InputEvent::PointerDown {
                    x: 0.0,
                    y: 0.0,
                    button: 0,
                    time_ms: 0.0,
                },
                &info(0),
            )
            .unwrap();
        cursor.handle_event(&move_to(50.0, 0.0, 20.0), &info(1)).unwrap();
        assert!(!cursor.state().ink.is_drawing());
    }

    #[test]
    fn scroll_clears_trail_and_finishes_stroke() {
        let mut cursor = system(Theme::Watercolor);
        cursor
            .handle_event(
                &InputEvent::PointerDown {
                    x: 0.0,
                    y: 0.0,
                    button: 0,
                    time_ms: 0.0,
                },
                &info(0),
            )
            .unwrap();
        cursor.handle_event(&move_to(10.0, 0.0, 20.0), &info(1)).unwrap();
        cursor.handle_event(&InputEvent::Scroll, &info(1)).unwrap();
        assert!(cursor.state().trail.is_empty());
        assert_eq!(cursor.state().ink.strokes().len(), 1);
        assert!(!cursor.state().ink.is_drawing());
    }

    #[test]
    fn leave_hides_and_disable_suppresses() {
        let mut cursor = system(Theme::Watercolor);
        cursor.handle_event(&InputEvent::PointerLeave, &info(0)).unwrap();
        assert!(cursor.frame().is_none());
        cursor.handle_event(&InputEvent::PointerEnter, &info(0)).unwrap();
        assert!(cursor.frame().is_some());

        cursor.set_disabled(true);
        cursor.handle_event(&move_to(200.0, 200.0, 1000.0), &info(1)).unwrap();
        cursor.update(&info(1)).unwrap();
        assert!(cursor.frame().is_none());
        assert!(cursor.state().trail.is_empty());
    }

    #[test]
    fn strokes_pruned_after_thirty_seconds() {
        let mut cursor = system(Theme::Watercolor);
        cursor
            .handle_event(
                &InputEvent::PointerDown {
                    x: 0.0,
                    y: 0.0,
                    button: 0,
                    time_ms: 0.0,
                },
                &info(0),
            )
            .unwrap();
        cursor.handle_event(&move_to(20.0, 0.0, 20.0), &info(0)).unwrap();
        cursor
            .handle_event(
                &InputEvent::PointerUp {
                    x: 20.0,
                    y: 0.0,
                    button: 0,
                    time_ms: 40.0,
                },
                &info(0),
            )
            .unwrap();
        assert_eq!(cursor.state().ink.strokes().len(), 1);
        // 36 s of frames: past the 30 s age plus one prune interval
        for n in 1..=2250 {
            cursor.update(&info(n)).unwrap();
        }
        assert!(cursor.state().ink.strokes().is_empty());
    }
}
