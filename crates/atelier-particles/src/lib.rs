//! Atelier Particles - crystal, bubble and ambient simulation
//!
//! Provides the decorative 3D scene:
//! - Crystals laid out on concentric rings with a full lifecycle
//!   (forming, active, transforming into bubbles, dormant, respawn)
//! - Arena-owned bubbles with buoyancy and spiral wobble
//! - A recycled ambient pool drifting inside a bounded shell
//! - Pointer picking, hover and multi-click interaction
//! - Instance packing for the painter

pub mod ambient;
pub mod arena;
pub mod bubble;
pub mod config;
pub mod crystal;
pub mod field;
pub mod geometry;
pub mod layout;
pub mod palette;
pub mod sync;

use atelier_core::{Camera, Result, SeededRng, Vec2};
use atelier_runtime::{FrameInfo, InputEvent, RuntimeSystem, Viewport};

pub use ambient::{AmbientParticle, AmbientPool, AmbientShape, AmbientVisual};
pub use arena::Arena;
pub use bubble::Bubble;
pub use config::{AmbientConfig, BubbleConfig, CrystalConfig, SceneConfig};
pub use crystal::{ClickOutcome, Crystal, CrystalPhase, PhaseEvent};
pub use field::{CrystalField, HoverChange};
pub use geometry::{Geometry, GeometryHandle, GeometryStore, ShapeKind};
pub use layout::Zone;
pub use sync::{AmbientInstance, BubbleInstance, CrystalDrawCall, CrystalInstance, CrystalSync, DrawLayer};

/// The crystal scene as a runtime system
pub struct CrystalSystem {
    config: SceneConfig,
    seed: u32,
    rng: SeededRng,
    camera: Camera,
    field: Option<CrystalField>,
    ambient: Option<AmbientPool>,
    pub sync: CrystalSync,
}

impl CrystalSystem {
    pub fn new(config: SceneConfig, seed: u32) -> Self {
        Self {
            config,
            seed,
            rng: SeededRng::new(seed),
            camera: Camera::new(),
            field: None,
            ambient: None,
            sync: CrystalSync::new(),
        }
    }

    pub fn field(&self) -> Option<&CrystalField> {
        self.field.as_ref()
    }

    pub fn ambient(&self) -> Option<&AmbientPool> {
        self.ambient.as_ref()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Whether any crystal currently owns the hover
    pub fn is_hovering(&self) -> bool {
        self.field.as_ref().is_some_and(CrystalField::is_hovering)
    }

    /// Screen position (CSS pixels) of a crystal, if it is in front of the camera
    pub fn crystal_screen_position(&self, index: usize, viewport: &Viewport) -> Option<Vec2> {
        let crystal = self.field.as_ref()?.crystal(index)?;
        let (w, h) = css_size(viewport);
        self.camera.project(crystal.position, w, h).map(|p| p.screen)
    }
}

fn css_size(viewport: &Viewport) -> (u32, u32) {
    (
        viewport.css_width.round() as u32,
        viewport.css_height.round() as u32,
    )
}

impl RuntimeSystem for CrystalSystem {
    fn initialize(&mut self, frame: &FrameInfo) -> Result<()> {
        self.config.validate()?;
        self.rng = SeededRng::new(self.seed);
        let (w, h) = css_size(&frame.viewport);
        self.camera.set_viewport(w, h);

        let mut layout_rng = self.rng.fork(1);
        let mut ambient_rng = self.rng.fork(2);
        let field = CrystalField::new(
            self.config.crystals.clone(),
            self.config.bubbles.clone(),
            &mut layout_rng,
        );
        let ambient = AmbientPool::new(self.config.ambient.clone(), &mut ambient_rng);
        log::info!(
            "crystal scene ready: {} crystals, {} ambient shapes, {} meshes",
            field.crystals().len(),
            ambient.len(),
            field.geometry().live_count()
        );
        self.sync.sync(&field, &ambient, frame.time);
        self.field = Some(field);
        self.ambient = Some(ambient);
        Ok(())
    }

    fn handle_event(&mut self, event: &InputEvent, frame: &FrameInfo) -> Result<()> {
        let Some(field) = self.field.as_mut() else {
            return Ok(());
        };
        let (w, h) = css_size(&frame.viewport);
        match event {
            InputEvent::PointerMove { x, y, .. } => {
                let ray = self.camera.screen_ray(*x, *y, w, h);
                let change = field.pointer_ray(&ray);
                if change.changed() {
                    log::trace!("hover {:?} -> {:?}", change.previous, change.current);
                }
            }
            InputEvent::Click { x, y, time_ms } => {
                let ray = self.camera.screen_ray(*x, *y, w, h);
                if let Some((index, outcome)) = field.click_ray(&ray, time_ms / 1000.0, &mut self.rng) {
                    log::debug!("click on crystal {index}: {outcome:?}");
                }
            }
            InputEvent::PointerLeave => {
                field.clear_hover();
            }
            InputEvent::Resize { width, height, .. } => {
                self.camera
                    .set_viewport(width.round() as u32, height.round() as u32);
            }
            _ => {}
        }
        Ok(())
    }

    fn update(&mut self, frame: &FrameInfo) -> Result<()> {
        let (Some(field), Some(ambient)) = (self.field.as_mut(), self.ambient.as_mut()) else {
            return Ok(());
        };
        field.update(frame.time, frame.dt, &mut self.rng)?;
        ambient.update(frame.time, frame.dt, &mut self.rng);
        self.sync.sync(field, ambient, frame.time);
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        if let Some(field) = self.field.as_mut() {
            field.release_all();
            log::info!(
                "crystal scene released ({} meshes left)",
                field.geometry().live_count()
            );
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "crystals"
    }
}
