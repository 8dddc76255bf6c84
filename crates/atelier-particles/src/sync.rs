//! Per-frame packing of simulation state into renderer-facing instance data

use atelier_core::{Color, Vec3};
use bytemuck::{Pod, Zeroable};
use serde::Serialize;

use crate::ambient::AmbientPool;
use crate::crystal::Crystal;
use crate::field::CrystalField;
use crate::geometry::GeometryHandle;

/// One draw layer of a crystal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawLayer {
    Solid,
    Wireframe,
    Glow,
}

impl DrawLayer {
    pub const ALL: [DrawLayer; 3] = [DrawLayer::Solid, DrawLayer::Wireframe, DrawLayer::Glow];

    fn base_opacity(&self) -> f32 {
        match self {
            DrawLayer::Solid => 0.7,
            DrawLayer::Wireframe => 0.9,
            DrawLayer::Glow => 0.15,
        }
    }

    fn index(&self) -> f32 {
        match self {
            DrawLayer::Solid => 0.0,
            DrawLayer::Wireframe => 1.0,
            DrawLayer::Glow => 2.0,
        }
    }
}

/// Crystal instance data. 80 bytes (5 rows of vec4).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CrystalInstance {
    pub pos_scale: [f32; 4],      // xyz = position, w = scale
    pub color: [f32; 4],          // rgba, a = opacity
    pub rotation_hover: [f32; 4], // xyz = euler rotation, w = hover progress
    pub energy: [f32; 4],         // energy, intensity, elegance, formation
    pub glow: [f32; 4],           // glow, face spread, click feedback, layer
}

/// Bubble instance data. 48 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct BubbleInstance {
    pub pos_size: [f32; 4],
    pub color: [f32; 4],
    pub life: [f32; 4], // life ratio, formation, elegance, unused
}

impl BubbleInstance {
    pub fn from_bubble(b: &crate::Bubble) -> Self {
        Self {
            pos_size: [b.position.x, b.position.y, b.position.z, b.size],
            color: b.color.with_alpha(b.opacity).to_array(),
            life: [b.life_ratio, b.formation_progress, b.elegance, 0.0],
        }
    }
}

/// Ambient instance data. 48 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct AmbientInstance {
    pub pos_scale: [f32; 4],
    pub color: [f32; 4],
    pub rotation_corners: [f32; 4], // xyz = rotation, w = silhouette corners
}

/// A crystal layer ready to draw
#[derive(Clone, Copy, Debug)]
pub struct CrystalDrawCall {
    pub crystal: usize,
    pub layer: DrawLayer,
    pub geometry: GeometryHandle,
    pub instance: CrystalInstance,
}

/// Solid and wireframe colour: colour shift as an HSL offset, then a 30 %
/// blend toward the hover tint.
pub fn surface_color(crystal: &Crystal) -> Color {
    let cs = crystal.color_shift;
    let shifted = crystal.base_color.offset_hsl(cs * 0.2, cs * 0.15, cs * 0.1);
    let tint = crystal.base_color.offset_hsl(0.05, 0.1, 0.15);
    shifted.lerp(&tint, crystal.hover_progress * 0.3)
}

pub fn glow_color(crystal: &Crystal) -> Color {
    crystal.base_color.scaled(1.2).offset_hsl(0.02, 0.1, 0.08)
}

pub fn layer_opacity(crystal: &Crystal, layer: DrawLayer) -> f32 {
    let opacity = match layer {
        DrawLayer::Glow => layer.base_opacity() * crystal.hover_progress * crystal.glow_intensity * 0.8,
        _ => {
            layer.base_opacity()
                * crystal.formation_progress
                * crystal.elegance
                * (1.0 + crystal.hover_progress * 0.4)
                * (1.0 + crystal.click_feedback * 0.3)
        }
    };
    opacity.clamp(0.0, 1.0)
}

#[derive(Clone, Copy, Debug)]
struct Spin {
    generation: u32,
    rotation: Vec3,
}

/// Packs the field and the ambient pool each frame
pub struct CrystalSync {
    spins: Vec<Spin>,
    draw_calls: Vec<CrystalDrawCall>,
    bubbles: Vec<BubbleInstance>,
    ambient: Vec<AmbientInstance>,
}

impl CrystalSync {
    pub fn new() -> Self {
        Self {
            spins: Vec::new(),
            draw_calls: Vec::new(),
            bubbles: Vec::new(),
            ambient: Vec::new(),
        }
    }

    /// Advance rotations and rebuild every instance list
    pub fn sync(&mut self, field: &CrystalField, ambient: &AmbientPool, time: f64) {
        self.draw_calls.clear();
        self.bubbles.clear();
        self.ambient.clear();

        let crystals = field.crystals();
        self.spins.truncate(crystals.len());
        while self.spins.len() < crystals.len() {
            let generation = crystals[self.spins.len()].generation;
            self.spins.push(Spin {
                generation,
                rotation: Vec3::ZERO,
            });
        }

        for (i, crystal) in crystals.iter().enumerate() {
            let spin = &mut self.spins[i];
            if spin.generation != crystal.generation {
                spin.generation = crystal.generation;
                spin.rotation = Vec3::ZERO;
            }
            if !crystal.phase.is_visible() {
                continue;
            }
            spin.rotation += crystal.rotation_speed * (1.0 + crystal.hover_progress * 0.5);
            let rotation = spin.rotation;

            let scale = crystal.current_scale * (1.0 + crystal.click_feedback * 0.2);
            let surface = surface_color(crystal);
            for layer in DrawLayer::ALL {
                let (color, layer_scale, geometry) = match layer {
                    DrawLayer::Solid => (surface, scale, crystal.geometry),
                    DrawLayer::Wireframe => (surface, scale * 1.03, crystal.geometry),
                    DrawLayer::Glow => (glow_color(crystal), scale, crystal.glow_geometry),
                };
                let p = crystal.position;
                let instance = CrystalInstance {
                    pos_scale: [p.x, p.y, p.z, layer_scale],
                    color: color.with_alpha(layer_opacity(crystal, layer)).to_array(),
                    rotation_hover: [rotation.x, rotation.y, rotation.z, crystal.hover_progress],
                    energy: [
                        crystal.energy,
                        crystal.intensity,
                        crystal.elegance,
                        crystal.formation_progress,
                    ],
                    glow: [
                        crystal.glow_intensity,
                        crystal.face_spread,
                        crystal.click_feedback,
                        layer.index(),
                    ],
                };
                self.draw_calls.push(CrystalDrawCall {
                    crystal: i,
                    layer,
                    geometry,
                    instance,
                });
            }
        }

        for crystal in crystals {
            for id in &crystal.bubbles {
                if let Some(bubble) = field.bubbles().get(*id) {
                    self.bubbles.push(BubbleInstance::from_bubble(bubble));
                }
            }
        }

        for p in ambient.particles() {
            let visual = p.visual(time, ambient.config());
            self.ambient.push(AmbientInstance {
                pos_scale: [p.position.x, p.position.y, p.position.z, visual.scale],
                color: visual.color.with_alpha(visual.opacity).to_array(),
                rotation_corners: [p.rotation.x, p.rotation.y, p.rotation.z, p.shape.corners() as f32],
            });
        }
    }

    pub fn draw_calls(&self) -> &[CrystalDrawCall] {
        &self.draw_calls
    }

    pub fn bubble_instances(&self) -> &[BubbleInstance] {
        &self.bubbles
    }

    pub fn ambient_instances(&self) -> &[AmbientInstance] {
        &self.ambient
    }

    /// Drawable-side rotation of a crystal
    pub fn rotation(&self, index: usize) -> Option<Vec3> {
        self.spins.get(index).map(|s| s.rotation)
    }
}

impl Default for CrystalSync {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AmbientConfig, BubbleConfig, CrystalConfig};
    use atelier_core::SeededRng;

    fn scene(seed: u32) -> (CrystalField, AmbientPool, SeededRng) {
        let mut rng = SeededRng::new(seed);
        let field = CrystalField::new(CrystalConfig::default(), BubbleConfig::default(), &mut rng);
        let ambient = AmbientPool::new(AmbientConfig::default(), &mut rng);
        (field, ambient, rng)
    }

    #[test]
    fn instance_layouts() {
        assert_eq!(std::mem::size_of::<CrystalInstance>(), 80);
        assert_eq!(std::mem::size_of::<BubbleInstance>(), 48);
        assert_eq!(std::mem::size_of::<AmbientInstance>(), 48);
        assert_eq!(std::mem::align_of::<CrystalInstance>(), 4);
    }

    #[test]
    fn three_layers_per_visible_crystal() {
        let (field, ambient, _) = scene(1);
        let mut sync = CrystalSync::new();
        sync.sync(&field, &ambient, 0.0);
        assert_eq!(sync.draw_calls().len(), 36);
        assert_eq!(sync.ambient_instances().len(), 25);
        assert!(sync.bubble_instances().is_empty());

        let wire: Vec<_> = sync
            .draw_calls()
            .iter()
            .filter(|c| c.crystal == 0)
            .collect();
        assert_eq!(wire[0].layer, DrawLayer::Solid);
        assert_eq!(wire[1].layer, DrawLayer::Wireframe);
        assert!((wire[1].instance.pos_scale[3] - wire[0].instance.pos_scale[3] * 1.03).abs() < 1e-5);
        assert_eq!(wire[2].geometry, field.crystals()[0].glow_geometry);
        // glow is invisible until hovered
        assert_eq!(wire[2].instance.color[3], 0.0);
    }

    #[test]
    fn dormant_crystal_is_skipped_and_rotation_resets() {
        let (mut field, ambient, mut rng) = scene(2);
        let mut sync = CrystalSync::new();
        sync.sync(&field, &ambient, 0.0);
        sync.sync(&field, &ambient, 0.016);
        assert_ne!(sync.rotation(4), Some(Vec3::ZERO));

        let spawned = field.force_transform(4, &mut rng);
        let mut time = 0.0;
        for _ in 0..260 {
            time += 0.016;
            field.update(time, 0.016, &mut rng).unwrap();
        }
        sync.sync(&field, &ambient, time);
        assert!(!field.crystals()[4].phase.is_visible());
        assert_eq!(sync.draw_calls().len(), 33);
        assert!(sync.bubble_instances().len() <= spawned);
        assert!(!sync.bubble_instances().is_empty());

        for _ in 0..380 {
            time += 0.016;
            field.update(time, 0.016, &mut rng).unwrap();
        }
        assert_eq!(field.crystals()[4].generation, 1);
        sync.sync(&field, &ambient, time);
        let spin = sync.rotation(4).unwrap();
        let speed = field.crystals()[4].rotation_speed;
        assert!((spin - speed).length() < 1e-6);
    }

    #[test]
    fn opacity_stays_in_unit_range() {
        let (mut field, _, mut rng) = scene(3);
        let camera = atelier_core::Camera::new();
        let target = field.crystals()[0].position;
        let ray = atelier_core::Ray::new(camera.position, target - camera.position);
        field.pointer_ray(&ray);
        field.click_ray(&ray, 0.0, &mut rng);
        for crystal in field.crystals() {
            for layer in DrawLayer::ALL {
                let o = layer_opacity(crystal, layer);
                assert!((0.0..=1.0).contains(&o));
            }
        }
    }
}
