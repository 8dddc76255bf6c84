//! Paints one frame of the decorative layer onto a `Surface`
//!
//! The 3D scene is drawn with the painter's algorithm: every visible face
//! of every crystal layer is projected, shaded, fogged and sorted far to
//! near. Bubbles and ambient shapes are billboards. The cursor layer is
//! drawn last in screen space.

use std::f32::consts::TAU;

use atelier_core::{Camera, Color, Vec2, Vec3};
use atelier_cursor::CursorFrame;
use atelier_particles::{CrystalSystem, DrawLayer};
use serde::{Deserialize, Serialize};

use crate::lighting::LightingRig;
use crate::surface::{BlendMode, Surface};

/// Linear distance fog
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fog {
    pub color: u32,
    pub near: f32,
    pub far: f32,
}

impl Default for Fog {
    fn default() -> Self {
        Self {
            color: 0x0a0a1a,
            near: 50.0,
            far: 140.0,
        }
    }
}

impl Fog {
    pub fn factor(&self, depth: f32) -> f32 {
        if self.far <= self.near {
            return 0.0;
        }
        ((depth - self.near) / (self.far - self.near)).clamp(0.0, 1.0)
    }

    pub fn apply(&self, color: Color, depth: f32) -> Color {
        let fogged = color.lerp(&Color::from_hex(self.color), self.factor(depth));
        fogged.with_alpha(color.a)
    }
}

/// Everything that goes into one painted frame
pub struct FrameInput<'a> {
    /// Scene time in seconds
    pub time: f64,
    pub device_pixel_ratio: f32,
    pub crystals: Option<&'a CrystalSystem>,
    pub cursor: Option<&'a CursorFrame>,
    /// Names of systems whose boundary has tripped
    pub tripped: &'a [&'a str],
}

/// A projected face waiting to be sorted
struct Face {
    points: [Vec2; 3],
    depth: f32,
    color: Color,
    blend: BlendMode,
}

pub struct Painter {
    pub fog: Fog,
    lighting: LightingRig,
    faces: Vec<Face>,
}

impl Painter {
    pub fn new(fog: Fog) -> Self {
        Self {
            fog,
            lighting: LightingRig::new(),
            faces: Vec::new(),
        }
    }

    pub fn lighting(&self) -> &LightingRig {
        &self.lighting
    }

    /// Clear and redraw everything
    pub fn paint<S: Surface + ?Sized>(&mut self, surface: &mut S, input: &FrameInput) {
        surface.clear(Color::from_hex(self.fog.color));
        self.lighting.update(input.time);

        if let Some(system) = input.crystals {
            self.paint_scene(surface, system);
        }
        if let Some(cursor) = input.cursor {
            paint_cursor(surface, cursor, input.device_pixel_ratio.max(1.0));
        }
        for (i, _) in input.tripped.iter().enumerate() {
            let offset = 8.0 + i as f32 * 14.0;
            surface.fill_rect(
                Vec2::new(offset, 8.0),
                Vec2::new(offset + 10.0, 18.0),
                Color::RED,
                BlendMode::Alpha,
            );
        }
    }

    fn paint_scene<S: Surface + ?Sized>(&mut self, surface: &mut S, system: &CrystalSystem) {
        let Some(field) = system.field() else {
            return;
        };
        let camera = system.camera();
        let (w, h) = surface.size();
        self.faces.clear();

        for call in system.sync.draw_calls() {
            let Some(geometry) = field.geometry().get(call.geometry) else {
                log::warn!("Draw call for crystal {} has a released geometry", call.crystal);
                continue;
            };
            let inst = &call.instance;
            let alpha = inst.color[3];
            if alpha <= 0.0 {
                continue;
            }
            let origin = Vec3::new(inst.pos_scale[0], inst.pos_scale[1], inst.pos_scale[2]);
            let scale = inst.pos_scale[3];
            let rotation = Vec3::new(inst.rotation_hover[0], inst.rotation_hover[1], inst.rotation_hover[2]);
            let base = Color::new(inst.color[0], inst.color[1], inst.color[2], alpha);

            for (tri, normal) in geometry.triangles() {
                let world = tri.map(|v| rotate_euler(v, rotation) * scale + origin);
                let normal = rotate_euler(normal, rotation);
                let centroid = (world[0] + world[1] + world[2]) * (1.0 / 3.0);
                // cull faces pointing away, except the additive shell
                if call.layer != DrawLayer::Glow && normal.dot(&(camera.position - centroid)) <= 0.0 {
                    continue;
                }
                let Some(points) = project_triangle(camera, world, w, h) else {
                    continue;
                };
                let depth = centroid.distance(&camera.position);

                match call.layer {
                    DrawLayer::Solid => self.faces.push(Face {
                        points,
                        depth,
                        color: self.fog.apply(self.lighting.shade(normal, centroid, base), depth),
                        blend: BlendMode::Alpha,
                    }),
                    DrawLayer::Glow => self.faces.push(Face {
                        points,
                        depth,
                        color: self.fog.apply(base, depth),
                        blend: BlendMode::Additive,
                    }),
                    DrawLayer::Wireframe => {
                        let color = self.fog.apply(base, depth);
                        for k in 0..3 {
                            let (a, b) = (points[k], points[(k + 1) % 3]);
                            for pair in line_quad(a, b, 0.5) {
                                self.faces.push(Face {
                                    points: pair,
                                    depth,
                                    color,
                                    blend: BlendMode::Alpha,
                                });
                            }
                        }
                    }
                }
            }
        }

        for bubble in system.sync.bubble_instances() {
            let center = Vec3::new(bubble.pos_size[0], bubble.pos_size[1], bubble.pos_size[2]);
            let Some(p) = camera.project(center, w, h) else {
                continue;
            };
            let color = Color::new(bubble.color[0], bubble.color[1], bubble.color[2], bubble.color[3]);
            let radius = bubble.pos_size[3] * p.pixels_per_unit;
            self.push_disc(p.screen, radius, p.depth, self.fog.apply(color, p.depth), BlendMode::Alpha);
            // specular highlight
            let highlight = Vec2::new(p.screen.x - radius * 0.35, p.screen.y - radius * 0.35);
            self.push_disc(
                highlight,
                radius * 0.25,
                p.depth - 0.01,
                Color::WHITE.with_alpha(color.a * 0.6),
                BlendMode::Additive,
            );
        }

        for ambient in system.sync.ambient_instances() {
            let center = Vec3::new(ambient.pos_scale[0], ambient.pos_scale[1], ambient.pos_scale[2]);
            let Some(p) = camera.project(center, w, h) else {
                continue;
            };
            let radius = ambient.pos_scale[3] * p.pixels_per_unit;
            let color = Color::new(ambient.color[0], ambient.color[1], ambient.color[2], ambient.color[3]);
            let corners = ambient.rotation_corners[3] as u32;
            let spin = ambient.rotation_corners[2];
            let color = self.fog.apply(color, p.depth);
            for points in polygon(p.screen, radius, corners, spin) {
                self.faces.push(Face {
                    points,
                    depth: p.depth,
                    color,
                    blend: BlendMode::Additive,
                });
            }
        }

        self.faces
            .sort_by(|a, b| b.depth.partial_cmp(&a.depth).unwrap_or(std::cmp::Ordering::Equal));
        for face in self.faces.drain(..) {
            surface.fill_triangle(face.points, face.color, face.blend);
        }
    }

    fn push_disc(&mut self, center: Vec2, radius: f32, depth: f32, color: Color, blend: BlendMode) {
        for points in polygon(center, radius, 16, 0.0) {
            self.faces.push(Face {
                points,
                depth,
                color,
                blend,
            });
        }
    }
}

impl Default for Painter {
    fn default() -> Self {
        Self::new(Fog::default())
    }
}

fn paint_cursor<S: Surface + ?Sized>(surface: &mut S, frame: &CursorFrame, dpr: f32) {
    let px = |p: Vec2| p * dpr;

    for stroke in &frame.strokes {
        for segment in &stroke.segments {
            surface.fill_quad(
                segment.quad.map(px),
                stroke.color.with_alpha(segment.opacity),
                BlendMode::Alpha,
            );
        }
        for pair in stroke.spine.windows(2) {
            for points in line_quad(px(pair[0]), px(pair[1]), stroke.width * 0.5 * dpr) {
                surface.fill_triangle(points, stroke.color.with_alpha(0.4), BlendMode::Alpha);
            }
        }
    }
    for pair in frame.current_stroke.windows(2) {
        for points in line_quad(px(pair[0]), px(pair[1]), dpr) {
            surface.fill_triangle(points, frame.color.with_alpha(0.6), BlendMode::Alpha);
        }
    }

    if !frame.visible {
        return;
    }

    for point in &frame.trail {
        let radius = point.size * 0.5 * dpr;
        let outer = Color::from_hsl((240.0 + point.hue) / 360.0, 0.8, 0.7);
        let inner = Color::from_hsl((220.0 + point.hue) / 360.0, 0.7, 0.6);
        surface.fill_disc(
            px(point.position),
            radius,
            radius * 0.5,
            outer.with_alpha(point.life * 0.2 * frame.opacity),
            BlendMode::Additive,
        );
        surface.fill_disc(
            px(point.position),
            radius * 0.5,
            dpr,
            inner.with_alpha(point.life * 0.4 * frame.opacity),
            BlendMode::Additive,
        );
    }

    let center = px(frame.follower);
    let ring_radius = frame.ring_size * 0.5 * frame.ring_scale * dpr;
    let ring_width = 1.5 * dpr;
    for points in ring(center, ring_radius, ring_width, 32, frame.ring_rotation.to_radians()) {
        surface.fill_triangle(points, frame.accent.with_alpha(frame.opacity * 0.8), BlendMode::Alpha);
    }

    let style = &frame.style;
    let radius = frame.size * 0.5 * frame.scale * style.scale * dpr;
    if style.glow_radius > 0.0 {
        surface.fill_disc(
            center,
            radius,
            style.glow_radius * 0.5 * dpr,
            style.glow_color.with_alpha(style.glow_color.a * frame.opacity),
            BlendMode::Additive,
        );
    }
    // gradient stops as concentric discs, outer first
    for (k, stop) in style.colors.iter().enumerate().rev() {
        let r = radius * (1.0 - k as f32 * 0.3);
        surface.fill_disc(
            center,
            r,
            style.blur * dpr,
            stop.with_alpha(stop.a * frame.opacity),
            BlendMode::Alpha,
        );
    }
}

/// XYZ-order Euler rotation
fn rotate_euler(v: Vec3, r: Vec3) -> Vec3 {
    let (sz, cz) = r.z.sin_cos();
    let v = Vec3::new(v.x * cz - v.y * sz, v.x * sz + v.y * cz, v.z);
    let (sy, cy) = r.y.sin_cos();
    let v = Vec3::new(v.x * cy + v.z * sy, v.y, -v.x * sy + v.z * cy);
    let (sx, cx) = r.x.sin_cos();
    Vec3::new(v.x, v.y * cx - v.z * sx, v.y * sx + v.z * cx)
}

fn project_triangle(camera: &Camera, world: [Vec3; 3], w: u32, h: u32) -> Option<[Vec2; 3]> {
    let a = camera.project(world[0], w, h)?;
    let b = camera.project(world[1], w, h)?;
    let c = camera.project(world[2], w, h)?;
    Some([a.screen, b.screen, c.screen])
}

/// Two triangles covering a segment `half_width` px to each side
fn line_quad(a: Vec2, b: Vec2, half_width: f32) -> Vec<[Vec2; 3]> {
    let d = b - a;
    let len = d.length();
    if len <= 0.0 {
        return Vec::new();
    }
    let n = Vec2::new(-d.y / len, d.x / len) * half_width;
    vec![[a + n, b + n, b - n], [a + n, b - n, a - n]]
}

/// Triangle fan for a regular polygon
fn polygon(center: Vec2, radius: f32, corners: u32, spin: f32) -> Vec<[Vec2; 3]> {
    if radius <= 0.0 || corners < 3 {
        return Vec::new();
    }
    let corner = |k: u32| {
        let a = spin + k as f32 / corners as f32 * TAU;
        center + Vec2::new(a.cos() * radius, a.sin() * radius)
    };
    (0..corners).map(|k| [center, corner(k), corner(k + 1)]).collect()
}

/// Triangle strip for an annulus
fn ring(center: Vec2, radius: f32, width: f32, segments: u32, spin: f32) -> Vec<[Vec2; 3]> {
    if radius <= 0.0 {
        return Vec::new();
    }
    let inner = (radius - width * 0.5).max(0.0);
    let outer = radius + width * 0.5;
    let at = |k: u32, r: f32| {
        let a = spin + k as f32 / segments as f32 * TAU;
        center + Vec2::new(a.cos() * r, a.sin() * r)
    };
    (0..segments)
        .flat_map(|k| {
            [
                [at(k, inner), at(k, outer), at(k + 1, outer)],
                [at(k, inner), at(k + 1, outer), at(k + 1, inner)],
            ]
        })
        .collect()
}
