//! The crystal field: every crystal, the bubble arena they share, the mesh
//! store and the pointer interaction layer.

use atelier_core::{Ray, Result, SeededRng};

use crate::arena::Arena;
use crate::bubble::Bubble;
use crate::config::{BubbleConfig, CrystalConfig};
use crate::crystal::{ClickOutcome, Crystal, PhaseEvent};
use crate::geometry::GeometryStore;
use crate::layout::ring_positions;

/// Hover owner change produced by a pointer ray
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HoverChange {
    pub previous: Option<usize>,
    pub current: Option<usize>,
}

impl HoverChange {
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }
}

pub struct CrystalField {
    crystals: Vec<Crystal>,
    bubbles: Arena<Bubble>,
    geometry: GeometryStore,
    hovered: Option<usize>,
    config: CrystalConfig,
    bubble_config: BubbleConfig,
}

impl CrystalField {
    /// Lay out `config.count` crystals on the rings
    pub fn new(config: CrystalConfig, bubble_config: BubbleConfig, rng: &mut SeededRng) -> Self {
        let mut geometry = GeometryStore::new();
        let crystals = ring_positions(config.count, rng)
            .into_iter()
            .enumerate()
            .map(|(index, (position, zone))| Crystal::spawn(index, zone, position, rng, &mut geometry))
            .collect();
        Self {
            crystals,
            bubbles: Arena::new(),
            geometry,
            hovered: None,
            config,
            bubble_config,
        }
    }

    pub fn crystals(&self) -> &[Crystal] {
        &self.crystals
    }

    pub fn crystal(&self, index: usize) -> Option<&Crystal> {
        self.crystals.get(index)
    }

    pub fn bubbles(&self) -> &Arena<Bubble> {
        &self.bubbles
    }

    pub fn geometry(&self) -> &GeometryStore {
        &self.geometry
    }

    pub fn config(&self) -> &CrystalConfig {
        &self.config
    }

    /// Step every crystal and its bubbles
    pub fn update(&mut self, time: f64, dt: f32, rng: &mut SeededRng) -> Result<()> {
        for crystal in &mut self.crystals {
            if let PhaseEvent::RespawnDue { overflow } = crystal.update(time, dt, &self.config) {
                crystal.respawn(
                    overflow,
                    &self.config,
                    rng,
                    &mut self.geometry,
                    &mut self.bubbles,
                );
            }

            let anchor = crystal.base_position;
            let bubbles = &mut self.bubbles;
            let bubble_config = &self.bubble_config;
            crystal.bubbles.retain(|&id| {
                let keep = match bubbles.get_mut(id) {
                    Some(bubble) => {
                        bubble.update(time, dt, bubble_config);
                        !bubble.is_expired(anchor, bubble_config)
                    }
                    None => false,
                };
                if !keep {
                    bubbles.remove(id);
                }
                keep
            });
        }

        if let Some(index) = self.hovered {
            if !self.crystals[index].is_active() {
                self.hovered = None;
            }
        }
        Ok(())
    }

    /// Nearest visible crystal whose bounding sphere the ray hits
    pub fn pick(&self, ray: &Ray) -> Option<usize> {
        self.crystals
            .iter()
            .enumerate()
            .filter(|(_, c)| c.phase.is_visible())
            .filter_map(|(i, c)| {
                let radius = self
                    .geometry
                    .get(c.geometry)
                    .map(|g| g.bounding_radius())
                    .unwrap_or(1.0);
                let scale = c.current_scale * (1.0 + c.click_feedback * 0.2);
                ray.intersect_sphere(c.position, radius * scale).map(|t| (i, t))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    /// Move the pointer ray: hover the picked crystal, unhover the old one
    pub fn pointer_ray(&mut self, ray: &Ray) -> HoverChange {
        let hit = self.pick(ray);
        self.set_hover(hit)
    }

    /// Pointer left the scene
    pub fn clear_hover(&mut self) -> HoverChange {
        self.set_hover(None)
    }

    fn set_hover(&mut self, hit: Option<usize>) -> HoverChange {
        let previous = self.hovered;
        if hit == previous {
            return HoverChange {
                previous,
                current: previous,
            };
        }
        if let Some(prev) = previous {
            self.crystals[prev].on_hover(false, &self.config);
        }
        self.hovered = hit.filter(|&i| self.crystals[i].on_hover(true, &self.config));
        HoverChange {
            previous,
            current: self.hovered,
        }
    }

    /// Dispatch a click at `now` seconds to whichever crystal the ray hits
    pub fn click_ray(&mut self, ray: &Ray, now: f64, rng: &mut SeededRng) -> Option<(usize, ClickOutcome)> {
        let index = self.pick(ray)?;
        Some((index, self.click(index, now, rng)))
    }

    /// Click a crystal by index
    pub fn click(&mut self, index: usize, now: f64, rng: &mut SeededRng) -> ClickOutcome {
        match self.crystals.get_mut(index) {
            Some(crystal) => crystal.on_click(now, &self.config, &self.bubble_config, rng, &mut self.bubbles),
            None => ClickOutcome::Ignored,
        }
    }

    /// Put a crystal straight into Transforming. Returns the bubble count.
    pub fn force_transform(&mut self, index: usize, rng: &mut SeededRng) -> usize {
        match self.crystals.get_mut(index) {
            Some(crystal) => {
                crystal.begin_transform(&self.config, &self.bubble_config, rng, &mut self.bubbles)
            }
            None => 0,
        }
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn is_hovering(&self) -> bool {
        self.hovered.is_some()
    }

    pub fn live_bubbles(&self) -> usize {
        self.bubbles.len()
    }

    /// Release every bubble and mesh
    pub fn release_all(&mut self) {
        for crystal in &mut self.crystals {
            crystal.release(&mut self.geometry, &mut self.bubbles);
        }
        self.hovered = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_core::{Camera, Vec3};

    fn field(seed: u32) -> (CrystalField, SeededRng) {
        let mut rng = SeededRng::new(seed);
        let field = CrystalField::new(CrystalConfig::default(), BubbleConfig::default(), &mut rng);
        (field, rng)
    }

    fn ray_at(field: &CrystalField, index: usize) -> Ray {
        let camera = Camera::new();
        let target = field.crystals()[index].position;
        Ray::new(camera.position, target - camera.position)
    }

    #[test]
    fn builds_full_field_with_two_meshes_each() {
        let (field, _) = field(1);
        assert_eq!(field.crystals().len(), 12);
        assert_eq!(field.geometry().live_count(), 24);
        assert!(field.crystals().iter().all(Crystal::is_active));
    }

    #[test]
    fn pick_hits_aimed_crystal_or_one_in_front() {
        let (field, _) = field(2);
        for i in 0..field.crystals().len() {
            let hit = field.pick(&ray_at(&field, i));
            assert!(hit.is_some());
        }
        let away = Ray::new(Vec3::new(0.0, 200.0, 0.0), Vec3::UP);
        assert_eq!(field.pick(&away), None);
    }

    #[test]
    fn hover_owner_follows_pointer() {
        let (mut field, _) = field(3);
        let ray = ray_at(&field, 0);
        let target = field.pick(&ray).unwrap();
        let change = field.pointer_ray(&ray);
        assert!(change.changed());
        assert_eq!(change.current, Some(target));
        assert!(field.crystals()[target].hovered);

        let change = field.clear_hover();
        assert_eq!(change.previous, Some(target));
        assert_eq!(change.current, None);
        assert!(!field.crystals()[target].hovered);
        assert!(!field.is_hovering());
    }

    #[test]
    fn hover_cleared_when_owner_transforms() {
        let (mut field, mut rng) = field(4);
        let ray = ray_at(&field, 5);
        let target = field.pick(&ray).unwrap();
        field.pointer_ray(&ray);
        field.force_transform(target, &mut rng);
        field.update(0.016, 0.016, &mut rng).unwrap();
        assert!(!field.is_hovering());
    }

    #[test]
    fn bubbles_pruned_and_released() {
        let (mut field, mut rng) = field(5);
        let spawned = field.force_transform(0, &mut rng);
        assert!(spawned >= 50);
        assert_eq!(field.live_bubbles(), spawned);

        let mut time = 0.0;
        for _ in 0..100 {
            time += 0.016;
            field.update(time, 0.016, &mut rng).unwrap();
            let crystal = &field.crystals()[0];
            for id in &crystal.bubbles {
                let bubble = field.bubbles().get(*id).unwrap();
                assert!(bubble.life > 0.0);
                assert!(bubble.position.distance(&crystal.base_position) < 100.0);
            }
        }

        field.release_all();
        assert_eq!(field.live_bubbles(), 0);
        assert_eq!(field.geometry().live_count(), 0);
    }

    #[test]
    fn respawn_keeps_two_meshes_per_crystal() {
        let (mut field, mut rng) = field(6);
        let before = field.crystals()[3].color_index;
        field.force_transform(3, &mut rng);
        let mut time = 0.0;
        // transform 4.0 s + respawn 6.0 s + a little
        for _ in 0..((10.1 / 0.016) as usize) {
            time += 0.016;
            field.update(time, 0.016, &mut rng).unwrap();
            assert_eq!(field.geometry().live_count(), 24);
        }
        let crystal = &field.crystals()[3];
        assert!(crystal.phase.is_visible());
        assert!(matches!(crystal.phase, crate::CrystalPhase::Forming { .. }));
        assert!(crystal.current_scale > 0.0);
        assert_ne!(crystal.color_index, before);
        assert_eq!(field.live_bubbles(), 0);
    }
}
