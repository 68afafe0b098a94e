//! Navmesh sampling: snap произвольной точки на ближайшую проходимую
//! в пределах `max_distance`.

use bevy::prelude::*;

pub trait NavMeshSampler {
    /// `None` если в радиусе `max_distance` нет проходимой точки
    fn sample_position(&self, point: Vec3, max_distance: f32) -> Option<Vec3>;
}

/// Любая точка проходима (нет navmesh'а)
#[derive(Debug, Clone, Copy, Default)]
pub struct Unrestricted;

impl NavMeshSampler for Unrestricted {
    fn sample_position(&self, point: Vec3, _max_distance: f32) -> Option<Vec3> {
        Some(point)
    }
}

/// Плоский navmesh: набор прямоугольников в плоскости XZ на высоте `height`
#[derive(Debug, Clone)]
pub struct FlatNavMesh {
    pub height: f32,
    /// Rect в координатах (x, z)
    pub regions: Vec<Rect>,
}

impl FlatNavMesh {
    pub fn new(height: f32) -> Self {
        Self {
            height,
            regions: Vec::new(),
        }
    }

    /// Квадратная арена с центром в (0, 0)
    pub fn square(half_size: f32, height: f32) -> Self {
        Self::new(height).with_region(Rect::new(-half_size, -half_size, half_size, half_size))
    }

    pub fn with_region(mut self, region: Rect) -> Self {
        self.regions.push(region);
        self
    }

    pub fn contains(&self, point: Vec3) -> bool {
        let flat = Vec2::new(point.x, point.z);
        self.regions.iter().any(|r| r.contains(flat))
    }

    fn closest_on_region(&self, region: &Rect, point: Vec3) -> Vec3 {
        Vec3::new(
            point.x.clamp(region.min.x, region.max.x),
            self.height,
            point.z.clamp(region.min.y, region.max.y),
        )
    }
}

impl NavMeshSampler for FlatNavMesh {
    fn sample_position(&self, point: Vec3, max_distance: f32) -> Option<Vec3> {
        self.regions
            .iter()
            .map(|region| self.closest_on_region(region, point))
            .map(|candidate| (candidate.distance(point), candidate))
            .filter(|(distance, _)| *distance <= max_distance)
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, candidate)| candidate)
    }
}
