//! Line-of-sight (occlusion) query.
//!
//! Внешний коллаборатор: physics engine отвечает "есть ли блокирующая геометрия
//! на отрезке from → to среди слоёв `mask`". Здесь: trait + простая реализация
//! на AABB препятствиях для headless симуляции и тестов.
//!
//! ## Layers (битовая маска):
//! - `LAYER_ACTORS` (0b10): зомби и игрок, взгляд НЕ блокируют по умолчанию
//! - `LAYER_ENVIRONMENT` (0b100): стены, terrain
//! - `LAYER_PROPS` (0b1000): ящики, машины, мебель

use bevy::prelude::*;

pub const LAYER_ACTORS: u32 = 0b10;
pub const LAYER_ENVIRONMENT: u32 = 0b100;
pub const LAYER_PROPS: u32 = 0b1000;

pub trait LineOfSight {
    /// true если что-то из слоёв `mask` пересекает отрезок
    fn is_blocked(&self, from: Vec3, to: Vec3, mask: u32) -> bool;
}

/// Ничего не блокирует (открытое поле / нет physics backend)
#[derive(Debug, Clone, Copy, Default)]
pub struct ClearSight;

impl LineOfSight for ClearSight {
    fn is_blocked(&self, _from: Vec3, _to: Vec3, _mask: u32) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub min: Vec3,
    pub max: Vec3,
    pub layer: u32,
}

impl Obstacle {
    pub fn new(center: Vec3, half_extents: Vec3, layer: u32) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
            layer,
        }
    }

    /// Slab test: отрезок from → to против AABB
    pub fn intersects_segment(&self, from: Vec3, to: Vec3) -> bool {
        let direction = to - from;
        let mut t_enter = 0.0_f32;
        let mut t_exit = 1.0_f32;

        for axis in 0..3 {
            let origin = from[axis];
            let delta = direction[axis];

            if delta.abs() <= f32::EPSILON {
                // Параллельно slab'у: либо внутри, либо мимо
                if origin < self.min[axis] || origin > self.max[axis] {
                    return false;
                }
                continue;
            }

            let inv = 1.0 / delta;
            let mut t0 = (self.min[axis] - origin) * inv;
            let mut t1 = (self.max[axis] - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            t_enter = t_enter.max(t0);
            t_exit = t_exit.min(t1);
            if t_enter > t_exit {
                return false;
            }
        }

        true
    }
}

/// Набор AABB препятствий (стены арены, пропсы)
#[derive(Debug, Clone, Default)]
pub struct ObstacleField {
    pub obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, obstacle: Obstacle) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    pub fn add(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }
}

impl LineOfSight for ObstacleField {
    fn is_blocked(&self, from: Vec3, to: Vec3, mask: u32) -> bool {
        self.obstacles
            .iter()
            .filter(|o| o.layer & mask != 0)
            .any(|o| o.intersects_segment(from, to))
    }
}
