//! Animation sync: тело → "двигается ли" флаг для locomotion анимации.

use bevy::prelude::*;

/// Ниже этой скорости считаем что стоим (м/с)
pub const MOVING_SPEED_THRESHOLD: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locomotion {
    #[default]
    Idle,
    Moving,
}

pub fn is_moving(velocity: Vec3) -> bool {
    velocity.length() > MOVING_SPEED_THRESHOLD
}

pub fn locomotion(velocity: Vec3) -> Locomotion {
    if is_moving(velocity) {
        Locomotion::Moving
    } else {
        Locomotion::Idle
    }
}
