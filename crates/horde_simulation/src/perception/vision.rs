//! Vision: range → cone → occlusion.
//!
//! Дешёвые проверки (дистанция, угол) до LOS луча.
//! Дистанция и угол: в горизонтальной плоскости (Y отбрасываем).

use bevy::prelude::*;
use crate::config::ZombieConfig;
use super::occlusion::LineOfSight;

/// Float-шум на границе конуса: угол == half-angle должен проходить
const ANGLE_EPSILON_DEG: f32 = 1e-4;

/// Позиция + направление взгляда агента
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentPose {
    pub position: Vec3,
    pub forward: Vec3,
}

impl AgentPose {
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self { position, forward }
    }
}

impl Default for AgentPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            forward: Vec3::Z,
        }
    }
}

/// Угол между векторами в градусах (0 если один из них нулевой)
pub fn angle_between_deg(a: Vec3, b: Vec3) -> f32 {
    let denominator = a.length() * b.length();
    if denominator <= f32::EPSILON {
        return 0.0;
    }
    let cos = (a.dot(b) / denominator).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

pub fn can_see_player(
    pose: &AgentPose,
    player_position: Vec3,
    config: &ZombieConfig,
    sight: &dyn LineOfSight,
) -> bool {
    let mut to_player = player_position - pose.position;
    to_player.y = 0.0;

    let distance = to_player.length();
    if distance > config.vision_radius {
        return false;
    }

    let angle = angle_between_deg(pose.forward, to_player.normalize_or_zero());
    if angle > config.vision_angle * 0.5 + ANGLE_EPSILON_DEG {
        return false;
    }

    let origin = pose.position + Vec3::Y * config.eye_height;
    let target = player_position + Vec3::Y * config.target_eye_height;

    !sight.is_blocked(origin, target, config.vision_blockers)
}
