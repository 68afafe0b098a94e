//! Hearing: чистая функция distance vs radius + boost.

use bevy::prelude::*;
use crate::sound::SoundEvent;

/// Граница включительная: distance == radius + boost → слышно
pub fn hears_sound(agent_position: Vec3, event: &SoundEvent, hearing_boost: f32) -> bool {
    agent_position.distance(event.position) <= event.radius + hearing_boost
}
