//! AI Events: что input/combat layer сообщает horde.

use bevy::prelude::*;

use crate::ai::horde::ZombieId;

/// Игрок выстрелил (каждый выстрел → gunshot noise)
#[derive(Event, Debug, Clone, Copy)]
pub struct PlayerFired {
    /// Откуда выстрел (позиция игрока/дула)
    pub position: Vec3,
}

/// Пуля попала в зомби
#[derive(Event, Debug, Clone, Copy)]
pub struct ZombieHit {
    pub zombie: ZombieId,
    pub damage: u32,
}
