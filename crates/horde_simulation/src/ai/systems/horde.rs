//! Horde tick + урон по зомби.

use bevy::prelude::*;

use crate::ai::events::ZombieHit;
use crate::ai::world::{HordeWorld, PlayerPose};

/// Система: применяем попадания (kill → despawn + score)
pub fn apply_zombie_hits_main_thread(
    mut world: NonSendMut<HordeWorld>,
    mut hits: EventReader<ZombieHit>,
) {
    if world.is_game_over() {
        hits.clear();
        return;
    }

    for hit in hits.read() {
        match world.horde_mut().damage(hit.zombie, hit.damage) {
            Some(remaining) => crate::log(&format!(
                "Zombie {:?} took {} damage ({} left)",
                hit.zombie, hit.damage, remaining
            )),
            None => crate::log_warning(&format!(
                "ZombieHit for unknown zombie {:?}, ignoring",
                hit.zombie
            )),
        }
    }
}

/// Система: движение тел + perception + FSM всех зомби
pub fn tick_horde_main_thread(
    mut world: NonSendMut<HordeWorld>,
    player: Res<PlayerPose>,
    time: Res<Time<Fixed>>,
) {
    if world.is_game_over() {
        return;
    }

    world.tick(time.delta_secs(), player.target());
}
