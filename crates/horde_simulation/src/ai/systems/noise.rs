//! Player noise → SoundEventBus (выстрелы из events, шаги из PlayerPose).

use bevy::prelude::*;

use crate::ai::events::PlayerFired;
use crate::ai::world::{HordeWorld, PlayerPose};

/// Система: gunshots + footsteps.
///
/// Идёт ПЕРВОЙ в цепочке: звуки этого тика доставляются до tick зомби.
pub fn emit_player_noise_main_thread(
    mut world: NonSendMut<HordeWorld>,
    player: Res<PlayerPose>,
    mut fired: EventReader<PlayerFired>,
    time: Res<Time<Fixed>>,
) {
    if world.is_game_over() || !player.present {
        fired.clear();
        return;
    }

    for shot in fired.read() {
        world.emit_gunshot(shot.position);
        crate::log(&format!("🔫 Gunshot noise at {:?}", shot.position));
    }

    world.tick_footsteps(time.delta_secs(), &player);
}
