//! Round systems: контакт зомби с игроком, таймер раунда.

use bevy::prelude::*;

use crate::ai::world::{HordeWorld, PlayerPose};

/// Система: зомби дотянулся до игрока → lose_round
pub fn resolve_player_contact_main_thread(world: NonSend<HordeWorld>, player: Res<PlayerPose>) {
    let Some(position) = player.target() else {
        return;
    };
    if world.is_game_over() {
        return;
    }

    world.resolve_contacts(position);
}

/// Система: countdown раунда (после контакта, чтобы смерть в последний тик не стала победой)
pub fn advance_round_main_thread(world: NonSend<HordeWorld>, time: Res<Time<Fixed>>) {
    world.round_mut().tick(time.delta_secs());
}
