//! Zombie AI: FSM, brain, horde и Bevy интеграция.
//!
//! Слои:
//! - `components::fsm`: таблица переходов (чистая функция)
//! - `brain`: один агент (perception → FSM → navigation/screech)
//! - `horde`: владеет агентами и их телами
//! - `world` + `systems`: NonSend resource и FixedUpdate системы

use bevy::prelude::*;

pub mod brain;
pub mod components;
pub mod events;
pub mod horde;
pub mod systems;
pub mod world;

#[cfg(test)]
mod horde_tests;

// Re-export основных типов
pub use brain::{ScreechAudio, Zombie, ZombieDeps};
pub use components::{transition, Stimulus, Transition, ZombieState};
pub use events::{PlayerFired, ZombieHit};
pub use horde::{Horde, ZombieId, ZombieView};
pub use world::{Arena, HordeWorld, PlayerPose};

use crate::config::HordeSettings;

/// Horde Plugin
///
/// Регистрирует horde системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. emit_player_noise_main_thread: выстрелы/шаги → SoundEventBus
/// 2. apply_zombie_hits_main_thread: урон, kill → score
/// 3. tick_horde_main_thread: тела + perception + FSM
/// 4. resolve_player_contact_main_thread: контакт → lose
/// 5. advance_round_main_thread: countdown → win
#[derive(Default)]
pub struct HordePlugin {
    pub settings: HordeSettings,
    pub arena: Arena,
}

impl HordePlugin {
    pub fn new(settings: HordeSettings, arena: Arena) -> Self {
        Self { settings, arena }
    }
}

impl Plugin for HordePlugin {
    fn build(&self, app: &mut App) {
        app.insert_non_send_resource(HordeWorld::new(self.settings.clone(), self.arena.clone()))
            .init_resource::<PlayerPose>()
            .add_event::<PlayerFired>()
            .add_event::<ZombieHit>()
            .add_systems(
                FixedUpdate,
                (
                    systems::emit_player_noise_main_thread,
                    systems::apply_zombie_hits_main_thread,
                    systems::tick_horde_main_thread,
                    systems::resolve_player_contact_main_thread,
                    systems::advance_round_main_thread,
                )
                    .chain(), // Последовательное выполнение для детерминизма
            );
    }
}
