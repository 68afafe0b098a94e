//! Horde Simulation Core
//!
//! Zombie perception + behavior на fixed timestep:
//! Wander / InvestigateSound / Chase / Search, звуковая шина, player noise,
//! survival round.
//!
//! Архитектура:
//! - Ядро (sound, perception, navigation, ai::brain, round): plain Rust,
//!   single-threaded (`Rc`/`RefCell`), без ECS
//! - Bevy 0.16 как host layer: FixedUpdate 60Hz, NonSend `HordeWorld`, events

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod animation;
pub mod config;
pub mod logger;
pub mod navigation;
pub mod perception;
pub mod round;
pub mod sound;

// Re-export базовых типов для удобства
pub use ai::{
    Arena, Horde, HordePlugin, HordeWorld, PlayerFired, PlayerPose, Zombie, ZombieDeps, ZombieHit,
    ZombieId, ZombieState, ZombieView,
};
pub use config::{ConfigError, HordeSettings, NoiseConfig, RoundConfig, ZombieConfig};
pub use logger::{
    init_logger, log, log_error, log_info, log_level, log_warning, log_with_level, set_log_level,
    set_logger, set_logger_if_needed, ConsoleLogger, LogLevel, LogPrinter,
};
pub use round::{format_time, RoundEvents, RoundOutcome, SurvivalRound};
pub use sound::{ListenerId, SoundEvent, SoundEventBus, SoundListener};

/// Главный plugin симуляции (объединяет все подсистемы)
#[derive(Default)]
pub struct SimulationPlugin {
    pub settings: HordeSettings,
    pub arena: Arena,
}

impl SimulationPlugin {
    pub fn new(settings: HordeSettings, arena: Arena) -> Self {
        Self { settings, arena }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Fixed timestep 60Hz для simulation tick
        app.insert_resource(Time::<Fixed>::from_hz(60.0));

        // Seed от create_headless_app не перетираем
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.add_plugins(HordePlugin::new(self.settings.clone(), self.arena.clone()));
    }
}

/// Детерминистичный RNG resource (seeded). Из него берутся seed'ы зомби.
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции.
///
/// Время продвигается ровно на один fixed step за `app.update()`
/// (кроме самого первого update): результат не зависит от wall clock.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();

    let fixed = Time::<Fixed>::from_hz(60.0);
    let step = fixed.timestep();

    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(fixed) // 60Hz FixedUpdate
        .insert_resource(TimeUpdateStrategy::ManualDuration(step));

    app
}

/// Спавнит зомби в `HordeWorld`; его RNG seed берётся из `DeterministicRng`.
pub fn spawn_zombie(app: &mut App, position: Vec3, forward: Vec3) -> ZombieId {
    let seed = {
        let mut rng = app.world_mut().resource_mut::<DeterministicRng>();
        rng.rng.gen::<u64>()
    };

    app.world_mut()
        .non_send_resource_mut::<HordeWorld>()
        .spawn_zombie(position, forward, seed)
}

/// Snapshot horde для сравнения детерминизма
/// (зомби в порядке спавна + состояние раунда, через Debug)
pub fn horde_snapshot(world: &World) -> Vec<u8> {
    let horde = world.non_send_resource::<HordeWorld>();
    let mut snapshot = Vec::new();

    for view in horde.views() {
        snapshot.extend_from_slice(&view.id.0.to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", view).as_bytes());
    }

    let round = horde.round();
    snapshot.extend_from_slice(
        format!("{:?}|{}|{:?}", round.outcome(), round.score(), round.time_left()).as_bytes(),
    );

    snapshot
}
