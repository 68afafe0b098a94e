//! HordeWorld: всё, что живёт на main thread (Rc/RefCell), то есть шина, horde,
//! player noise, раунд. Хранится в Bevy как NonSend resource.

use bevy::prelude::*;
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::ai::horde::{Horde, ZombieId, ZombieView};
use crate::config::HordeSettings;
use crate::navigation::FlatNavMesh;
use crate::perception::ObstacleField;
use crate::round::{RoundEvents, SurvivalRound};
use crate::sound::{NoiseKind, PlayerNoiseEmitter, SoundEventBus};

/// Статическая геометрия уровня (walkable area + vision blockers)
#[derive(Debug, Clone)]
pub struct Arena {
    pub navmesh: FlatNavMesh,
    pub obstacles: ObstacleField,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            navmesh: FlatNavMesh::square(50.0, 0.0),
            obstacles: ObstacleField::new(),
        }
    }
}

/// Игрок глазами симуляции (пишет хост/input layer)
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct PlayerPose {
    pub position: Vec3,
    pub velocity: Vec3,
    pub grounded: bool,
    /// false: игрока нет (не заспавнен / уничтожен)
    pub present: bool,
}

impl Default for PlayerPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            grounded: true,
            present: false,
        }
    }
}

impl PlayerPose {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            present: true,
            ..Default::default()
        }
    }

    pub fn target(&self) -> Option<Vec3> {
        self.present.then_some(self.position)
    }
}

pub struct HordeWorld {
    settings: HordeSettings,
    bus: Rc<SoundEventBus>,
    horde: Horde,
    noise: PlayerNoiseEmitter,
    round: Rc<RefCell<SurvivalRound>>,
}

impl HordeWorld {
    /// Невалидные настройки → log_error + defaults (как при ошибке загрузки файла)
    pub fn new(settings: HordeSettings, arena: Arena) -> Self {
        let settings = match settings.validate() {
            Ok(()) => settings,
            Err(err) => {
                crate::log_error(&format!("HordeWorld: {}, using default settings", err));
                HordeSettings::default()
            }
        };

        let bus = Rc::new(SoundEventBus::new());
        let round = Rc::new(RefCell::new(SurvivalRound::new(settings.round.clone())));
        let round_events: Rc<RefCell<dyn RoundEvents>> = round.clone();

        let horde = Horde::new(bus.clone(), Rc::new(arena.navmesh), Rc::new(arena.obstacles))
            .with_round(round_events);

        Self {
            noise: PlayerNoiseEmitter::new(settings.noise.clone()),
            settings,
            bus,
            horde,
            round,
        }
    }

    pub fn settings(&self) -> &HordeSettings {
        &self.settings
    }

    pub fn bus(&self) -> &Rc<SoundEventBus> {
        &self.bus
    }

    pub fn horde(&self) -> &Horde {
        &self.horde
    }

    pub fn horde_mut(&mut self) -> &mut Horde {
        &mut self.horde
    }

    pub fn round(&self) -> Ref<'_, SurvivalRound> {
        self.round.borrow()
    }

    pub fn round_mut(&self) -> RefMut<'_, SurvivalRound> {
        self.round.borrow_mut()
    }

    pub fn is_game_over(&self) -> bool {
        self.round.borrow().is_game_over()
    }

    /// Зомби с настройками из `settings` (здоровье из round config)
    pub fn spawn_zombie(&mut self, position: Vec3, forward: Vec3, seed: u64) -> ZombieId {
        self.horde.spawn(
            self.settings.zombie.clone(),
            self.settings.round.zombie_health,
            position,
            forward,
            seed,
        )
    }

    pub fn emit_gunshot(&mut self, position: Vec3) -> NoiseKind {
        self.noise.emit_gunshot(&self.bus, position)
    }

    pub fn tick_footsteps(&mut self, delta: f32, player: &PlayerPose) -> Option<NoiseKind> {
        self.noise
            .tick_footsteps(&self.bus, delta, player.position, player.velocity, player.grounded)
    }

    pub fn tick(&mut self, delta: f32, player: Option<Vec3>) {
        self.horde.tick(delta, player);
    }

    pub fn resolve_contacts(&self, player: Vec3) -> bool {
        self.horde
            .resolve_contacts(player, self.settings.round.contact_radius)
    }

    pub fn views(&self) -> Vec<ZombieView> {
        self.horde.views()
    }
}
