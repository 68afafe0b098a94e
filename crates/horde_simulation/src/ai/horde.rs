//! Horde: владеет зомби (brain + тело), связывает их с шиной и раундом.
//!
//! Тело: `SimulatedNavAgent`, brain видит его через `NavHandle`.
//! Per-tick порядок:
//! 1. шаг ВСЕХ тел + обновление поз (чтобы звуки внутри тика видели свежие позиции)
//! 2. tick brain'ов в порядке спавна

use bevy::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

use crate::ai::brain::{Zombie, ZombieDeps};
use crate::ai::components::ZombieState;
use crate::animation::{locomotion, Locomotion};
use crate::config::ZombieConfig;
use crate::navigation::{NavHandle, NavMeshSampler, SimulatedNavAgent};
use crate::perception::{AgentPose, LineOfSight};
use crate::round::RoundEvents;
use crate::sound::SoundEventBus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ZombieId(pub u32);

/// Read-only snapshot одного зомби (HUD, анимация, snapshot детерминизма)
#[derive(Debug, Clone, PartialEq)]
pub struct ZombieView {
    pub id: ZombieId,
    pub state: ZombieState,
    pub position: Vec3,
    pub forward: Vec3,
    pub velocity: Vec3,
    pub locomotion: Locomotion,
    pub commanded_speed: f32,
    pub health: u32,
}

struct ZombieSlot {
    id: ZombieId,
    brain: Rc<RefCell<Zombie>>,
    body: Rc<RefCell<SimulatedNavAgent>>,
    health: u32,
}

pub struct Horde {
    bus: Rc<SoundEventBus>,
    navmesh: Rc<dyn NavMeshSampler>,
    sight: Rc<dyn LineOfSight>,
    round: Option<Rc<RefCell<dyn RoundEvents>>>,
    zombies: Vec<ZombieSlot>,
    next_id: u32,
}

impl Horde {
    pub fn new(
        bus: Rc<SoundEventBus>,
        navmesh: Rc<dyn NavMeshSampler>,
        sight: Rc<dyn LineOfSight>,
    ) -> Self {
        Self {
            bus,
            navmesh,
            sight,
            round: None,
            zombies: Vec::new(),
            next_id: 0,
        }
    }

    /// Куда сообщать о kill/contact
    pub fn with_round(mut self, round: Rc<RefCell<dyn RoundEvents>>) -> Self {
        self.round = Some(round);
        self
    }

    pub fn bus(&self) -> &Rc<SoundEventBus> {
        &self.bus
    }

    pub fn len(&self) -> usize {
        self.zombies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zombies.is_empty()
    }

    pub fn ids(&self) -> Vec<ZombieId> {
        self.zombies.iter().map(|slot| slot.id).collect()
    }

    /// Создаёт зомби, подписывает на шину. `seed`: его личный RNG.
    pub fn spawn(
        &mut self,
        config: ZombieConfig,
        health: u32,
        position: Vec3,
        forward: Vec3,
        seed: u64,
    ) -> ZombieId {
        let config = match config.validate() {
            Ok(()) => config,
            Err(err) => {
                crate::log_error(&format!("Horde: {}, spawning with default zombie config", err));
                ZombieConfig::default()
            }
        };

        let id = ZombieId(self.next_id);
        self.next_id += 1;

        let body = Rc::new(RefCell::new(SimulatedNavAgent::new(position, forward)));
        let pose = {
            let body = body.borrow();
            AgentPose::new(body.position(), body.forward())
        };

        let navigation: NavHandle = body.clone();
        let deps = ZombieDeps::new(self.bus.clone())
            .with_navigation(navigation)
            .with_navmesh(self.navmesh.clone())
            .with_sight(self.sight.clone());

        let brain = Rc::new(RefCell::new(Zombie::new(config, pose, deps, seed)));
        let listener = Zombie::activate(&brain);

        crate::log(&format!(
            "Zombie {:?} spawned at {:?} (listener {:?}, hp {})",
            id, position, listener, health
        ));

        self.zombies.push(ZombieSlot {
            id,
            brain,
            body,
            health,
        });
        id
    }

    /// Убирает зомби: отписка от шины + остановка навигации
    pub fn despawn(&mut self, id: ZombieId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };

        let slot = self.zombies.remove(index);
        let mut brain = slot.brain.borrow_mut();
        brain.deactivate();
        brain.halt();
        crate::log(&format!("Zombie {:?} despawned", id));
        true
    }

    /// Урон. Возвращает оставшееся здоровье (None: такого зомби нет).
    /// При 0 зомби умирает: despawn + очки раунду.
    pub fn damage(&mut self, id: ZombieId, amount: u32) -> Option<u32> {
        let index = self.index_of(id)?;

        let slot = &mut self.zombies[index];
        slot.health = slot.health.saturating_sub(amount);
        let remaining = slot.health;

        if remaining == 0 {
            crate::log_info(&format!("💀 Zombie {:?} killed", id));
            self.despawn(id);
            if let Some(round) = &self.round {
                round.borrow_mut().add_kill_score();
            }
        }

        Some(remaining)
    }

    pub fn tick(&mut self, delta: f32, player: Option<Vec3>) {
        for slot in &self.zombies {
            let pose = {
                let mut body = slot.body.borrow_mut();
                body.step(delta);
                AgentPose::new(body.position(), body.forward())
            };
            slot.brain.borrow_mut().set_pose(pose);
        }

        for slot in &self.zombies {
            slot.brain.borrow_mut().tick(delta, player);
        }
    }

    /// Зомби в пределах `radius` от игрока
    pub fn touching(&self, player: Vec3, radius: f32) -> Vec<ZombieId> {
        self.zombies
            .iter()
            .filter(|slot| slot.body.borrow().position().distance(player) <= radius)
            .map(|slot| slot.id)
            .collect()
    }

    /// Контакт с игроком → `lose_round`. true если контакт был.
    pub fn resolve_contacts(&self, player: Vec3, radius: f32) -> bool {
        let touching = self.touching(player, radius);
        let Some(first) = touching.first() else {
            return false;
        };

        crate::log_info(&format!("🧟 Zombie {:?} reached the player at {:?}", first, player));
        if let Some(round) = &self.round {
            round.borrow_mut().lose_round();
        }
        true
    }

    pub fn view(&self, id: ZombieId) -> Option<ZombieView> {
        self.index_of(id).map(|index| Self::view_of(&self.zombies[index]))
    }

    pub fn views(&self) -> Vec<ZombieView> {
        self.zombies.iter().map(Self::view_of).collect()
    }

    pub fn brain(&self, id: ZombieId) -> Option<Rc<RefCell<Zombie>>> {
        self.index_of(id).map(|index| self.zombies[index].brain.clone())
    }

    pub fn body(&self, id: ZombieId) -> Option<Rc<RefCell<SimulatedNavAgent>>> {
        self.index_of(id).map(|index| self.zombies[index].body.clone())
    }

    fn index_of(&self, id: ZombieId) -> Option<usize> {
        self.zombies.iter().position(|slot| slot.id == id)
    }

    fn view_of(slot: &ZombieSlot) -> ZombieView {
        let body = slot.body.borrow();
        let brain = slot.brain.borrow();
        ZombieView {
            id: slot.id,
            state: brain.state(),
            position: body.position(),
            forward: body.forward(),
            velocity: body.velocity(),
            locomotion: locomotion(body.velocity()),
            commanded_speed: brain.commanded_speed(),
            health: slot.health,
        }
    }
}
