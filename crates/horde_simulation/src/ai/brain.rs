//! Zombie brain: perception → FSM → navigation/speed/screech.
//!
//! Per-tick порядок:
//! 1. screech cooldown
//! 2. vision → `PlayerSpotted` (last known position обновляется)
//! 3. tick текущего состояния (с учётом только что сменённого state)
//!
//! Звуки приходят асинхронно через `SoundEventBus` (`SoundListener` для
//! `RefCell<Zombie>`), переход в InvestigateSound: сразу внутри `emit`.
//!
//! Re-entrancy policy:
//! - Свой screech агент не слышит: шина пропускает `source` подписчика
//! - Доставка агенту, который прямо сейчас внутри своего tick (RefCell занят),
//!   отбрасывается с warning

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::ai::components::{transition, Stimulus, Transition, ZombieState};
use crate::config::ZombieConfig;
use crate::navigation::{random_ground_point, reached_destination, NavHandle, NavMeshSampler, Unrestricted};
use crate::perception::{can_see_player, hears_sound, AgentPose, ClearSight, LineOfSight};
use crate::sound::{ListenerId, SoundEvent, SoundEventBus, SoundListener};

/// Audio playback для screech (pitch уже рандомизирован)
pub trait ScreechAudio {
    fn play_screech(&mut self, pitch: f32);
}

/// Коллабораторы агента: передаются явно при создании
pub struct ZombieDeps {
    pub bus: Rc<SoundEventBus>,
    pub navigation: Option<NavHandle>,
    pub navmesh: Rc<dyn NavMeshSampler>,
    pub sight: Rc<dyn LineOfSight>,
    pub audio: Option<Box<dyn ScreechAudio>>,
}

impl ZombieDeps {
    /// Без навигации, без препятствий, без звука
    pub fn new(bus: Rc<SoundEventBus>) -> Self {
        Self {
            bus,
            navigation: None,
            navmesh: Rc::new(Unrestricted),
            sight: Rc::new(ClearSight),
            audio: None,
        }
    }

    pub fn with_navigation(mut self, navigation: NavHandle) -> Self {
        self.navigation = Some(navigation);
        self
    }

    pub fn with_navmesh(mut self, navmesh: Rc<dyn NavMeshSampler>) -> Self {
        self.navmesh = navmesh;
        self
    }

    pub fn with_sight(mut self, sight: Rc<dyn LineOfSight>) -> Self {
        self.sight = sight;
        self
    }

    pub fn with_audio(mut self, audio: Box<dyn ScreechAudio>) -> Self {
        self.audio = Some(audio);
        self
    }
}

pub struct Zombie {
    config: ZombieConfig,
    bus: Rc<SoundEventBus>,
    navigation: Option<NavHandle>,
    navmesh: Rc<dyn NavMeshSampler>,
    sight: Rc<dyn LineOfSight>,
    audio: Option<Box<dyn ScreechAudio>>,
    rng: ChaCha8Rng,
    listener: Option<ListenerId>,

    pose: AgentPose,
    state: ZombieState,
    /// Фиксируется при создании
    spawn_point: Vec3,

    last_sound_pos: Vec3,
    has_sound_target: bool,
    last_known_player_pos: Vec3,

    search_timer: f32,
    wander_timer: f32,
    screech_timer: f32,
    screech_used_this_chase: bool,

    commanded_speed: f32,
    destination: Option<Vec3>,
}

impl Zombie {
    /// Создаёт агента в Wander и сразу выбирает wander точку.
    /// На шину НЕ подписывается: см. `activate`.
    pub fn new(config: ZombieConfig, pose: AgentPose, deps: ZombieDeps, seed: u64) -> Self {
        let mut zombie = Self {
            config,
            bus: deps.bus,
            navigation: deps.navigation,
            navmesh: deps.navmesh,
            sight: deps.sight,
            audio: deps.audio,
            rng: ChaCha8Rng::seed_from_u64(seed),
            listener: None,
            pose,
            state: ZombieState::Wander,
            spawn_point: pose.position,
            last_sound_pos: Vec3::ZERO,
            has_sound_target: false,
            last_known_player_pos: pose.position,
            search_timer: 0.0,
            wander_timer: 0.0,
            screech_timer: 0.0,
            screech_used_this_chase: false,
            commanded_speed: 0.0,
            destination: None,
        };
        zombie.enter(ZombieState::Wander);
        zombie
    }

    /// Подписка на шину (agent activation). Повторный вызов: no-op.
    pub fn activate(handle: &Rc<RefCell<Zombie>>) -> ListenerId {
        if let Some(id) = handle.borrow().listener {
            return id;
        }

        let weak: Weak<dyn SoundListener> = Rc::downgrade(handle) as Weak<dyn SoundListener>;
        let bus = handle.borrow().bus.clone();
        let id = bus.subscribe(weak);
        handle.borrow_mut().listener = Some(id);
        id
    }

    /// Отписка (agent deactivation). После неё звуки не доставляются.
    pub fn deactivate(&mut self) {
        if let Some(id) = self.listener.take() {
            self.bus.unsubscribe(id);
        }
    }

    pub fn is_active(&self) -> bool {
        self.listener.is_some()
    }

    pub fn listener_id(&self) -> Option<ListenerId> {
        self.listener
    }

    pub fn config(&self) -> &ZombieConfig {
        &self.config
    }

    pub fn state(&self) -> ZombieState {
        self.state
    }

    pub fn pose(&self) -> AgentPose {
        self.pose
    }

    /// Хост обновляет позу после шага физики/навигации
    pub fn set_pose(&mut self, pose: AgentPose) {
        self.pose = pose;
    }

    pub fn spawn_point(&self) -> Vec3 {
        self.spawn_point
    }

    pub fn has_sound_target(&self) -> bool {
        self.has_sound_target
    }

    pub fn last_sound_pos(&self) -> Vec3 {
        self.last_sound_pos
    }

    pub fn last_known_player_pos(&self) -> Vec3 {
        self.last_known_player_pos
    }

    pub fn search_timer(&self) -> f32 {
        self.search_timer
    }

    pub fn wander_timer(&self) -> f32 {
        self.wander_timer
    }

    pub fn screech_timer(&self) -> f32 {
        self.screech_timer
    }

    pub fn screech_used_this_chase(&self) -> bool {
        self.screech_used_this_chase
    }

    /// Последняя скорость, выданная навигации (для animation sync)
    pub fn commanded_speed(&self) -> f32 {
        self.commanded_speed
    }

    /// Последняя destination, выданная навигации
    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    pub fn can_see(&self, player_position: Vec3) -> bool {
        can_see_player(&self.pose, player_position, &self.config, self.sight.as_ref())
    }

    /// Один кадр. `player == None`: игрока нет в мире.
    pub fn tick(&mut self, delta: f32, player: Option<Vec3>) {
        if self.screech_timer > 0.0 {
            self.screech_timer -= delta;
        }

        let sees_player = match player {
            Some(position) if self.can_see(position) => {
                self.last_known_player_pos = position;
                self.apply(Stimulus::PlayerSpotted);
                true
            }
            _ => false,
        };

        match self.state {
            ZombieState::Wander => {
                self.tick_wander(delta);
                if self.has_sound_target && !sees_player {
                    self.apply(Stimulus::SoundPending);
                }
            }

            ZombieState::InvestigateSound => {
                self.tick_investigate();
                if !sees_player && self.reached(self.config.investigate_point_tolerance) {
                    // Звук отработан: иначе Search сразу вернёт нас сюда же
                    self.has_sound_target = false;
                    self.apply(Stimulus::SoundReached);
                }
            }

            ZombieState::Chase => {
                match player {
                    Some(position) => self.tick_chase(position),
                    None => crate::log_warning(&format!(
                        "Zombie {:?}: Chase without a player, falling back to Search",
                        self.listener
                    )),
                }
                if !sees_player {
                    self.apply(Stimulus::PlayerLost);
                }
            }

            ZombieState::Search => {
                self.tick_search(delta);
                if self.has_sound_target && !sees_player {
                    self.apply(Stimulus::SoundPending);
                }
            }
        }
    }

    /// Реакция на звук с шины. true если звук сменил состояние.
    pub fn hear(&mut self, event: &SoundEvent) -> bool {
        if !hears_sound(self.pose.position, event, self.config.hearing_boost) {
            return false;
        }

        match transition(self.state, Stimulus::SoundHeard) {
            Transition::Enter(next) => {
                crate::log(&format!(
                    "🔊 Zombie {:?} heard sound at {:?} (radius {:.1}, distance {:.1})",
                    self.listener,
                    event.position,
                    event.radius,
                    self.pose.position.distance(event.position)
                ));
                self.last_sound_pos = event.position;
                self.has_sound_target = true;
                self.enter(next);
                true
            }
            Transition::Repick | Transition::Stay => false,
        }
    }

    fn apply(&mut self, stimulus: Stimulus) {
        match transition(self.state, stimulus) {
            Transition::Enter(next) => self.enter(next),
            Transition::Repick => self.repick(),
            Transition::Stay => {}
        }
    }

    fn repick(&mut self) {
        match self.state {
            ZombieState::Wander => {
                self.pick_wander_point();
                self.wander_timer = 0.0;
            }
            ZombieState::Search => self.pick_search_point(),
            ZombieState::InvestigateSound | ZombieState::Chase => {}
        }
    }

    /// Смена состояния + entry actions
    fn enter(&mut self, next: ZombieState) {
        let previous = self.state;

        if previous == ZombieState::Chase && next != ZombieState::Chase {
            self.screech_used_this_chase = false;
        }

        self.state = next;
        if previous != next {
            crate::log(&format!(
                "Zombie {:?}: {} → {}",
                self.listener,
                previous.as_str(),
                next.as_str()
            ));
        }

        match next {
            ZombieState::Wander => {
                self.set_speed(self.config.wander_speed);
                self.wander_timer = 0.0;
                self.has_sound_target = false;
                self.pick_wander_point();
            }

            ZombieState::InvestigateSound => {
                self.set_speed(self.config.investigate_speed);
                if self.has_sound_target {
                    self.set_destination(self.last_sound_pos);
                }
            }

            ZombieState::Chase => {
                self.set_speed(self.config.chase_speed);
                self.has_sound_target = false;
                self.try_screech();
            }

            ZombieState::Search => {
                self.set_speed(self.config.investigate_speed);
                self.search_timer = self.config.search_duration;
                self.pick_search_point();
            }
        }
    }

    fn tick_wander(&mut self, delta: f32) {
        self.wander_timer += delta;

        if self.reached(self.config.wander_point_tolerance)
            || self.wander_timer >= self.config.wander_repath_time
        {
            self.apply(Stimulus::WanderPointDone);
        }
    }

    fn tick_investigate(&mut self) {
        if self.has_sound_target {
            self.set_destination(self.last_sound_pos);
        }
    }

    fn tick_chase(&mut self, player_position: Vec3) {
        self.set_destination(player_position);
        self.last_known_player_pos = player_position;
    }

    fn tick_search(&mut self, delta: f32) {
        self.search_timer -= delta;

        if self.reached(self.config.search_point_tolerance) && self.search_timer > 0.0 {
            self.apply(Stimulus::SearchPointReached);
        }

        if self.search_timer <= 0.0 {
            self.apply(Stimulus::SearchExpired);
        }
    }

    /// Screech один раз за chase episode, если cooldown готов
    fn try_screech(&mut self) -> bool {
        if !self.config.enable_screech || self.screech_used_this_chase || self.screech_timer > 0.0 {
            return false;
        }

        let (min_pitch, max_pitch) = (self.config.min_screech_pitch, self.config.max_screech_pitch);
        let pitch = if min_pitch < max_pitch {
            self.rng.gen_range(min_pitch..=max_pitch)
        } else {
            min_pitch
        };
        if let Some(audio) = self.audio.as_mut() {
            audio.play_screech(pitch);
        }

        // Флаги до emit: слушатели могут что угодно делать с шиной
        self.screech_used_this_chase = true;
        self.screech_timer = self.config.screech_cooldown;

        let position = self.pose.position;
        let radius = self.config.screech_radius;
        crate::log_info(&format!(
            "📢 Zombie {:?} screeched at {:?} (radius {:.1}, pitch {:.2})",
            self.listener, position, radius, pitch
        ));
        match self.listener {
            Some(id) => self.bus.emit_from(id, position, radius),
            None => self.bus.emit(position, radius),
        }
        true
    }

    fn pick_wander_point(&mut self) {
        let raw = random_ground_point(&mut self.rng, self.spawn_point, self.config.wander_radius);

        match self.navmesh.sample_position(raw, self.config.wander_snap_distance) {
            Some(point) => self.set_destination(point),
            None => crate::log(&format!(
                "Zombie {:?}: wander point {:?} off navmesh, skipping",
                self.listener, raw
            )),
        }
    }

    fn pick_search_point(&mut self) {
        let center = self.last_known_player_pos;
        let raw = random_ground_point(&mut self.rng, center, self.config.search_radius);

        let point = self
            .navmesh
            .sample_position(raw, self.config.search_snap_distance)
            .unwrap_or(raw);
        self.set_destination(point);
    }

    fn reached(&self, tolerance: f32) -> bool {
        reached_destination(self.navigation.as_ref(), tolerance)
    }

    fn set_destination(&mut self, point: Vec3) {
        self.destination = Some(point);
        if let Some(navigation) = &self.navigation {
            navigation.borrow_mut().set_destination(point);
        }
    }

    fn set_speed(&mut self, speed: f32) {
        self.commanded_speed = speed;
        if let Some(navigation) = &self.navigation {
            navigation.borrow_mut().set_speed(speed);
        }
    }

    /// Остановить навигацию (смерть)
    pub fn halt(&mut self) {
        self.commanded_speed = 0.0;
        if let Some(navigation) = &self.navigation {
            navigation.borrow_mut().stop();
        }
    }
}

impl Drop for Zombie {
    fn drop(&mut self) {
        self.deactivate();
    }
}

impl SoundListener for RefCell<Zombie> {
    fn on_sound(&self, event: &SoundEvent) {
        match self.try_borrow_mut() {
            Ok(mut zombie) => {
                zombie.hear(event);
            }
            Err(_) => crate::log_warning(&format!(
                "Zombie busy while sound at {:?} was delivered, dropping re-entrant event",
                event.position
            )),
        }
    }
}
