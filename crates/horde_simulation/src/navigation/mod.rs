//! Navigation: контракт адаптера (destination/speed/status), arrival test,
//! генерация случайных точек + snap на navmesh.
//!
//! Архитектура:
//! - Агент только КОМАНДУЕТ навигацией (`set_destination`, `set_speed`)
//!   и читает статус (`path_pending`, `has_path`, `remaining_distance`)
//! - Внутренности (path, velocity) принадлежат backend'у
//! - `NavHandle` (shared reference): агент и хост (который двигает тело)
//!   смотрят на один и тот же backend

pub mod agent;
pub mod navmesh;


use bevy::prelude::*;
use rand::Rng;
use std::cell::RefCell;
use std::rc::Rc;

pub use agent::SimulatedNavAgent;
pub use navmesh::{FlatNavMesh, NavMeshSampler, Unrestricted};

/// Контракт path-following backend'а
pub trait NavigationAdapter {
    /// Повторная выдача той же точки: безвредна
    fn set_destination(&mut self, point: Vec3);
    fn set_speed(&mut self, speed: f32);
    fn path_pending(&self) -> bool;
    fn has_path(&self) -> bool;
    fn remaining_distance(&self) -> f32;
    /// Остановиться немедленно (смерть, конец раунда)
    fn stop(&mut self) {}
}

pub type NavHandle = Rc<RefCell<dyn NavigationAdapter>>;

/// Arrival test для всех "reached X" guard'ов FSM.
///
/// - нет backend'а → считаем что пришли
/// - путь ещё считается → не пришли
/// - пути нет → пришли
/// - иначе remaining_distance <= tolerance
pub fn reached_destination(navigation: Option<&NavHandle>, tolerance: f32) -> bool {
    let Some(navigation) = navigation else {
        return true;
    };
    let navigation = navigation.borrow();

    if navigation.path_pending() {
        return false;
    }
    if !navigation.has_path() {
        return true;
    }
    navigation.remaining_distance() <= tolerance
}

/// Равномерная точка внутри шара (rejection sampling в кубе [-1, 1]^3)
pub fn random_point_in_sphere<R: Rng + ?Sized>(rng: &mut R, center: Vec3, radius: f32) -> Vec3 {
    loop {
        let candidate = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        if candidate.length_squared() <= 1.0 {
            return center + candidate * radius;
        }
    }
}

/// Случайная точка около anchor, приплюснутая к высоте anchor'а
pub fn random_ground_point<R: Rng + ?Sized>(rng: &mut R, anchor: Vec3, radius: f32) -> Vec3 {
    let mut point = random_point_in_sphere(rng, anchor, radius);
    point.y = anchor.y;
    point
}
