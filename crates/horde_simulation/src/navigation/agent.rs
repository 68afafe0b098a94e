//! SimulatedNavAgent: headless path follower (прямая линия к destination).
//!
//! Заменяет внешний pathfinding backend в headless симуляции и тестах.
//! `path_latency` имитирует асинхронный расчёт пути (pathPending N тиков).

use bevy::prelude::*;
use super::NavigationAdapter;

/// Ближе этого считаем что стоим в точке
const ARRIVE_EPSILON: f32 = 0.01;

#[derive(Debug, Clone)]
pub struct SimulatedNavAgent {
    position: Vec3,
    forward: Vec3,
    velocity: Vec3,
    destination: Option<Vec3>,
    speed: f32,
    stopped: bool,
    /// Сколько тиков path "считается" после новой destination
    pub path_latency: u32,
    pending_ticks: u32,
}

impl SimulatedNavAgent {
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        let forward = forward.normalize_or_zero();
        Self {
            position,
            forward: if forward == Vec3::ZERO { Vec3::Z } else { forward },
            velocity: Vec3::ZERO,
            destination: None,
            speed: 0.0,
            stopped: false,
            path_latency: 0,
            pending_ticks: 0,
        }
    }

    pub fn with_path_latency(mut self, ticks: u32) -> Self {
        self.path_latency = ticks;
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Двигаемся к destination на speed * delta (не проскакивая точку)
    pub fn step(&mut self, delta: f32) {
        self.velocity = Vec3::ZERO;

        if self.pending_ticks > 0 {
            self.pending_ticks -= 1;
            return;
        }
        if self.stopped {
            return;
        }
        let Some(destination) = self.destination else {
            return;
        };

        let to_destination = destination - self.position;
        let distance = to_destination.length();
        if distance <= ARRIVE_EPSILON || delta <= 0.0 {
            return;
        }

        let direction = to_destination / distance;
        let travel = (self.speed * delta).min(distance);
        self.position += direction * travel;
        self.velocity = direction * (travel / delta);

        let flat = Vec3::new(direction.x, 0.0, direction.z);
        if flat.length_squared() > f32::EPSILON {
            self.forward = flat.normalize();
        }
    }
}

impl NavigationAdapter for SimulatedNavAgent {
    fn set_destination(&mut self, point: Vec3) {
        if self.destination != Some(point) {
            self.pending_ticks = self.path_latency;
        }
        self.destination = Some(point);
        self.stopped = false;
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    fn path_pending(&self) -> bool {
        self.pending_ticks > 0
    }

    fn has_path(&self) -> bool {
        self.destination.is_some() && self.pending_ticks == 0
    }

    fn remaining_distance(&self) -> f32 {
        self.destination
            .map(|destination| destination.distance(self.position))
            .unwrap_or(0.0)
    }

    fn stop(&mut self) {
        self.stopped = true;
        self.velocity = Vec3::ZERO;
    }
}
