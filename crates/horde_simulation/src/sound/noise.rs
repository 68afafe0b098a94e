//! Player noise: выстрелы и шаги → SoundEventBus.
//!
//! Выстрел: всегда событие радиуса `gunshot_radius`.
//! Шаги: пока игрок на земле и горизонтальная скорость > `min_move_speed`,
//! копим таймер; каждые `step_interval` секунд: footstep событие.
//! Остановился/в воздухе → таймер в 0.

use bevy::prelude::*;
use crate::config::NoiseConfig;
use crate::sound::SoundEventBus;

/// Audio playback hook (опционально; без него события всё равно летят)
pub trait AudioCue {
    fn play(&mut self);
}

/// Что произошло за вызов (для логов/тестов)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoiseKind {
    Gunshot,
    Footstep,
}

pub struct PlayerNoiseEmitter {
    pub config: NoiseConfig,
    step_timer: f32,
    gunshot_audio: Option<Box<dyn AudioCue>>,
    footstep_audio: Option<Box<dyn AudioCue>>,
}

impl PlayerNoiseEmitter {
    pub fn new(config: NoiseConfig) -> Self {
        Self {
            config,
            step_timer: 0.0,
            gunshot_audio: None,
            footstep_audio: None,
        }
    }

    pub fn with_audio(
        mut self,
        gunshot: Option<Box<dyn AudioCue>>,
        footstep: Option<Box<dyn AudioCue>>,
    ) -> Self {
        self.gunshot_audio = gunshot;
        self.footstep_audio = footstep;
        self
    }

    pub fn step_timer(&self) -> f32 {
        self.step_timer
    }

    /// Вызывается оружием при каждом выстреле.
    pub fn emit_gunshot(&mut self, bus: &SoundEventBus, position: Vec3) -> NoiseKind {
        if let Some(audio) = self.gunshot_audio.as_mut() {
            audio.play();
        }
        bus.emit(position, self.config.gunshot_radius);
        NoiseKind::Gunshot
    }

    /// Per-tick: footstep если пора. Возвращает `Some(Footstep)` когда событие ушло.
    pub fn tick_footsteps(
        &mut self,
        bus: &SoundEventBus,
        delta: f32,
        position: Vec3,
        velocity: Vec3,
        grounded: bool,
    ) -> Option<NoiseKind> {
        let horizontal_speed = Vec3::new(velocity.x, 0.0, velocity.z).length();

        if !(horizontal_speed > self.config.min_move_speed && grounded) {
            self.step_timer = 0.0;
            return None;
        }

        self.step_timer += delta;
        if self.step_timer < self.config.step_interval {
            return None;
        }

        if let Some(audio) = self.footstep_audio.as_mut() {
            audio.play();
        }
        bus.emit(position, self.config.footstep_radius);
        self.step_timer = 0.0;

        Some(NoiseKind::Footstep)
    }
}
