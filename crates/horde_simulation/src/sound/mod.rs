//! Sound: глобальный (но явный) канал звуковых событий + player noise policy.

pub mod bus;
pub mod noise;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod bus_tests;

pub use bus::{ListenerId, SoundEvent, SoundEventBus, SoundListener};
pub use noise::{AudioCue, NoiseKind, PlayerNoiseEmitter};
