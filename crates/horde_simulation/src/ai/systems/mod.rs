//! Horde systems (FixedUpdate, main thread only)
//!
//! NAMING: `_main_thread` суффикс = работа с NonSend `HordeWorld` (Rc/RefCell).
//! Bevy гарантирует что такие системы идут на main thread.

pub mod horde;
pub mod noise;
pub mod round;

// Re-export all systems
pub use horde::*;
pub use noise::*;
pub use round::*;
