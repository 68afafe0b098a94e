//! Perception: vision (range + cone + occlusion) и hearing (distance vs radius).
//!
//! Чистые функции от состояния мира: никаких side effects.

pub mod hearing;
pub mod occlusion;
pub mod vision;


pub use hearing::hears_sound;
pub use occlusion::{
    ClearSight, LineOfSight, Obstacle, ObstacleField, LAYER_ACTORS, LAYER_ENVIRONMENT, LAYER_PROPS,
};
pub use vision::{angle_between_deg, can_see_player, AgentPose};
