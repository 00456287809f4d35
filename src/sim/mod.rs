//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep, one `update` per frame
//! - Seeded RNG only
//! - Stable iteration order (by pool slot)
//! - No drawing or hardware dependencies

pub mod collision;
pub mod controls;
pub mod physics;
pub mod pool;
pub mod replay;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{circles_overlap, objects_overlap};
pub use controls::{Steering, deflection_scale, steer};
pub use physics::wrap_position;
pub use pool::{Pool, SlotId};
pub use replay::{InputLog, RecordedFrame};
pub use snapshot::Snapshot;
pub use spawn::{fragment_velocity, random_velocity, wave_size};
pub use state::{
    AsteroidSize, ButtonLatches, GameEvent, GameObject, GameSession, GameState, ObjectKind, Timers,
    screen_center,
};
pub use tick::TickInput;
