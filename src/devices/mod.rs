//! Household device catalog: identities, descriptors, and usage arithmetic.

/// Always-on baseline draw.
pub mod baseload;
/// Ordered device catalog keyed by room and device.
pub mod registry;
pub mod types;

pub use baseload::BaseLoad;
pub use registry::DeviceRegistry;
pub use types::{
    DeviceId, DeviceKey, DeviceKind, DeviceSpec, ENERGY_PER_LITER_HOT_WATER, ResourceUsage,
    RoomId, WaterFlow,
};
