//! Virtual spaces: numbered, per-monitor window layouts that can be saved and
//! restored with their stacking order.
//!
//! - [`model`]: slots, window records, virtual spaces.
//! - [`store`]: the in-memory (monitor, slot) map.
//! - [`persist`]: JSON file and in-memory backends.
//! - [`resolve`]: map saved records back onto live windows.
//! - [`SpaceManager`]: save/restore/clear/rename/activate orchestration.
//! - [`events`] and [`control`]: outbound notifications and inbound requests.

pub mod control;
mod error;
pub mod events;
mod manager;
pub mod model;
pub mod persist;
mod report;
pub mod resolve;
pub mod settings;
pub mod store;

pub use control::{ControlAction, ControlRequest, spawn_control_loop};
pub use error::{Error, Result};
pub use events::{EventBus, SlotSummary, SpaceAction, SpaceEvent};
pub use manager::SpaceManager;
pub use model::{Frame, Slot, VirtualSpace, WindowRecord};
pub use persist::{JsonFileStore, MemoryStore, StoreBackend};
pub use report::{
    RestoreReport, SaveReport, SavedSpace, WindowRestore, WindowRestoreStatus,
};
pub use resolve::{Resolution, Unmatched};
pub use settings::{Settings, SpaceMode};
pub use store::VirtualSpacesStore;
