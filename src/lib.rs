// Stargate Engine - gate template engine for block-world portals
//
// - gate: template parsing, structure transform, matching, exit resolution
// - world: read-only block access and the material registry
// - portal / persistence: networks, destination behaviours, saved portals
// - context: explicit startup state for hosts
//
// The gate module is pure with respect to the world: it reads blocks through
// `BlockAccess` and never writes.

// Constants module
pub mod constants;

// Core engine modules
pub mod config;
pub mod error;
pub mod logging;

// Geometry and world access
pub mod physics;
pub mod world;

// Gate template engine
pub mod gate;

// Portal layer
pub mod context;
pub mod persistence;
pub mod portal;

pub use config::{EconomyDefaults, EngineConfig, LoggingConfig};
pub use context::StargateContext;
pub use error::{EngineError, EngineResult, ErrorContext, OptionExt};
pub use logging::init_logging;
pub use physics::AABB;

// === Gate Types ===
pub use gate::{
    matches, mismatches, parse_template, resolve, CoordinateTransform, ExitLocation, ExitQuery,
    ExitResult, ExitSource, Facing, MaterialSpec, Occupant, ParseOptions, RelativeVector,
    StructureInstance, TemplateError, TemplateLayout, TemplateLoadReport, TemplateRegistry,
};

// === Core World Types ===
pub use world::core::{
    BlockHalf, BlockId, BlockState, MaterialRegistry, PhysicsProperties, VoxelPos,
};
pub use world::interfaces::BlockAccess;
pub use world::MemoryWorld;

// === Portals ===
pub use persistence::{
    ImportReport, JsonPortalStore, LegacyDbImporter, PersistenceError, PortalImporter,
    PortalRecord,
};
pub use portal::{NetworkRegistry, Portal, PortalBehavior, PortalFlags};
