//! Gate template engine
//!
//! Template parsing, the structure frame transform, structure matching and
//! exit resolution. Everything here is read-only with respect to the world.

pub mod error;
pub mod exit_data;
pub mod exit_operations;
pub mod instance;
pub mod layout_data;
pub mod layout_operations;
pub mod matcher;
pub mod template_registry;
pub mod transform;
pub mod vector;

pub use error::TemplateError;
pub use exit_data::{ExitLocation, ExitQuery, ExitResult, ExitSource, Occupant};
pub use exit_operations::resolve;
pub use instance::StructureInstance;
pub use layout_data::{DerivedCells, MaterialSpec, TemplateConfig, TemplateLayout};
pub use layout_operations::{parse_template, write_template, ParseOptions};
pub use matcher::{matches, mismatches};
pub use template_registry::{TemplateLoadReport, TemplateRegistry};
pub use transform::{CoordinateTransform, Facing};
pub use vector::RelativeVector;
