//! Domain entities

mod descriptor;
mod status;

pub use descriptor::ServiceDescriptor;
pub use status::{ServiceStatus, StatusKind, DISABLED_MESSAGE};
