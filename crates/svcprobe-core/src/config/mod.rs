//! Service configuration
//!
//! - `DescriptorStore` - service descriptors loaded from a JSON file, cached until reset
//! - `DisabledMarkers` - marker files that switch individual services off

mod disabled;
mod store;

pub use disabled::DisabledMarkers;
pub use store::{DescriptorSource, DescriptorStore};
