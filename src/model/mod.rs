//! Domain model — the shapes fetched content takes between the API layer
//! and the formatting layer.

mod block;
mod properties;
mod snapshot;

pub use block::{BlockKind, ContentNode};
pub use properties::PropertyKind;
pub use snapshot::{NormalizedItem, NormalizedTarget, TargetKind, TargetRef};
