pub mod model;

pub use model::{BlockingEntity, Snapshot};
