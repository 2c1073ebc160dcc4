pub mod interval;
pub use interval::DateInterval;

pub mod serializer;
pub use serializer::{Flavor, Inline, Params, Placeholder, Serializer};
