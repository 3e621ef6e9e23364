pub mod client_builder;
pub mod clock;
pub mod header_constants;
pub mod random_id;

pub use clock::{Clock, SystemClock};
#[cfg(test)]
pub use clock::ManualClock;
