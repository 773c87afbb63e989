//! Ports - the capabilities the domain needs from the outside world

mod clock;
mod gateway;

pub use clock::{Clock, SystemClock};
#[cfg(any(test, feature = "test-util"))]
pub use clock::FixedClock;
pub use gateway::{ConnectionOpener, MessagingGateway};
