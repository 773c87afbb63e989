//! Envelope routing

mod dispatcher;

pub use dispatcher::EventDispatcher;
