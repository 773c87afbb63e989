//! Event and command handlers
//!
//! Handlers return errors to the dispatcher, which logs them per frame.

mod command;
mod error;
mod message;
pub mod replies;

pub use command::CommandRouter;
pub use error::{HandlerError, HandlerResult};
pub use message::MessageHandler;
