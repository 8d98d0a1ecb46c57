//! Service layer: the interpreter client and the session that owns the
//! current configuration.

pub mod ai_client;
pub mod interpreter;
pub mod session;

pub use ai_client::AiClient;
pub use interpreter::{HealthCache, Interpreter};
#[allow(unused_imports)]
pub use interpreter::InterpreterError;
pub use session::QuoteSession;
