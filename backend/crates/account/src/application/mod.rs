//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod session_gate;
pub mod session_token;
pub mod sign_in;
pub mod sign_up;

// Re-exports
pub use config::AccountConfig;
pub use session_gate::{SessionGate, SessionStatus};
pub use session_token::SessionToken;
pub use sign_in::{SignInInput, SignInUseCase};
pub use sign_up::{SignUpInput, SignUpUseCase};
