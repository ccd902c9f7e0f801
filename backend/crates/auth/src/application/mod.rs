//! Application Layer
//!
//! Use cases and application services.

pub mod bootstrap_user;
pub mod check_session;
pub mod config;
pub mod sign_in;
pub mod sign_out;
pub mod verify_credentials;

// Re-exports
pub use bootstrap_user::{BootstrapUserInput, BootstrapUserOutput, BootstrapUserUseCase};
pub use check_session::{CheckSessionUseCase, SessionStatusOutput};
pub use config::{AuthConfig, DenyAction, DistributedSettings, SessionBackendConfig};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::{SignOutOutput, SignOutUseCase};
pub use verify_credentials::CredentialVerifier;
