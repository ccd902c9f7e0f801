//! Shared Kernel
//!
//! Vocabulary shared by every backend crate:
//! - The unified [`AppError`](error::app_error::AppError) and its [`ErrorKind`](error::kind::ErrorKind)
//! - Typed identifier wrappers
//!
//! Only things whose meaning is stable across domains belong here.

pub mod error {
    pub mod app_error;
    pub mod kind;
}
pub mod id;
