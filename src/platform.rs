//! Platform-specific type aliases and trait bounds
//!
//! This module provides conditional compilation for single-threaded (Rc-based)
//! vs multi-threaded (Arc-based) implementations.
//!
//! - `send` feature (default): Uses Arc and requires Send bounds
//! - `local` feature: Uses Rc and removes Send+Sync requirements. Takes precedence
//!   when both features are enabled.

// ============================================================================
// MULTI-THREADED (send feature - default)
// ============================================================================
#[cfg(not(feature = "local"))]
pub use std::sync::Arc as SharedPtr;

#[cfg(not(feature = "local"))]
pub use futures::future::BoxFuture as PlatformFuture;

#[cfg(not(feature = "local"))]
pub trait MaybeSend: Send {}
#[cfg(not(feature = "local"))]
impl<T: Send> MaybeSend for T {}

#[cfg(not(feature = "local"))]
pub type PlatformBoxFutureStatic<T> =
    std::pin::Pin<Box<dyn std::future::Future<Output = T> + Send + 'static>>;

#[cfg(not(feature = "local"))]
pub type BoxedStrategy<T> = Box<dyn crate::streams::QueuingStrategy<T> + Send + 'static>;

// ============================================================================
// SINGLE-THREADED (local feature)
// ============================================================================
#[cfg(feature = "local")]
pub use std::rc::Rc as SharedPtr;

#[cfg(feature = "local")]
pub use futures::future::LocalBoxFuture as PlatformFuture;

#[cfg(feature = "local")]
pub trait MaybeSend {}
#[cfg(feature = "local")]
impl<T> MaybeSend for T {}

#[cfg(feature = "local")]
pub type PlatformBoxFutureStatic<T> =
    std::pin::Pin<Box<dyn std::future::Future<Output = T> + 'static>>;

#[cfg(feature = "local")]
pub type BoxedStrategy<T> = Box<dyn crate::streams::QueuingStrategy<T> + 'static>;
