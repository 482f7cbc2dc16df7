//! Network management for the explorer core.
//!
//! Three pieces live here:
//!
//! - [`NetworkRegistry`] - the set of known networks (built-ins plus
//!   user-added custom endpoints) and the single active selection.
//! - [`NetworkResolver`] - answers "what chain does this URL serve,
//!   and is it alive?" through a per-URL read-through cache with
//!   single-flight request coalescing.
//! - [`ExplorerContext`] - the explicit application-state struct that
//!   wires registry and resolver together and publishes active-network
//!   changes to observers; there is no ambient global state.

pub mod context;
pub mod registry;
pub mod resolver;
pub mod urls;

pub use context::ExplorerContext;
pub use registry::{normalize_url, NetworkRegistry, RegistryError};
pub use resolver::{NetworkResolver, ResolutionStatus};
pub use urls::build_url;
