//! # System Interaction Layer
//!
//! Boundary between the lookup logic and the outside world.
//!
//! ## Modules
//!
//! - **`http`**: the blocking HTTP client used to reach the Merriam-Webster API,
//!   behind the `Fetcher` trait so queries can be tested without a network.

pub mod http;
