//! Coplate backend library modules.
//!
//! Layering follows ports-and-adapters: [`domain`] holds entities, use-case
//! services, and port traits; [`inbound`] adapts HTTP onto the domain;
//! [`outbound`] implements the ports against PostgreSQL.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use doc::ApiDoc;
pub use middleware::Trace;
