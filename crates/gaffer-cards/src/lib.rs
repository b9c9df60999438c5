//! Penalty-card generation: the pure per-user generator, the bounded
//! worker pool that fans it out, and the nomination/reverse social path.

pub mod error;
pub mod generator;
pub mod nomination;
pub mod pool;
pub mod service;

pub use error::{CardError, CardResult};
pub use generator::generate_for_user;
pub use nomination::{build_slate, NominationService, MAX_NOMINATIONS};
pub use pool::{run_pool, PoolReport, DEFAULT_WORKERS};
pub use service::CardService;
