//! CLI command implementations

pub mod classify;
pub mod config;
pub mod content;
pub mod reconcile;

pub use classify::execute as classify;
pub use config::execute as config;
pub use content::execute as content;
pub use reconcile::execute as reconcile;
