// core.rs splits ledger responsibilities into submodules: block and engine
// (chain), aggregate views (state) and integrity scanning (validation).
pub mod chain;
pub mod state;
pub mod validation;

pub use chain::*;
pub use state::*;
pub use validation::*;
