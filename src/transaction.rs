//! Transaction module split into types, validation and loan event constructors

pub mod loan;
pub mod types;
pub mod validation;

pub use loan::*;
pub use types::*;
// validation module only adds inherent methods; nothing to re-export
