//! Domain layer for Naming Guardian
//!
//! CDD Principle: Domain Model - Pure vocabulary for naming-convention enforcement
//! - Declarations, roles and case styles describe what is being checked
//! - Violations and reports describe what was found
//! - Independent of file systems, parsers and output formats

pub mod declaration;
pub mod violations;

// Re-export main domain types for convenience
pub use declaration::*;
pub use violations::*;
