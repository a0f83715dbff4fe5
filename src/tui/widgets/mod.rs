//! TUI widgets for the sandbox.
//!
//! Contains reusable UI components.

pub mod editor;
pub mod header;
pub mod reference;
pub mod result;
pub mod spinner;
pub mod table;
pub mod test_cases;
