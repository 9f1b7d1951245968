//! Shared option types used by the client facades and the CLI.

pub mod enums;
pub mod one_or_many;

pub use enums::*;
pub use one_or_many::*;
