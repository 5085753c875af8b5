pub mod derive;
pub mod rules;
pub mod types;

pub use derive::*;
pub use rules::*;
pub use types::*;
