// File: ./src/model/mod.rs
pub mod dates;
pub mod input;
pub mod parser;

pub use dates::{Direction, WeekdayExpression};
pub use input::Input;
pub use parser::{InputParser, ResolvedOffset};
