//! Command handlers for the Intexta CLI.

pub mod ask;
pub mod assemble;
pub mod filter;

pub use ask::AskCommand;
pub use assemble::AssembleCommand;
pub use filter::FilterCommand;
