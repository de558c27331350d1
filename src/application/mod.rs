pub mod agent;
pub mod repl;
pub mod tooling;
