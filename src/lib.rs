pub mod appointy;
pub mod cli;
pub mod core;
pub mod scheduling;
pub mod tools;
