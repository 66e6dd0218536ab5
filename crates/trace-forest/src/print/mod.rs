//! Text dumps for debugging and assertion messages.

#[path = "printBinary.rs"]
mod print_binary_impl;

pub use print_binary_impl::{print_binary, PrintChild};
