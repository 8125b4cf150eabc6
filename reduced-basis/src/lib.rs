pub mod artifact;
pub mod basis;
pub mod emulator;
pub mod error;
pub mod interaction;
pub mod tensor;
pub mod training;

pub extern crate faer;
