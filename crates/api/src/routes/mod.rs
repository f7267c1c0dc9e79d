pub mod demo;
pub mod export;
pub mod weather;

pub use demo::*;
pub use export::*;
pub use weather::*;
