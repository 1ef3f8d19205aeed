mod config;
mod nesting_engine;
mod timer;

pub mod evolution;
pub mod fitness;

#[doc(inline)]
pub use config::NestConfig;

#[doc(inline)]
pub use nesting_engine::{GenerationReport, NestingEngine, Termination, UpdateCallback};

#[doc(inline)]
pub use timer::Timer;
