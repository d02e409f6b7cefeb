pub mod run;
pub mod settings;
pub mod stats;
pub mod timer;
