//! Startup wiring: configuration loading and optional demo seeding.

mod seed;
mod settings;

pub use seed::{DEMO_USER_ID, DemoSeedOutcome, seed_demo_directory};
pub use settings::DirectorySettings;
