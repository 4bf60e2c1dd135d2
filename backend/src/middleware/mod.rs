//! Actix middleware shared by every directory route.

pub mod trace;

pub use trace::Trace;
