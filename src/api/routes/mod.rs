//! API route modules.

pub mod events;
pub mod meetings;
pub mod runs;
