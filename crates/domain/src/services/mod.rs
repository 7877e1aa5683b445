//! Pure domain services.

pub mod cooldown;
pub mod export;

pub use cooldown::CooldownPolicy;
pub use export::render_csv;
