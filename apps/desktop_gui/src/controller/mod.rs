//! Controller layer: UI events, intent-to-command reduction, and command orchestration.

pub mod events;
pub mod orchestration;
pub mod reducer;
