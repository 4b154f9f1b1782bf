//! Controller layer: UI events, output-panel state transitions, and command
//! orchestration.

pub mod events;
pub mod orchestration;
pub mod reducer;
