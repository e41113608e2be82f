//! Narrative engine for a small dating-sim: a day counter, an affection score
//! and a four-phase story flag, fed by a hosted dialogue model and a hosted
//! portrait generator.
//!
//! - [`engine`] - the narrative engine, its worker thread and the collaborators
//! - [`model`] - state, replies, achievements and transition reports
//! - [`ui`] - settings and the terminal front end

pub mod engine;
pub mod model;
pub mod ui;
