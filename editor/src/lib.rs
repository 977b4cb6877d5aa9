//! Interactive creation tooling for the simulation scene
//!
//! Converts pointer gestures in the viewport into finalized world-object
//! descriptions: a [`maker::ShapeMaker`] previews the object live through
//! the scene transport and hands the finished description to the factory
//! backend on commit.

pub mod events;
pub mod input;
pub mod maker;
pub mod settings;

pub use events::EditorEvent;
pub use input::{InputState, MouseEvent};
pub use maker::{MakerPhase, ShapeMaker};
pub use settings::{CreationSettings, EditorSettings};
