//! Diagrid Core Library
//!
//! Interactive editing core of the Diagrid canvas editor: raw input
//! normalization, interaction dispatch and the undoable command engine.
//! Rendering and windowing stay with the host, which plugs in through the
//! [`Viewer`] trait.

pub mod camera;
pub mod canvas;
pub mod clipboard;
pub mod command;
pub mod config;
pub mod document;
pub mod error;
pub mod event;
pub mod handler;
pub mod handles;
pub mod input;
pub mod interaction;
pub mod selection;
pub mod viewer;

pub use camera::Camera;
pub use canvas::CanvasViewer;
pub use clipboard::Clipboard;
pub use command::{Command, CommandStack, CompoundCommand};
pub use config::EditorConfig;
pub use document::{Attributes, Document, Item, ItemId, ItemKind};
pub use error::{EditorError, EditorResult};
pub use event::{Event, EventDetail, EventKind, EventSource, Modifiers};
pub use handler::InteractionHandler;
pub use handles::{Handle, HandleKind};
pub use input::{DragInput, EventNormalizer, GestureInput, KeyInput, MouseInput, RawInput};
pub use interaction::{Interaction, InteractionChanged, InteractionContext, InteractionId};
pub use selection::{Alignment, SizeMatch};
pub use viewer::{Cursor, Feedback, ViewMode, Viewer};
