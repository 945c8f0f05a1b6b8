mod clipboard;
mod generator;

pub use self::clipboard::{Clipboard, ClipboardError, ClipboardOperation, ClipboardResult};
pub use self::generator::{
    ContentGenerator, GenerateOperation, GenerationError, GenerationResult, InlineImage,
};

pub use crux_core::render::Render;

use crate::event::Event;
// The Effect derive wires the capabilities to the app by this name.
use crate::App;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub content_generator: ContentGenerator<Event>,
    pub clipboard: Clipboard<Event>,
}
