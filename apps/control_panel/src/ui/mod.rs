//! UI layer: the view surface handlers write into and its terminal rendition.

pub mod terminal;
pub mod view;

pub use view::{BadgeTone, ConnectionState, Control, InputField, PageView, Panel, Region};
