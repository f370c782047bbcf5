//! Flat `{{placeholder}}` templates over HTML-ish markup.
//!
//! A [`Template`] parses its source once into a forest of [`Descriptor`]s,
//! materializes it into a live tree through [`mold_dom::HostTree`], and then
//! rewrites only the text nodes and attributes whose rendered value changes
//! when [`Template::update`] is called.

pub mod bindings;
pub mod error;
pub mod options;
pub mod template;
pub mod template_ast;
pub mod template_parse;

pub use bindings::{Binding, Bindings};
pub use error::{ParseError, ParseErrorKind, TemplateError};
pub use options::ParseOptions;
pub use template::{SlotLocation, Template};
pub use template_ast::{AttrDescriptor, Descriptor, Segment, TextDescriptor};
pub use template_parse::{parse_template, parse_template_with_options, segment_text};
