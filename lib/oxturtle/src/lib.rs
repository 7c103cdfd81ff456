#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![doc(html_favicon_url = "https://raw.githubusercontent.com/oxigraph/oxigraph/main/logo.svg")]
#![doc(html_logo_url = "https://raw.githubusercontent.com/oxigraph/oxigraph/main/logo.svg")]

mod dumper;
mod line_formats;
mod reader;
mod source;
mod stack;
mod syntax;
mod terse;
mod writer;

pub use crate::dumper::BlockDumper;
pub use crate::reader::{Reader, ReaderFlags};
pub use crate::source::ByteSource;
pub use crate::stack::Stack;
pub use crate::syntax::{Syntax, UnknownSyntaxError};
pub use crate::writer::{Writer, WriterFlags};
