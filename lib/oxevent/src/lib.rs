#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![doc(html_favicon_url = "https://raw.githubusercontent.com/oxigraph/oxigraph/main/logo.svg")]
#![doc(html_logo_url = "https://raw.githubusercontent.com/oxigraph/oxigraph/main/logo.svg")]

mod caret;
mod env;
mod event;
pub mod grammar;
mod log;
mod node;
mod status;
pub mod uri;
pub mod vocab;

pub use crate::caret::Caret;
pub use crate::env::Env;
pub use crate::event::{Event, EventCollector, Sink, Statement, StatementFlags};
pub use crate::log::{Log, LogEntry, LogLevel, StderrLog};
pub use crate::node::{Node, NodeFlags, NodeKind};
pub use crate::status::Status;
pub use crate::uri::UriRef;
