//! wmm-core - Shared minification types
//!
//! Leaf types used by every markup minifier in the workspace:
//! - Source coordinates and diagnostic fragments
//! - The forward-only parsing cursor
//! - Parse events emitted by the tokenizers
//! - Error/warning and result types
//! - Collaborator traits (CSS/JS minifier backends, logger)

mod collab;
mod context;
mod coords;
mod error;
mod events;
mod result;

pub use collab::{
    CssMinifier, JsMinifier, MinificationLogger, MinifiedCode, NullCssMinifier, NullJsMinifier,
    NullLogger, TracingLogger,
};
pub use context::ParsingContext;
pub use coords::{coordinates_at, fragment_around, SourceCoordinates};
pub use error::{MinificationErrorInfo, ParseError, ParseErrorKind};
pub use events::{AttrQuote, Attribute, ParseEvent};
pub use result::{MarkupMinificationResult, MinificationStatistics};
