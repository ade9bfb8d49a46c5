//! wmm-js - Crockford-style JavaScript minifier
//!
//! A two-symbol-lookahead character rewriter that strips comments and
//! collapses whitespace to the minimal separators required to keep tokens
//! apart. It is the default backend for embedded/inline scripts when no
//! dedicated JS minifier is plugged in.
//!
//! Scan state lives in a struct constructed fresh inside every call, so the
//! public type is freely shareable across threads.

mod minifier;

pub use minifier::{CrockfordJsMinifier, JsMinError};
