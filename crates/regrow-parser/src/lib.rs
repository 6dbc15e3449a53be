//! An incremental LR(1) parser runtime.
//!
//! `regrow-parser` drives a compiled parse table and a language-supplied lex
//! function over a textual input to produce a concrete syntax tree, and —
//! the point of the exercise — re-parses the input after a localized edit by
//! reusing subtrees from the previous parse on both sides of the edit.
//!
//! The runtime consumes a [`Language`] descriptor (parse table, lexer entry
//! point, symbol metadata) and an [`Input`] capability; it produces
//! reference-counted, immutable [`Tree`]s. Parsing never fails: invalid
//! input shows up as `ERROR` nodes inside the returned tree.
//!
//! Language packs are built elsewhere; see the `regrow-arith` crate in this
//! workspace for a small hand-compiled example.

mod debug;
mod error;
mod input;
mod language;
mod length;
mod lexer;
mod parser;
mod stack;
mod tree;


pub use triomphe::Arc;

pub use crate::debug::{render_tree, DebugKind, Debugger};
pub use crate::error::LanguageError;
pub use crate::input::{Input, StringInput};
pub use crate::language::{
    Language, LexFn, LexState, ParseAction, StateId, Symbol, LEX_STATE_ERROR,
};
pub use crate::lexer::Lexer;
pub use crate::length::Length;
pub use crate::parser::{InputEdit, Parser};
pub use crate::tree::Tree;
