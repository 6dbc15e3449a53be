use std::rc::Rc;

use tracing::trace;

use crate::debug::{DebugKind, Debugger};
use crate::input::Input;
use crate::language::Symbol;
use crate::length::Length;
use crate::tree::Tree;

/// Cursor over the input, driven by a language's lex function.
///
/// A lexer lives for one parse call. The language's lex function programs
/// against it: inspect [`lookahead`](Lexer::lookahead), consume characters
/// with [`advance`](Lexer::advance), mark the token boundary with
/// [`start_token`](Lexer::start_token) (everything consumed before the mark
/// becomes the token's padding), and close the token with
/// [`emit`](Lexer::emit).
pub struct Lexer<'a> {
    input: &'a mut dyn Input,
    current_position: Length,
    token_start_position: Length,
    token_end_position: Length,
    /// Position at which lexing of the current token began; the span up to
    /// `token_start_position` is the token's padding.
    entry_position: Length,
    lookahead: Option<char>,
    debugger: Option<Rc<dyn Debugger>>,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(input: &'a mut dyn Input, debugger: Option<Rc<dyn Debugger>>) -> Lexer<'a> {
        Lexer {
            input,
            current_position: Length::ZERO,
            token_start_position: Length::ZERO,
            token_end_position: Length::ZERO,
            entry_position: Length::ZERO,
            lookahead: None,
            debugger,
        }
    }

    /// Seek to `position` and re-prime the lookahead character.
    pub(crate) fn reset(&mut self, position: Length) {
        self.current_position = position;
        self.token_start_position = position;
        self.token_end_position = position;
        self.entry_position = position;
        self.input.seek(position.chars);
        self.lookahead = self.input.read();
        self.debug(&format!("reset position:{}", position.chars));
    }

    /// The character at the cursor, or `None` at end of input.
    pub fn lookahead(&self) -> Option<char> {
        self.lookahead
    }

    /// Consume the current character into the token being lexed.
    pub fn advance(&mut self) {
        if let Some(c) = self.lookahead {
            self.debug(&format!("advance char:{c:?}"));
            self.current_position = self.current_position + Length::of_char(c);
            self.lookahead = self.input.read();
        }
    }

    /// Mark the start of the token. Characters consumed before this call
    /// become the emitted leaf's padding; every lex-function path must call
    /// it before [`emit`](Lexer::emit).
    pub fn start_token(&mut self) {
        self.token_start_position = self.current_position;
    }

    /// Close the current token and build its leaf.
    pub fn emit(&mut self, symbol: Symbol) -> Tree {
        debug_assert!(self.token_start_position.chars >= self.entry_position.chars);
        self.token_end_position = self.current_position;
        let padding = self.token_start_position - self.entry_position;
        let size = self.token_end_position - self.token_start_position;
        self.entry_position = self.current_position;
        self.debug(&format!(
            "token start:{}, size:{}",
            self.token_start_position.chars, size.chars
        ));
        Tree::leaf(symbol, padding, size)
    }

    /// Re-lay a reused node's extent against the cursor and re-prime the
    /// lookahead so subsequent lexing starts cleanly after it.
    pub(crate) fn resume_reused(&mut self, padding: Length, size: Length) {
        self.token_start_position = self.current_position + padding;
        self.token_end_position = self.token_start_position + size;
        self.current_position = self.token_end_position;
        self.entry_position = self.current_position;
        self.input.seek(self.current_position.chars);
        self.lookahead = self.input.read();
    }

    pub(crate) fn current_position(&self) -> Length {
        self.current_position
    }

    fn debug(&self, message: &str) {
        trace!(target: "regrow::lex", "{message}");
        if let Some(debugger) = &self.debugger {
            debugger.debug(DebugKind::Lex, message);
        }
    }
}
