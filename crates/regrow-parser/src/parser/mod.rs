mod reconcile;

use std::rc::Rc;

use tracing::trace;
use triomphe::Arc;

use crate::debug::{DebugKind, Debugger};
use crate::input::Input;
use crate::language::{Language, LexState, ParseAction, StateId, Symbol, LEX_STATE_ERROR};
use crate::length::Length;
use crate::lexer::Lexer;
use crate::stack::Stack;
use crate::tree::Tree;

/// A localized edit to a previously parsed input, in characters.
///
/// Row and column coordinates are re-derived while lexing, so callers only
/// supply character counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEdit {
    pub position: usize,
    pub chars_inserted: usize,
    pub chars_removed: usize,
}

/// An incremental LR parser.
///
/// A parser is long-lived: parse an input once, then hand each edit to
/// [`parse`](Parser::parse) and the unchanged regions on both sides of the
/// edit are reused from the previous tree instead of being re-lexed and
/// re-parsed.
///
/// Parsing never fails. Invalid input turns into `ERROR` nodes inside the
/// returned tree, and every input yields a tree rooted at
/// [`Symbol::DOCUMENT`] whose extent matches the input length.
///
/// ```
/// # use regrow_parser::{Language, Parser, StringInput, Symbol, Tree, Lexer, LexState};
/// # fn lex(lexer: &mut Lexer<'_>, _state: LexState) -> Tree {
/// #     lexer.start_token();
/// #     match lexer.lookahead() {
/// #         Some(_) => {
/// #             lexer.advance();
/// #             lexer.emit(Symbol::FIRST_GRAMMAR)
/// #         }
/// #         None => lexer.emit(Symbol::END),
/// #     }
/// # }
/// # use regrow_parser::ParseAction;
/// # let mut table = vec![Vec::new(); 8];
/// # table[Symbol::FIRST_GRAMMAR.index()] = vec![ParseAction::Shift { state: 1 }];
/// # table[4 + Symbol::END.index()] = vec![ParseAction::Accept];
/// # table[4 + Symbol::FIRST_GRAMMAR.index()] = vec![ParseAction::Shift { state: 1 }];
/// # let language = Language::new(
/// #     vec!["ERROR", "END", "DOCUMENT", "LETTER"],
/// #     vec![false; 4],
/// #     vec![0, 0],
/// #     table,
/// #     lex,
/// # ).unwrap();
/// let mut parser = Parser::new(regrow_parser::Arc::new(language));
/// let tree = parser.parse(&mut StringInput::new("ab"), None);
/// assert_eq!(tree.symbol(), Symbol::DOCUMENT);
/// assert_eq!(tree.total_size().chars, 2);
/// ```
pub struct Parser {
    language: Arc<Language>,
    stack: Stack,
    right_stack: Stack,
    /// Expected character length of the input being parsed, maintained by
    /// reconciliation and used to locate right-stack nodes.
    total_chars: usize,
    lookahead: Option<Tree>,
    debugger: Option<Rc<dyn Debugger>>,
}

impl Parser {
    pub fn new(language: Arc<Language>) -> Parser {
        Parser {
            language,
            stack: Stack::new(),
            right_stack: Stack::new(),
            total_chars: 0,
            lookahead: None,
            debugger: None,
        }
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    /// Attach a trace sink, releasing any previous one. Pass `None` to
    /// detach.
    pub fn set_debugger(&mut self, debugger: Option<Rc<dyn Debugger>>) {
        self.debugger = debugger;
    }

    pub fn debugger(&self) -> Option<&Rc<dyn Debugger>> {
        self.debugger.as_ref()
    }

    /// Parse `input`. With no edit this is a parse from scratch; with an
    /// edit it is an incremental reparse against the tree returned by the
    /// previous call, reusing subtrees on both sides of the edit.
    pub fn parse(&mut self, input: &mut dyn Input, edit: Option<InputEdit>) -> Tree {
        let mut lexer = Lexer::new(input, self.debugger.clone());

        let position = match edit {
            Some(edit) => {
                self.debug(&format!(
                    "edit pos:{}, inserted:{}, removed:{}",
                    edit.position, edit.chars_inserted, edit.chars_removed
                ));
                self.break_down_left_stack(edit)
            }
            None => {
                self.debug("new_parse");
                self.stack.shrink(0);
                self.right_stack.shrink(0);
                Length::ZERO
            }
        };

        self.lookahead = None;
        lexer.reset(position);

        loop {
            let state = self.stack.top_state();
            if self.lookahead.is_none() {
                let lex_state = self.language.lex_state(state);
                let node = self.next_node(&mut lexer, lex_state);
                self.lookahead = Some(node);
            }
            let symbol = match &self.lookahead {
                Some(node) => {
                    debug_assert!(
                        !node.is_extra(),
                        "an extra token can never be the acted-on lookahead"
                    );
                    node.symbol()
                }
                None => unreachable!("lookahead was just fetched"),
            };

            self.debug(&format!(
                "lookahead state:{}, sym:{}",
                state,
                self.language.symbol_name(symbol)
            ));
            match self.language.action(state, symbol) {
                ParseAction::Shift { state: next_state } => {
                    if symbol == Symbol::ERROR {
                        self.debug("error_sym");
                        if !self.handle_error(&mut lexer) {
                            return self.finish();
                        }
                    } else {
                        self.debug(&format!("shift state:{next_state}"));
                        self.shift(next_state);
                    }
                }
                ParseAction::ShiftExtra => {
                    self.debug("shift_extra");
                    self.shift_extra(state);
                }
                ParseAction::Reduce {
                    symbol,
                    child_count,
                } => {
                    self.debug(&format!(
                        "reduce sym:{}, count:{}",
                        self.language.symbol_name(symbol),
                        child_count
                    ));
                    self.reduce(symbol, child_count);
                }
                ParseAction::ReduceExtra { symbol } => {
                    self.debug(&format!(
                        "reduce_extra sym:{}",
                        self.language.symbol_name(symbol)
                    ));
                    self.reduce_extra(symbol);
                }
                ParseAction::ReduceFragile {
                    symbol,
                    child_count,
                } => {
                    self.debug(&format!(
                        "reduce_fragile sym:{}, count:{}",
                        self.language.symbol_name(symbol),
                        child_count
                    ));
                    self.reduce_fragile(symbol, child_count);
                }
                ParseAction::Accept => {
                    self.debug("accept");
                    return self.finish();
                }
                ParseAction::Error => {
                    self.debug("error_sym");
                    if !self.handle_error(&mut lexer) {
                        return self.finish();
                    }
                }
            }
        }
    }

    /// The next lookahead: a reusable node from the right stack when one
    /// lines up with the cursor, otherwise the next lexed token.
    fn next_node(&mut self, lexer: &mut Lexer<'_>, lex_state: LexState) -> Tree {
        if let Some(node) = self.break_down_right_stack(lexer) {
            self.debug(&format!(
                "reuse sym:{}, size:{}",
                self.language.symbol_name(node.symbol()),
                node.total_size().chars
            ));
            lexer.resume_reused(node.padding(), node.size());
            return node;
        }
        self.language.lex(lexer, lex_state)
    }

    fn shift(&mut self, state: StateId) {
        if let Some(node) = self.lookahead.take() {
            self.stack.push(state, node);
        }
    }

    fn shift_extra(&mut self, state: StateId) {
        if let Some(node) = self.lookahead.as_mut() {
            node.set_extra();
        }
        self.shift(state);
    }

    /// Slice the top of the stack into a new parent node.
    ///
    /// The declared child count refers to grammar children; unless
    /// `count_extras` is set, extra tokens inside the slice widen it so
    /// that the parent still receives `declared` grammar children.
    fn reduce_slice(&mut self, symbol: Symbol, declared: usize, count_extras: bool) -> Tree {
        let mut child_count = declared;
        if !count_extras {
            let mut i = 0;
            while i < child_count {
                if child_count == self.stack.len() {
                    break;
                }
                let entry_index = self.stack.len() - 1 - i;
                if self.stack.node(entry_index).is_extra() {
                    child_count += 1;
                }
                i += 1;
            }
        }

        debug_assert!(child_count <= self.stack.len());
        let start = self.stack.len() - child_count;
        let children = self.stack.split_off_nodes(start);
        let hidden = self.language.is_hidden(symbol);
        Tree::node(symbol, children, hidden)
    }

    /// Push a freshly reduced node, deriving its state from the table
    /// unless the node is extra (extras stay in the current state).
    fn push_reduced(&mut self, node: Tree, extra: bool) {
        let top_state = self.stack.top_state();
        let state = if extra {
            top_state
        } else {
            self.language.action(top_state, node.symbol()).goto_state()
        };
        self.stack.push(state, node);
    }

    fn reduce(&mut self, symbol: Symbol, child_count: usize) {
        let node = self.reduce_slice(symbol, child_count, false);
        self.push_reduced(node, false);
    }

    fn reduce_extra(&mut self, symbol: Symbol) {
        let mut node = self.reduce_slice(symbol, 1, false);
        node.set_extra();
        self.push_reduced(node, true);
    }

    fn reduce_fragile(&mut self, symbol: Symbol, child_count: usize) {
        let mut node = self.reduce_slice(symbol, child_count, false);
        node.set_fragile_left();
        node.set_fragile_right();
        self.push_reduced(node, false);
    }

    /// Wrap `child_count` entries into an `ERROR` node. Extras count like
    /// ordinary children here, the node is fragile on both sides, and the
    /// whitespace in front of the unexpected lookahead is pulled into the
    /// error's extent so no characters go missing.
    fn reduce_error(&mut self, child_count: usize) {
        let mut node = self.reduce_slice(Symbol::ERROR, child_count, true);
        if let Some(lookahead) = self.lookahead.as_mut() {
            node.extend_size(lookahead.padding());
            lookahead.set_padding(Length::ZERO);
        }
        node.set_fragile_left();
        node.set_fragile_right();
        self.push_reduced(node, false);
    }

    /// Recover from an unexpected lookahead. Returns `false` when the end
    /// of input was reached without recovering; the driver then wraps up.
    fn handle_error(&mut self, lexer: &mut Lexer<'_>) -> bool {
        // Entries below the anchor were parsed before the error and stay
        // intact.
        let anchor = self.stack.len();

        loop {
            let symbol = match &self.lookahead {
                Some(node) => node.symbol(),
                None => unreachable!("recovery runs with a lookahead buffered"),
            };

            // Unwind the parse stack until a state is found in which an
            // error is expected and the current lookahead is expected
            // afterwards.
            for i in (0..anchor).rev() {
                let stack_state = self.stack.state(i);
                let on_error = self.language.action(stack_state, Symbol::ERROR);
                if let ParseAction::Shift {
                    state: state_after_error,
                } = on_error
                {
                    let action_after_error = self.language.action(state_after_error, symbol);
                    if !action_after_error.is_error() {
                        self.debug(&format!(
                            "recover state:{}, count:{}",
                            state_after_error,
                            self.stack.len() - i
                        ));
                        self.reduce_error(self.stack.len() - i - 1);
                        return true;
                    }
                }
            }

            // No stack state can recover with this lookahead. Keep the
            // token in the tree under the current state and skip to the
            // next one in the error lex state.
            if let Some(node) = &self.lookahead {
                self.debug(&format!(
                    "skip token:{}",
                    self.language.symbol_name(node.symbol())
                ));
            }
            let state = self.stack.top_state();
            self.shift(state);
            let node = self.next_node(lexer, LEX_STATE_ERROR);
            let at_end = node.symbol() == Symbol::END;
            self.lookahead = Some(node);

            if at_end {
                self.debug("fail_to_recover");
                self.reduce_error(self.stack.len() - anchor);
                return false;
            }
        }
    }

    /// Wrap the whole stack into the document node, extras and all.
    fn finish(&mut self) -> Tree {
        self.reduce(Symbol::DOCUMENT, self.stack.len());
        match self.stack.top_node() {
            Some(node) => node.clone(),
            None => unreachable!("finish always leaves the document on the stack"),
        }
    }

    pub(crate) fn debug(&self, message: &str) {
        trace!(target: "regrow::parse", "{message}");
        if let Some(debugger) = &self.debugger {
            debugger.debug(DebugKind::Parse, message);
        }
    }
}
