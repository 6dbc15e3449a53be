use std::fmt;

use crate::error::LanguageError;
use crate::lexer::Lexer;
use crate::tree::Tree;

/// A compact tag for a terminal or non-terminal in a language's alphabet.
///
/// The first three values are builtin; grammar symbols start at
/// [`Symbol::FIRST_GRAMMAR`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(pub u16);

impl Symbol {
    /// The error non-terminal produced by recovery.
    pub const ERROR: Symbol = Symbol(0);
    /// The end-of-input terminal.
    pub const END: Symbol = Symbol(1);
    /// The root symbol wrapping every finished parse.
    pub const DOCUMENT: Symbol = Symbol(2);
    /// The first value available to grammar symbols.
    pub const FIRST_GRAMMAR: Symbol = Symbol(3);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a row in the parse table. State 0 is the start state and the
/// top state of an empty parse stack.
pub type StateId = u16;

/// Index of a mode in a language's lexer.
pub type LexState = u16;

/// The lex state used while error recovery skips tokens.
pub const LEX_STATE_ERROR: LexState = u16::MAX;

/// One entry of a parse-table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseAction {
    Shift { state: StateId },
    ShiftExtra,
    Reduce { symbol: Symbol, child_count: usize },
    ReduceExtra { symbol: Symbol },
    ReduceFragile { symbol: Symbol, child_count: usize },
    Accept,
    Error,
}

impl ParseAction {
    /// The target state of a shift, and state 0 for every other action.
    pub(crate) fn goto_state(self) -> StateId {
        match self {
            ParseAction::Shift { state } => state,
            _ => 0,
        }
    }

    pub(crate) fn is_error(self) -> bool {
        matches!(self, ParseAction::Error)
    }
}

/// A language's lex entry point: emit the next terminal as a leaf,
/// [`Symbol::END`] at end of input.
pub type LexFn = fn(&mut Lexer<'_>, LexState) -> Tree;

/// A compiled language: parse table, lexer entry point and symbol metadata.
///
/// Descriptors are read-only and may be shared between parsers.
pub struct Language {
    symbol_count: usize,
    state_count: usize,
    symbol_names: Vec<&'static str>,
    hidden_symbols: Vec<bool>,
    lex_states: Vec<LexState>,
    parse_table: Vec<Vec<ParseAction>>,
    lex_fn: LexFn,
}

impl Language {
    /// Assemble a language, validating that the tables agree on symbol and
    /// state counts.
    ///
    /// `symbol_names` defines the symbol alphabet (one entry per symbol,
    /// builtins included); `lex_states` has one entry per parse state; the
    /// parse table is a dense `states x symbols` grid of action lists in
    /// row-major order. An empty cell means `Error`, and only the first
    /// entry of a cell is ever consulted.
    pub fn new(
        symbol_names: Vec<&'static str>,
        hidden_symbols: Vec<bool>,
        lex_states: Vec<LexState>,
        parse_table: Vec<Vec<ParseAction>>,
        lex_fn: LexFn,
    ) -> Result<Language, LanguageError> {
        let symbol_count = symbol_names.len();
        let state_count = lex_states.len();

        if symbol_count < Symbol::FIRST_GRAMMAR.index() {
            return Err(LanguageError::MissingBuiltins {
                expected: Symbol::FIRST_GRAMMAR.index(),
                found: symbol_count,
            });
        }
        if state_count == 0 {
            return Err(LanguageError::NoStates);
        }
        if hidden_symbols.len() != symbol_count {
            return Err(LanguageError::HiddenFlagCount {
                expected: symbol_count,
                found: hidden_symbols.len(),
            });
        }
        if parse_table.len() != state_count * symbol_count {
            return Err(LanguageError::TableSize {
                expected: state_count * symbol_count,
                found: parse_table.len(),
                state_count,
                symbol_count,
            });
        }

        Ok(Language {
            symbol_count,
            state_count,
            symbol_names,
            hidden_symbols,
            lex_states,
            parse_table,
            lex_fn,
        })
    }

    pub fn symbol_count(&self) -> usize {
        self.symbol_count
    }

    pub fn state_count(&self) -> usize {
        self.state_count
    }

    pub fn symbol_name(&self, symbol: Symbol) -> &'static str {
        self.symbol_names[symbol.index()]
    }

    pub fn is_hidden(&self, symbol: Symbol) -> bool {
        self.hidden_symbols[symbol.index()]
    }

    /// The first action for `(state, symbol)`; an empty cell is an error.
    pub fn action(&self, state: StateId, symbol: Symbol) -> ParseAction {
        let cell = &self.parse_table[state as usize * self.symbol_count + symbol.index()];
        cell.first().copied().unwrap_or(ParseAction::Error)
    }

    pub(crate) fn lex_state(&self, state: StateId) -> LexState {
        self.lex_states[state as usize]
    }

    pub(crate) fn lex(&self, lexer: &mut Lexer<'_>, lex_state: LexState) -> Tree {
        (self.lex_fn)(lexer, lex_state)
    }
}

impl fmt::Debug for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Language")
            .field("symbol_count", &self.symbol_count)
            .field("state_count", &self.state_count)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::{Language, LexState, ParseAction, Symbol};
    use crate::error::LanguageError;
    use crate::lexer::Lexer;
    use crate::tree::Tree;

    fn lex_nothing(lexer: &mut Lexer<'_>, _state: LexState) -> Tree {
        lexer.start_token();
        lexer.emit(Symbol::END)
    }

    #[test]
    fn rejects_missing_builtins() {
        let err = Language::new(vec!["ERROR", "END"], vec![false; 2], vec![0], vec![], lex_nothing)
            .unwrap_err();
        assert_eq!(
            err,
            LanguageError::MissingBuiltins {
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn rejects_mismatched_hidden_flags() {
        let err = Language::new(
            vec!["ERROR", "END", "DOCUMENT"],
            vec![false; 2],
            vec![0],
            vec![Vec::new(); 3],
            lex_nothing,
        )
        .unwrap_err();
        assert_eq!(
            err,
            LanguageError::HiddenFlagCount {
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn rejects_wrong_table_size() {
        let err = Language::new(
            vec!["ERROR", "END", "DOCUMENT"],
            vec![false; 3],
            vec![0, 0],
            vec![Vec::new(); 3],
            lex_nothing,
        )
        .unwrap_err();
        assert_eq!(
            err,
            LanguageError::TableSize {
                expected: 6,
                found: 3,
                state_count: 2,
                symbol_count: 3
            }
        );
    }

    #[test]
    fn empty_cell_is_an_error_action() {
        let language = Language::new(
            vec!["ERROR", "END", "DOCUMENT"],
            vec![false; 3],
            vec![0],
            vec![Vec::new(); 3],
            lex_nothing,
        )
        .unwrap();
        assert_eq!(language.action(0, Symbol::END), ParseAction::Error);
    }

    #[test]
    fn first_cell_entry_wins() {
        let mut table = vec![Vec::new(); 3];
        table[Symbol::END.index()] = vec![ParseAction::Accept, ParseAction::Error];
        let language = Language::new(
            vec!["ERROR", "END", "DOCUMENT"],
            vec![false; 3],
            vec![0],
            table,
            lex_nothing,
        )
        .unwrap();
        assert_eq!(language.action(0, Symbol::END), ParseAction::Accept);
    }

    #[test]
    fn goto_state_of_non_shift_is_start() {
        assert_eq!(ParseAction::Accept.goto_state(), 0);
        assert_eq!(ParseAction::Shift { state: 7 }.goto_state(), 7);
    }
}
