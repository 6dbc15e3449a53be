//! A hand-compiled language pack for additive and multiplicative integer
//! expressions, with whitespace attached to the tree as extra tokens.
//!
//! The grammar is deliberately small — it exists to exercise the
//! `regrow-parser` runtime end to end, the same way a generated language
//! pack would drive it:
//!
//! ```text
//! expression := SUM | PRODUCT | INT
//! SUM        := expression PLUS expression   (left associative)
//! PRODUCT    := expression STAR expression   (left associative, binds tighter)
//! ```
//!
//! Reductions that resolve an operator-precedence conflict are fragile, so
//! an edit near an operator forces the surrounding reductions to be redone
//! on reparse while operands further out stay reusable.

use regrow_parser::{Arc, Language, LexState, Lexer, ParseAction, Symbol, Tree};

pub const INT: Symbol = Symbol(3);
pub const PLUS: Symbol = Symbol(4);
pub const STAR: Symbol = Symbol(5);
pub const WHITESPACE: Symbol = Symbol(6);
pub const SUM: Symbol = Symbol(7);
pub const PRODUCT: Symbol = Symbol(8);

const SYMBOL_COUNT: usize = 9;
const STATE_COUNT: usize = 6;

/// Operands: everything the expression states accept in operand position.
/// The error symbol is included so recovery can shift an error node where
/// an operand was expected.
const OPERANDS: [Symbol; 4] = [INT, SUM, PRODUCT, Symbol::ERROR];

fn lex(lexer: &mut Lexer<'_>, _state: LexState) -> Tree {
    lexer.start_token();
    match lexer.lookahead() {
        None => lexer.emit(Symbol::END),
        Some(c) if c.is_ascii_whitespace() => {
            while matches!(lexer.lookahead(), Some(c) if c.is_ascii_whitespace()) {
                lexer.advance();
            }
            lexer.emit(WHITESPACE)
        }
        Some(c) if c.is_ascii_digit() => {
            while matches!(lexer.lookahead(), Some(c) if c.is_ascii_digit()) {
                lexer.advance();
            }
            lexer.emit(INT)
        }
        Some('+') => {
            lexer.advance();
            lexer.emit(PLUS)
        }
        Some('*') => {
            lexer.advance();
            lexer.emit(STAR)
        }
        Some(_) => {
            lexer.advance();
            lexer.emit(Symbol::ERROR)
        }
    }
}

fn set(table: &mut [Vec<ParseAction>], state: usize, symbol: Symbol, action: ParseAction) {
    table[state * SYMBOL_COUNT + symbol.index()] = vec![action];
}

/// Build the language descriptor.
///
/// The six states:
/// 0. expecting the first operand
/// 1. one complete expression on the stack
/// 2. after `+`, expecting the right operand
/// 3. after `*`, expecting the right operand
/// 4. `expression + expression` on the stack
/// 5. `expression * expression` on the stack
pub fn language() -> Arc<Language> {
    let mut table = vec![Vec::new(); STATE_COUNT * SYMBOL_COUNT];

    // Whitespace may appear between any two tokens and stays in the
    // current state.
    for state in 0..STATE_COUNT {
        set(&mut table, state, WHITESPACE, ParseAction::ShiftExtra);
    }

    for operand in OPERANDS {
        set(&mut table, 0, operand, ParseAction::Shift { state: 1 });
        set(&mut table, 2, operand, ParseAction::Shift { state: 4 });
        set(&mut table, 3, operand, ParseAction::Shift { state: 5 });
    }

    set(&mut table, 1, Symbol::END, ParseAction::Accept);
    set(&mut table, 1, PLUS, ParseAction::Shift { state: 2 });
    set(&mut table, 1, STAR, ParseAction::Shift { state: 3 });

    // A `+` after `a + b` reduces first (left associativity); a `*` binds
    // tighter and shifts. The conflict-resolved reductions are fragile.
    set(
        &mut table,
        4,
        PLUS,
        ParseAction::ReduceFragile {
            symbol: SUM,
            child_count: 3,
        },
    );
    set(&mut table, 4, STAR, ParseAction::Shift { state: 3 });
    set(
        &mut table,
        4,
        Symbol::END,
        ParseAction::Reduce {
            symbol: SUM,
            child_count: 3,
        },
    );

    set(
        &mut table,
        5,
        PLUS,
        ParseAction::ReduceFragile {
            symbol: PRODUCT,
            child_count: 3,
        },
    );
    set(
        &mut table,
        5,
        STAR,
        ParseAction::ReduceFragile {
            symbol: PRODUCT,
            child_count: 3,
        },
    );
    set(
        &mut table,
        5,
        Symbol::END,
        ParseAction::Reduce {
            symbol: PRODUCT,
            child_count: 3,
        },
    );

    let language = Language::new(
        vec![
            "ERROR",
            "END",
            "DOCUMENT",
            "INT",
            "PLUS",
            "STAR",
            "WHITESPACE",
            "SUM",
            "PRODUCT",
        ],
        vec![false; SYMBOL_COUNT],
        vec![0; STATE_COUNT],
        table,
        lex,
    );

    match language {
        Ok(language) => Arc::new(language),
        Err(error) => unreachable!("arithmetic language tables are consistent: {error}"),
    }
}
