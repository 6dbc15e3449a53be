use pretty_assertions::assert_eq;
use std::rc::Rc;

use regrow_arith::language;
use regrow_parser::{Debugger, InputEdit, Parser, StringInput};

use crate::common::{parse_fresh, render, splice, Recorder};

/// Reparse `text` after `edit` (inserting `insert`) and check the result
/// against a from-scratch parse of the edited text. Returns the recorder so
/// callers can inspect how much was reused.
fn reparse_and_check(text: &str, edit: InputEdit, insert: &str) -> Rc<Recorder> {
    let recorder = Recorder::new();
    let mut parser = Parser::new(language());
    parser.set_debugger(Some(recorder.clone() as Rc<dyn Debugger>));
    parser.parse(&mut StringInput::new(text), None);

    let edited_text = splice(text, edit, insert);
    recorder.clear();
    let edited = parser.parse(&mut StringInput::new(&edited_text), Some(edit));

    assert_eq!(
        edited.total_size().chars,
        edited_text.chars().count(),
        "length mismatch after editing {text:?} into {edited_text:?}"
    );
    let (_, fresh) = parse_fresh(&edited_text);
    assert_eq!(
        render(&edited),
        render(&fresh),
        "incremental parse of {edited_text:?} diverged from a fresh parse"
    );
    recorder
}

#[test]
fn widening_the_left_operand_reuses_the_right_side() {
    // "1+2" -> "10+2": only the first INT is re-lexed; the PLUS and the
    // right-hand INT come back from the previous parse.
    let recorder = reparse_and_check(
        "1+2",
        InputEdit {
            position: 1,
            chars_inserted: 1,
            chars_removed: 0,
        },
        "0",
    );
    assert!(recorder.count_prefixed("reuse ") >= 2);
    assert_eq!(recorder.count_prefixed("reuse sym:PLUS"), 1);
    assert_eq!(recorder.count_prefixed("reuse sym:INT"), 1);
}

#[test]
fn deleting_the_operator_merges_the_operands() {
    // "1+2" -> "12": the old right-hand INT no longer lines up with a token
    // boundary, so nothing is reused and the result is a single INT.
    let recorder = reparse_and_check(
        "1+2",
        InputEdit {
            position: 1,
            chars_inserted: 0,
            chars_removed: 1,
        },
        "",
    );
    assert_eq!(recorder.count_prefixed("reuse "), 0);
}

#[test]
fn replacing_an_operator_rebuilds_around_reused_operands() {
    // "1+2+3" -> "1*2+3": the reductions around the replaced operator are
    // redone, but the trailing operands come back from the previous parse.
    let recorder = reparse_and_check(
        "1+2+3",
        InputEdit {
            position: 1,
            chars_inserted: 1,
            chars_removed: 1,
        },
        "*",
    );
    assert!(recorder.count_prefixed("reuse sym:INT") >= 1);
    // Fragile reductions from the previous parse are never reused.
    assert_eq!(recorder.count_prefixed("reuse sym:SUM"), 0);
    assert_eq!(recorder.count_prefixed("reuse sym:PRODUCT"), 0);
}

#[test]
fn editing_an_operand_keeps_the_far_side() {
    // "1+2+3" -> "1+9+3": the middle operand is re-lexed, the trailing INT
    // is reused.
    let recorder = reparse_and_check(
        "1+2+3",
        InputEdit {
            position: 2,
            chars_inserted: 1,
            chars_removed: 1,
        },
        "9",
    );
    assert!(recorder.count_prefixed("reuse sym:INT") >= 1);
}

#[test]
fn null_edit_reuses_the_whole_tree() {
    let recorder = reparse_and_check(
        "1+2",
        InputEdit {
            position: 0,
            chars_inserted: 0,
            chars_removed: 0,
        },
        "",
    );
    assert!(recorder.count_prefixed("reuse sym:SUM") >= 1);
}

#[test]
fn extras_are_never_reused_as_lookahead() {
    // "1 + 2" -> "1 * 2": the whitespace next to the replaced operator is
    // re-lexed; the reused nodes are real tokens.
    let recorder = reparse_and_check(
        "1 + 2",
        InputEdit {
            position: 2,
            chars_inserted: 1,
            chars_removed: 1,
        },
        "*",
    );
    assert_eq!(recorder.count_prefixed("reuse sym:WHITESPACE"), 0);
    assert!(recorder.count_prefixed("reuse sym:INT") >= 1);
}

#[test]
fn appending_extends_the_parse() {
    reparse_and_check(
        "1+2",
        InputEdit {
            position: 3,
            chars_inserted: 2,
            chars_removed: 0,
        },
        "+3",
    );
}

#[test]
fn edits_chain_across_reparses() {
    let mut parser = Parser::new(language());
    parser.parse(&mut StringInput::new("1+2"), None);

    let first = InputEdit {
        position: 1,
        chars_inserted: 1,
        chars_removed: 0,
    };
    let text = splice("1+2", first, "0");
    let tree = parser.parse(&mut StringInput::new(&text), Some(first));
    assert_eq!(render(&tree), render(&parse_fresh(&text).1));

    let second = InputEdit {
        position: 2,
        chars_inserted: 1,
        chars_removed: 1,
    };
    let text = splice(&text, second, "*");
    assert_eq!(text, "10*2");
    let tree = parser.parse(&mut StringInput::new(&text), Some(second));
    assert_eq!(render(&tree), render(&parse_fresh(&text).1));
}

#[test]
fn editing_inside_an_error_region_reparses_it() {
    let recorder = reparse_and_check(
        "1+$+2",
        InputEdit {
            position: 2,
            chars_inserted: 1,
            chars_removed: 1,
        },
        "9",
    );
    // The error node is fragile, so nothing inside it survives the edit.
    assert_eq!(recorder.count_prefixed("reuse sym:ERROR"), 0);
}

#[test]
fn reused_nodes_keep_their_contents() {
    // Reuse safety: the reused right-hand INT spans the same two characters
    // it did in the previous parse, shifted by the edit delta.
    let mut parser = Parser::new(language());
    parser.parse(&mut StringInput::new("1+23"), None);

    let edit = InputEdit {
        position: 1,
        chars_inserted: 1,
        chars_removed: 0,
    };
    let tree = parser.parse(&mut StringInput::new("10+23"), Some(edit));
    let sum = &tree.children()[0];
    let right = sum.children().last().expect("sum has children");
    assert_eq!(right.size().chars, 2);
}
