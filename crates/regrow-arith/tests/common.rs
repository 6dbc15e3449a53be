use std::cell::RefCell;
use std::rc::Rc;

use regrow_arith::language;
use regrow_parser::{render_tree, DebugKind, Debugger, InputEdit, Parser, StringInput, Tree};

/// A debug sink that records parse events, used to observe how much of a
/// previous parse was reused.
#[derive(Default)]
pub struct Recorder {
    events: RefCell<Vec<String>>,
}

impl Recorder {
    pub fn new() -> Rc<Recorder> {
        Rc::new(Recorder::default())
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    pub fn count_prefixed(&self, prefix: &str) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| event.starts_with(prefix))
            .count()
    }
}

impl Debugger for Recorder {
    fn debug(&self, kind: DebugKind, message: &str) {
        if kind == DebugKind::Parse {
            self.events.borrow_mut().push(message.to_string());
        }
    }
}

pub fn parse_fresh(text: &str) -> (Parser, Tree) {
    let mut parser = Parser::new(language());
    let tree = parser.parse(&mut StringInput::new(text), None);
    (parser, tree)
}

/// Render against a fresh descriptor; only symbol names are consulted.
pub fn render(tree: &Tree) -> String {
    render_tree(tree, &language())
}

/// Apply `edit` to `text`, inserting `insert` at the edit position.
pub fn splice(text: &str, edit: InputEdit, insert: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    assert_eq!(insert.chars().count(), edit.chars_inserted);
    let mut out: String = chars[..edit.position].iter().collect();
    out.push_str(insert);
    out.extend(chars[edit.position + edit.chars_removed..].iter());
    out
}
