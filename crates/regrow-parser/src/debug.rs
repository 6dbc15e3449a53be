use crate::language::Language;
use crate::tree::Tree;

/// Which half of the runtime produced a debug event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugKind {
    Parse,
    Lex,
}

/// A sink for runtime trace events.
///
/// Attach one with [`Parser::set_debugger`](crate::Parser::set_debugger) to
/// observe shifts, reductions, recovery and subtree reuse as they happen.
/// The same events are always emitted at `trace` level through `tracing`,
/// whether or not a sink is attached. The sink is released (dropped) when it
/// is replaced or when the parser is dropped.
pub trait Debugger {
    fn debug(&self, kind: DebugKind, message: &str);
}

/// Render a tree with symbol names resolved, one node per line.
///
/// Content ranges are in characters; extra tokens are marked. Fragile flags
/// are reuse bookkeeping and deliberately left out, so two parses of the
/// same text render identically regardless of how much was reused.
pub fn render_tree(tree: &Tree, language: &Language) -> String {
    let mut out = String::new();
    render(tree, language, 0, 0, &mut out);
    out
}

fn render(tree: &Tree, language: &Language, position: usize, depth: usize, out: &mut String) {
    let start = position + tree.padding().chars;
    let end = start + tree.size().chars;
    for _ in 0..depth {
        out.push_str("  ");
    }
    out.push_str(language.symbol_name(tree.symbol()));
    out.push_str(&format!("@{start}..{end}"));
    if tree.is_extra() {
        out.push_str(" (extra)");
    }
    out.push('\n');

    // Children tile the node's padded extent; the node's own padding is
    // derived from the leading children.
    let mut child_position = position;
    for child in tree.children() {
        render(child, language, child_position, depth + 1, out);
        child_position += child.total_size().chars;
    }
}
