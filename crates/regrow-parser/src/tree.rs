use std::fmt;

use triomphe::Arc;

use crate::language::Symbol;
use crate::length::Length;

#[derive(Debug, Clone, PartialEq, Eq)]
struct TreeData {
    symbol: Symbol,
    padding: Length,
    size: Length,
    children: Vec<Tree>,
    extra: bool,
    fragile_left: bool,
    fragile_right: bool,
    hidden: bool,
}

/// A node in a concrete syntax tree.
///
/// Nodes are immutable once shared; cloning a `Tree` shares the node by
/// reference count, and dropping the last reference releases the children
/// recursively. The flag mutators used by the parse driver copy the node
/// first if it is still referenced elsewhere, so trees handed out by a
/// previous parse are never changed behind the caller's back.
#[derive(Clone, PartialEq, Eq)]
pub struct Tree(Arc<TreeData>);

impl Tree {
    /// Build a terminal node.
    pub fn leaf(symbol: Symbol, padding: Length, size: Length) -> Tree {
        Tree(Arc::new(TreeData {
            symbol,
            padding,
            size,
            children: Vec::new(),
            extra: false,
            fragile_left: false,
            fragile_right: false,
            hidden: false,
        }))
    }

    /// Build a non-terminal over `children`.
    ///
    /// Leading children without content fold their whole extent into the
    /// parent's padding; the first child with content contributes its own
    /// padding to the parent's padding and starts the parent's size, and
    /// every later child extends the size by its total extent.
    pub fn node(symbol: Symbol, children: Vec<Tree>, hidden: bool) -> Tree {
        let mut padding = Length::ZERO;
        let mut size = Length::ZERO;
        let mut have_content = false;
        for child in &children {
            if have_content {
                size = size + child.total_size();
            } else if child.is_empty() {
                padding = padding + child.total_size();
            } else {
                padding = padding + child.padding();
                size = child.size();
                have_content = true;
            }
        }
        Tree(Arc::new(TreeData {
            symbol,
            padding,
            size,
            children,
            extra: false,
            fragile_left: false,
            fragile_right: false,
            hidden,
        }))
    }

    pub fn symbol(&self) -> Symbol {
        self.0.symbol
    }

    /// The extent of ignorable text preceding this node's content.
    pub fn padding(&self) -> Length {
        self.0.padding
    }

    /// The extent of this node's own content, excluding padding.
    pub fn size(&self) -> Length {
        self.0.size
    }

    pub fn total_size(&self) -> Length {
        self.0.padding + self.0.size
    }

    pub fn children(&self) -> &[Tree] {
        &self.0.children
    }

    pub fn child_count(&self) -> usize {
        self.0.children.len()
    }

    pub fn is_extra(&self) -> bool {
        self.0.extra
    }

    /// True when the node has no content of its own.
    pub fn is_empty(&self) -> bool {
        self.0.size.chars == 0
    }

    pub fn is_fragile_left(&self) -> bool {
        self.0.fragile_left
    }

    pub fn is_fragile_right(&self) -> bool {
        self.0.fragile_right
    }

    pub fn is_hidden(&self) -> bool {
        self.0.hidden
    }

    pub(crate) fn set_extra(&mut self) {
        Arc::make_mut(&mut self.0).extra = true;
    }

    pub(crate) fn set_fragile_left(&mut self) {
        Arc::make_mut(&mut self.0).fragile_left = true;
    }

    pub(crate) fn set_fragile_right(&mut self) {
        Arc::make_mut(&mut self.0).fragile_right = true;
    }

    pub(crate) fn set_padding(&mut self, padding: Length) {
        Arc::make_mut(&mut self.0).padding = padding;
    }

    pub(crate) fn extend_size(&mut self, amount: Length) {
        let data = Arc::make_mut(&mut self.0);
        data.size = data.size + amount;
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}
