//! Edit reconciliation: splitting the previous parse into a reusable left
//! prefix and a reusable right suffix around an edit.

use super::{InputEdit, Parser};
use crate::language::{ParseAction, Symbol};
use crate::length::Length;
use crate::lexer::Lexer;
use crate::tree::Tree;

impl Parser {
    /// Break the previous parse down around `edit`.
    ///
    /// Pops the left stack until it is valid up to the edit, re-pushing the
    /// children that precede the edit under table-derived states, and seeds
    /// the right stack with the subtrees that lie entirely past the edit
    /// window (shifted by the edit's net character delta). Returns the
    /// position at which lexing must resume.
    pub(super) fn break_down_left_stack(&mut self, edit: InputEdit) -> Length {
        self.right_stack.shrink(0);

        let prev_size = self.stack.total_tree_size();
        debug_assert!(edit.chars_removed <= prev_size.chars + edit.chars_inserted);
        self.total_chars = prev_size.chars + edit.chars_inserted - edit.chars_removed;

        let mut left_end = prev_size;
        let mut right_start = self.total_chars;

        loop {
            let node = match self.stack.top_node() {
                Some(node) => node.clone(),
                None => break,
            };

            // The stack is valid up through a leaf that ends before the
            // edit, unless that leaf is an error.
            if left_end.chars < edit.position
                && node.child_count() == 0
                && node.symbol() != Symbol::ERROR
            {
                break;
            }

            self.debug(&format!(
                "pop_left sym:{}, state:{}",
                self.language.symbol_name(node.symbol()),
                self.stack.top_state()
            ));
            self.stack.shrink(self.stack.len() - 1);
            left_end = left_end - node.total_size();

            let children = node.children();

            // Re-push the children that end before the edit, deriving each
            // child's state from the parse table.
            let mut taken = 0;
            while taken < children.len() && left_end.chars < edit.position {
                let child = &children[taken];
                let state = self.stack.top_state();
                let next_state = if child.is_extra() {
                    state
                } else {
                    match self.language.action(state, child.symbol()) {
                        ParseAction::Shift { state } => state,
                        // The table no longer shifts this child here, so it
                        // cannot be reused as-is; decompose further.
                        _ => break,
                    }
                };
                self.debug(&format!(
                    "push_left sym:{}, state:{}",
                    self.language.symbol_name(child.symbol()),
                    next_state
                ));
                self.stack.push(next_state, child.clone());
                left_end = left_end + child.total_size();
                taken += 1;
            }

            // Seed the right stack with the remaining children that lie at
            // or past the end of the inserted text, rightmost first, so the
            // child nearest the edit ends up on top.
            for child in children[taken..].iter().rev() {
                right_start = match right_start.checked_sub(child.total_size().chars) {
                    Some(start) => start,
                    None => break,
                };
                if right_start < edit.position + edit.chars_inserted {
                    break;
                }
                self.debug(&format!(
                    "push_right sym:{}",
                    self.language.symbol_name(child.symbol())
                ));
                self.right_stack.push(0, child.clone());
            }

            // Dropping `node` here releases it; re-pushed children hold
            // their own references.
        }

        self.debug(&format!(
            "reuse_left chars:{}, state:{}",
            left_end.chars,
            self.stack.top_state()
        ));
        left_end
    }

    /// Surface the next reusable node from the right stack, decomposing
    /// nodes that overlap the cursor into their children. Returns `None`
    /// when the lexer has to produce the next token instead.
    pub(super) fn break_down_right_stack(&mut self, lexer: &Lexer<'_>) -> Option<Tree> {
        if self.right_stack.is_empty() {
            return None;
        }

        let current = lexer.current_position().chars;
        let state = self.stack.top_state();

        let mut right_start = self
            .total_chars
            .checked_sub(self.right_stack.total_tree_size().chars)?;

        loop {
            let node = self.right_stack.top_node()?.clone();

            // The nearest reusable node still lies past the cursor; the
            // gap has to be lexed first.
            if right_start > current {
                return None;
            }

            let action = self.language.action(state, node.symbol());
            let usable = !action.is_error()
                && !node.is_extra()
                && !node.is_empty()
                && !node.is_fragile_left()
                && !node.is_fragile_right();
            if usable && right_start == current {
                self.right_stack.shrink(self.right_stack.len() - 1);
                return Some(node);
            }

            self.debug(&format!(
                "pop_right sym:{}",
                self.language.symbol_name(node.symbol())
            ));
            self.right_stack.shrink(self.right_stack.len() - 1);
            right_start += node.total_size().chars;

            // Expose the children, earliest on top, dropping the ones that
            // end at or before the cursor.
            for child in node.children().iter().rev() {
                if right_start <= current {
                    break;
                }
                self.debug(&format!(
                    "push_right sym:{}",
                    self.language.symbol_name(child.symbol())
                ));
                self.right_stack.push(0, child.clone());
                right_start -= child.total_size().chars;
            }
        }
    }
}
