//! Locating comments anywhere in a tree.
//!
//! Every lookup uses the same order: all comments of one sibling sequence are
//! checked first, then the children of each of those comments are searched in
//! turn, starting from the root sequence. `walk` yields comments in that exact
//! order too.

use crate::{api::CommentId, api::Error, Comment};

/// A located comment, along with the sequence that holds it
///
/// The holding sequence is either the root list of the thread or the children
/// of some other comment, which makes it possible to remove or replace the
/// comment in place.
#[derive(Debug)]
pub struct Slot<'a> {
    container: &'a mut Vec<Comment>,
    index: usize,
    parent: Option<CommentId>,
    depth: usize,
}

impl<'a> Slot<'a> {
    pub fn comment(&self) -> &Comment {
        &self.container[self.index]
    }

    pub fn comment_mut(&mut self) -> &mut Comment {
        &mut self.container[self.index]
    }

    pub fn into_comment(self) -> &'a mut Comment {
        &mut self.container[self.index]
    }

    /// `None` for root comments
    pub fn parent(&self) -> Option<CommentId> {
        self.parent
    }

    /// 0 for root comments, 1 for direct replies to a root, etc.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Removes the comment along with all its replies
    pub fn remove(self) -> Comment {
        self.container.remove(self.index)
    }

    pub fn replace(self, with: Comment) -> Comment {
        std::mem::replace(&mut self.container[self.index], with)
    }
}

pub fn find<'a>(comments: &'a [Comment], id: &CommentId) -> Option<&'a Comment> {
    if let Some(c) = comments.iter().find(|c| c.id == *id) {
        return Some(c);
    }
    for c in comments {
        if let Some(res) = find(&c.children, id) {
            return Some(res);
        }
    }
    None
}

pub fn find_slot<'a>(roots: &'a mut Vec<Comment>, id: &CommentId) -> Option<Slot<'a>> {
    find_slot_in(roots, id, None, 0)
}

fn find_slot_in<'a>(
    container: &'a mut Vec<Comment>,
    id: &CommentId,
    parent: Option<CommentId>,
    depth: usize,
) -> Option<Slot<'a>> {
    if let Some(index) = container.iter().position(|c| c.id == *id) {
        return Some(Slot {
            container,
            index,
            parent,
            depth,
        });
    }
    for c in container.iter_mut() {
        let parent = Some(c.id);
        if let Some(res) = find_slot_in(&mut c.children, id, parent, depth + 1) {
            return Some(res);
        }
    }
    None
}

/// Runs `f` on the comment `id`, failing with `NotFound` if there is none
///
/// `f` must do all its checks before changing anything, so that a failure
/// leaves the tree untouched.
pub fn apply<'a, T>(
    roots: &'a mut Vec<Comment>,
    id: &CommentId,
    f: impl FnOnce(Slot<'a>) -> Result<T, Error>,
) -> Result<T, Error> {
    let slot = find_slot(roots, id).ok_or(Error::NotFound(*id))?;
    f(slot)
}

pub fn walk(roots: &[Comment]) -> Walk<'_> {
    Walk {
        current: roots,
        pos: 0,
        stack: Vec::new(),
    }
}

pub struct Walk<'a> {
    current: &'a [Comment],
    pos: usize,

    /// Sibling sequences still to visit, next one on top
    stack: Vec<&'a [Comment]>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Comment;

    fn next(&mut self) -> Option<&'a Comment> {
        loop {
            if let Some(c) = self.current.get(self.pos) {
                self.pos += 1;
                return Some(c);
            }
            let done = std::mem::take(&mut self.current);
            self.stack.extend(done.iter().rev().map(|c| &c.children[..]));
            self.current = self.stack.pop()?;
            self.pos = 0;
        }
    }
}
