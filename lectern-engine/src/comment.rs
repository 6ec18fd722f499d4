use std::collections::BTreeSet;

use crate::api::{flat::Tree, Actor, CommentId, ModerationState, Time, UserId};

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Comment {
    pub id: CommentId,
    pub body: String,
    pub author: Actor,
    pub created_at: Time,
    pub edited_at: Option<Time>,

    /// Users who currently like this comment
    pub likes: BTreeSet<UserId>,

    pub moderation: ModerationState,

    /// Most recent report reason, kept after a rejection
    pub report_reason: Option<String>,

    /// Replies, in insertion order
    #[serde(skip)]
    pub children: Vec<Comment>,
}

impl Comment {
    pub fn new(author: Actor, body: String, now: Time) -> Comment {
        Comment {
            id: CommentId::new_v4(),
            body,
            author,
            created_at: now,
            edited_at: None,
            likes: BTreeSet::new(),
            moderation: ModerationState::Published,
            report_reason: None,
            children: Vec::new(),
        }
    }

    pub fn like_count(&self) -> u64 {
        self.likes.len() as u64
    }

    pub fn is_liked_by(&self, user: &UserId) -> bool {
        self.likes.contains(user)
    }

    /// Returns whether `user` likes the comment after the toggle
    pub fn toggle_like(&mut self, user: UserId) -> bool {
        if self.likes.remove(&user) {
            false
        } else {
            self.likes.insert(user);
            true
        }
    }

    /// Number of comments in this subtree, including this one
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|c| c.subtree_len())
            .sum::<usize>()
    }
}

impl Tree for Comment {
    fn id(&self) -> CommentId {
        self.id
    }

    fn children(&self) -> &[Comment] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<Comment> {
        &mut self.children
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::api::{Role, Uuid};

    #[test]
    fn like_toggles_back_and_forth() {
        let author = Actor::new(UserId(Uuid::new_v4()), "alice", Role::Learner);
        let mut c = Comment::new(author, String::from("hello"), Utc::now());
        let bob = UserId(Uuid::new_v4());
        assert!(c.toggle_like(bob));
        assert!(c.is_liked_by(&bob));
        assert_eq!(c.like_count(), 1);
        assert!(!c.toggle_like(bob));
        assert!(!c.is_liked_by(&bob));
        assert_eq!(c.like_count(), 0);
    }
}
