use uuid::Uuid;

use crate::{flat::Tree, Actor, Time, STUB_UUID};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct CommentId(pub Uuid);

impl CommentId {
    pub fn new_v4() -> CommentId {
        CommentId(Uuid::new_v4())
    }

    pub fn stub() -> CommentId {
        CommentId(STUB_UUID)
    }
}

/// One discussion context, eg. a lesson or a course
#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct ContextId(pub Uuid);

impl ContextId {
    pub fn stub() -> ContextId {
        ContextId(STUB_UUID)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationState {
    #[default]
    Published,
    Flagged,
    Rejected,
}

/// A comment as seen by one actor
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct CommentView {
    pub id: CommentId,
    pub body: String,
    pub author: Actor,
    pub created_at: Time,
    pub edited_at: Option<Time>,
    pub like_count: u64,

    /// Whether the actor this view was computed for likes this comment
    pub liked_by_actor: bool,

    pub moderation: ModerationState,
    pub report_reason: Option<String>,

    /// Replies, in the order they were posted
    ///
    /// Serialized by whatever holds the view, see [`crate::flat`].
    #[serde(skip)]
    pub children: Vec<CommentView>,
}

impl CommentView {
    /// Number of comments in this subtree, including this one
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|c| c.subtree_len())
            .sum::<usize>()
    }
}

impl Tree for CommentView {
    fn id(&self) -> CommentId {
        self.id
    }

    fn children(&self) -> &[CommentView] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<CommentView> {
        &mut self.children
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ThreadView {
    pub context: ContextId,

    #[serde(with = "crate::flat")]
    pub comments: Vec<CommentView>,
}

impl ThreadView {
    pub fn len(&self) -> usize {
        self.comments.iter().map(|c| c.subtree_len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}
