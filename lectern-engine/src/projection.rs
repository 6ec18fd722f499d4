use crate::{
    api::{Actor, CommentView, ThreadView, UserId},
    Comment, Thread,
};

impl Comment {
    /// The view of this comment and its replies, as seen by `viewer`
    pub fn view_for(&self, viewer: &UserId) -> CommentView {
        CommentView {
            id: self.id,
            body: self.body.clone(),
            author: self.author.clone(),
            created_at: self.created_at,
            edited_at: self.edited_at,
            like_count: self.like_count(),
            liked_by_actor: self.is_liked_by(viewer),
            moderation: self.moderation,
            report_reason: self.report_reason.clone(),
            children: self.children.iter().map(|c| c.view_for(viewer)).collect(),
        }
    }
}

pub fn project_for(thread: &Thread, actor: &Actor) -> ThreadView {
    ThreadView {
        context: thread.context,
        comments: thread.roots.iter().map(|c| c.view_for(&actor.id)).collect(),
    }
}
