use crate::{
    api::{
        self, Actor, CommentId, CommentView, ContextId, Decision, Error, Intent, ModerationState,
        Outcome, SortOrder, ThreadView,
    },
    project_for,
    resolver::{self, Walk},
    Clock, Comment, OrderExt, SystemClock,
};

/// All the comments of one discussion context
///
/// This is the shape a durable store persists.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Thread {
    pub context: ContextId,

    /// Top-level comments, in the order they were posted
    #[serde(with = "crate::api::flat")]
    pub roots: Vec<Comment>,
}

impl Thread {
    pub fn new(context: ContextId) -> Thread {
        Thread {
            context,
            roots: Vec::new(),
        }
    }

    pub fn get(&self, id: &CommentId) -> Option<&Comment> {
        resolver::find(&self.roots, id)
    }

    pub fn iter(&self) -> Walk<'_> {
        resolver::walk(&self.roots)
    }

    /// Total number of comments, replies included
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Limits {
    pub max_body_len: usize,
    pub max_reason_len: usize,

    /// Deepest level a reply may sit at, roots being at level 0
    pub max_depth: Option<usize>,
}

impl Default for Limits {
    fn default() -> Limits {
        Limits {
            max_body_len: api::MAX_BODY_LEN,
            max_reason_len: api::MAX_REASON_LEN,
            max_depth: None,
        }
    }
}

/// Owner of one thread, through which every intent on it goes
///
/// Operations either fully succeed or leave the thread exactly as it was.
#[derive(Clone, Debug)]
pub struct ThreadStore<C = SystemClock> {
    thread: Thread,
    clock: C,
    limits: Limits,
}

impl<C: Clock> ThreadStore<C> {
    pub fn new(thread: Thread, clock: C) -> ThreadStore<C> {
        ThreadStore {
            thread,
            clock,
            limits: Limits::default(),
        }
    }

    pub fn with_limits(mut self, limits: Limits) -> ThreadStore<C> {
        self.limits = limits;
        self
    }

    pub fn context(&self) -> ContextId {
        self.thread.context
    }

    pub fn thread(&self) -> &Thread {
        &self.thread
    }

    pub fn into_thread(self) -> Thread {
        self.thread
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn get(&self, id: &CommentId) -> Option<&Comment> {
        self.thread.get(id)
    }

    pub fn len(&self) -> usize {
        self.thread.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thread.is_empty()
    }

    pub fn add_comment(&mut self, actor: &Actor, body: &str) -> Result<CommentView, Error> {
        let body = api::validate_text("body", body, self.limits.max_body_len)?;
        let comment = Comment::new(actor.clone(), body.to_string(), self.clock.now());
        let view = comment.view_for(&actor.id);
        tracing::debug!(
            context = ?self.thread.context,
            actor = ?actor.id,
            comment = ?comment.id,
            "added root comment"
        );
        self.thread.roots.push(comment);
        Ok(view)
    }

    pub fn reply(
        &mut self,
        actor: &Actor,
        target: &CommentId,
        body: &str,
    ) -> Result<CommentView, Error> {
        let body = api::validate_text("body", body, self.limits.max_body_len)?;
        let now = self.clock.now();
        let max_depth = self.limits.max_depth;
        let context = self.thread.context;
        resolver::apply(&mut self.thread.roots, target, |slot| {
            if let Some(max_depth) = max_depth {
                if slot.depth() >= max_depth {
                    return Err(Error::InvalidInput(format!(
                        "replies cannot be nested deeper than {max_depth} levels"
                    )));
                }
            }
            let reply = Comment::new(actor.clone(), body.to_string(), now);
            let view = reply.view_for(&actor.id);
            tracing::debug!(
                ?context,
                actor = ?actor.id,
                parent = ?target,
                comment = ?reply.id,
                depth = slot.depth() + 1,
                "added reply"
            );
            slot.into_comment().children.push(reply);
            Ok(view)
        })
    }

    pub fn edit(
        &mut self,
        actor: &Actor,
        target: &CommentId,
        body: &str,
    ) -> Result<CommentView, Error> {
        let now = self.clock.now();
        let max_body_len = self.limits.max_body_len;
        let context = self.thread.context;
        resolver::apply(&mut self.thread.roots, target, |slot| {
            let comment = slot.into_comment();
            if comment.author.id != actor.id {
                return Err(Error::Forbidden);
            }
            let body = api::validate_text("body", body, max_body_len)?;
            comment.body = body.to_string();
            // a clock going backwards must not put the edit before the creation
            comment.edited_at = Some(now.max(comment.created_at));
            tracing::debug!(?context, actor = ?actor.id, comment = ?target, "edited comment");
            Ok(comment.view_for(&actor.id))
        })
    }

    /// Removes the comment and all its replies
    pub fn delete(&mut self, actor: &Actor, target: &CommentId) -> Result<(), Error> {
        let context = self.thread.context;
        resolver::apply(&mut self.thread.roots, target, |slot| {
            if slot.comment().author.id != actor.id && !actor.can_moderate() {
                return Err(Error::Forbidden);
            }
            let removed = slot.remove();
            tracing::debug!(
                ?context,
                actor = ?actor.id,
                comment = ?target,
                num_removed = removed.subtree_len(),
                "deleted comment"
            );
            Ok(())
        })
    }

    pub fn toggle_like(&mut self, actor: &Actor, target: &CommentId) -> Result<CommentView, Error> {
        let context = self.thread.context;
        resolver::apply(&mut self.thread.roots, target, |slot| {
            let comment = slot.into_comment();
            let liked = comment.toggle_like(actor.id);
            tracing::debug!(?context, actor = ?actor.id, comment = ?target, liked, "toggled like");
            Ok(comment.view_for(&actor.id))
        })
    }

    /// Flags the comment for moderation, the latest reason replacing any previous one
    pub fn report(&mut self, actor: &Actor, target: &CommentId, reason: &str) -> Result<(), Error> {
        let max_reason_len = self.limits.max_reason_len;
        let context = self.thread.context;
        resolver::apply(&mut self.thread.roots, target, |slot| {
            let reason = api::validate_text("report reason", reason, max_reason_len)?;
            let comment = slot.into_comment();
            comment.moderation = ModerationState::Flagged;
            comment.report_reason = Some(reason.to_string());
            tracing::debug!(?context, actor = ?actor.id, comment = ?target, "reported comment");
            Ok(())
        })
    }

    pub fn moderate(
        &mut self,
        actor: &Actor,
        target: &CommentId,
        decision: Decision,
    ) -> Result<CommentView, Error> {
        if !actor.can_moderate() {
            return Err(Error::Forbidden);
        }
        let context = self.thread.context;
        resolver::apply(&mut self.thread.roots, target, |slot| {
            let comment = slot.into_comment();
            match decision {
                Decision::Approve => {
                    comment.moderation = ModerationState::Published;
                    comment.report_reason = None;
                }
                Decision::Reject => comment.moderation = ModerationState::Rejected,
            }
            tracing::debug!(
                ?context,
                actor = ?actor.id,
                comment = ?target,
                %decision,
                "moderated comment"
            );
            Ok(comment.view_for(&actor.id))
        })
    }

    pub fn apply(&mut self, actor: &Actor, intent: Intent) -> Result<Outcome, Error> {
        let res = match &intent {
            Intent::AddComment { body } => self.add_comment(actor, body).map(Outcome::Comment),
            Intent::Reply { target, body } => {
                self.reply(actor, target, body).map(Outcome::Comment)
            }
            Intent::Edit { target, body } => self.edit(actor, target, body).map(Outcome::Comment),
            Intent::Delete { target } => self.delete(actor, target).map(|()| Outcome::Done),
            Intent::ToggleLike { target } => {
                self.toggle_like(actor, target).map(Outcome::Comment)
            }
            Intent::Report { target, reason } => {
                self.report(actor, target, reason).map(|()| Outcome::Done)
            }
            Intent::Moderate { target, decision } => {
                self.moderate(actor, target, *decision).map(Outcome::Comment)
            }
        };
        if let Err(err) = &res {
            tracing::info!(
                context = ?self.thread.context,
                actor = ?actor.id,
                intent = intent.name(),
                target = ?intent.target(),
                "refused intent: {err}"
            );
        }
        res
    }

    /// The thread as seen by `actor`, roots sorted by `order`
    pub fn view(&self, actor: &Actor, order: SortOrder) -> ThreadView {
        let mut view = project_for(&self.thread, actor);
        order.sort(&mut view.comments);
        view
    }

    /// Every flagged comment, for moderators
    pub fn flagged(&self, actor: &Actor) -> Result<Vec<CommentView>, Error> {
        if !actor.can_moderate() {
            return Err(Error::Forbidden);
        }
        Ok(self
            .thread
            .iter()
            .filter(|c| c.moderation == ModerationState::Flagged)
            .map(|c| c.view_for(&actor.id))
            .collect())
    }
}
