use std::cmp::Reverse;

use crate::{
    api::{CommentId, CommentView, SortOrder, Time},
    Comment, Thread,
};

/// Anything that can be sorted as a root comment
pub trait Ranked {
    fn rank_id(&self) -> CommentId;
    fn rank_date(&self) -> Time;
    fn rank_likes(&self) -> u64;
}

impl Ranked for Comment {
    fn rank_id(&self) -> CommentId {
        self.id
    }

    fn rank_date(&self) -> Time {
        self.created_at
    }

    fn rank_likes(&self) -> u64 {
        self.like_count()
    }
}

impl Ranked for CommentView {
    fn rank_id(&self) -> CommentId {
        self.id
    }

    fn rank_date(&self) -> Time {
        self.created_at
    }

    fn rank_likes(&self) -> u64 {
        self.like_count
    }
}

pub trait OrderExt {
    /// Sorts only the slice it is given: children are left as they are
    fn sort<R: Ranked>(&self, roots: &mut [R]);
}

impl OrderExt for SortOrder {
    fn sort<R: Ranked>(&self, roots: &mut [R]) {
        // The id tiebreak keeps the order total, so it does not depend on
        // the order comments were in before sorting
        match self {
            SortOrder::Recent => {
                roots.sort_unstable_by_key(|c| (Reverse(c.rank_date()), c.rank_id()))
            }
            SortOrder::Popular => roots.sort_unstable_by_key(|c| {
                (Reverse(c.rank_likes()), Reverse(c.rank_date()), c.rank_id())
            }),
        }
    }
}

impl Thread {
    /// Returns a copy of this thread with its root comments sorted
    pub fn sorted(&self, order: SortOrder) -> Thread {
        let mut res = self.clone();
        order.sort(&mut res.roots);
        res
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::api::{Actor, ContextId, Role, UserId, Uuid};

    fn comment(body: &str, minute: i64, likes: usize) -> Comment {
        let author = Actor::new(UserId(Uuid::new_v4()), "author", Role::Learner);
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + Duration::minutes(minute);
        let mut c = Comment::new(author, String::from(body), date);
        for _ in 0..likes {
            c.likes.insert(UserId(Uuid::new_v4()));
        }
        c
    }

    fn bodies(comments: &[Comment]) -> Vec<&str> {
        comments.iter().map(|c| c.body.as_str()).collect()
    }

    #[test]
    fn recent_is_newest_first() {
        let mut roots = vec![comment("old", 0, 5), comment("new", 10, 0), comment("mid", 5, 1)];
        SortOrder::Recent.sort(&mut roots);
        assert_eq!(bodies(&roots), vec!["new", "mid", "old"]);
    }

    #[test]
    fn popular_breaks_ties_by_recency() {
        let mut roots = vec![
            comment("old-liked", 0, 3),
            comment("new-unliked", 10, 0),
            comment("new-liked", 8, 3),
            comment("mid", 5, 1),
        ];
        SortOrder::Popular.sort(&mut roots);
        assert_eq!(
            bodies(&roots),
            vec!["new-liked", "old-liked", "mid", "new-unliked"]
        );
    }

    #[test]
    fn sorting_leaves_replies_alone() {
        let mut root = comment("root", 0, 0);
        root.children = vec![comment("first", 1, 0), comment("second", 2, 9)];
        let thread = Thread {
            context: ContextId::stub(),
            roots: vec![root, comment("other", 3, 0)],
        };
        let sorted = thread.sorted(SortOrder::Popular);
        let root = sorted.roots.iter().find(|c| c.body == "root").unwrap();
        assert_eq!(bodies(&root.children), vec!["first", "second"]);
    }

    #[test]
    fn sorting_keeps_every_root() {
        let thread = Thread {
            context: ContextId::stub(),
            roots: (0..20).map(|i| comment(&i.to_string(), i % 7, (i % 3) as usize)).collect(),
        };
        for order in [SortOrder::Recent, SortOrder::Popular] {
            let sorted = thread.sorted(order);
            let mut before = thread.roots.iter().map(|c| c.id).collect::<Vec<_>>();
            let mut after = sorted.roots.iter().map(|c| c.id).collect::<Vec<_>>();
            before.sort();
            after.sort();
            assert_eq!(before, after);
        }
    }
}
