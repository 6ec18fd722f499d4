use std::collections::HashSet;
use bolero::generator::TypeGenerator;

use chrono::{Duration, TimeZone, Utc};

use crate::{
    api::{
        Actor, CommentId, ContextId, Decision, Error, Intent, ModerationState, Role, UserId, Uuid,
    },
    ManualClock, Thread, ThreadStore,
};

#[derive(Clone, Debug, bolero::generator::TypeGenerator)]
enum FuzzOp {
    Add { actor: u8, blank: bool },
    Reply { actor: u8, target: u8, blank: bool },
    Edit { actor: u8, target: u8, blank: bool },
    Delete { actor: u8, target: u8 },
    ToggleLike { actor: u8, target: u8 },
    Report { actor: u8, target: u8, blank: bool },
    Moderate { actor: u8, target: u8, approve: bool },
    Tick { minutes: i8 },
}

fn actors() -> Vec<Actor> {
    vec![
        Actor::new(UserId(Uuid::new_v4()), "alice", Role::Learner),
        Actor::new(UserId(Uuid::new_v4()), "bob", Role::Learner),
        Actor::new(UserId(Uuid::new_v4()), "instructor", Role::Instructor),
        Actor::new(UserId(Uuid::new_v4()), "root", Role::Admin),
    ]
}

/// Picks an existing comment, or a missing one for the last index
fn pick_target(thread: &Thread, idx: u8) -> CommentId {
    let ids = thread.iter().map(|c| c.id).collect::<Vec<_>>();
    ids.get(idx as usize % (ids.len() + 1))
        .copied()
        .unwrap_or_else(CommentId::stub)
}

fn text(blank: bool, n: usize) -> String {
    match blank {
        true => String::from(" \n"),
        false => format!("text {n}"),
    }
}

fn check_invariants(thread: &Thread) {
    let mut seen = HashSet::new();
    for c in thread.iter() {
        assert!(seen.insert(c.id), "comment {:?} appears twice", c.id);
        assert!(!c.body.trim().is_empty());
        if let Some(edited_at) = c.edited_at {
            assert!(edited_at >= c.created_at);
        }
        if c.moderation == ModerationState::Flagged {
            assert!(c.report_reason.is_some());
        }
    }
    assert_eq!(seen.len(), thread.len());
}

#[test]
fn fuzz_intent_sequences() {
    bolero::check!()
        .with_type::<Vec<FuzzOp>>()
        .cloned()
        .for_each(|ops| {
            let actors = actors();
            let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
            let clock = ManualClock::starting_at(start);
            let mut store = ThreadStore::new(Thread::new(ContextId::stub()), clock.clone());
            for (n, op) in ops.into_iter().enumerate() {
                let before = store.thread().clone();
                let len_before = before.len();
                let actor_of = |a: u8| &actors[a as usize % actors.len()];
                let (actor, intent) = match op {
                    FuzzOp::Tick { minutes } => {
                        clock.advance(Duration::minutes(minutes as i64));
                        continue;
                    }
                    FuzzOp::Add { actor, blank } => (
                        actor_of(actor),
                        Intent::AddComment { body: text(blank, n) },
                    ),
                    FuzzOp::Reply { actor, target, blank } => (
                        actor_of(actor),
                        Intent::Reply {
                            target: pick_target(&before, target),
                            body: text(blank, n),
                        },
                    ),
                    FuzzOp::Edit { actor, target, blank } => (
                        actor_of(actor),
                        Intent::Edit {
                            target: pick_target(&before, target),
                            body: text(blank, n),
                        },
                    ),
                    FuzzOp::Delete { actor, target } => (
                        actor_of(actor),
                        Intent::Delete {
                            target: pick_target(&before, target),
                        },
                    ),
                    FuzzOp::ToggleLike { actor, target } => (
                        actor_of(actor),
                        Intent::ToggleLike {
                            target: pick_target(&before, target),
                        },
                    ),
                    FuzzOp::Report { actor, target, blank } => (
                        actor_of(actor),
                        Intent::Report {
                            target: pick_target(&before, target),
                            reason: text(blank, n),
                        },
                    ),
                    FuzzOp::Moderate { actor, target, approve } => (
                        actor_of(actor),
                        Intent::Moderate {
                            target: pick_target(&before, target),
                            decision: match approve {
                                true => Decision::Approve,
                                false => Decision::Reject,
                            },
                        },
                    ),
                };

                let target = intent.target().and_then(|t| before.get(&t));
                let mut retry = store.clone();
                let res = store.apply(actor, intent.clone());

                // permission rules hold whatever else happens
                match (&intent, target) {
                    (Intent::Edit { .. }, Some(t)) if t.author.id != actor.id => {
                        assert_eq!(res, Err(Error::Forbidden))
                    }
                    (Intent::Delete { .. }, Some(t))
                        if t.author.id != actor.id && !actor.can_moderate() =>
                    {
                        assert_eq!(res, Err(Error::Forbidden))
                    }
                    (Intent::Moderate { .. }, _) if !actor.can_moderate() => {
                        assert_eq!(res, Err(Error::Forbidden))
                    }
                    (_, None) if intent.target().is_some() => {
                        assert!(res.is_err())
                    }
                    _ => (),
                }

                let thread = store.thread();
                match (&res, &intent) {
                    (Err(_), _) => assert_eq!(thread, &before),
                    (Ok(_), Intent::AddComment { .. } | Intent::Reply { .. }) => {
                        assert_eq!(thread.len(), len_before + 1)
                    }
                    (Ok(_), Intent::Delete { .. }) => {
                        let removed = target.expect("deleted a missing comment").subtree_len();
                        assert_eq!(thread.len(), len_before - removed);
                    }
                    (Ok(_), Intent::ToggleLike { .. }) => {
                        assert_eq!(thread.len(), len_before);
                        retry.apply(actor, intent.clone()).expect("first toggle succeeded");
                        retry.apply(actor, intent.clone()).expect("second toggle succeeded");
                        assert_eq!(retry.thread(), &before);
                    }
                    (Ok(_), _) => assert_eq!(thread.len(), len_before),
                }
                check_invariants(thread);
            }
        });
}
