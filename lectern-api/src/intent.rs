use std::{fmt, str::FromStr};

use crate::{CommentId, CommentView, Error};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approve,
    Reject,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Decision::Approve => "approve",
            Decision::Reject => "reject",
        })
    }
}

impl FromStr for Decision {
    type Err = Error;

    fn from_str(s: &str) -> Result<Decision, Error> {
        match s {
            "approve" => Ok(Decision::Approve),
            "reject" => Ok(Decision::Reject),
            _ => Err(Error::InvalidInput(format!("unknown decision {s:?}"))),
        }
    }
}

/// Something an actor asks a thread to do
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum Intent {
    AddComment {
        body: String,
    },
    Reply {
        target: CommentId,
        body: String,
    },
    Edit {
        target: CommentId,
        body: String,
    },
    Delete {
        target: CommentId,
    },
    ToggleLike {
        target: CommentId,
    },
    Report {
        target: CommentId,
        reason: String,
    },
    Moderate {
        target: CommentId,
        decision: Decision,
    },
}

impl Intent {
    pub fn target(&self) -> Option<CommentId> {
        match self {
            Intent::AddComment { .. } => None,
            Intent::Reply { target, .. }
            | Intent::Edit { target, .. }
            | Intent::Delete { target }
            | Intent::ToggleLike { target }
            | Intent::Report { target, .. }
            | Intent::Moderate { target, .. } => Some(*target),
        }
    }

    /// Short name, for logs
    pub fn name(&self) -> &'static str {
        match self {
            Intent::AddComment { .. } => "add-comment",
            Intent::Reply { .. } => "reply",
            Intent::Edit { .. } => "edit",
            Intent::Delete { .. } => "delete",
            Intent::ToggleLike { .. } => "toggle-like",
            Intent::Report { .. } => "report",
            Intent::Moderate { .. } => "moderate",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum Outcome {
    Comment(#[serde(with = "crate::flat::single")] CommentView),
    Done,
}

impl Outcome {
    pub fn comment(self) -> Option<CommentView> {
        match self {
            Outcome::Comment(c) => Some(c),
            Outcome::Done => None,
        }
    }
}
