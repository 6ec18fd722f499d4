use std::str::FromStr;

use anyhow::{anyhow, Context};
use serde_json::json;
use uuid::Uuid;

use crate::CommentId;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    Unknown,
    InvalidInput,
    NotFound,
    Forbidden,
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Unknown error: {0}")]
    Unknown(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Comment not found {0:?}")]
    NotFound(CommentId),

    #[error("Permission denied")]
    Forbidden,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Unknown(_) => ErrorKind::Unknown,
            Error::InvalidInput(_) => ErrorKind::InvalidInput,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Forbidden => ErrorKind::Forbidden,
        }
    }

    pub fn status_code(&self) -> http::StatusCode {
        use http::StatusCode;
        match self {
            Error::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Forbidden => StatusCode::FORBIDDEN,
        }
    }

    pub fn contents(&self) -> Vec<u8> {
        serde_json::to_vec(&match self {
            Error::Unknown(msg) => json!({
                "message": msg,
                "type": "unknown",
            }),
            Error::InvalidInput(reason) => json!({
                "message": reason,
                "type": "invalid-input",
            }),
            Error::NotFound(id) => json!({
                "message": "comment not found",
                "type": "not-found",
                "comment": id.0,
            }),
            Error::Forbidden => json!({
                "message": "permission denied",
                "type": "forbidden",
            }),
        })
        .expect("serializing error contents")
    }

    pub fn parse(body: &[u8]) -> anyhow::Result<Error> {
        let data: serde_json::Value =
            serde_json::from_slice(body).context("parsing error contents")?;
        let message = || {
            String::from(
                data.get("message")
                    .and_then(|msg| msg.as_str())
                    .unwrap_or(""),
            )
        };
        Ok(
            match data
                .get("type")
                .and_then(|t| t.as_str())
                .ok_or_else(|| anyhow!("error type is not a string"))?
            {
                "unknown" => Error::Unknown(message()),
                "invalid-input" => Error::InvalidInput(message()),
                "not-found" => Error::NotFound(CommentId(
                    data.get("comment")
                        .and_then(|id| id.as_str())
                        .and_then(|id| Uuid::from_str(id).ok())
                        .ok_or_else(|| anyhow!("not-found error without a proper comment id"))?,
                )),
                "forbidden" => Error::Forbidden,
                _ => return Err(anyhow!("error contents has unknown type")),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reads_back_contents() {
        let errors = [
            Error::Unknown(String::from("boom")),
            Error::InvalidInput(String::from("body must not be empty")),
            Error::NotFound(CommentId(Uuid::new_v4())),
            Error::Forbidden,
        ];
        for e in errors {
            assert_eq!(Error::parse(&e.contents()).unwrap(), e);
        }
    }

    #[test]
    fn status_codes() {
        assert_eq!(Error::Forbidden.status_code(), http::StatusCode::FORBIDDEN);
        assert_eq!(
            Error::NotFound(CommentId::stub()).status_code(),
            http::StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::InvalidInput(String::new()).kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn parse_rejects_unknown_types() {
        assert!(Error::parse(br#"{"type": "teapot"}"#).is_err());
        assert!(Error::parse(br#"{"type": "not-found"}"#).is_err());
        assert!(Error::parse(b"not json").is_err());
    }
}
