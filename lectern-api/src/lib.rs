use chrono::Utc;

pub use uuid::{uuid, Uuid};
pub type Time = chrono::DateTime<Utc>;

pub const STUB_UUID: Uuid = uuid!("ffffffff-ffff-ffff-ffff-ffffffffffff");

/// Maximum length of a comment body, in characters
pub const MAX_BODY_LEN: usize = 1000;

/// Maximum length of a report reason, in characters
pub const MAX_REASON_LEN: usize = 1000;

pub const MAX_DISPLAY_NAME_LEN: usize = 100;

mod actor;
pub use actor::{Actor, AuthToken, NewActor, Role, UserId};

mod comment;
pub use comment::{CommentId, CommentView, ContextId, ModerationState, ThreadView};

mod error;
pub use error::{Error, ErrorKind};

pub mod flat;

mod intent;
pub use intent::{Decision, Intent, Outcome};

mod order;
pub use order::SortOrder;

// The validate functions reject anything that the engine must never store.
// They return the trimmed text so that callers store exactly what was checked.

pub fn validate_string(s: &str) -> Result<(), Error> {
    if s.contains('\0') {
        return Err(Error::InvalidInput(String::from(
            "null bytes are not allowed in text",
        )));
    }
    Ok(())
}

/// Checks that `s` is non-empty once trimmed and at most `max_len` characters long
pub fn validate_text<'a>(what: &str, s: &'a str, max_len: usize) -> Result<&'a str, Error> {
    validate_string(s)?;
    let s = s.trim();
    if s.is_empty() {
        return Err(Error::InvalidInput(format!("{what} must not be empty")));
    }
    let len = s.chars().count();
    if len > max_len {
        return Err(Error::InvalidInput(format!(
            "{what} is {len} characters long, the maximum is {max_len}"
        )));
    }
    Ok(s)
}
