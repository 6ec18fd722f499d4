use std::{fmt, str::FromStr};

use crate::Error;

/// How the root comments of a thread are ordered for display
///
/// Replies are never reordered: they always show in the order they were posted.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Newest first
    #[default]
    Recent,

    /// Most liked first, newest first among equally liked comments
    Popular,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortOrder::Recent => "recent",
            SortOrder::Popular => "popular",
        })
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<SortOrder, Error> {
        match s {
            "recent" => Ok(SortOrder::Recent),
            "popular" => Ok(SortOrder::Popular),
            _ => Err(Error::InvalidInput(format!("unknown sort order {s:?}"))),
        }
    }
}
