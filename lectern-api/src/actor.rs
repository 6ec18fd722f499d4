use std::{fmt, str::FromStr};

use uuid::Uuid;

use crate::{Error, MAX_DISPLAY_NAME_LEN, STUB_UUID};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn stub() -> UserId {
        UserId(STUB_UUID)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct AuthToken(pub Uuid);

impl AuthToken {
    pub fn stub() -> AuthToken {
        AuthToken(STUB_UUID)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Learner,
    Instructor,
    Admin,
}

impl Role {
    /// Instructors and admins may moderate and delete other people's comments
    pub fn can_moderate(&self) -> bool {
        match self {
            Role::Learner => false,
            Role::Instructor | Role::Admin => true,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Learner => "learner",
            Role::Instructor => "instructor",
            Role::Admin => "admin",
        })
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Role, Error> {
        match s {
            "learner" => Ok(Role::Learner),
            "instructor" => Ok(Role::Instructor),
            "admin" => Ok(Role::Admin),
            _ => Err(Error::InvalidInput(format!("unknown role {s:?}"))),
        }
    }
}

/// The identity issuing an intent, as resolved by whoever authenticated it
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Actor {
    pub id: UserId,
    pub display_name: String,
    pub avatar: Option<String>,
    pub role: Role,
}

impl Actor {
    pub fn new(id: UserId, display_name: impl Into<String>, role: Role) -> Actor {
        Actor {
            id,
            display_name: display_name.into(),
            avatar: None,
            role,
        }
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Actor {
        self.avatar = Some(avatar.into());
        self
    }

    pub fn can_moderate(&self) -> bool {
        self.role.can_moderate()
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewActor {
    pub display_name: String,
    pub avatar: Option<String>,
    pub role: Role,
}

impl NewActor {
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_text("display name", &self.display_name, MAX_DISPLAY_NAME_LEN)?;
        if let Some(avatar) = &self.avatar {
            crate::validate_string(avatar)?;
        }
        Ok(())
    }

    pub fn into_actor(self, id: UserId) -> Actor {
        Actor {
            id,
            display_name: self.display_name.trim().to_string(),
            avatar: self.avatar,
            role: self.role,
        }
    }
}
