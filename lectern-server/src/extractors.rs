use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{self, request},
};
use lectern_api::{Actor, AuthToken, Uuid};

use crate::{Directory, Error, Threads};

#[derive(Clone, axum::extract::FromRef)]
pub struct AppState {
    pub threads: Threads,
    pub directory: Directory,
    pub admin_token: Option<AuthToken>,
}

/// The bearer token of the request, not yet checked against anything
pub struct PreAuth(pub AuthToken);

#[async_trait]
impl<S: Sync> FromRequestParts<S> for PreAuth {
    type Rejection = Error;

    async fn from_request_parts(req: &mut request::Parts, _state: &S) -> Result<PreAuth, Error> {
        let auth = req
            .headers
            .get(http::header::AUTHORIZATION)
            .ok_or_else(Error::forbidden)?
            .to_str()
            .map_err(|_| Error::forbidden())?;
        let mut auth = auth.split(' ');
        if !auth
            .next()
            .ok_or_else(Error::forbidden)?
            .eq_ignore_ascii_case("bearer")
        {
            return Err(Error::forbidden());
        }
        let token = auth.next().ok_or_else(Error::forbidden)?;
        if auth.next().is_some() {
            return Err(Error::forbidden());
        }
        let token = Uuid::try_parse(token).map_err(|_| Error::forbidden())?;
        Ok(PreAuth(AuthToken(token)))
    }
}

/// The actor issuing the request
pub struct Auth(pub Actor);

#[async_trait]
impl FromRequestParts<AppState> for Auth {
    type Rejection = Error;

    async fn from_request_parts(req: &mut request::Parts, state: &AppState) -> Result<Auth, Error> {
        let token = PreAuth::from_request_parts(req, state).await?.0;
        Ok(Auth(state.directory.resolve(&token).await?))
    }
}

pub struct AdminAuth;

#[async_trait]
impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = Error;

    async fn from_request_parts(
        req: &mut request::Parts,
        state: &AppState,
    ) -> Result<AdminAuth, Error> {
        let token = PreAuth::from_request_parts(req, state).await?.0;
        if Some(token) == state.admin_token {
            Ok(AdminAuth)
        } else {
            Err(Error::forbidden())
        }
    }
}
