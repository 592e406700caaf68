use common::http::ext::{RequestGlobalExt, ResultExt};
use common::make_response;
use hyper::body::Incoming;
use hyper::StatusCode;
use serde_json::json;

use super::{clear_flash, parse_form, redirect, set_cookie};
use crate::api::cookies;
use crate::api::error::Result;
use crate::api::Body;
use crate::database::{Session, User};
use crate::global::ApiGlobal;

#[derive(serde::Deserialize)]
struct CredentialsForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

/// The form endpoints have no templates; GET returns the field contract plus
/// any pending flash message.
fn form_contract(req: &hyper::Request<Incoming>) -> Result<hyper::Response<Body>> {
    let message = cookies::parse(req, cookies::FLASH_COOKIE);
    let had_flash = message.is_some();

    let mut response = make_response!(
        StatusCode::OK,
        json!({ "fields": ["username", "password"], "message": message })
    );
    if had_flash {
        clear_flash(&mut response);
    }

    Ok(response)
}

pub async fn register_form(req: hyper::Request<Incoming>) -> Result<hyper::Response<Body>> {
    form_contract(&req)
}

pub async fn login_form(req: hyper::Request<Incoming>) -> Result<hyper::Response<Body>> {
    form_contract(&req)
}

pub async fn register<G: ApiGlobal>(req: hyper::Request<Incoming>) -> Result<hyper::Response<Body>> {
    let global = req.get_global::<G>()?;

    let form: CredentialsForm = parse_form(req).await?;
    let username = form.username.trim().to_lowercase();

    if let Err(message) = User::validate_username(&username) {
        return Ok(redirect("/register", Some(message)));
    }

    if let Err(message) = User::validate_password(&form.password) {
        return Ok(redirect("/register", Some(message)));
    }

    let hash = User::hash_password(&form.password);

    match User::create(global.db(), &username, &hash).await {
        Ok(_) => Ok(redirect("/login", Some("Usuário registrado com sucesso!"))),
        Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
            Ok(redirect("/register", Some("Usuário já existe!")))
        }
        Err(err) => Err((StatusCode::INTERNAL_SERVER_ERROR, "failed to create user", err).into()),
    }
}

pub async fn login<G: ApiGlobal>(req: hyper::Request<Incoming>) -> Result<hyper::Response<Body>> {
    let global = req.get_global::<G>()?;

    let form: CredentialsForm = parse_form(req).await?;
    let username = form.username.trim().to_lowercase();

    let user = User::by_username(global.db(), &username)
        .await
        .map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch user"))?;

    let Some(user) = user.filter(|user| user.verify_password(&form.password)) else {
        return Ok(redirect("/login", Some("Usuário ou senha inválidos!")));
    };

    Session::purge_expired(global.db())
        .await
        .map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to purge expired sessions"))?;

    let validity_secs = global.config().session.validity_secs;
    let session = Session::create(global.db(), user.id, chrono::Duration::seconds(validity_secs as i64))
        .await
        .map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to create session"))?;

    let mut response = redirect("/", None);
    set_cookie(&mut response, &cookies::session(&session.id, validity_secs));

    Ok(response)
}

pub async fn logout<G: ApiGlobal>(req: hyper::Request<Incoming>) -> Result<hyper::Response<Body>> {
    let global = req.get_global::<G>()?;

    if let Some(token) = cookies::parse(&req, cookies::SESSION_COOKIE) {
        Session::delete(global.db(), &token)
            .await
            .map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to delete session"))?;
    }

    let mut response = redirect("/login", None);
    set_cookie(&mut response, &cookies::clear(cookies::SESSION_COOKIE));

    Ok(response)
}
