use bytes::Bytes;
use common::http::ext::{RequestGlobalExt, ResultExt};
use common::make_response;
use hyper::body::Incoming;
use hyper::{header, StatusCode};
use serde_json::json;

use super::{clear_flash, param_id, parse_form, redirect, require_auth};
use crate::api::cookies;
use crate::api::error::Result;
use crate::api::Body;
use crate::database::Protocolo;
use crate::delivery::{self, DeliveryMode};
use crate::global::ApiGlobal;
use crate::label;

#[derive(serde::Deserialize)]
struct AddForm {
    #[serde(default)]
    nome: String,
    #[serde(default)]
    assunto: String,
}

pub async fn index<G: ApiGlobal>(req: hyper::Request<Incoming>) -> Result<hyper::Response<Body>> {
    let global = req.get_global::<G>()?;
    let auth = require_auth(&req).await?;

    let protocolos = Protocolo::list_for_user(global.db(), auth.user.id)
        .await
        .map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to list protocolos"))?;

    let message = cookies::parse(&req, cookies::FLASH_COOKIE);
    let had_flash = message.is_some();

    let mut response = make_response!(StatusCode::OK, json!({ "protocolos": protocolos, "message": message }));
    if had_flash {
        clear_flash(&mut response);
    }

    Ok(response)
}

pub async fn add<G: ApiGlobal>(req: hyper::Request<Incoming>) -> Result<hyper::Response<Body>> {
    let global = req.get_global::<G>()?;
    let auth = require_auth(&req).await?;

    let form: AddForm = parse_form(req).await?;
    let nome = form.nome.trim();
    let assunto = form.assunto.trim();

    if nome.is_empty() || assunto.is_empty() {
        return Ok(redirect("/", Some("Preencha todos os campos!")));
    }

    Protocolo::create(global.db(), auth.user.id, nome, assunto)
        .await
        .map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to create protocolo"))?;

    Ok(redirect("/", Some("Protocolo adicionado com sucesso!")))
}

pub async fn delete<G: ApiGlobal>(req: hyper::Request<Incoming>) -> Result<hyper::Response<Body>> {
    let global = req.get_global::<G>()?;
    let auth = require_auth(&req).await?;
    let id = param_id(&req)?;

    let removed = Protocolo::delete(global.db(), id, auth.user.id)
        .await
        .map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to delete protocolo"))?;

    if removed == 0 {
        return Ok(redirect("/", Some("Protocolo não encontrado!")));
    }

    Ok(redirect("/", Some("Protocolo excluído com sucesso!")))
}

pub async fn print_pdf<G: ApiGlobal>(req: hyper::Request<Incoming>) -> Result<hyper::Response<Body>> {
    let global = req.get_global::<G>()?;
    let auth = require_auth(&req).await?;
    let id = param_id(&req)?;

    let protocolo = owned_record(&global, id, auth.user.id).await?;

    let path = match label::render(&global.config().label, &protocolo).await {
        Ok(path) => path,
        Err(err) => {
            tracing::warn!(error = %err, id, "label render failed");
            return Ok(redirect("/", Some("Erro ao gerar a etiqueta!")));
        }
    };

    let bytes = tokio::fs::read(&path)
        .await
        .map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to read rendered label"))?;

    Ok(attachment(id, bytes))
}

pub async fn print_direct<G: ApiGlobal>(req: hyper::Request<Incoming>) -> Result<hyper::Response<Body>> {
    let global = req.get_global::<G>()?;
    let auth = require_auth(&req).await?;
    let id = param_id(&req)?;

    let protocolo = owned_record(&global, id, auth.user.id).await?;

    let path = match label::render(&global.config().label, &protocolo).await {
        Ok(path) => path,
        Err(err) => {
            tracing::warn!(error = %err, id, "label render failed");
            return Ok(redirect("/", Some(&format!("Erro ao imprimir: {err}"))));
        }
    };

    let mode = global.config().label.dispatch;
    if mode == DeliveryMode::Download {
        let bytes = tokio::fs::read(&path)
            .await
            .map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to read rendered label"))?;

        return Ok(attachment(id, bytes));
    }

    match delivery::dispatch(mode, &path).await {
        Ok(()) => Ok(redirect("/", Some("Protocolo enviado para impressão!"))),
        Err(err) => {
            tracing::warn!(error = %err, id, "print dispatch failed");
            Ok(redirect("/", Some(&format!("Erro ao imprimir: {err}"))))
        }
    }
}

/// Looks up a record and hides it when it belongs to someone else.
async fn owned_record<G: ApiGlobal>(global: &std::sync::Arc<G>, id: i64, user_id: i64) -> Result<Protocolo> {
    let protocolo = Protocolo::get(global.db(), id)
        .await
        .map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch protocolo"))?;

    match protocolo.filter(|p| p.user_id == user_id) {
        Some(protocolo) => Ok(protocolo),
        None => Err((StatusCode::NOT_FOUND, "protocolo não encontrado").into()),
    }
}

fn attachment(id: i64, bytes: Vec<u8>) -> hyper::Response<Body> {
    hyper::Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"protocolo-{id}.pdf\""),
        )
        .body(Body::new(Bytes::from(bytes)))
        .expect("failed to build response")
}
