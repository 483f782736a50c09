//! Form bodies in either browser encoding.

use std::fmt::Display;

use axum::Form;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::de::value::{Error as ValueError, MapDeserializer};

use super::error::AppError;
use crate::ValidationError;

/// Deserializes `T` from a `application/x-www-form-urlencoded` or
/// `multipart/form-data` body.
///
/// Field names are normalized (lowercased, underscores removed) before
/// matching, and when a name repeats the first non-empty value wins. File
/// parts of a multipart body are ignored. Any other content type, or a body
/// that cannot be parsed, is rejected as a 400 validation error.
#[derive(Debug, Clone)]
pub struct FormFields<T>(pub T);

impl<S, T> FromRequest<S> for FormFields<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let pairs = if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state).await.map_err(malformed)?;
            multipart_pairs(multipart).await?
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(malformed)?;
            pairs
        } else {
            return Err(AppError(ValidationError::UnsupportedFormEncoding.into()));
        };

        let fields = normalize_fields(pairs);
        T::deserialize(MapDeserializer::<_, ValueError>::new(fields.into_iter()))
            .map(Self)
            .map_err(malformed)
    }
}

fn malformed(e: impl Display) -> AppError {
    log::debug!(target: "forum_auth", "msg=\"form rejected\", error=\"{e}\"");
    AppError(ValidationError::MalformedForm.into())
}

async fn multipart_pairs(mut multipart: Multipart) -> Result<Vec<(String, String)>, AppError> {
    let mut pairs = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(ToOwned::to_owned) else {
            continue;
        };
        let value = field.text().await.map_err(malformed)?;
        pairs.push((name, value));
    }

    Ok(pairs)
}

fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// One entry per normalized name, keeping the first non-empty value.
fn normalize_fields(pairs: Vec<(String, String)>) -> Vec<(String, String)> {
    let mut fields: Vec<(String, String)> = Vec::with_capacity(pairs.len());

    for (name, value) in pairs {
        let name = normalize_name(&name);
        match fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, kept)) if kept.is_empty() => *kept = value,
            Some(_) => {}
            None => fields.push((name, value)),
        }
    }

    fields
}
