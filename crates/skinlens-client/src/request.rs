//! Replayable request descriptions
//!
//! A `reqwest::RequestBuilder` with a multipart body can't be cloned, so the
//! wrapper keeps its own description of each call and rebuilds the request
//! for the retry.

use reqwest::{
    Client, Method, RequestBuilder,
    multipart::{Form, Part},
};
use serde::Serialize;
use skinlens_core::types::ImageFile;

use crate::{ClientError, Result};

#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    /// A single file part under `field`
    Multipart { field: String, file: ImageFile },
}

/// An outgoing backend call, tagged with whether it has already been retried
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub method: Method,
    /// Path relative to the API base URL, e.g. `/products/3/`
    pub path: String,
    pub body: RequestBody,
    retried: bool,
}

impl PendingRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: RequestBody::Empty,
            retried: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body
    ///
    /// # Errors
    /// - `ClientError::RequestSetup` if `body` can't be serialized
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| ClientError::RequestSetup(format!("Invalid request body: {}", e)))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    pub fn multipart(mut self, field: impl Into<String>, file: ImageFile) -> Self {
        self.body = RequestBody::Multipart {
            field: field.into(),
            file,
        };
        self
    }

    pub fn is_retried(&self) -> bool {
        self.retried
    }

    /// Copy of this request marked as already retried
    pub(crate) fn into_retry(mut self) -> Self {
        self.retried = true;
        self
    }

    pub(crate) fn build(&self, client: &Client, url: &str) -> Result<RequestBuilder> {
        let builder = client.request(self.method.clone(), url);

        Ok(match &self.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart { field, file } => {
                builder.multipart(multipart_form(field, file)?)
            }
        })
    }
}

/// Build a one-part multipart form carrying `file`
pub(crate) fn multipart_form(field: &str, file: &ImageFile) -> Result<Form> {
    let part = Part::bytes(file.bytes.to_vec())
        .file_name(file.file_name.clone())
        .mime_str(&file.content_type)
        .map_err(|e| {
            ClientError::RequestSetup(format!(
                "Invalid content type '{}': {}",
                file.content_type, e
            ))
        })?;

    Ok(Form::new().part(field.to_string(), part))
}
