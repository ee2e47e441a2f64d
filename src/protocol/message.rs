use std::collections::HashMap;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde::Serialize;

use crate::error::Result;

/// An inbound request as seen by the handler chain
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub query: HashMap<String, String>,
    pub body: Bytes,
}

impl Request {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            query: HashMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add decoded query pairs; a repeated key keeps its first value
    pub fn with_query_pairs(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        for (key, value) in pairs {
            self.query.entry(key).or_insert(value);
        }
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Query parameter `key`, treating an empty value as absent
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Response under construction; the last handler to write wins
#[derive(Debug, Clone)]
pub struct Reply {
    status: StatusCode,
    content_type: Option<HeaderValue>,
    body: Bytes,
}

impl Reply {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            content_type: None,
            body: Bytes::new(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn content_type(&self) -> Option<&HeaderValue> {
        self.content_type.as_ref()
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Encode `value` as the JSON body
    pub fn json<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let encoded = serde_json::to_vec(value)?;
        self.content_type = Some(HeaderValue::from_static("application/json"));
        self.body = Bytes::from(encoded);
        Ok(())
    }
}

impl Default for Reply {
    fn default() -> Self {
        Self::new()
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let mut response = (self.status, Body::from(self.body)).into_response();
        if let Some(content_type) = self.content_type {
            response.headers_mut().insert(CONTENT_TYPE, content_type);
        }
        response
    }
}
