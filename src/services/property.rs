//! Property listings.
//!
//! One method per backend operation. Request shaping lives in [`requests`]
//! so it can be checked without a server; the service just sends.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::{ApiClient, ApiRequest, ApiResponse, Attachment};

/// Full-record update for a listing.
///
/// The four structured fields are opaque to the client and forwarded as-is.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PropertyUpdate {
    pub title: String,
    pub description: String,
    pub location: Value,
    pub details: Value,
    pub rules: Value,
    pub fees: Value,
}

/// Multipart field name for uploaded images.
pub const ATTACHMENT_FIELD: &str = "images";

pub mod requests {
    use super::*;
    use crate::api::{ApiError, FormPayload};
    use serde_json::json;

    pub fn list_all() -> ApiRequest {
        ApiRequest::get("api/properties")
    }

    pub fn list_mine() -> ApiRequest {
        ApiRequest::get("api/properties/my")
    }

    pub fn get(id: impl Display) -> ApiRequest {
        ApiRequest::get(format!("api/properties/{id}"))
    }

    pub fn update_status(id: impl Display, status: &str) -> ApiRequest {
        ApiRequest::patch(format!("api/properties/{id}/status")).json(json!({ "status": status }))
    }

    pub fn delete(id: impl Display) -> ApiRequest {
        ApiRequest::delete(format!("api/properties/{id}"))
    }

    /// Full-record update as multipart: `title` and `description` as plain
    /// text, the structured fields as JSON strings, then any attachments.
    pub fn update(id: impl Display, update: &PropertyUpdate, attachments: &[Attachment]) -> Result<ApiRequest, ApiError> {
        let request = ApiRequest::put(format!("api/properties/{id}"));
        let mut form = FormPayload::new()
            .text("title", update.title.as_str())
            .text("description", update.description.as_str())
            .json("location", &update.location)?
            .json("details", &update.details)?
            .json("rules", &update.rules)?
            .json("fees", &update.fees)?;
        for attachment in attachments {
            form = form.file(ATTACHMENT_FIELD, attachment.clone());
        }
        Ok(request.multipart(form))
    }

    /// Update with a caller-supplied JSON body.
    pub fn update_json(id: impl Display, body: Value) -> ApiRequest {
        ApiRequest::put(format!("api/properties/{id}")).json(body)
    }
}

#[derive(Clone)]
pub struct PropertyService {
    client: ApiClient,
}

impl PropertyService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_all(&self) -> ApiResponse {
        self.client.send(requests::list_all()).await
    }

    pub async fn list_mine(&self) -> ApiResponse {
        self.client.send(requests::list_mine()).await
    }

    pub async fn get(&self, id: impl Display) -> ApiResponse {
        self.client.send(requests::get(id)).await
    }

    pub async fn update_status(&self, id: impl Display, status: &str) -> ApiResponse {
        self.client.send(requests::update_status(id, status)).await
    }

    pub async fn delete(&self, id: impl Display) -> ApiResponse {
        self.client.send(requests::delete(id)).await
    }

    pub async fn update(&self, id: impl Display, update: &PropertyUpdate, attachments: &[Attachment]) -> ApiResponse {
        let request = requests::update(id, update, attachments)?;
        self.client.send(request).await
    }

    pub async fn update_json(&self, id: impl Display, body: Value) -> ApiResponse {
        self.client.send(requests::update_json(id, body)).await
    }
}
