//! Rent requests and contracts.

use std::fmt::Display;

use serde::Serialize;

use crate::api::{ApiClient, ApiRequest, ApiResponse};

pub mod requests {
    use super::*;
    use crate::api::{ApiError, ErrorKind};
    use serde_json::json;

    pub fn list_mine() -> ApiRequest {
        ApiRequest::get("api/rent-requests/my-requests")
    }

    pub fn create<T: Serialize>(data: &T) -> Result<ApiRequest, ApiError> {
        let body = serde_json::to_value(data).map_err(|e| {
            ApiError::new(ErrorKind::Unknown, format!("failed to encode rent request: {e}"), None)
        })?;
        Ok(ApiRequest::post("api/rent-requests").json(body))
    }

    pub fn update_status(id: impl Display, status: &str) -> ApiRequest {
        ApiRequest::put(format!("api/rent-requests/{id}/status")).json(json!({ "status": status }))
    }
}

#[derive(Clone)]
pub struct RentRequestService {
    client: ApiClient,
}

impl RentRequestService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_mine(&self) -> ApiResponse {
        self.client.send(requests::list_mine()).await
    }

    pub async fn create<T: Serialize>(&self, data: &T) -> ApiResponse {
        let request = requests::create(data)?;
        self.client.send(request).await
    }

    pub async fn update_status(&self, id: impl Display, status: &str) -> ApiResponse {
        self.client.send(requests::update_status(id, status)).await
    }
}
