use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::error::{ApiError, ErrorKind};

/// Result of every API call: the parsed JSON payload or a normalized error.
pub type ApiResponse = Result<Value, ApiError>;

/// A file part carried by a multipart request.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A single multipart file field.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub field: String,
    pub attachment: Attachment,
}

/// Inspectable multipart payload. Converted to a `reqwest` form at send time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormPayload {
    pub fields: Vec<(String, String)>,
    pub files: Vec<FilePart>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a plain text field.
    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.push((name.to_string(), value.into()));
        self
    }

    /// Adds a structured value as a JSON-serialized text field.
    pub fn json<T: Serialize>(mut self, name: &str, value: &T) -> Result<Self, ApiError> {
        let encoded = serde_json::to_string(value).map_err(|e| {
            ApiError::new(
                ErrorKind::Unknown,
                format!("failed to encode form field {name}: {e}"),
                None,
            )
        })?;
        self.fields.push((name.to_string(), encoded));
        Ok(self)
    }

    pub fn file(mut self, field: &str, attachment: Attachment) -> Self {
        self.files.push(FilePart {
            field: field.to_string(),
            attachment,
        });
        self
    }

    /// Looks up the first text field with the given name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub(crate) fn into_form(self) -> Result<reqwest::multipart::Form, ApiError> {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }
        for part in self.files {
            let attachment = part.attachment;
            let file = reqwest::multipart::Part::bytes(attachment.bytes)
                .file_name(attachment.file_name)
                .mime_str(&attachment.content_type)
                .map_err(|e| {
                    ApiError::new(
                        ErrorKind::Unknown,
                        format!("invalid content type: {e}"),
                        None,
                    )
                })?;
            form = form.part(part.field, file);
        }
        Ok(form)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    Multipart(FormPayload),
}

/// One outgoing call: method, path relative to the base endpoint, and
/// optional body and query parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<RequestBody>,
    pub query: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            query: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    pub fn multipart(mut self, form: FormPayload) -> Self {
        self.body = Some(RequestBody::Multipart(form));
        self
    }

    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn json_body(&self) -> Option<&Value> {
        match &self.body {
            Some(RequestBody::Json(v)) => Some(v),
            _ => None,
        }
    }

    pub fn form_body(&self) -> Option<&FormPayload> {
        match &self.body {
            Some(RequestBody::Multipart(f)) => Some(f),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_sets_method_path_and_body() {
        let req = ApiRequest::patch("api/properties/3/status").json(json!({"status": "rented"}));
        assert_eq!(req.method, Method::PATCH);
        assert_eq!(req.path, "api/properties/3/status");
        assert_eq!(req.json_body(), Some(&json!({"status": "rented"})));
        assert!(req.form_body().is_none());
    }

    #[test]
    fn test_form_payload_json_fields_are_strings() {
        let form = FormPayload::new()
            .text("title", "Flat")
            .json("rules", &json!(["no pets"]))
            .unwrap();
        assert_eq!(form.field("title"), Some("Flat"));
        assert_eq!(form.field("rules"), Some(r#"["no pets"]"#));
        assert_eq!(form.field("missing"), None);
    }

    #[test]
    fn test_form_payload_rejects_bad_mime() {
        let form = FormPayload::new().file(
            "images",
            Attachment {
                file_name: "a.png".to_string(),
                content_type: "not a mime".to_string(),
                bytes: vec![1, 2, 3],
            },
        );
        let err = form.into_form().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unknown);
    }
}
