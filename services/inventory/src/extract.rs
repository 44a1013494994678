//! Request body extractors

use axum::{
    Form, Json, async_trait,
    extract::{FromRequest, Request},
    http::header,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

/// Body decoded from `application/json` when the request says so, and from
/// an urlencoded form otherwise.
///
/// ```ignore
/// async fn login(FormOrJson(credentials): FormOrJson<Credentials>) -> Response {
///     // ...
/// }
/// ```
pub struct FormOrJson<T>(pub T);

fn is_json(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

#[async_trait]
impl<T, S> FromRequest<S> for FormOrJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_json(&req) {
            let Json(data) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| e.into_response())?;
            Ok(FormOrJson(data))
        } else {
            let Form(data) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| e.into_response())?;
            Ok(FormOrJson(data))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Credentials;
    use axum::{body::Body, http::StatusCode};

    fn request(content_type: &str, body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/login")
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_form_body() {
        let req = request("application/x-www-form-urlencoded", "username=alice&password=pw1");
        let FormOrJson(credentials) = FormOrJson::<Credentials>::from_request(req, &())
            .await
            .unwrap();
        assert_eq!(credentials.username, "alice");
        assert_eq!(credentials.password, "pw1");
    }

    #[tokio::test]
    async fn test_json_body() {
        let req = request(
            "application/json; charset=utf-8",
            r#"{"username":"alice","password":"pw1"}"#,
        );
        let FormOrJson(credentials) = FormOrJson::<Credentials>::from_request(req, &())
            .await
            .unwrap();
        assert_eq!(credentials.username, "alice");
        assert_eq!(credentials.password, "pw1");
    }

    #[tokio::test]
    async fn test_malformed_json_is_rejected() {
        let req = request("application/json", "{not json");
        let rejection = FormOrJson::<Credentials>::from_request(req, &())
            .await
            .err()
            .unwrap();
        assert_eq!(rejection.status(), StatusCode::BAD_REQUEST);
    }
}
