use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};

use crate::{error::AppError, module::Caller};

pub const MODULE_HEADER: &str = "x-module-id";

/// Extractor for the module a request is made on behalf of. Requests without
/// the header are attributed to the core.
pub struct CallerModule(pub Caller);

#[async_trait]
impl<S> FromRequestParts<S> for CallerModule
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(MODULE_HEADER) else {
            return Ok(CallerModule(Caller::Core));
        };

        let module = value
            .to_str()
            .map_err(|_| AppError::BadRequest(format!("Invalid {} header", MODULE_HEADER)))?
            .trim();

        if module.is_empty() {
            Ok(CallerModule(Caller::Core))
        } else {
            Ok(CallerModule(Caller::Module(module.to_string())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<Caller, AppError> {
        let (mut parts, _) = request.into_parts();
        CallerModule::from_request_parts(&mut parts, &())
            .await
            .map(|CallerModule(caller)| caller)
    }

    #[tokio::test]
    async fn test_missing_header_is_core() {
        let caller = extract(Request::new(())).await.unwrap();
        assert_eq!(caller, Caller::Core);
    }

    #[tokio::test]
    async fn test_header_names_module() {
        let request = Request::builder()
            .header("X-Module-Id", " analytics ")
            .body(())
            .unwrap();

        let caller = extract(request).await.unwrap();
        assert_eq!(caller, Caller::Module("analytics".into()));
    }

    #[tokio::test]
    async fn test_blank_header_is_core() {
        let request = Request::builder()
            .header(MODULE_HEADER, "")
            .body(())
            .unwrap();

        assert_eq!(extract(request).await.unwrap(), Caller::Core);
    }
}
