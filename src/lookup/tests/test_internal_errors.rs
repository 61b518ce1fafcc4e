use super::common::{names, FailingCatalog};
use crate::errors::LookupError;
use crate::lookup::LookupService;
use crate::rate_limit::{RateLimitConfig, RateLimiter};
use std::sync::Arc;

fn failing_service() -> LookupService {
    LookupService::new(
        Arc::new(FailingCatalog),
        Arc::new(RateLimiter::new(RateLimitConfig::default())),
    )
}

#[tokio::test]
async fn test_storage_failures_become_generic_internal_errors() {
    let service = failing_service();

    let single = service.get_by_name("pikachu").await.unwrap_err();
    let batch = service
        .get_many_by_name(&names(&["pikachu", "eevee"]))
        .await
        .unwrap_err();
    let by_kind = service.get_by_kind("fire").await.unwrap_err();

    for err in [single, batch, by_kind] {
        assert_eq!(err, LookupError::Internal);
        assert_eq!(err.to_string(), "An internal error occurred");
    }
}

#[tokio::test]
async fn test_validation_still_precedes_storage() {
    let service = failing_service();
    assert!(matches!(
        service.get_by_name("p").await,
        Err(LookupError::BadRequest(_))
    ));
}
