use super::common::TestCatalogBuilder;
use crate::errors::LookupError;
use pretty_assertions::assert_eq;
use schema::PokemonType;

#[tokio::test]
async fn test_fire_returns_both_fire_creatures() {
    let harness = TestCatalogBuilder::starters().build().await;
    let records = harness.service.get_by_kind("fire").await.unwrap();

    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["charmander", "vulpix"]);
    assert!(records.iter().all(|r| r.kinds.contains(&"fire".to_string())));
}

#[tokio::test]
async fn test_secondary_kind_matches_with_full_kind_list() {
    let harness = TestCatalogBuilder::starters().build().await;
    let records = harness.service.get_by_kind("Poison").await.unwrap();

    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["bulbasaur", "gengar"]);
    assert_eq!(records[0].kinds, vec!["grass", "poison"]);
    assert_eq!(records[1].kinds, vec!["ghost", "poison"]);
}

#[tokio::test]
async fn test_short_kind_is_bad_request() {
    let harness = TestCatalogBuilder::starters().build().await;
    let err = harness.service.get_by_kind("f").await.unwrap_err();
    assert!(matches!(err, LookupError::BadRequest(_)));
    assert_eq!(harness.catalog.queries(), 0);
}

#[tokio::test]
async fn test_misspelled_kind_suggests_from_kind_list() {
    let harness = TestCatalogBuilder::starters().build().await;
    let err = harness.service.get_by_kind("fyre").await.unwrap_err();
    assert_eq!(
        err,
        LookupError::NotFound("No Pokemon found with type 'fyre'. Did you mean: fire?".into())
    );
}

#[tokio::test]
async fn test_kind_suggestions_never_mention_creatures() {
    // A creature name close to the input must not leak into kind suggestions
    let harness = TestCatalogBuilder::new()
        .with_creature("rocky", &["rock"])
        .build()
        .await;
    let err = harness.service.get_by_kind("rocko").await.unwrap_err();
    let LookupError::NotFound(message) = err else {
        panic!("expected NotFound");
    };
    assert!(message.contains("Did you mean: rock"), "{message}");
    assert!(!message.contains("rocky"), "{message}");
}

#[tokio::test]
async fn test_unrelated_kind_lists_every_known_kind() {
    let harness = TestCatalogBuilder::starters().build().await;
    let err = harness.service.get_by_kind("shadowy").await.unwrap_err();
    let expected = format!(
        "No Pokemon found with type 'shadowy'. Known types: {}",
        PokemonType::all_names().join(", ")
    );
    assert_eq!(err, LookupError::NotFound(expected));
}

#[tokio::test]
async fn test_known_kind_without_members() {
    let harness = TestCatalogBuilder::starters().build().await;
    let err = harness.service.get_by_kind("dragon").await.unwrap_err();
    assert_eq!(
        err,
        LookupError::NotFound("No Pokemon found with type 'dragon'.".into())
    );
}

#[tokio::test]
async fn test_injected_kind_candidates() {
    let harness = TestCatalogBuilder::starters().build().await;
    let service = harness
        .service
        .with_kind_candidates(vec!["sound".to_string(), "light".to_string()]);
    let err = service.get_by_kind("sounds").await.unwrap_err();
    assert_eq!(
        err,
        LookupError::NotFound("No Pokemon found with type 'sounds'. Did you mean: sound?".into())
    );
}
