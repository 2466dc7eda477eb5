mod common;

use rotomdex::types::PokemonType;
use rotomdex::{DexError, PokeApiClient};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn list_parses_count_and_entries() {
    let server = MockServer::start().await;
    common::mount_page(&server, 0, 10, 1302, &[1, 2, 3]).await;

    let client = PokeApiClient::with_base_url(server.uri());
    let page = client.list(0, 10).await.unwrap();

    assert_eq!(page.count, 1302);
    assert_eq!(page.results.len(), 3);
    assert_eq!(page.results[0].name, "pokemon-1");
    assert!(page.results[2].url.ends_with("/pokemon/3"));
}

#[tokio::test]
async fn detail_parses_payload() {
    let server = MockServer::start().await;
    common::mount_detail(&server, 25, "pikachu", &["electric"]).await;

    let client = PokeApiClient::with_base_url(server.uri());
    let detail = client.detail("25").await.unwrap();

    assert_eq!(detail.id, 25);
    assert_eq!(detail.name, "pikachu");
    assert_eq!(detail.types.len(), 1);
    assert_eq!(detail.types[0].kind.name, "electric");
    assert_eq!(detail.stats[0].stat.name, "hp");
    assert!(detail.species.url.contains("/pokemon-species/25/"));
}

#[tokio::test]
async fn missing_resource_maps_to_not_found() {
    let server = MockServer::start().await;

    let client = PokeApiClient::with_base_url(server.uri());
    let err = client.detail("missingno").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn server_error_maps_to_api_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pokemon/1"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = PokeApiClient::with_base_url(server.uri());
    let err = client.detail("1").await.unwrap_err();

    assert!(matches!(err, DexError::Api { status: 503, .. }));
}

#[tokio::test]
async fn undecodable_body_maps_to_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pokemon/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = PokeApiClient::with_base_url(server.uri());
    let err = client.detail("1").await.unwrap_err();

    assert!(matches!(err, DexError::Http(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn type_listing_hits_the_tag_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/type/fire"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::type_json("fire", &[4, 5, 6])))
        .expect(1)
        .mount(&server)
        .await;

    let client = PokeApiClient::with_base_url(server.uri());
    let listing = client.type_listing(PokemonType::Fire).await.unwrap();

    assert_eq!(listing.name, "fire");
    assert_eq!(listing.pokemon.len(), 3);
}

#[tokio::test]
async fn list_sends_offset_and_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pokemon/"))
        .and(query_param("offset", "40"))
        .and(query_param("limit", "10"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::page_json(&server.uri(), 100, &[41])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = PokeApiClient::with_base_url(server.uri());
    client.list(40, 10).await.unwrap();
}
