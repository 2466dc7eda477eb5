mod common;

use std::time::Duration;

use rotomdex::Pokedex;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn dex_for(server: &MockServer) -> Pokedex {
    Pokedex::builder()
        .base_url(server.uri())
        .prefetch(false)
        .retry_backoff(Duration::from_millis(1), Duration::from_millis(4))
        .build()
}

#[tokio::test]
async fn finds_by_sanitized_lowercased_name() {
    let server = MockServer::start().await;
    // the lookup goes by name, not id
    Mock::given(method("GET"))
        .and(path("/pokemon/pikachu"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::detail_json(25, "pikachu", &["electric"])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dex = dex_for(&server);
    let found = dex.search_by_name("  Pika<script>chu  ").await;

    let pokemon = found.expect("should resolve after sanitization");
    assert_eq!(pokemon.id, 25);
    assert_eq!(pokemon.name, "pikachu");
    assert_eq!(pokemon.stats[0].name, "HP");
    assert_eq!(pokemon.abilities[1].name, "solar power");
    assert!(pokemon.abilities[1].hidden);
}

#[tokio::test]
async fn empty_after_sanitization_skips_the_network() {
    let server = MockServer::start().await;

    let dex = dex_for(&server);
    assert!(dex.search_by_name("").await.is_none());
    assert!(dex.search_by_name("   ").await.is_none());
    assert!(dex.search_by_name("!!;;''").await.is_none());

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_name_resolves_to_none() {
    let server = MockServer::start().await;

    let dex = dex_for(&server);
    assert!(dex.search_by_name("missingno").await.is_none());
}

#[tokio::test]
async fn server_error_also_resolves_to_none_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pokemon/pikachu"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let dex = dex_for(&server);
    assert!(dex.search_by_name("pikachu").await.is_none());
}

#[tokio::test]
async fn search_term_refines_the_visible_page() {
    let server = MockServer::start().await;
    common::mount_page(&server, 0, 1, 3, &[1]).await;
    common::mount_page(&server, 0, 10, 3, &[1, 2, 3]).await;
    common::mount_detail(&server, 1, "bulbasaur", &["grass", "poison"]).await;
    common::mount_detail(&server, 2, "ivysaur", &["grass", "poison"]).await;
    common::mount_detail(&server, 3, "venusaur", &["grass", "poison"]).await;

    let dex = dex_for(&server);
    dex.initialize().await.unwrap();
    assert_eq!(dex.visible_pokemon().len(), 3);

    // substring match on the name, case-insensitive
    dex.set_search_term("SAUR");
    assert_eq!(dex.visible_pokemon().len(), 3);
    dex.set_search_term("ivy");
    let names: Vec<_> = dex.visible_pokemon().iter().map(|p| p.name.clone()).collect();
    assert_eq!(names, vec!["ivysaur"]);

    // or on the decimal id
    dex.set_search_term("3");
    let ids: Vec<_> = dex.visible_pokemon().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![3]);

    // refinement never refetches
    dex.set_search_term("no-such-pokemon");
    assert!(dex.visible_pokemon().is_empty());
    dex.set_search_term("");
    assert_eq!(dex.visible_pokemon().len(), 3);
}
