//! Shared wiremock fixtures for the integration tests.
#![allow(dead_code)]

use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A detail payload in the remote wire shape.
pub fn detail_json(id: u32, name: &str, types: &[&str]) -> Value {
    json!({
        "id": id,
        "name": name,
        "height": 7,
        "weight": 69,
        "sprites": {
            "front_default": format!("https://sprites.example/{id}.png"),
            "front_shiny": null,
            "back_default": null,
            "back_shiny": null,
            "other": {
                "official-artwork": {
                    "front_default": format!("https://sprites.example/art/{id}.png"),
                    "front_shiny": null
                }
            }
        },
        "types": types
            .iter()
            .enumerate()
            .map(|(i, tag)| json!({
                "slot": i + 1,
                "type": {"name": tag, "url": format!("https://pokeapi.co/api/v2/type/{}/", i + 1)}
            }))
            .collect::<Vec<_>>(),
        "stats": [
            {"base_stat": 45, "effort": 0, "stat": {"name": "hp", "url": ""}},
            {"base_stat": 49, "effort": 0, "stat": {"name": "attack", "url": ""}},
            {"base_stat": 65, "effort": 1, "stat": {"name": "special-attack", "url": ""}}
        ],
        "abilities": [
            {"ability": {"name": "overgrow", "url": ""}, "is_hidden": false, "slot": 1},
            {"ability": {"name": "solar-power", "url": ""}, "is_hidden": true, "slot": 3}
        ],
        "species": {
            "name": name,
            "url": format!("https://pokeapi.co/api/v2/pokemon-species/{id}/")
        }
    })
}

/// A listing payload whose entry URLs point back at the mock server.
pub fn page_json(server_uri: &str, count: u32, ids: &[u32]) -> Value {
    json!({
        "count": count,
        "next": null,
        "previous": null,
        "results": ids
            .iter()
            .map(|id| json!({
                "name": format!("pokemon-{id}"),
                "url": format!("{server_uri}/pokemon/{id}")
            }))
            .collect::<Vec<_>>()
    })
}

/// A type membership payload whose member URLs carry the given ids.
pub fn type_json(tag: &str, ids: &[u32]) -> Value {
    json!({
        "id": 1,
        "name": tag,
        "pokemon": ids
            .iter()
            .map(|id| json!({
                "pokemon": {
                    "name": format!("pokemon-{id}"),
                    "url": format!("https://pokeapi.co/api/v2/pokemon/{id}/")
                },
                "slot": 1
            }))
            .collect::<Vec<_>>()
    })
}

/// Mount a listing window at `offset`/`limit`.
pub async fn mount_page(server: &MockServer, offset: u32, limit: u32, count: u32, ids: &[u32]) {
    Mock::given(method("GET"))
        .and(path("/pokemon/"))
        .and(query_param("offset", offset.to_string()))
        .and(query_param("limit", limit.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(&server.uri(), count, ids)))
        .mount(server)
        .await;
}

/// Mount a detail endpoint for one pokemon.
pub async fn mount_detail(server: &MockServer, id: u32, name: &str, types: &[&str]) {
    Mock::given(method("GET"))
        .and(path(format!("/pokemon/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail_json(id, name, types)))
        .mount(server)
        .await;
}

/// Mount detail endpoints for a block of generated pokemon.
pub async fn mount_details(server: &MockServer, ids: &[u32]) {
    for id in ids {
        mount_detail(server, *id, &format!("pokemon-{id}"), &["normal"]).await;
    }
}
