#![allow(dead_code)]

pub mod config;
pub mod identity;
pub mod routes;
pub mod server;

use std::sync::Arc;

use bulwark_config::Config;
use bulwark_server::Collaborators;
use serde_json::Value;

use self::identity::HeaderIdentity;
use self::routes::Probe;
use self::server::TestServer;

/// Start a server with the test routes and header-based identity
pub async fn start(config: Config) -> (TestServer, Probe) {
    let probe = Probe::default();
    let collaborators = Collaborators {
        identity: Arc::new(HeaderIdentity),
        store: None,
        routes: routes::api_routes(&probe),
    };

    let server = TestServer::start(config, collaborators).await.unwrap();
    (server, probe)
}

/// Status and parsed JSON body of a response
pub async fn json(resp: reqwest::Response) -> (u16, Value) {
    let status = resp.status().as_u16();
    let body = resp.json::<Value>().await.unwrap();
    (status, body)
}
