//! Shared fixtures for integration tests.

use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use subresource_router::config::{parse_config, RouterConfig};
use subresource_router::{HttpServer, Shutdown};

/// A catalog entry resource whose locators lead to every scenario type.
pub const CATALOG: &str = r#"
[dispatch]
entry = "catalog"
max_rounds = 8

[[types]]
name = "catalog"

[[types]]
name = "I"
kind = "capability"

[[types]]
name = "A"
kind = "capability"
implements = ["I"]

[[types]]
name = "B"
kind = "capability"
implements = ["I"]

[[types]]
name = "Diamond"
implements = ["A", "B"]

[[types]]
name = "Grand"

[[types]]
name = "Parent"
base = "Grand"

[[types]]
name = "Child"
base = "Parent"

[[types]]
name = "Items"

[[types]]
name = "Letters"

[[types]]
name = "Plain"

[[resources]]
type = "catalog"
[[resources.routes]]
methods = ["GET", "POST"]
path = "/shop"
endpoint = "shop"
produces = "Items"
[[resources.routes]]
methods = ["GET"]
path = "/diamond"
endpoint = "diamond"
produces = "Diamond"
[[resources.routes]]
methods = ["GET"]
path = "/child"
endpoint = "child"
produces = "Child"
[[resources.routes]]
methods = ["GET"]
path = "/letters"
endpoint = "letters"
produces = "Letters"
[[resources.routes]]
methods = ["GET"]
path = "/plain"
endpoint = "plain"
produces = "Plain"

[[resources]]
type = "I"
[[resources.routes]]
methods = ["GET"]
path = "/shared"
endpoint = "shared"

[[resources]]
type = "Grand"
[[resources.routes]]
methods = ["GET"]
path = "/grand"
endpoint = "grand"

[[resources]]
type = "Parent"
[[resources.routes]]
methods = ["GET"]
path = "/parent"
endpoint = "parent"

[[resources]]
type = "Items"
[[resources.routes]]
methods = ["GET"]
path = "/items/{id}"
endpoint = "get_item"

[[resources]]
type = "Letters"
[[resources.routes]]
methods = ["GET"]
path = "/a"
endpoint = "a"
[[resources.routes]]
methods = ["GET"]
path = "/b"
endpoint = "b"
"#;

pub fn catalog_config() -> RouterConfig {
    parse_config(CATALOG).expect("catalog fixture is valid")
}

/// Start the server on an ephemeral port. Returns its address and the shutdown handle.
#[allow(dead_code)]
pub async fn start_server(config: RouterConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let (_, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(config).unwrap();

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    (addr, shutdown)
}
