//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the operation route table
//! - Install the keyword fallback for old-style URIs
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener and drain on shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, Uri},
    routing::{on, MethodFilter},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::http::handlers;
use crate::http::request::{self, RequestIdGenerator};
use crate::routing::Operation;
use crate::store::ProductStore;

/// Application state injected into handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub store: Arc<dyn ProductStore>,
    pub legacy_dispatch: bool,
}

/// HTTP server for the online shop.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a new HTTP server over the given store.
    pub fn new(config: ServiceConfig, store: Arc<dyn ProductStore>) -> Self {
        let state = AppState {
            store,
            legacy_dispatch: config.routing.legacy_dispatch,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let mut routes: Router<AppState> = Router::new();
        for op in Operation::ALL {
            let handler =
                move |state: State<AppState>, uri: Uri| handlers::dispatch(state, op, uri);
            let mut method_router = on(op.method_filter(), handler);
            if op.method() == Method::GET {
                // axum would otherwise answer HEAD with the GET handler.
                method_router = method_router.on(MethodFilter::HEAD, handlers::legacy_dispatch);
            }
            routes = routes.route(op.path(), method_router.fallback(handlers::legacy_dispatch));
        }

        routes
            .fallback(handlers::legacy_dispatch)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %req.method(),
                    uri = %req.uri(),
                    request_id = %request::request_id(req),
                )
            }))
            .layer(SetRequestIdLayer::x_request_id(RequestIdGenerator))
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            legacy_dispatch = self.config.routing.legacy_dispatch,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Clone of the fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, Product, SqliteStore};
    use axum::http::{header, StatusCode};
    use axum::response::Response;
    use tower::ServiceExt;

    fn server_with(store: Arc<dyn ProductStore>) -> (Router, Arc<dyn ProductStore>) {
        let server = HttpServer::new(ServiceConfig::default(), store.clone());
        (server.router(), store)
    }

    fn memory_server() -> (Router, Arc<dyn ProductStore>) {
        server_with(Arc::new(MemoryStore::new()))
    }

    async fn send(router: &Router, method: Method, uri: &str) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        router.clone().oneshot(request).await.unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn run_scenario(router: &Router) {
        let res = send(router, Method::POST, "/create-new-product?name=Widget&code=W1&category=Tools").await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().get(header::CONTENT_TYPE).is_none());

        let res = send(router, Method::GET, "/get-product-list").await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(
            body_string(res).await,
            "[{\"name\":\"Widget\",\"code\":\"W1\",\"category\":\"Tools\"}]\n"
        );

        let res = send(
            router,
            Method::POST,
            "/change-product-by-name?old-name=Widget&name=Widget2&code=W2&category=Tools2",
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);

        let res = send(router, Method::GET, "/get-product-info?name=Widget2").await;
        assert_eq!(res.status(), StatusCode::OK);
        let product: Product = serde_json::from_str(&body_string(res).await).unwrap();
        assert_eq!(product, Product::new("Widget2", "W2", "Tools2"));

        let res = send(router, Method::GET, "/get-product-info?name=Widget").await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = send(router, Method::DELETE, "/delete-product?name=Widget2").await;
        assert_eq!(res.status(), StatusCode::OK);

        let res = send(router, Method::GET, "/get-product-list").await;
        assert_eq!(body_string(res).await, "[]\n");
    }

    #[tokio::test]
    async fn test_scenario_memory_store() {
        let (router, _) = memory_server();
        run_scenario(&router).await;
    }

    #[tokio::test]
    async fn test_scenario_sqlite_store() {
        let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
        let (router, _) = server_with(Arc::new(store));
        run_scenario(&router).await;
    }

    #[tokio::test]
    async fn test_fetch_missing_on_empty_store() {
        let (router, _) = memory_server();
        let res = send(&router, Method::GET, "/get-product-info?name=Missing").await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(res).await, "Not found product with name:Missing");
    }

    #[tokio::test]
    async fn test_legacy_query_keywords() {
        let (router, store) = memory_server();

        let res = send(&router, Method::POST, "/?name=Widget&code=W1&category=Tools&create-new-product").await;
        assert_eq!(res.status(), StatusCode::OK);

        let res = send(&router, Method::GET, "/?name=Widget&get-product-info").await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            body_string(res).await,
            "{\"name\":\"Widget\",\"code\":\"W1\",\"category\":\"Tools\"}\n"
        );

        let res = send(&router, Method::DELETE, "/?name=Widget&delete-product").await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_params_are_rejected_without_mutation() {
        let (router, store) = memory_server();
        store.create(Product::new("Widget", "W1", "Tools")).await.unwrap();

        let cases = [
            (Method::POST, "/create-new-product?name=A&code=1", "category param not found"),
            (Method::POST, "/create-new-product?name=&code=1&category=c", "name param not found"),
            (Method::POST, "/change-product-by-name?name=A&code=1&category=c", "old-name param not found"),
            (Method::POST, "/change-product-by-name?old-name=Widget&code=1&category=c", "name param not found"),
            (Method::DELETE, "/delete-product", "name param not found"),
            (Method::GET, "/get-product-info?code=1", "name param not found"),
        ];

        for (method, uri, message) in cases {
            let res = send(&router, method, uri).await;
            assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body_string(res).await, message, "{uri}");
        }

        assert_eq!(
            store.list().await.unwrap(),
            vec![Product::new("Widget", "W1", "Tools")]
        );
    }

    #[tokio::test]
    async fn test_unmatched_update_and_delete_are_not_found() {
        let (router, store) = memory_server();
        store.create(Product::new("Widget", "W1", "Tools")).await.unwrap();

        let res = send(
            &router,
            Method::POST,
            "/change-product-by-name?old-name=Ghost&name=New&code=1&category=c",
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(res).await, "Not found product with name:Ghost");

        let res = send(&router, Method::DELETE, "/delete-product?name=Ghost").await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        assert_eq!(
            store.list().await.unwrap(),
            vec![Product::new("Widget", "W1", "Tools")]
        );
    }

    #[tokio::test]
    async fn test_unexpected_requests_are_bad_requests() {
        let (router, _) = memory_server();

        let res = send(&router, Method::GET, "/unknown").await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_string(res).await, "Got unexpected GET request");

        let res = send(&router, Method::POST, "/get-product-list").await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_string(res).await, "Got unexpected POST request");

        let res = send(&router, Method::PUT, "/?create-new-product").await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_string(res).await, "Got unexpected PUT request");
    }

    #[tokio::test]
    async fn test_head_and_options_are_bad_requests() {
        let (router, _) = memory_server();

        for uri in [
            "/get-product-list",
            "/get-product-info?name=x",
            "/?get-product-list",
        ] {
            let res = send(&router, Method::HEAD, uri).await;
            assert_eq!(res.status(), StatusCode::BAD_REQUEST, "HEAD {uri}");
        }

        let res = send(&router, Method::OPTIONS, "/get-product-list").await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_string(res).await, "Got unexpected OPTIONS request");
    }

    #[tokio::test]
    async fn test_legacy_dispatch_disabled() {
        let mut config = ServiceConfig::default();
        config.routing.legacy_dispatch = false;
        let router = HttpServer::new(config, Arc::new(MemoryStore::new())).router();

        let res = send(&router, Method::GET, "/?get-product-list").await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let res = send(&router, Method::GET, "/get-product-list").await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_request_id_is_returned() {
        let (router, _) = memory_server();

        let res = send(&router, Method::GET, "/get-product-list").await;
        let id = res.headers()[request::X_REQUEST_ID].to_str().unwrap();
        assert!(uuid::Uuid::parse_str(id).is_ok());

        let req = Request::builder()
            .uri("/get-product-list")
            .header(request::X_REQUEST_ID, "client-id")
            .body(Body::empty())
            .unwrap();
        let res = router.clone().oneshot(req).await.unwrap();
        assert_eq!(res.headers()[request::X_REQUEST_ID], "client-id");
    }

    #[tokio::test]
    async fn test_concurrent_updates_never_tear_records() {
        let (router, store) = memory_server();
        store.create(Product::new("Item", "c0", "k0")).await.unwrap();

        let mut handles = Vec::new();
        for i in 1..=20 {
            let writer = router.clone();
            handles.push(tokio::spawn(async move {
                let uri = format!("/change-product-by-name?old-name=Item&name=Item&code=c{i}&category=k{i}");
                send(&writer, Method::POST, &uri).await.status()
            }));
            let reader = router.clone();
            handles.push(tokio::spawn(async move {
                let res = send(&reader, Method::GET, "/get-product-info?name=Item").await;
                let status = res.status();
                let product: Product = serde_json::from_str(&body_string(res).await).unwrap();
                assert_eq!(&product.code[1..], &product.category[1..]);
                status
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap(), StatusCode::OK);
        }

        let product = store.find_by_name("Item").await.unwrap().unwrap();
        assert_eq!(&product.code[1..], &product.category[1..]);
    }
}
