use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method},
};
use config::{AllowList, CorsConfig};
use deployment::Deployment;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{DeploymentImpl, routes};

pub fn router(deployment: DeploymentImpl) -> Router {
    let cors = deployment.config().cors.clone();

    let router = Router::new()
        .merge(routes::redirect::router())
        .merge(routes::health::router())
        .with_state(deployment)
        .layer(TraceLayer::new_for_http());

    if cors.enabled {
        router.layer(cors_layer(&cors))
    } else {
        router
    }
}

/// Credentialed CORS may not answer with `*`, so wildcards mirror the request
/// instead when credentials are allowed.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let credentials = config.allow_credentials;

    let origins = match &config.allow_origins {
        AllowList::Any if credentials => AllowOrigin::mirror_request(),
        AllowList::Any => AllowOrigin::any(),
        AllowList::Only(origins) => AllowOrigin::list(parse_all(origins, "origin", |origin| {
            HeaderValue::from_str(origin).ok()
        })),
    };
    let methods = match &config.allow_methods {
        AllowList::Any if credentials => AllowMethods::mirror_request(),
        AllowList::Any => AllowMethods::any(),
        AllowList::Only(methods) => AllowMethods::list(parse_all(methods, "method", |method| {
            Method::from_bytes(method.to_ascii_uppercase().as_bytes()).ok()
        })),
    };
    let headers = match &config.allow_headers {
        AllowList::Any if credentials => AllowHeaders::mirror_request(),
        AllowList::Any => AllowHeaders::any(),
        AllowList::Only(headers) => AllowHeaders::list(parse_all(headers, "header", |header| {
            HeaderName::from_bytes(header.as_bytes()).ok()
        })),
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(headers)
        .allow_credentials(credentials)
}

fn parse_all<T>(items: &[String], kind: &str, parse: impl Fn(&str) -> Option<T>) -> Vec<T> {
    items
        .iter()
        .filter_map(|item| {
            let parsed = parse(item);
            if parsed.is_none() {
                tracing::warn!("Ignoring invalid CORS {kind}: {item:?}");
            }
            parsed
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, Response, StatusCode, header},
    };
    use config::{
        AppConfig, CorsConfig, DatabaseConfig, HttpsPolicy, RedirectConfig, ServerConfig,
    };
    use db::{
        DBService,
        models::{
            company::{Company, CreateCompany},
            company_branch::CompanyBranch,
            qr_code::{CreateQrCode, QrCode},
        },
    };
    use deployment::Deployment;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::DeploymentImpl;

    struct Seeded {
        branch_id: i64,
        qr_code_id: i64,
    }

    async fn setup_deployment(base_domain: &str, https: HttpsPolicy) -> DeploymentImpl {
        setup_deployment_with_cors(base_domain, https, CorsConfig::default()).await
    }

    async fn setup_deployment_with_cors(
        base_domain: &str,
        https: HttpsPolicy,
        cors: CorsConfig,
    ) -> DeploymentImpl {
        let config = AppConfig {
            server: ServerConfig::default(),
            database: DatabaseConfig::new("sqlite::memory:"),
            redirect: RedirectConfig::new(base_domain, https),
            cors,
        };
        let db = DBService::new(&config.database).await.unwrap();
        DeploymentImpl::from_parts(config, db)
    }

    async fn seed(deployment: &DeploymentImpl, subdomain: &str, hash: &str, scans: i32) -> Seeded {
        let pool = &deployment.db().pool;
        let company = Company::create(
            pool,
            &CreateCompany {
                name: format!("{subdomain} bistro"),
                subdomain: subdomain.to_string(),
            },
        )
        .await
        .unwrap();
        let branch = CompanyBranch::create(pool, company.id).await.unwrap();
        let qr_code = QrCode::create(
            pool,
            &CreateQrCode {
                company_branch_id: branch.id,
                url_hash: Some(hash.to_string()),
                scan_count: scans,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        Seeded {
            branch_id: branch.id,
            qr_code_id: qr_code.id,
        }
    }

    async fn get(deployment: &DeploymentImpl, uri: &str) -> Response<Body> {
        super::router(deployment.clone())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn json_body(response: Response<Body>) -> Value {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn set_cookie(response: &Response<Body>) -> String {
        response
            .headers()
            .get(header::SET_COOKIE)
            .expect("set-cookie header")
            .to_str()
            .unwrap()
            .to_string()
    }

    async fn scan_count(deployment: &DeploymentImpl, id: i64) -> i32 {
        QrCode::find_by_id(&deployment.db().pool, id)
            .await
            .unwrap()
            .unwrap()
            .scan_count
    }

    #[tokio::test]
    async fn redirect_sends_visitor_to_company_subdomain() {
        let deployment = setup_deployment("example.com", HttpsPolicy::Always).await;
        let seeded = seed(&deployment, "acme", "H", 0).await;

        let response = get(&deployment, "/redirect/H").await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "https://acme.example.com/"
        );
        let cookie = set_cookie(&response);
        assert!(cookie.starts_with(&format!("company_branch_id={}", seeded.branch_id)));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=2592000"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Secure"));

        assert_eq!(scan_count(&deployment, seeded.qr_code_id).await, 1);
    }

    #[tokio::test]
    async fn local_base_domain_redirects_over_http_without_secure_cookie() {
        let deployment = setup_deployment("localhost:8000", HttpsPolicy::Auto).await;
        seed(&deployment, "acme", "H", 0).await;

        let response = get(&deployment, "/redirect/H").await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "http://acme.localhost:8000/"
        );
        assert!(!set_cookie(&response).contains("Secure"));
    }

    #[tokio::test]
    async fn unknown_hash_is_404_and_counts_nothing() {
        let deployment = setup_deployment("example.com", HttpsPolicy::Auto).await;
        let seeded = seed(&deployment, "acme", "H", 4).await;

        let response = get(&deployment, "/redirect/missing").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        let body = json_body(response).await;
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.contains("missing"));
        assert!(detail.contains("not found"));

        assert_eq!(scan_count(&deployment, seeded.qr_code_id).await, 4);
    }

    #[tokio::test]
    async fn sequential_redirects_count_every_scan() {
        let deployment = setup_deployment("example.com", HttpsPolicy::Auto).await;
        let seeded = seed(&deployment, "acme", "H", 5).await;

        let mut last_scanned = None;
        for expected in [6, 7, 8] {
            let response = get(&deployment, "/redirect/H").await;
            assert_eq!(response.status(), StatusCode::FOUND);

            let stored = QrCode::find_by_id(&deployment.db().pool, seeded.qr_code_id)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(stored.scan_count, expected);
            let scanned = stored.last_scanned.unwrap();
            if let Some(previous) = last_scanned {
                assert!(scanned >= previous);
            }
            last_scanned = Some(scanned);
        }
    }

    #[tokio::test]
    async fn store_failure_on_redirect_is_opaque_500() {
        let deployment = setup_deployment("example.com", HttpsPolicy::Auto).await;
        seed(&deployment, "acme", "H", 0).await;
        deployment.db().pool.clone().close().await.unwrap();

        let response = get(&deployment, "/redirect/H").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await["detail"], "Internal server error");
    }

    #[tokio::test]
    async fn liveness_is_always_ok() {
        let deployment = setup_deployment("example.com", HttpsPolicy::Auto).await;

        let response = get(&deployment, "/health/live").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_reports_database_state() {
        let deployment = setup_deployment("example.com", HttpsPolicy::Auto).await;

        let response = get(&deployment, "/health/ready").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ready");
        assert_eq!(body["checks"]["database"], true);
        assert!(body.get("errors").is_none());

        deployment.db().pool.clone().close().await.unwrap();

        let response = get(&deployment, "/health/ready").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = json_body(response).await;
        assert_eq!(body["status"], "not_ready");
        assert_eq!(body["checks"]["database"], false);
        assert!(
            body["errors"][0]
                .as_str()
                .unwrap()
                .starts_with("Database check failed")
        );
    }

    #[tokio::test]
    async fn credentialed_cors_mirrors_the_request_origin() {
        let deployment = setup_deployment("example.com", HttpsPolicy::Auto).await;

        let response = super::router(deployment)
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/health/live")
                    .header(header::ORIGIN, "https://menu.example.com")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://menu.example.com"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
    }

    #[tokio::test]
    async fn disabled_cors_adds_no_headers() {
        let cors = CorsConfig {
            enabled: false,
            ..CorsConfig::default()
        };
        let deployment = setup_deployment_with_cors("example.com", HttpsPolicy::Auto, cors).await;

        let response = super::router(deployment)
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .header(header::ORIGIN, "https://menu.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none()
        );
    }
}
