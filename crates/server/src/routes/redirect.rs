use axum::{
    Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use deployment::Deployment;
use services::services::redirect::RedirectTarget;

use crate::{DeploymentImpl, error::ApiError};

pub const BRANCH_COOKIE: &str = "company_branch_id";
const BRANCH_COOKIE_MAX_AGE: time::Duration = time::Duration::days(30);

/// Counts the scan behind `url_hash` and sends the visitor to the owning
/// company's site, tagged with the branch they scanned at.
pub async fn redirect_qr_code(
    State(deployment): State<DeploymentImpl>,
    Path(url_hash): Path<String>,
    jar: CookieJar,
) -> Result<Response, ApiError> {
    let scan = deployment
        .qr_code()
        .resolve_and_record_scan(&deployment.db().pool, &url_hash)
        .await?;

    let target =
        RedirectTarget::for_subdomain(&deployment.config().redirect, &scan.company.subdomain)?;
    let jar = jar.add(branch_cookie(scan.branch.id, target.scheme.is_secure()));

    Ok((
        StatusCode::FOUND,
        jar,
        [(header::LOCATION, target.as_str().to_string())],
    )
        .into_response())
}

fn branch_cookie(branch_id: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((BRANCH_COOKIE, branch_id.to_string()))
        .path("/")
        .max_age(BRANCH_COOKIE_MAX_AGE)
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

pub fn router() -> Router<DeploymentImpl> {
    Router::new().route("/redirect/{url_hash}", get(redirect_qr_code))
}
