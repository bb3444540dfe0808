use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response};
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, warn};

use crate::{
    api::basic_auth::CurrentUser,
    app_state::SharedAppState,
    services::authorization::scope::{LocationContext, ScopeResolverFn},
    services::authorization::{AccessDecision, DenyReason, Permission},
};

/// Middleware that resolves the location context once per request and
/// attaches it to the extensions, so guards and handlers agree on the
/// scope token.
pub async fn location_context(mut req: Request, next: Next) -> Response {
    let context = LocationContext::from_request(&req);
    if let Some(location) = &context.location {
        debug!("Resolved location context: {}", location);
    }
    req.extensions_mut().insert(context);
    next.run(req).await
}

/// Middleware factory requiring a single permission for the request's
/// location context
pub fn require_permission(
    state: SharedAppState,
    permission: Permission,
) -> impl Fn(Request, Next) -> Pin<Box<dyn Future<Output = Result<Response, StatusCode>> + Send>>
       + Clone {
    require_any_permission(state, vec![permission])
}

/// Middleware factory requiring at least one of the given permissions
/// (OR semantics) for the request's location context
pub fn require_any_permission(
    state: SharedAppState,
    permissions: Vec<Permission>,
) -> impl Fn(Request, Next) -> Pin<Box<dyn Future<Output = Result<Response, StatusCode>> + Send>>
       + Clone {
    move |req: Request, next: Next| {
        let state = state.clone();
        let permissions = permissions.clone();
        Box::pin(async move {
            let scope_token = req
                .extensions()
                .get::<LocationContext>()
                .cloned()
                .unwrap_or_else(|| LocationContext::from_request(&req))
                .location;
            let actor = current_actor(&req);

            let decision = state
                .auth_service
                .check(actor.as_deref(), &permissions, scope_token.as_deref())
                .await;
            settle(
                decision,
                actor.as_deref(),
                &permissions,
                scope_token.as_deref(),
            )?;
            Ok(next.run(req).await)
        })
    }
}

/// Middleware factory requiring a permission for the location named by a
/// route-level resolver. The resolver overrides the request's location
/// context; if it yields nothing the check denies with `ScopeUnresolved`
/// rather than falling back to an unscoped check.
pub fn require_permission_scoped(
    state: SharedAppState,
    permission: Permission,
    resolver: ScopeResolverFn,
) -> impl Fn(Request, Next) -> Pin<Box<dyn Future<Output = Result<Response, StatusCode>> + Send>>
       + Clone {
    move |req: Request, next: Next| {
        let state = state.clone();
        Box::pin(async move {
            let actor = current_actor(&req);
            let scope_token = resolver(&req);

            let decision = match scope_token.as_deref() {
                Some(token) => {
                    state
                        .auth_service
                        .check(actor.as_deref(), &[permission], Some(token))
                        .await
                }
                None => {
                    warn!(
                        "Scope resolution failed for {} {}",
                        req.method(),
                        req.uri().path()
                    );
                    AccessDecision::Denied(DenyReason::ScopeUnresolved)
                }
            };

            settle(
                decision,
                actor.as_deref(),
                &[permission],
                scope_token.as_deref(),
            )?;
            Ok(next.run(req).await)
        })
    }
}

/// The actor id carried by the auth middleware, if any. Extracted before
/// the check so nothing borrows the request across it.
fn current_actor(req: &Request) -> Option<String> {
    req.extensions()
        .get::<CurrentUser>()
        .map(|user| user.email.clone())
}

/// Map the decision onto an HTTP status, logging the outcome. Any deny
/// short-circuits the request; handlers never see denied requests.
fn settle(
    decision: AccessDecision,
    actor: Option<&str>,
    permissions: &[Permission],
    scope_token: Option<&str>,
) -> Result<(), StatusCode> {
    match decision {
        AccessDecision::Allowed => {
            debug!(
                "Access granted: {} may {:?} (scope: {:?})",
                actor.unwrap_or("<anonymous>"),
                permissions.iter().map(|p| p.as_str()).collect::<Vec<_>>(),
                scope_token
            );
            Ok(())
        }
        AccessDecision::Denied(DenyReason::Unauthenticated) => {
            warn!("Access denied: no authenticated user");
            Err(StatusCode::UNAUTHORIZED)
        }
        AccessDecision::Denied(reason) => {
            warn!(
                "Access denied ({:?}): {} lacks {:?} (scope: {:?})",
                reason,
                actor.unwrap_or("<anonymous>"),
                permissions.iter().map(|p| p.as_str()).collect::<Vec<_>>(),
                scope_token
            );
            Err(StatusCode::FORBIDDEN)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::AppState;
    use crate::services::AuthorizationService;
    use crate::settings::config::Settings;
    use crate::stop_flag::StopFlag;
    use axum::body::Body;
    use axum::http::Method;
    use axum::routing::post;
    use axum::Router;
    use lendhub_core::inventory::shared_inventory::{SharedBundles, SharedInventory};
    use lendhub_core::loans::shared_loan_book::SharedLoanBook;
    use lendhub_core::locations::shared_locations::SharedLocations;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn admin_state() -> SharedAppState {
        Arc::new(AppState {
            settings: Settings::default(),
            stop_flag: StopFlag::new(),
            locations: SharedLocations::new(),
            inventory: SharedInventory::new(),
            bundles: SharedBundles::new(),
            loans: SharedLoanBook::new(),
            auth_service: Arc::new(AuthorizationService::with_default_config(Some(
                "admin@localhost".to_string(),
            ))),
        })
    }

    fn no_scope(_req: &Request) -> Option<String> {
        None
    }

    async fn attach_admin(mut req: Request, next: Next) -> Response {
        req.extensions_mut().insert(CurrentUser {
            email: "admin@localhost".to_string(),
            name: "Admin".to_string(),
            access_token: None,
        });
        next.run(req).await
    }

    #[tokio::test]
    async fn test_unresolved_scope_denies_even_a_system_admin() {
        let state = admin_state();
        let app = Router::new()
            .route(
                "/things",
                post(|| async { "ok" }).layer(axum::middleware::from_fn(
                    require_permission_scoped(state, Permission::InventoryManage, no_scope),
                )),
            )
            .layer(axum::middleware::from_fn(attach_admin));

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/things")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_settle_maps_deny_reasons_onto_statuses() {
        assert!(settle(AccessDecision::Allowed, Some("user"), &[], None).is_ok());
        assert_eq!(
            settle(
                AccessDecision::Denied(DenyReason::Unauthenticated),
                None,
                &[],
                None
            ),
            Err(StatusCode::UNAUTHORIZED)
        );
        assert_eq!(
            settle(
                AccessDecision::Denied(DenyReason::ScopeUnresolved),
                Some("user"),
                &[Permission::InventoryManage],
                None
            ),
            Err(StatusCode::FORBIDDEN)
        );
    }
}
