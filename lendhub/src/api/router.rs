use axum::middleware;
use axum::routing::{delete, get, post, put};
use axum::Router;

use lendhub_core::authorization::EffectivePermissions;
use lendhub_core::inventory::bundle::Bundle;
use lendhub_core::inventory::item::{Item, ItemStatus};
use lendhub_core::inventory::shared_inventory::{BundleVec, ItemVec};
use lendhub_core::loans::loan::{Borrower, Loan, LoanStatus, LoanTarget};
use lendhub_core::loans::shared_loan_book::LoanVec;
use lendhub_core::locations::location::{Location, OpeningHours, TimeRange, Weekday};
use lendhub_core::locations::shared_locations::LocationVec;
use lendhub_core::notification_types::{NotificationReceiver, WebhookContext};
use lendhub_core::settings::api_server::AuthMode;

use utoipa::openapi::security::SecurityScheme;
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers::admin::assignments::__path_assign_role_handler;
use crate::api::handlers::admin::assignments::__path_list_assignments_handler;
use crate::api::handlers::admin::assignments::__path_revoke_role_handler;
use crate::api::handlers::admin::permissions::__path_list_permissions_handler;
use crate::api::handlers::admin::roles::__path_create_role_handler;
use crate::api::handlers::admin::roles::__path_list_roles_handler;
use crate::api::handlers::bundles::__path_create_bundle_handler;
use crate::api::handlers::bundles::__path_delete_bundle_handler;
use crate::api::handlers::bundles::__path_list_bundles_handler;
use crate::api::handlers::health::__path_health_handler;
use crate::api::handlers::info::__path_info_handler;
use crate::api::handlers::items::__path_create_item_handler;
use crate::api::handlers::items::__path_delete_item_handler;
use crate::api::handlers::items::__path_get_item_handler;
use crate::api::handlers::items::__path_list_items_handler;
use crate::api::handlers::items::__path_set_item_status_handler;
use crate::api::handlers::loans::__path_get_loan_handler;
use crate::api::handlers::loans::__path_list_loans_handler;
use crate::api::handlers::loans::__path_open_loan_handler;
use crate::api::handlers::loans::__path_return_loan_handler;
use crate::api::handlers::locations::__path_create_location_handler;
use crate::api::handlers::locations::__path_get_location_handler;
use crate::api::handlers::locations::__path_get_opening_hours_handler;
use crate::api::handlers::locations::__path_list_locations_handler;
use crate::api::handlers::locations::__path_set_opening_hours_handler;
use crate::api::handlers::login::__path_login_handler;
use crate::api::handlers::login::__path_validate_token_handler;
use crate::api::handlers::me::__path_my_permissions_handler;
use crate::api::handlers::privacy::__path_anonymize_borrower_handler;
use crate::api::handlers::privacy::__path_export_borrower_data_handler;

use crate::app_state::SharedAppState;

use super::basic_auth::auth;
use super::handlers::admin::assignments::{
    assign_role_handler, list_assignments_handler, revoke_role_handler, AssignRoleRequest,
    AssignmentInfo, AssignmentsListResponse,
};
use super::handlers::admin::permissions::{
    list_permissions_handler, PermissionInfo, PermissionsListResponse,
};
use super::handlers::admin::roles::{
    create_role_handler, list_roles_handler, AdminActionResponse, CreateRoleRequest, RoleInfo,
    RolesListResponse,
};
use super::handlers::bundles::{
    create_bundle_handler, delete_bundle_handler, list_bundles_handler, CreateBundleRequest,
};
use super::handlers::health::health_handler;
use super::handlers::info::info_handler;
use super::handlers::items::{
    create_item_handler, delete_item_handler, get_item_handler, list_items_handler,
    set_item_status_handler, CreateItemRequest, SetItemStatusRequest,
};
use super::handlers::loans::{
    get_loan_handler, list_loans_handler, open_loan_handler, return_loan_handler, OpenLoanRequest,
};
use super::handlers::locations::{
    create_location_handler, get_location_handler, get_opening_hours_handler,
    list_locations_handler, set_opening_hours_handler, CreateLocationRequest,
};
use super::handlers::login::{login_handler, validate_token_handler, FormData};
use super::handlers::me::my_permissions_handler;
use super::handlers::privacy::{
    anonymize_borrower_handler, export_borrower_data_handler, AnonymizeRequest,
};
use super::middleware::authorization::{
    location_context, require_any_permission, require_permission, require_permission_scoped,
};
use crate::services::authorization::scope::resolve_location_from_path;
use crate::services::authorization::Permission;

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        info_handler,
        login_handler,
        validate_token_handler,
        my_permissions_handler,
        list_items_handler,
        get_item_handler,
        create_item_handler,
        set_item_status_handler,
        delete_item_handler,
        list_bundles_handler,
        create_bundle_handler,
        delete_bundle_handler,
        list_loans_handler,
        get_loan_handler,
        open_loan_handler,
        return_loan_handler,
        list_locations_handler,
        get_location_handler,
        create_location_handler,
        get_opening_hours_handler,
        set_opening_hours_handler,
        export_borrower_data_handler,
        anonymize_borrower_handler,
        list_roles_handler,
        create_role_handler,
        list_assignments_handler,
        assign_role_handler,
        revoke_role_handler,
        list_permissions_handler,
    ),
    components(
        schemas(
            Item, ItemVec, ItemStatus, Bundle, BundleVec,
            Loan, LoanVec, LoanStatus, LoanTarget, Borrower,
            Location, LocationVec, OpeningHours, TimeRange, Weekday,
            NotificationReceiver, WebhookContext, EffectivePermissions, AuthMode,
            CreateItemRequest, SetItemStatusRequest, CreateBundleRequest,
            OpenLoanRequest, CreateLocationRequest, AnonymizeRequest, FormData,
            RoleInfo, RolesListResponse, CreateRoleRequest, AdminActionResponse,
            AssignmentInfo, AssignmentsListResponse, AssignRoleRequest,
            PermissionInfo, PermissionsListResponse
        )
    ),
    tags(
        (name = "lendhub-service", description = "lendhub api")
    ),
    modifiers(&SecurityAddon)

)]
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap(); // we can unwrap safely since there already is components registered.
        components.add_security_scheme(
            "bearerAuth",
            SecurityScheme::Http(utoipa::openapi::security::Http::new(
                utoipa::openapi::security::HttpAuthScheme::Bearer,
            )),
        )
    }
}

struct ApiDoc;

impl utoipa::OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        SecurityAddon::openapi()
    }
}

pub struct ApiRoutes;

impl ApiRoutes {
    pub fn create(state: SharedAppState) -> Router {
        let api = ApiDoc::openapi();
        let authenticated_router = Router::new()
            .route(
                "/api/v1/authenticated/items",
                get(list_items_handler).layer(middleware::from_fn(require_permission(
                    state.clone(),
                    Permission::InventoryView,
                ))),
            )
            .route(
                "/api/v1/authenticated/items/{item_id}",
                get(get_item_handler).layer(middleware::from_fn(require_permission(
                    state.clone(),
                    Permission::InventoryView,
                ))),
            )
            .route(
                "/api/v1/authenticated/locations/{location_id}/items",
                post(create_item_handler).layer(middleware::from_fn(require_permission_scoped(
                    state.clone(),
                    Permission::InventoryManage,
                    resolve_location_from_path,
                ))),
            )
            .route(
                "/api/v1/authenticated/locations/{location_id}/items/{item_id}/status",
                put(set_item_status_handler).layer(middleware::from_fn(
                    require_permission_scoped(
                        state.clone(),
                        Permission::InventoryManage,
                        resolve_location_from_path,
                    ),
                )),
            )
            .route(
                "/api/v1/authenticated/locations/{location_id}/items/{item_id}",
                delete(delete_item_handler).layer(middleware::from_fn(
                    require_permission_scoped(
                        state.clone(),
                        Permission::InventoryManage,
                        resolve_location_from_path,
                    ),
                )),
            )
            .route(
                "/api/v1/authenticated/bundles",
                get(list_bundles_handler).layer(middleware::from_fn(require_permission(
                    state.clone(),
                    Permission::InventoryView,
                ))),
            )
            .route(
                "/api/v1/authenticated/locations/{location_id}/bundles",
                post(create_bundle_handler).layer(middleware::from_fn(
                    require_permission_scoped(
                        state.clone(),
                        Permission::BundleManage,
                        resolve_location_from_path,
                    ),
                )),
            )
            .route(
                "/api/v1/authenticated/locations/{location_id}/bundles/{bundle_id}",
                delete(delete_bundle_handler).layer(middleware::from_fn(
                    require_permission_scoped(
                        state.clone(),
                        Permission::BundleManage,
                        resolve_location_from_path,
                    ),
                )),
            )
            .route(
                "/api/v1/authenticated/loans",
                get(list_loans_handler).layer(middleware::from_fn(require_permission(
                    state.clone(),
                    Permission::LoanView,
                ))),
            )
            .route(
                "/api/v1/authenticated/loans/{loan_id}",
                get(get_loan_handler).layer(middleware::from_fn(require_permission(
                    state.clone(),
                    Permission::LoanView,
                ))),
            )
            .route(
                "/api/v1/authenticated/locations/{location_id}/loans",
                post(open_loan_handler).layer(middleware::from_fn(require_permission_scoped(
                    state.clone(),
                    Permission::LoanManage,
                    resolve_location_from_path,
                ))),
            )
            .route(
                "/api/v1/authenticated/locations/{location_id}/loans/{loan_id}/return",
                post(return_loan_handler).layer(middleware::from_fn(require_permission_scoped(
                    state.clone(),
                    Permission::LoanManage,
                    resolve_location_from_path,
                ))),
            )
            .route(
                "/api/v1/authenticated/locations",
                get(list_locations_handler).merge(post(create_location_handler).layer(
                    middleware::from_fn(require_permission(
                        state.clone(),
                        Permission::LocationManage,
                    )),
                )),
            )
            .route(
                "/api/v1/authenticated/locations/{location_id}",
                get(get_location_handler),
            )
            .route(
                "/api/v1/authenticated/locations/{location_id}/hours",
                get(get_opening_hours_handler).merge(put(set_opening_hours_handler).layer(
                    middleware::from_fn(require_permission_scoped(
                        state.clone(),
                        Permission::HoursManage,
                        resolve_location_from_path,
                    )),
                )),
            )
            .route(
                "/api/v1/authenticated/privacy/export",
                get(export_borrower_data_handler).layer(middleware::from_fn(require_permission(
                    state.clone(),
                    Permission::PrivacyManage,
                ))),
            )
            .route(
                "/api/v1/authenticated/privacy/anonymize",
                post(anonymize_borrower_handler).layer(middleware::from_fn(require_permission(
                    state.clone(),
                    Permission::PrivacyManage,
                ))),
            )
            .route(
                "/api/v1/authenticated/admin/roles",
                get(list_roles_handler)
                    .layer(middleware::from_fn(require_any_permission(
                        state.clone(),
                        vec![Permission::AuditView, Permission::SystemAdmin],
                    )))
                    .merge(
                        post(create_role_handler).layer(middleware::from_fn(require_permission(
                            state.clone(),
                            Permission::UserManage,
                        ))),
                    ),
            )
            .route(
                "/api/v1/authenticated/admin/assignments",
                get(list_assignments_handler)
                    .layer(middleware::from_fn(require_any_permission(
                        state.clone(),
                        vec![Permission::AuditView, Permission::SystemAdmin],
                    )))
                    .merge(
                        post(assign_role_handler).layer(middleware::from_fn(require_permission(
                            state.clone(),
                            Permission::UserManage,
                        ))),
                    )
                    .merge(
                        delete(revoke_role_handler).layer(middleware::from_fn(require_permission(
                            state.clone(),
                            Permission::UserManage,
                        ))),
                    ),
            )
            .route(
                "/api/v1/authenticated/admin/permissions",
                get(list_permissions_handler).layer(middleware::from_fn(require_any_permission(
                    state.clone(),
                    vec![Permission::AuditView, Permission::SystemAdmin],
                ))),
            )
            .route(
                "/api/v1/authenticated/me/permissions",
                get(my_permissions_handler),
            )
            .route(
                "/api/v1/authenticated/validate-token",
                post(validate_token_handler),
            )
            // Location context first, then authentication; auth runs
            // outermost so guards always see the current user.
            .route_layer(middleware::from_fn(location_context))
            .route_layer(middleware::from_fn_with_state(state.clone(), auth));

        let public_router = Router::new()
            .route("/api/v1/login", post(login_handler))
            .route("/api/v1/health", get(health_handler))
            .route("/api/v1/info", get(info_handler))
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api.clone()))
            .merge(Redoc::with_url("/redoc", api.clone()))
            .merge(RapiDoc::new("/api-docs/openapi.json").path("/rapidoc"))
            .with_state(state.clone());

        Router::new()
            .merge(authenticated_router)
            .merge(public_router)
            .with_state(state.clone())
    }
}
