use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use crate::routes::{auth, orders, users, MessageResponse};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        auth::signup,
        auth::signin,
        users::find_all,
        users::find_by_id,
        users::me,
        users::patch,
        users::delete,
        orders::create,
        orders::find_all,
        orders::find_by_id,
        orders::patch,
        orders::delete,
    ),
    components(
        schemas(
            HealthResponse,
            MessageResponse,
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::SigninResponse,
            users::UserResponse,
            users::PatchUserRequest,
            orders::CreateOrderRequest,
            orders::PatchOrderRequest,
            orders::OrderResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "users"),
        (name = "orders")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_rest_path() {
        let doc = ApiDoc::openapi();
        for path in ["/health", "/api/v1/auth/signup", "/api/v1/users/me", "/api/v1/orders/{id}"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
        assert!(doc.components.unwrap().security_schemes.contains_key("bearer"));
    }
}
