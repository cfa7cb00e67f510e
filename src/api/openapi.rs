//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, health, transactions};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Biblios API",
        version = "1.0.0",
        description = "Library Lending Management REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::signup,
        auth::login,
        auth::me,
        auth::list_members,
        auth::update_member,
        auth::delete_member,
        // Books
        books::list_books,
        books::add_book,
        books::update_book,
        books::delete_book,
        // Transactions
        transactions::issue_book,
        transactions::return_book,
        transactions::list_transactions,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginData,
            auth::SignupRequest,
            auth::SignupData,
            auth::MemberIdData,
            crate::models::user::User,
            crate::models::user::MemberSummary,
            crate::models::user::UpdateMember,
            crate::models::user::Role,
            // Books
            books::BookIdData,
            crate::models::book::Book,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            // Transactions
            transactions::IssueRequest,
            transactions::IssueData,
            transactions::ReturnRequest,
            transactions::ReturnData,
            crate::models::transaction::TransactionDetails,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication and roster management"),
        (name = "books", description = "Catalog management"),
        (name = "transactions", description = "Lending ledger")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
