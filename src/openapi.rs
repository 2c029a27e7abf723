use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stockflow API",
        version = "0.1.0",
        description = r#"
# Stockflow Inventory & Gate Pass API

Lightweight stock control for single-shop operators: a product catalog with
main-unit/piece conversion, an append-only ledger of incoming and outgoing
stock, and gate pass issuance producing printable 42-column documents.

## Authentication

All business endpoints require a JWT bearer token obtained from
`POST /api/v1/auth/login`:

```
Authorization: Bearer <your-jwt-token>
```

Gate pass issuance additionally re-verifies the account password carried in
the request body; a valid token alone is not enough.

## Pagination

List endpoints accept `page` (default 1) and `per_page` (default 20).
        "#
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "auth", description = "Registration, login, session"),
        (name = "products", description = "Product catalog"),
        (name = "stock", description = "Stock receipts and issues"),
        (name = "gate-passes", description = "Gate pass issuance and lookup"),
        (name = "profile", description = "Shop details, units, employees"),
        (name = "dashboard", description = "Summary reporting")
    ),
    paths(
        crate::handlers::products::list_products,
        crate::handlers::products::create_product,
        crate::handlers::products::get_product,
        crate::handlers::products::delete_product,
        crate::handlers::products::low_stock_products,
        crate::handlers::products::product_history,

        crate::handlers::stock::restock,
        crate::handlers::stock::list_receipts,
        crate::handlers::stock::list_issues,

        crate::handlers::gate_passes::issue_gate_pass,
        crate::handlers::gate_passes::get_gate_pass,
        crate::handlers::gate_passes::get_gate_pass_document,

        crate::handlers::profile::get_shop,
        crate::handlers::profile::update_shop,
        crate::handlers::profile::list_units,
        crate::handlers::profile::create_unit,
        crate::handlers::profile::list_employees,
        crate::handlers::profile::create_employee,

        crate::handlers::dashboard::summary,
    ),
    components(
        schemas(
            crate::ApiResponse<serde_json::Value>,
            crate::PaginatedResponse<serde_json::Value>,
            crate::ListQuery,

            crate::entities::product::ProductStatus,
            crate::services::conversion::UnitMode,
            crate::services::products::CreateProductInput,
            crate::services::stock::RestockInput,
            crate::services::gate_pass::GatePassInput,
            crate::services::gate_pass::GatePassLineInput,
            crate::services::profile::UpdateShopProfileInput,
            crate::services::profile::CreateUnitInput,
            crate::services::profile::CreateEmployeeInput,
            crate::services::audit::DashboardSummary,
            crate::handlers::stock::RestockResponse,
            crate::handlers::gate_passes::GatePassResponse,

            crate::auth::LoginCredentials,
            crate::auth::RegisterRequest,
            crate::auth::TokenResponse,

            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
