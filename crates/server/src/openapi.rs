use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct BankAccountRequestDoc {
    pub account_number: String,
    pub account_holder_name: String,
    #[schema(example = 1000.0)]
    pub balance: f64,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct BankAccountResponseDoc {
    pub id: i32,
    pub account_number: String,
    pub account_holder_name: String,
    #[schema(example = 1000.0)]
    pub balance: f64,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::accounts::list,
        crate::routes::accounts::create,
        crate::routes::accounts::get,
        crate::routes::accounts::update,
        crate::routes::accounts::delete,
    ),
    components(
        schemas(
            HealthResponse,
            BankAccountRequestDoc,
            BankAccountResponseDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "accounts")
    )
)]
pub struct ApiDoc;
