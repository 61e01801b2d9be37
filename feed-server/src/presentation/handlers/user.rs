use crate::application::user_service::UserService;
use crate::domain::error::ActionError;
use crate::presentation::dto::{ActionResponse, SearchUsersQuery};
use crate::presentation::utils::request_id;
use actix_web::{HttpRequest, HttpResponse, get, web};
use tracing::info;

#[get("/users/search")]
async fn search_users(
    req: HttpRequest,
    users: web::Data<UserService>,
    query: web::Query<SearchUsersQuery>,
) -> Result<HttpResponse, ActionError> {
    let results = users.search_users(query.into_inner().into()).await?;

    info!(
        request_id = %request_id(&req),
        total_items = results.pagination.total_items,
        "users searched"
    );

    Ok(HttpResponse::Ok().json(ActionResponse::ok(results)))
}

#[cfg(test)]
mod tests {
    use crate::application::fault_policy::FaultTag;
    use crate::test_support::{InMemoryPosts, InMemoryUsers, TestApi, sample_users};
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;
    use serde_json::json;

    fn api() -> TestApi {
        TestApi::new(
            InMemoryPosts::default(),
            InMemoryUsers::with_users(sample_users()),
        )
    }

    #[actix_web::test]
    async fn finds_users_by_name_or_username() {
        let reply = api()
            .send(TestRequest::get().uri("/api/users/search?query=Le"))
            .await;

        assert_eq!(reply.status, StatusCode::OK);
        let names: Vec<_> = reply.body["data"]["items"]
            .as_array()
            .cloned()
            .unwrap_or_default()
            .iter()
            .filter_map(|item| item["name"].as_str().map(str::to_owned))
            .collect();
        assert_eq!(
            names,
            ["Leanne Graham", "Mrs. Dennis Schulist", "Patricia Lebsack"]
        );
        assert_eq!(reply.body["data"]["items"][0]["postCount"], json!(10));
    }

    #[actix_web::test]
    async fn short_query_returns_empty_page_without_store_access() {
        let api = api();
        let reply = api
            .send(TestRequest::get().uri("/api/users/search?query=%20a%20"))
            .await;

        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body["data"]["items"], json!([]));
        assert_eq!(reply.body["data"]["pagination"]["totalPages"], json!(0));
        assert_eq!(reply.body["data"]["pagination"]["pageSize"], json!(10));
        assert_eq!(api.users.calls(), 0);
    }

    #[actix_web::test]
    async fn forced_search_failure_returns_generic_message() {
        let reply = api()
            .failing(FaultTag::SearchUsers)
            .send(TestRequest::get().uri("/api/users/search?query=Clem"))
            .await;

        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            reply.body["error"],
            json!("Failed to search users. Please try again later.")
        );
    }
}
