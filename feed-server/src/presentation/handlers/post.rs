use crate::application::invalidation::{POSTS_ROUTE, RouteRevisions};
use crate::application::post_service::{PostService, PostsQuery};
use crate::domain::error::ActionError;
use crate::domain::filter::PostFilter;
use crate::domain::pagination::PaginationState;
use crate::presentation::dto::{ActionResponse, ListPostsQuery};
use crate::presentation::utils::{parse_post_id, request_id};
use actix_web::http::header::{CacheControl, CacheDirective, ETag, EntityTag};
use actix_web::{HttpRequest, HttpResponse, delete, get, web};
use tracing::info;

#[get("/posts")]
async fn list_posts(
    req: HttpRequest,
    posts: web::Data<PostService>,
    revisions: web::Data<RouteRevisions>,
    query: web::Query<ListPostsQuery>,
) -> Result<HttpResponse, ActionError> {
    let query: PostsQuery = query.into_inner().into();
    let page = posts.get_posts(query).await?;

    info!(
        request_id = %request_id(&req),
        page = page.pagination.page,
        total_items = page.pagination.total_items,
        "posts retrieved"
    );

    Ok(HttpResponse::Ok()
        .insert_header(ETag(listing_tag(
            revisions.revision(POSTS_ROUTE),
            &page.pagination,
            &PostFilter::for_author(query.author_id),
        )))
        .insert_header(CacheControl(vec![CacheDirective::NoCache]))
        .json(ActionResponse::ok(page)))
}

#[get("/posts/{id}")]
async fn get_post(
    req: HttpRequest,
    posts: web::Data<PostService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ActionError> {
    let post_id = parse_post_id(&path)?;
    let post = posts.get_post(post_id).await?;

    info!(request_id = %request_id(&req), post_id, "post retrieved");

    Ok(HttpResponse::Ok().json(ActionResponse::ok(post)))
}

#[delete("/posts/{id}")]
async fn delete_post(
    req: HttpRequest,
    posts: web::Data<PostService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ActionError> {
    let post_id = parse_post_id(&path)?;
    posts.delete_post(post_id).await?;

    info!(request_id = %request_id(&req), post_id, "post deleted");

    Ok(HttpResponse::Ok().json(ActionResponse::done()))
}

/// Identifies one page of the listing at one revision. The revision only
/// moves on deletes made through this service; writes that bypass it do
/// not change the tag.
fn listing_tag(revision: u64, pagination: &PaginationState, filter: &PostFilter) -> EntityTag {
    let author = match filter {
        PostFilter::All => 0,
        PostFilter::Author(id) => *id,
    };
    EntityTag::new_weak(format!(
        "posts-r{revision}-a{author}-p{}-s{}",
        pagination.page, pagination.page_size
    ))
}
