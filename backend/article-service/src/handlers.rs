/// Article handlers - HTTP endpoints for the ranking operations
use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::error::{ServiceError, ServiceResult};
use crate::keys::ArticleKey;
use crate::models::{
    AddToGroupsRequest, ArticleOrder, ListQuery, PostArticleRequest, PostArticleResponse,
    VoteOutcome, VoteRequest, VoteResponse,
};
use crate::services::ArticleService;
use crate::store::RankingStore;

/// Mount every route under `/api/v1` for a given store backend.
pub fn configure<S: RankingStore + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health::<S>))
            .route("/metrics", web::get().to(metrics::<S>))
            .service(
                web::scope("/articles")
                    .route("", web::get().to(list_articles::<S>))
                    .route("", web::post().to(post_article::<S>))
                    .route("/{id}", web::get().to(get_article::<S>))
                    .route("/{id}/votes", web::post().to(vote_article::<S>))
                    .route("/{id}/groups", web::post().to(add_to_groups::<S>)),
            )
            .route(
                "/groups/{name}/articles",
                web::get().to(list_group_articles::<S>),
            ),
    );
}

/// Create an article
pub async fn post_article<S: RankingStore + 'static>(
    service: web::Data<ArticleService<S>>,
    payload: web::Json<PostArticleRequest>,
) -> ServiceResult<HttpResponse> {
    let req = payload.into_inner();
    let id = service
        .post_article(&req.user, &req.title, &req.link)
        .await?;

    Ok(HttpResponse::Created().json(PostArticleResponse {
        id,
        key: ArticleKey::article(id),
    }))
}

/// Get a specific article by id
pub async fn get_article<S: RankingStore + 'static>(
    service: web::Data<ArticleService<S>>,
    article_id: web::Path<u64>,
) -> ServiceResult<HttpResponse> {
    let article_id = article_id.into_inner();
    let article = service
        .get_article(article_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(ArticleKey::article(article_id)))?;

    Ok(HttpResponse::Ok().json(article))
}

/// Vote for an article
pub async fn vote_article<S: RankingStore + 'static>(
    service: web::Data<ArticleService<S>>,
    article_id: web::Path<u64>,
    payload: web::Json<VoteRequest>,
) -> ServiceResult<HttpResponse> {
    let article = ArticleKey::article(article_id.into_inner());
    let outcome = service.vote_article(&payload.user, &article).await?;

    if outcome == VoteOutcome::UnknownArticle {
        return Err(ServiceError::NotFound(article));
    }

    Ok(HttpResponse::Ok().json(VoteResponse { article, outcome }))
}

/// List articles ranked by score (default) or time
pub async fn list_articles<S: RankingStore + 'static>(
    service: web::Data<ArticleService<S>>,
    query: web::Query<ListQuery>,
) -> ServiceResult<HttpResponse> {
    let (page, order) = parse_list_query(&query)?;
    let articles = service.list_articles(page, order).await?;
    Ok(HttpResponse::Ok().json(articles))
}

/// Attach an article to groups
pub async fn add_to_groups<S: RankingStore + 'static>(
    service: web::Data<ArticleService<S>>,
    article_id: web::Path<u64>,
    payload: web::Json<AddToGroupsRequest>,
) -> ServiceResult<HttpResponse> {
    service
        .add_to_groups(article_id.into_inner(), &payload.groups)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// List a group's articles through its cached ranking
pub async fn list_group_articles<S: RankingStore + 'static>(
    service: web::Data<ArticleService<S>>,
    group: web::Path<String>,
    query: web::Query<ListQuery>,
) -> ServiceResult<HttpResponse> {
    let (page, order) = parse_list_query(&query)?;
    let articles = service
        .list_group_articles(&group.into_inner(), page, order)
        .await?;
    Ok(HttpResponse::Ok().json(articles))
}

pub async fn health<S: RankingStore + 'static>(
    service: web::Data<ArticleService<S>>,
) -> ServiceResult<HttpResponse> {
    service.store().ping().await?;
    Ok(HttpResponse::Ok().json(json!({ "status": "ok" })))
}

pub async fn metrics<S: RankingStore + 'static>(
    service: web::Data<ArticleService<S>>,
) -> ServiceResult<HttpResponse> {
    let body = service
        .metrics()
        .render()
        .map_err(|e| ServiceError::Internal(e.to_string()))?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(body))
}

fn parse_list_query(query: &ListQuery) -> ServiceResult<(u32, ArticleOrder)> {
    let order = match query.order.as_deref() {
        Some(raw) => raw.parse().map_err(ServiceError::InvalidInput)?,
        None => ArticleOrder::default(),
    };
    Ok((query.page.unwrap_or(1), order))
}
