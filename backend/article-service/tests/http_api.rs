use actix_web::{http::StatusCode, test, web, App};
use article_service::models::PostArticleResponse;
use article_service::{handlers, Article, ArticleService, MemoryStore, RankingSettings};
use serde_json::{json, Value};
use std::sync::Arc;

fn service_data() -> web::Data<ArticleService<MemoryStore>> {
    web::Data::new(ArticleService::new(
        Arc::new(MemoryStore::new()),
        RankingSettings::default(),
    ))
}

macro_rules! init_app {
    ($data:expr) => {
        test::init_service(
            App::new()
                .app_data($data.clone())
                .configure(handlers::configure::<MemoryStore>),
        )
        .await
    };
}

#[actix_web::test]
async fn test_post_vote_and_list() {
    let data = service_data();
    let app = init_app!(data);

    let req = test::TestRequest::post()
        .uri("/api/v1/articles")
        .set_json(json!({"user": "alice", "title": "A title", "link": "http://www.google.com"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: PostArticleResponse = test::read_body_json(resp).await;
    assert_eq!(created.id, 1);
    assert_eq!(created.key, "article:1");

    let req = test::TestRequest::post()
        .uri("/api/v1/articles/1/votes")
        .set_json(json!({"user": "bob"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["outcome"], "counted");
    assert_eq!(body["article"], "article:1");

    let req = test::TestRequest::post()
        .uri("/api/v1/articles/1/votes")
        .set_json(json!({"user": "bob"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["outcome"], "already_voted");

    let req = test::TestRequest::get().uri("/api/v1/articles").to_request();
    let articles: Vec<Article> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].votes, 2);
    assert_eq!(articles[0].user, "alice");

    let req = test::TestRequest::get()
        .uri("/api/v1/articles?page=2&order=time")
        .to_request();
    let articles: Vec<Article> = test::call_and_read_body_json(&app, req).await;
    assert!(articles.is_empty());
}

#[actix_web::test]
async fn test_get_article() {
    let data = service_data();
    let app = init_app!(data);
    data.post_article("alice", "t", "l").await.unwrap();

    let req = test::TestRequest::get().uri("/api/v1/articles/1").to_request();
    let article: Article = test::call_and_read_body_json(&app, req).await;
    assert_eq!(article.id, "article:1");
    assert_eq!(article.votes, 1);

    let req = test::TestRequest::get().uri("/api/v1/articles/2").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_vote_unknown_article_is_404() {
    let data = service_data();
    let app = init_app!(data);

    let req = test::TestRequest::post()
        .uri("/api/v1/articles/9/votes")
        .set_json(json!({"user": "bob"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "not_found_error");
    assert_eq!(body["status"], 404);
}

#[actix_web::test]
async fn test_groups() {
    let data = service_data();
    let app = init_app!(data);
    data.post_article("alice", "a", "l").await.unwrap();
    data.post_article("bob", "b", "l").await.unwrap();

    let req = test::TestRequest::post()
        .uri("/api/v1/articles/2/groups")
        .set_json(json!({"groups": ["new-group"]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri("/api/v1/groups/new-group/articles")
        .to_request();
    let articles: Vec<Article> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].id, "article:2");
}

#[actix_web::test]
async fn test_unknown_order_is_400() {
    let data = service_data();
    let app = init_app!(data);

    let req = test::TestRequest::get()
        .uri("/api/v1/articles?order=hot")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_health_and_metrics() {
    let data = service_data();
    let app = init_app!(data);
    data.post_article("alice", "a", "l").await.unwrap();

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");

    let req = test::TestRequest::get().uri("/api/v1/metrics").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("articles_posted_total"));
}
