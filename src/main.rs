mod config;
mod entity;
mod error;
mod export;
mod history;
mod models;
mod patron;
mod view;

use actix_web::{
    get,
    http::{
        header::{ContentDisposition, ContentType, DispositionParam, DispositionType},
        StatusCode,
    },
    middleware::Logger,
    post,
    web::{route, Data, Form, ServiceConfig},
    App, HttpResponse, HttpServer,
};
use anyhow::Context;
use askama::Template;
use config::Config;
use entity::{Entity, ReadingHistory};
use history::Export;
use serde::Deserialize;
use std::{env::var, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use view::IndexPage;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer().with_filter(EnvFilter::new(
                var("RUST_LOG").unwrap_or_else(|_| {
                    "reading_history=debug,actix_web=info,sqlx=warn".into()
                }),
            )),
        )
        .init();

    let config = Config::from_env().context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let entity = Entity::new(config.database.connect_options());
    let history: Arc<dyn ReadingHistory> = Arc::new(entity);
    let history = Data::from(history);

    let addr = config.socket_addr();
    tracing::info!(%addr, "starting server");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(history.clone())
            .configure(routes)
    })
    .bind(addr)
    .with_context(|| format!("failed to bind {addr}"))?
    .run()
    .await?;

    Ok(())
}

fn routes(cfg: &mut ServiceConfig) {
    cfg.service(index)
        .service(index_submit)
        .default_service(route().to(fallback));
}

#[derive(Debug, Deserialize)]
struct PatronForm {
    patron_record_number: String,
}

#[get("/")]
async fn index() -> HttpResponse {
    render_form(StatusCode::OK, None)
}

#[post("/")]
async fn index_submit(form: Form<PatronForm>, entity: Data<dyn ReadingHistory>) -> HttpResponse {
    match history::export(entity.get_ref(), &form.patron_record_number).await {
        Export::Csv { filename, body } => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(filename)],
            })
            .body(body),
        result @ Export::Unavailable => {
            render_form(StatusCode::SERVICE_UNAVAILABLE, result.message())
        }
        result => render_form(StatusCode::OK, result.message()),
    }
}

fn render_form(status: StatusCode, error_message: Option<&str>) -> HttpResponse {
    let Ok(html) = (IndexPage { error_message }).render() else {
        tracing::error!("failed to render index page");
        return HttpResponse::InternalServerError().body("failed to render page");
    };

    HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(html)
}

async fn fallback() -> HttpResponse {
    HttpResponse::NotFound().body("not found")
}

#[cfg(test)]
mod test {
    use super::routes;
    use crate::{
        entity::ReadingHistory,
        history::{
            test::{dune, FakeHistory},
            NO_RESULTS_MESSAGE, UNAVAILABLE_MESSAGE,
        },
    };
    use actix_web::{
        http::{header, StatusCode},
        test,
        web::Data,
        App,
    };
    use std::sync::Arc;

    async fn call(
        fake: Arc<FakeHistory>,
        req: test::TestRequest,
    ) -> (StatusCode, Option<String>, Option<String>, String) {
        let history: Arc<dyn ReadingHistory> = fake;
        let app =
            test::init_service(App::new().app_data(Data::from(history)).configure(routes)).await;
        let resp = test::call_service(&app, req.to_request()).await;

        let status = resp.status();
        let get = |name: header::HeaderName| {
            resp.headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };
        let content_type = get(header::CONTENT_TYPE);
        let disposition = get(header::CONTENT_DISPOSITION);
        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        (status, content_type, disposition, body)
    }

    fn submit(patron_record_number: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/")
            .set_form([("patron_record_number", patron_record_number)])
    }

    #[actix_web::test]
    async fn test_get_renders_empty_form() {
        let fake = Arc::new(FakeHistory::default());
        let req = test::TestRequest::get().uri("/");
        let (status, content_type, _, body) = call(fake.clone(), req).await;

        assert_eq!(status, StatusCode::OK);
        assert!(content_type.unwrap().starts_with("text/html"));
        assert!(body.contains(r#"name="patron_record_number""#));
        assert!(!body.contains("error-message\""));
        assert!(fake.calls().is_empty());
    }

    #[actix_web::test]
    async fn test_post_returns_csv_attachment() {
        let fake = Arc::new(FakeHistory::with(vec![dune()]));
        let (status, content_type, disposition, body) = call(fake.clone(), submit("pqa")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(content_type.unwrap().starts_with("text/csv"));
        assert_eq!(
            disposition.as_deref(),
            Some(r#"attachment; filename="pqa_Reading-History.csv""#)
        );
        assert_eq!(
            body,
            "Title,Author,Item Number,Checkedout Date\n\
             Dune,\"Herbert, Frank\",i12345a,03/14/2024\n"
        );
        assert_eq!(fake.calls(), vec!["pqa".to_string()]);
    }

    #[actix_web::test]
    async fn test_post_trims_input() {
        let fake = Arc::new(FakeHistory::with(vec![dune()]));
        let (_, _, disposition, _) = call(fake.clone(), submit("  p123a  ")).await;

        assert_eq!(
            disposition.as_deref(),
            Some(r#"attachment; filename="p123a_Reading-History.csv""#)
        );
        assert_eq!(fake.calls(), vec!["p123a".to_string()]);
    }

    #[actix_web::test]
    async fn test_post_invalid() {
        let fake = Arc::new(FakeHistory::with(vec![dune()]));
        let (status, content_type, disposition, body) = call(fake.clone(), submit("xyz")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(content_type.unwrap().starts_with("text/html"));
        assert!(disposition.is_none());
        // the quotes around 'p' and 'a' come back html-escaped
        assert!(body.contains("Invalid patron record number. The value must start with"));
        assert!(fake.calls().is_empty());
    }

    #[actix_web::test]
    async fn test_post_no_results() {
        let fake = Arc::new(FakeHistory::default());
        let (status, _, disposition, body) = call(fake.clone(), submit("pabcdea")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(disposition.is_none());
        assert!(body.contains(NO_RESULTS_MESSAGE));
        assert_eq!(fake.calls(), vec!["pabcdea".to_string()]);
    }

    #[actix_web::test]
    async fn test_post_database_failure() {
        let fake = Arc::new(FakeHistory::failing());
        let (status, _, disposition, body) = call(fake, submit("p123a")).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(disposition.is_none());
        assert!(body.contains(UNAVAILABLE_MESSAGE));
    }

    #[actix_web::test]
    async fn test_unknown_route() {
        let fake = Arc::new(FakeHistory::default());
        let (status, _, _, _) = call(fake, test::TestRequest::get().uri("/export")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
