//! HTTP surface.
//!
//! `GET /` is the embed entry point: with `embed=1` and a known widget it
//! returns the standalone document, otherwise the authoring index. The
//! `/api` routes expose the registry, generated forms, export and share
//! links as JSON.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use url::Url;

use crate::{
    codec,
    data::{
        brand::{BrandKits, apply_brand_kit},
        config::Config,
        field::FieldDescriptor,
    },
    error::{FormError, RegistryError},
    export::{compose, escape_html},
    form::{Form, FormRenderer},
    router::{EmbedParams, Route, embed_url, route},
    widget::{WidgetDefinition, registry::WidgetRegistry},
};

/// Shared state of the web surface.
#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: Arc<WidgetRegistry>,
    pub kits: Arc<BrandKits>,
    /// Base of generated share links.
    pub base_url: Url,
}

impl AppState {
    pub fn new(registry: WidgetRegistry, kits: BrandKits, base_url: Url) -> Self {
        Self {
            registry: Arc::new(registry),
            kits: Arc::new(kits),
            base_url,
        }
    }

    fn widget(&self, id: &str) -> Result<Arc<WidgetDefinition>, WebError> {
        Ok(self.registry.get(id)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Form(#[from] FormError),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = match &self {
            WebError::Registry(_) => StatusCode::NOT_FOUND,
            WebError::Form(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        debug!("web: {status}: {self}");
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Serialize)]
struct WidgetSummary {
    id: String,
    label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl WidgetSummary {
    fn of(def: &WidgetDefinition) -> Self {
        Self {
            id: def.id.clone(),
            label: def.label.clone(),
            description: def.description.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WidgetDetail {
    #[serde(flatten)]
    summary: WidgetSummary,
    fields: Vec<FieldDescriptor>,
    default_config: Config,
}

#[derive(Debug, Deserialize)]
struct TokenQuery {
    config: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ExportRequest {
    config: Option<Config>,
    brand: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LinkRequest {
    config: Option<Config>,
}

#[derive(Debug, Serialize)]
struct LinkResponse {
    url: String,
    token: String,
}

/// Build the router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/widgets", get(list_widgets))
        .route("/api/widgets/{id}", get(widget_detail))
        .route("/api/widgets/{id}/form", get(widget_form))
        .route("/api/widgets/{id}/export", post(export_widget))
        .route("/api/widgets/{id}/link", post(share_link))
        .with_state(state)
}

/// Serve on `addr` until the task is cancelled.
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await
}

async fn index(State(state): State<AppState>, RawQuery(query): RawQuery) -> Html<String> {
    let params = query.as_deref().map(EmbedParams::from_query).unwrap_or_default();
    match route(&state.registry, &params) {
        Route::Embed(view) => Html(view.document().to_string()),
        Route::Authoring { .. } => Html(authoring_index(&state.registry)),
    }
}

fn authoring_index(registry: &WidgetRegistry) -> String {
    let items: String = registry
        .list()
        .map(|def| {
            format!(
                "<li><a href=\"/?embed=1&amp;widget={id}\">{label}</a>{description} \
                 <a href=\"/api/widgets/{id}/form\">form</a></li>\n",
                id = urlencoding::encode(&def.id),
                label = escape_html(&def.label),
                description = def
                    .description
                    .as_deref()
                    .map(|d| format!(" <small>{}</small>", escape_html(d)))
                    .unwrap_or_default(),
            )
        })
        .collect();
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <title>Widgets</title>\n</head>\n<body>\n<h1>Widgets</h1>\n<ul>\n{items}</ul>\n</body>\n</html>\n"
    )
}

async fn list_widgets(State(state): State<AppState>) -> Json<Vec<WidgetSummary>> {
    Json(state.registry.list().map(|def| WidgetSummary::of(def)).collect())
}

async fn widget_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WidgetDetail>, WebError> {
    let def = state.widget(&id)?;
    Ok(Json(WidgetDetail {
        summary: WidgetSummary::of(&def),
        fields: def.fields.clone(),
        default_config: def.default_config.clone(),
    }))
}

async fn widget_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<Form>, WebError> {
    let def = state.widget(&id)?;
    let config = codec::decode_or_default(query.config.as_deref(), &def.default_config);
    Ok(Json(FormRenderer::new(&def).build(&config)?))
}

async fn export_widget(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ExportRequest>,
) -> Result<Html<String>, WebError> {
    let def = state.widget(&id)?;
    let brand = match req.brand.as_deref() {
        Some(kit) => Some(
            state
                .kits
                .get(kit)
                .ok_or_else(|| RegistryError::UnknownBrandKit { id: kit.to_string() })?,
        ),
        None => None,
    };
    let brand = brand.filter(|k| !k.is_neutral());
    let config = req.config.unwrap_or_else(|| def.default_config.clone());
    let config = match brand {
        Some(kit) => apply_brand_kit(&config, kit),
        None => config,
    };
    Ok(Html(compose(&def, &config, brand).to_string()))
}

async fn share_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<LinkRequest>,
) -> Result<Json<LinkResponse>, WebError> {
    let def = state.widget(&id)?;
    let config = req.config.unwrap_or_else(|| def.default_config.clone());
    Ok(Json(LinkResponse {
        url: embed_url(&state.base_url, &def.id, &config).to_string(),
        token: codec::encode(&config),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app() -> Router {
        let base = Url::parse("https://widgets.test/").unwrap();
        router(AppState::new(
            WidgetRegistry::with_builtins(),
            BrandKits::default(),
            base,
        ))
    }

    async fn send(req: Request<Body>) -> (StatusCode, String) {
        let res = app().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_list_keeps_registration_order() {
        let (status, body) = send(get_req("/api/widgets")).await;
        assert_eq!(status, StatusCode::OK);
        let list: Vec<Value> = serde_json::from_str(&body).unwrap();
        assert_eq!(list[0]["id"], "clock");
        assert_eq!(list[1]["id"], "counter");
    }

    #[tokio::test]
    async fn test_unknown_widget_is_404() {
        let (status, body) = send(get_req("/api/widgets/sundial")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("unknown widget: sundial"));
    }

    #[tokio::test]
    async fn test_detail_and_form() {
        let (status, body) = send(get_req("/api/widgets/counter")).await;
        assert_eq!(status, StatusCode::OK);
        let detail: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(detail["defaultConfig"]["counterTitle"], "Counter");

        let mut config = Config::from_object(detail["defaultConfig"].clone());
        config.set("counterTitle", json!("Laps"));
        let uri = format!("/api/widgets/counter/form?config={}", codec::encode(&config));
        let (status, body) = send(get_req(&uri)).await;
        assert_eq!(status, StatusCode::OK);
        let form: Value = serde_json::from_str(&body).unwrap();
        let title = form["sections"]
            .as_array()
            .unwrap()
            .iter()
            .flat_map(|s| s["controls"].as_array().unwrap())
            .find(|c| c["path"] == "counterTitle")
            .unwrap();
        assert_eq!(title["value"], "Laps");
    }

    #[tokio::test]
    async fn test_embed_and_authoring_index() {
        let token = codec::encode(&Config::from_object(json!({ "counterTitle": "<b>x</b>" })));
        let (status, body) = send(get_req(&format!("/?embed=1&widget=counter&config={token}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.starts_with("<!DOCTYPE html>"));
        assert!(body.contains("&lt;b&gt;x&lt;/b&gt;"));

        let (_, body) = send(get_req("/?embed=1&widget=sundial")).await;
        assert!(body.contains("<h1>Widgets</h1>"));
        assert!(body.contains("href=\"/?embed=1&amp;widget=lifeProgress\""));
        assert!(body.contains("href=\"/api/widgets/lifeProgress/form\""));

        let (_, body) = send(get_req("/?embed=1&widget=lifeProgress")).await;
        assert!(!body.contains("<h1>Widgets</h1>"));
        assert!(body.contains("<title>"));
    }

    #[tokio::test]
    async fn test_export_with_brand() {
        let (status, body) = send(post_json(
            "/api/widgets/clock/export",
            json!({ "brand": "jazer" }),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("fonts.googleapis.com"));

        let (status, _) = send(post_json(
            "/api/widgets/clock/export",
            json!({ "brand": "acme" }),
        ))
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_link() {
        let (status, body) = send(post_json(
            "/api/widgets/quotes/link",
            json!({ "config": { "author": "Ada" } }),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        let res: Value = serde_json::from_str(&body).unwrap();
        let token = res["token"].as_str().unwrap();
        assert_eq!(
            codec::decode(token).unwrap(),
            Config::from_object(json!({ "author": "Ada" }))
        );
        assert!(res["url"].as_str().unwrap().contains("widget=quotes"));
    }
}
