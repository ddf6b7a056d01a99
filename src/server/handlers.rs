//! `/qr` handlers and the small JSON endpoints.
//!
//! The multipart and query-string variants only collect raw parameters; both
//! funnel into [`render`], which validates and calls the generator once.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::context::ServiceContext;
use crate::error::AppError;
use crate::params::{parse_size, parse_symbology, validate_text, MAX_SIZE, MIN_SIZE};
use crate::ports::CodeRequest;

/// Parameters common to every `/qr` variant, still unvalidated.
#[derive(Debug, Default, Deserialize)]
pub struct QrParams {
    /// Text or URL to encode.
    pub text: Option<String>,
    /// `qr` or `barcode`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Pixel size as sent by the client.
    pub size: Option<String>,
    /// Icon to download when no file was uploaded.
    pub icon_url: Option<String>,
    /// Uploaded icon bytes.
    #[serde(skip)]
    pub icon: Option<Vec<u8>>,
}

fn invalid_form() -> AppError {
    AppError::InvalidArgument("invalid form".to_string())
}

/// POST /qr – multipart form with optional icon upload.
pub async fn qr_form(
    State(ctx): State<ServiceContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AppError> {
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!("multipart rejected: {e}");
        invalid_form()
    })?;

    let mut params = QrParams::default();
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::debug!("parse form error: {e}");
        invalid_form()
    })? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "icon" {
            let data = field
                .bytes()
                .await
                .map_err(|_| AppError::InvalidArgument("invalid icon file".to_string()))?;
            ctx.icons.check_len(data.len())?;
            params.icon = Some(data.to_vec());
            continue;
        }

        let slot = match name.as_str() {
            "text" => &mut params.text,
            "type" => &mut params.kind,
            "size" => &mut params.size,
            "icon_url" => &mut params.icon_url,
            _ => continue,
        };
        *slot = Some(field.text().await.map_err(|_| invalid_form())?);
    }

    render(&ctx, params).await
}

/// GET /qr – query-string variant, icon by URL only.
pub async fn qr_query(
    State(ctx): State<ServiceContext>,
    Query(params): Query<QrParams>,
) -> Result<Response, AppError> {
    render(&ctx, params).await
}

/// Validate raw parameters, resolve the icon and render the PNG response.
///
/// # Errors
///
/// Returns a client error for invalid parameters or icons, and the
/// generator's error otherwise.
pub async fn render(ctx: &ServiceContext, params: QrParams) -> Result<Response, AppError> {
    let text = params.text.unwrap_or_default();
    validate_text(&text).map_err(AppError::InvalidArgument)?;
    let symbology = parse_symbology(params.kind.as_deref()).map_err(AppError::InvalidArgument)?;
    let size = parse_size(params.size.as_deref(), ctx.generator.default_size())
        .map_err(AppError::InvalidArgument)?;

    let mut request = CodeRequest { text, symbology, size, icon: None };
    if symbology.supports_icon() {
        let icon_url = params.icon_url.as_deref().map(str::trim).filter(|u| !u.is_empty());
        match (params.icon.filter(|bytes| !bytes.is_empty()), icon_url) {
            (Some(bytes), _) => request = request.with_icon(bytes),
            (None, Some(url)) => request = request.with_icon(ctx.icons.fetch(url).await?),
            (None, None) => {}
        }
    }

    tracing::info!(?request, "generating");
    let png = ctx.generate(request).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CONTENT_DISPOSITION, symbology.content_disposition()),
        ],
        png,
    )
        .into_response())
}

/// GET /health – liveness probe.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /openapi.json – description of the `/qr` endpoint.
pub async fn openapi() -> Json<Value> {
    let size_schema = json!({ "type": "integer", "minimum": MIN_SIZE, "maximum": MAX_SIZE });
    let type_schema = json!({ "type": "string", "enum": ["qr", "barcode"], "default": "qr" });
    let png = json!({
        "description": "QR code or barcode image",
        "content": { "image/png": { "schema": { "type": "string", "format": "binary" } } }
    });
    let error = json!({
        "description": "Error message",
        "content": { "text/plain": { "schema": { "type": "string" } } }
    });

    Json(json!({
        "openapi": "3.0.3",
        "info": {
            "title": "QR Code Generator API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Generates QR codes with optional icon overlay, or Code 128 barcodes"
        },
        "paths": {
            "/qr": {
                "post": {
                    "summary": "Generate QR code or barcode",
                    "requestBody": {
                        "required": true,
                        "content": {
                            "multipart/form-data": {
                                "schema": {
                                    "type": "object",
                                    "required": ["text"],
                                    "properties": {
                                        "text": { "type": "string", "description": "Text or URL to encode" },
                                        "type": type_schema.clone(),
                                        "size": size_schema.clone(),
                                        "icon": { "type": "string", "format": "binary", "description": "Centre icon (PNG/JPEG/GIF), QR only" },
                                        "icon_url": { "type": "string", "format": "uri", "description": "Centre icon URL, QR only" }
                                    }
                                }
                            }
                        }
                    },
                    "responses": { "200": png.clone(), "400": error.clone() }
                },
                "get": {
                    "summary": "Generate QR code or barcode from query parameters",
                    "parameters": [
                        { "name": "text", "in": "query", "required": true, "schema": { "type": "string" } },
                        { "name": "type", "in": "query", "schema": type_schema },
                        { "name": "size", "in": "query", "schema": size_schema },
                        { "name": "icon_url", "in": "query", "schema": { "type": "string", "format": "uri" } }
                    ],
                    "responses": { "200": png, "400": error }
                }
            }
        }
    }))
}
