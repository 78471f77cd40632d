use axum::Json;
use axum::extract::Query;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::error::PipelineError;
use crate::grid;
use crate::models::{ExportRequest, ExportResponse};
use crate::raster;

#[derive(Deserialize, Default)]
pub struct ExportParams {
    #[serde(default)]
    pub format: Option<String>,
}

// Turns a previously generated grid back into a downloadable PNG. The
// grid goes through the same validation boundary as fresh model output,
// so a tampered or ragged grid never reaches the rasterizer.
pub async fn export_handler(
    Query(params): Query<ExportParams>,
    Json(payload): Json<ExportRequest>,
) -> Result<Response, PipelineError> {
    let pixel_grid = grid::validate(&payload.data)?;
    let canvas = raster::render(&pixel_grid);
    let filename = format!("{}.png", raster::download_name(&payload.user_prompt));

    if params.format.as_deref() == Some("dataurl") {
        let body = ExportResponse {
            data_url: raster::data_url(&canvas)?,
            filename,
        };
        return Ok(Json(body).into_response());
    }

    let png = raster::encode_png(&canvas)?;
    let headers = [
        (header::CONTENT_TYPE, "image/png".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    Ok((StatusCode::OK, headers, png).into_response())
}
