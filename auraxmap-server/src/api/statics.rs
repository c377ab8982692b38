//! Static asset handlers for tile images and hex outline SVGs.
//!
//! Requests are validated through the query service before any disk
//! access, so an invalid coordinate and a missing file produce the same
//! not-found answer and path traversal never reaches the filesystem.
//! Assets are content-addressed by map code and coordinates; changes
//! ship under new URLs, so responses carry a long-lived immutable
//! cache-control header.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::debug;

use auraxmap::query::QueryError;

use super::{ApiError, AppState};

/// One week, immutable.
const CACHE_CONTROL: &str = "private, max-age=604800, immutable";

/// Serve one map tile image.
///
/// The filename follows the `lod{L}_{x}_{y}.jpg` scheme; anything else
/// is a missing tile.
pub async fn tile(
    State(state): State<AppState>,
    Path((code, filename)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let (lod, x, y) = parse_tile_filename(&filename).ok_or_else(|| {
        QueryError::TileNotFound {
            map_code: code.clone(),
            lod: 0,
            x: 0,
            y: 0,
        }
    })?;
    let relative = state.query.resolve_tile(&code, lod, x, y)?;
    serve_asset(&state, &relative, "image/jpeg", QueryError::TileNotFound {
        map_code: code,
        lod,
        x,
        y,
    })
    .await
}

/// Serve one hex outline SVG.
pub async fn hex(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let code = filename
        .strip_suffix(".svg")
        .ok_or_else(|| QueryError::UnknownMapCode(filename.clone()))?;
    let relative = state.query.resolve_hex(code)?;
    serve_asset(
        &state,
        &relative,
        "image/svg+xml",
        QueryError::UnknownMapCode(code.to_owned()),
    )
    .await
}

async fn serve_asset(
    state: &AppState,
    relative: &std::path::Path,
    content_type: &'static str,
    missing: QueryError,
) -> Result<Response, ApiError> {
    let path = state.asset_dir.join(relative);
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok((
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, content_type),
                (header::CACHE_CONTROL, CACHE_CONTROL),
            ],
            bytes,
        )
            .into_response()),
        Err(err) => {
            debug!(path = %path.display(), error = %err, "asset not found on disk");
            Err(missing.into())
        }
    }
}

/// Parse a `lod{L}_{x}_{y}.jpg` tile filename.
fn parse_tile_filename(filename: &str) -> Option<(u8, i32, i32)> {
    let stem = filename.strip_suffix(".jpg")?;
    let rest = stem.strip_prefix("lod")?;
    let mut parts = rest.splitn(3, '_');
    let lod = parts.next()?.parse().ok()?;
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    Some((lod, x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tile_filename() {
        assert_eq!(parse_tile_filename("lod0_-4_3.jpg"), Some((0, -4, 3)));
        assert_eq!(parse_tile_filename("lod3_0_0.jpg"), Some((3, 0, 0)));
    }

    #[test]
    fn test_parse_rejects_malformed_names() {
        assert_eq!(parse_tile_filename("lod0_-4_3.png"), None);
        assert_eq!(parse_tile_filename("tile0_0_0.jpg"), None);
        assert_eq!(parse_tile_filename("lod0_0.jpg"), None);
        assert_eq!(parse_tile_filename("lodx_0_0.jpg"), None);
        assert_eq!(parse_tile_filename("lod0_0_0_0.jpg"), None);
    }
}
