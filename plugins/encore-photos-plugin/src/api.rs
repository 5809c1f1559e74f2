//! JSON and file endpoints under `/api/p/photos`.

use crate::model::{AlbumChanges, NewAlbum, NewPhoto, PhotoChanges};
use crate::storage::FileStorage;
use crate::store::AlbumStore;
use encore_plugin_api::{ApiRequest, ApiRoute, HttpResponse, PluginError, PluginResult, RouteParams};
use serde::Deserialize;
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use tracing::{info, warn};

/// Stores shared by every handler.
#[derive(Clone)]
pub struct Context {
    pub albums: Arc<AlbumStore>,
    pub files: Arc<dyn FileStorage>,
}

/// The route table. Static and static-prefixed routes come before the
/// `[id]` routes so they stay reachable.
pub fn routes(ctx: &Context) -> Vec<ApiRoute> {
    vec![
        ApiRoute::new("")
            .get(with(ctx, list_albums))
            .post(with(ctx, create_album)),
        ApiRoute::new("upload").post(with(ctx, upload)),
        ApiRoute::new("file/[key]").get(with(ctx, serve_file)),
        ApiRoute::new("album/[slug]").get(with(ctx, album_by_slug)),
        ApiRoute::new("photo/[photoId]")
            .get(with(ctx, get_photo))
            .put(with(ctx, update_photo))
            .delete(with(ctx, delete_photo)),
        ApiRoute::new("[id]/photos")
            .get(with(ctx, list_photos))
            .post(with(ctx, add_photos)),
        ApiRoute::new("[id]/reorder").put(with(ctx, reorder)),
        ApiRoute::new("[id]")
            .get(with(ctx, get_album))
            .put(with(ctx, update_album))
            .delete(with(ctx, delete_album)),
    ]
}

fn with<F, Fut>(ctx: &Context, handler: F) -> impl Fn(ApiRequest, RouteParams) -> Fut + Send + Sync + 'static
where
    F: Fn(Context, ApiRequest, RouteParams) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = PluginResult<HttpResponse>> + Send + 'static,
{
    let ctx = ctx.clone();
    move |req, params| handler(ctx.clone(), req, params)
}

fn param<'a>(params: &'a RouteParams, name: &str) -> PluginResult<&'a str> {
    params
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| PluginError::invalid_input(format!("missing route parameter {name}")))
}

fn success() -> PluginResult<HttpResponse> {
    HttpResponse::json(200, &json!({ "success": true }))
}

async fn list_albums(ctx: Context, req: ApiRequest, _: RouteParams) -> PluginResult<HttpResponse> {
    let published_only = req.query_param("published") == Some("true");
    HttpResponse::json(200, &ctx.albums.list(published_only))
}

async fn create_album(ctx: Context, req: ApiRequest, _: RouteParams) -> PluginResult<HttpResponse> {
    let album = ctx.albums.create(req.json::<NewAlbum>()?)?;
    info!(album_id = %album.id, slug = %album.slug, "Album created");
    HttpResponse::json(201, &album)
}

/// Stores the raw request body as one image.
///
/// The album comes from `?albumId=`, the file name from `?filename=` and the
/// type from the `content-type` header.
async fn upload(ctx: Context, req: ApiRequest, _: RouteParams) -> PluginResult<HttpResponse> {
    if req.body.is_empty() {
        return Err(PluginError::invalid_input("No files provided"));
    }
    let album_id = req
        .query_param("albumId")
        .filter(|id| !id.is_empty())
        .ok_or_else(|| PluginError::invalid_input("Album ID required"))?;
    if ctx.albums.get(album_id).is_none() {
        return Err(PluginError::not_found("Album not found"));
    }
    let mime_type = req
        .headers
        .get("content-type")
        .map(String::as_str)
        .filter(|t| t.starts_with("image/"))
        .ok_or_else(|| PluginError::invalid_input("No valid image files provided"))?;
    let filename = req.query_param("filename").unwrap_or("upload");

    let file = ctx.files.upload(filename, mime_type, req.body.clone());
    ctx.albums.add_photos(
        album_id,
        vec![NewPhoto {
            storage_key: file.key.clone(),
            url: file.url.clone(),
            filename: file.name.clone(),
            size: file.size,
            mime_type: Some(file.mime_type.clone()),
            ..NewPhoto::default()
        }],
    )?;
    info!(album_id, key = %file.key, storage = ctx.files.name(), "Photo uploaded");

    HttpResponse::json(201, &json!({ "photos": [file], "albumId": album_id }))
}

async fn serve_file(ctx: Context, _: ApiRequest, params: RouteParams) -> PluginResult<HttpResponse> {
    let file = ctx
        .files
        .get(param(&params, "key")?)
        .ok_or_else(|| PluginError::not_found("File not found"))?;
    Ok(HttpResponse {
        status: 200,
        content_type: file.mime_type,
        body: file.data,
    })
}

/// Unpublished albums are hidden unless `?published=false` is passed.
async fn album_by_slug(ctx: Context, req: ApiRequest, params: RouteParams) -> PluginResult<HttpResponse> {
    let require_published = req.query_param("published") != Some("false");
    let album = ctx
        .albums
        .by_slug(param(&params, "slug")?)
        .filter(|a| a.album.published || !require_published)
        .ok_or_else(|| PluginError::not_found("Album not found"))?;
    HttpResponse::json(200, &album)
}

async fn get_photo(ctx: Context, _: ApiRequest, params: RouteParams) -> PluginResult<HttpResponse> {
    let photo = ctx
        .albums
        .photo(param(&params, "photoId")?)
        .ok_or_else(|| PluginError::not_found("Photo not found"))?;
    HttpResponse::json(200, &photo)
}

async fn update_photo(ctx: Context, req: ApiRequest, params: RouteParams) -> PluginResult<HttpResponse> {
    let changes: PhotoChanges = req.json()?;
    let photo = ctx.albums.update_photo(param(&params, "photoId")?, changes)?;
    HttpResponse::json(200, &photo)
}

async fn delete_photo(ctx: Context, _: ApiRequest, params: RouteParams) -> PluginResult<HttpResponse> {
    let photo = ctx.albums.delete_photo(param(&params, "photoId")?)?;
    release(&ctx, &photo.storage_key);
    success()
}

async fn list_photos(ctx: Context, _: ApiRequest, params: RouteParams) -> PluginResult<HttpResponse> {
    HttpResponse::json(200, &ctx.albums.photos(param(&params, "id")?))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<NewPhoto>),
    One(Box<NewPhoto>),
}

async fn add_photos(ctx: Context, req: ApiRequest, params: RouteParams) -> PluginResult<HttpResponse> {
    let photos = match req.json::<OneOrMany>()? {
        OneOrMany::Many(photos) => photos,
        OneOrMany::One(photo) => vec![*photo],
    };
    let added = ctx.albums.add_photos(param(&params, "id")?, photos)?;
    HttpResponse::json(200, &json!({ "count": added.len() }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReorderRequest {
    photo_ids: Vec<String>,
}

async fn reorder(ctx: Context, req: ApiRequest, params: RouteParams) -> PluginResult<HttpResponse> {
    let body: ReorderRequest = req
        .json()
        .map_err(|_| PluginError::invalid_input("photoIds must be an array"))?;
    ctx.albums.reorder(param(&params, "id")?, &body.photo_ids)?;
    success()
}

async fn get_album(ctx: Context, _: ApiRequest, params: RouteParams) -> PluginResult<HttpResponse> {
    let album = ctx
        .albums
        .get(param(&params, "id")?)
        .ok_or_else(|| PluginError::not_found("Album not found"))?;
    HttpResponse::json(200, &album)
}

async fn update_album(ctx: Context, req: ApiRequest, params: RouteParams) -> PluginResult<HttpResponse> {
    let changes: AlbumChanges = req.json()?;
    let album = ctx.albums.update(param(&params, "id")?, changes)?;
    HttpResponse::json(200, &album)
}

async fn delete_album(ctx: Context, _: ApiRequest, params: RouteParams) -> PluginResult<HttpResponse> {
    let photos = ctx.albums.delete(param(&params, "id")?)?;
    for photo in &photos {
        release(&ctx, &photo.storage_key);
    }
    success()
}

/// File removal failures never fail the request.
fn release(ctx: &Context, key: &str) {
    if !ctx.files.delete(key) {
        warn!(key, storage = ctx.files.name(), "Stored file was already gone");
    }
}
