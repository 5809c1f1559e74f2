//! JSON endpoints under `/api/p/concerts`.

use crate::model::ConcertInput;
use crate::store::ConcertStore;
use encore_plugin_api::{ApiRequest, ApiRoute, HttpResponse, PluginError, RouteParams};
use serde_json::json;
use std::sync::Arc;

const NOT_FOUND: &str = "Concert not found";

/// Collection and item routes, static before dynamic.
pub fn routes(store: &Arc<ConcertStore>) -> Vec<ApiRoute> {
    let list = Arc::clone(store);
    let create = Arc::clone(store);
    let show = Arc::clone(store);
    let update = Arc::clone(store);
    let remove = Arc::clone(store);

    vec![
        ApiRoute::new("")
            .get(move |req: ApiRequest, _| {
                let store = Arc::clone(&list);
                async move {
                    let published_only = req.query_param("published") == Some("true");
                    HttpResponse::json(200, &store.list(published_only))
                }
            })
            .post(move |req: ApiRequest, _| {
                let store = Arc::clone(&create);
                async move {
                    let input: ConcertInput = req.json()?;
                    let concert = store.create(input)?;
                    tracing::info!(concert_id = %concert.id, "Concert created");
                    HttpResponse::json(201, &concert)
                }
            }),
        ApiRoute::new("[id]")
            .get(move |_, params: RouteParams| {
                let store = Arc::clone(&show);
                async move {
                    let concert = store
                        .get(id(&params)?)
                        .ok_or_else(|| PluginError::not_found(NOT_FOUND))?;
                    HttpResponse::json(200, &concert)
                }
            })
            .put(move |req: ApiRequest, params: RouteParams| {
                let store = Arc::clone(&update);
                async move {
                    let input: ConcertInput = req.json()?;
                    let concert = store
                        .update(id(&params)?, input)?
                        .ok_or_else(|| PluginError::not_found(NOT_FOUND))?;
                    HttpResponse::json(200, &concert)
                }
            })
            .delete(move |_, params: RouteParams| {
                let store = Arc::clone(&remove);
                async move {
                    if !store.delete(id(&params)?) {
                        return Err(PluginError::not_found(NOT_FOUND));
                    }
                    HttpResponse::json(200, &json!({ "success": true }))
                }
            }),
    ]
}

fn id(params: &RouteParams) -> Result<&str, PluginError> {
    params
        .get("id")
        .map(String::as_str)
        .ok_or_else(|| PluginError::invalid_input("missing concert id"))
}
