use crate::error::ApiError;
use crate::file_system;
use crate::models::{CreateFileRequest, PathQuery, PathRequest, RenameRequest, WriteFileRequest};
use crate::picker;
use crate::state::AppState;
use crate::terminal::{self, LaunchRequest};
use actix_web::http::header;
use actix_web::{get, post, web, HttpResponse};
use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use serde_json::json;
use std::convert::Infallible;
use std::path::PathBuf;
use std::time::Instant;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;

type ApiResult = Result<HttpResponse, ApiError>;

fn acknowledged() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "success": true }))
}

#[get("/api/connect")]
pub async fn connect() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "success": true, "message": "Connection successful" }))
}

#[get("/api/read-directory")]
pub async fn read_directory(query: web::Query<PathQuery>) -> ApiResult {
    debug!("Listing directory: {}", query.path);
    let nodes = file_system::list_directory(&query.path).await.map_err(|e| {
        warn!("Failed to read directory '{}': {}", query.path, e);
        ApiError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(nodes))
}

#[get("/api/read-directory-tree")]
pub async fn read_directory_tree(query: web::Query<PathQuery>) -> ApiResult {
    let root = PathBuf::from(&query.path);
    info!("Received request for directory tree: {}", root.display());
    let start_time = Instant::now();

    let tree = web::block({
        let root = root.clone();
        move || file_system::read_directory_tree(&root)
    })
    .await?;

    let duration = start_time.elapsed();
    info!(
        "Built tree for '{}' in {:.2?} ({} top-level entries).",
        root.display(),
        duration,
        tree.len()
    );
    Ok(HttpResponse::Ok().json(tree))
}

#[get("/api/read-file")]
pub async fn read_file(query: web::Query<PathQuery>) -> ApiResult {
    debug!("Reading file: {}", query.path);
    match file_system::read_file(&query.path).await {
        Ok(content) => Ok(HttpResponse::Ok().json(content)),
        Err(e) => {
            warn!("Failed to read file '{}': {}", query.path, e);
            Err(e.into())
        }
    }
}

/// Bytes travel as a JSON array of numbers.
#[get("/api/read-file-binary")]
pub async fn read_file_binary(query: web::Query<PathQuery>) -> ApiResult {
    debug!("Reading binary file: {}", query.path);
    match file_system::read_file_binary(&query.path).await {
        Ok(bytes) => Ok(HttpResponse::Ok().json(bytes)),
        Err(e) => {
            warn!("Failed to read binary file '{}': {}", query.path, e);
            Err(e.into())
        }
    }
}

#[post("/api/write-file")]
pub async fn write_file(req: web::Json<WriteFileRequest>) -> ApiResult {
    debug!("Writing {} bytes to {}", req.content.len(), req.path);
    if let Err(e) = file_system::write_file(&req.path, &req.content).await {
        warn!("Failed to write file '{}': {}", req.path, e);
        return Err(e.into());
    }
    Ok(HttpResponse::Ok().json(json!({ "success": true, "path": req.path })))
}

#[post("/api/create-file")]
pub async fn create_file(req: web::Json<CreateFileRequest>) -> ApiResult {
    info!("Creating file: {}", req.path);
    if let Err(e) = file_system::write_file(&req.path, &req.content).await {
        warn!("Failed to create file '{}': {}", req.path, e);
        return Err(e.into());
    }
    Ok(HttpResponse::Ok().json(json!({ "success": true, "path": req.path })))
}

#[get("/api/file-exists")]
pub async fn file_exists(query: web::Query<PathQuery>) -> HttpResponse {
    HttpResponse::Ok().json(file_system::exists(&query.path).await)
}

#[get("/api/directory-exists")]
pub async fn directory_exists(query: web::Query<PathQuery>) -> HttpResponse {
    HttpResponse::Ok().json(file_system::directory_exists(&query.path).await)
}

#[post("/api/delete-file")]
pub async fn delete_file(req: web::Json<PathRequest>) -> ApiResult {
    info!("Deleting file: {}", req.path);
    if let Err(e) = file_system::delete_file(&req.path).await {
        warn!("Failed to delete file '{}': {}", req.path, e);
        return Err(e.into());
    }
    Ok(acknowledged())
}

#[post("/api/create-directory")]
pub async fn create_directory(req: web::Json<PathRequest>) -> ApiResult {
    info!("Creating directory: {}", req.path);
    if let Err(e) = file_system::create_directory(&req.path).await {
        warn!("Failed to create directory '{}': {}", req.path, e);
        return Err(e.into());
    }
    Ok(HttpResponse::Ok().json(json!({ "success": true, "path": req.path })))
}

#[post("/api/delete-directory")]
pub async fn delete_directory(req: web::Json<PathRequest>) -> ApiResult {
    info!("Deleting directory: {}", req.path);
    if let Err(e) = file_system::delete_directory(&req.path).await {
        warn!("Failed to delete directory '{}': {}", req.path, e);
        return Err(e.into());
    }
    Ok(acknowledged())
}

#[post("/api/rename-item")]
pub async fn rename_item(req: web::Json<RenameRequest>) -> ApiResult {
    info!("Renaming '{}' to '{}'", req.old_path, req.new_path);
    if let Err(e) = file_system::rename_item(&req.old_path, &req.new_path).await {
        warn!("Failed to rename '{}': {}", req.old_path, e);
        return Err(e.into());
    }
    Ok(HttpResponse::Ok().json(json!({ "success": true, "newPath": req.new_path })))
}

/// Responds with the chosen path, or `null` on cancel.
#[post("/api/select-directory")]
pub async fn select_directory() -> HttpResponse {
    let picked = picker::select_directory()
        .await
        .map(|path| path.to_string_lossy().to_string());
    HttpResponse::Ok().json(picked)
}

#[get("/api/get-app-path")]
pub async fn get_app_path() -> ApiResult {
    let home = file_system::home_directory()
        .ok_or_else(|| ApiError::NotFound("Home directory is not available".to_string()))?;
    Ok(HttpResponse::Ok().json(home.to_string_lossy()))
}

#[post("/api/watch-directory")]
pub async fn watch_directory(
    state: web::Data<AppState>,
    req: web::Json<PathRequest>,
) -> ApiResult {
    let mut watcher = state.watcher.lock();
    if let Err(e) = watcher.start(&req.path) {
        warn!("Failed to watch directory '{}': {}", req.path, e);
        return Err(e.into());
    }
    Ok(acknowledged())
}

#[post("/api/unwatch-directory")]
pub async fn unwatch_directory(state: web::Data<AppState>) -> HttpResponse {
    state.watcher.lock().stop();
    acknowledged()
}

/// Launch failures are reported in the body, never as an error status.
#[post("/api/launch-claude-code-external")]
pub async fn launch_external(
    state: web::Data<AppState>,
    req: web::Json<LaunchRequest>,
) -> ApiResult {
    let request = req.into_inner();
    let stored = state.settings.lock().terminal_settings();
    let settings = match &request.terminal_settings {
        Some(input) => input.resolve(&stored),
        None => stored,
    };

    let outcome = web::block(move || terminal::launch(&request, &settings)).await?;
    if let Some(error) = &outcome.error {
        warn!("External terminal launch failed: {}", error);
    }
    Ok(HttpResponse::Ok().json(outcome))
}

/// Server-Sent Events stream of every push event. A subscriber that falls
/// behind skips what it missed.
#[get("/api/events")]
pub async fn events(state: web::Data<AppState>) -> HttpResponse {
    let receiver = state.events.subscribe();
    info!(
        "Event subscriber connected ({} active)",
        state.events.receiver_count()
    );

    let hello = stream::once(async {
        Ok::<_, Infallible>(web::Bytes::from_static(b": connected\n\n"))
    });
    let frames = BroadcastStream::new(receiver).filter_map(|item| async move {
        match item {
            Ok(event) => match event.to_sse_frame() {
                Ok(frame) => Some(Ok(web::Bytes::from(frame))),
                Err(e) => {
                    warn!("Failed to encode '{}' event: {}", event.name(), e);
                    None
                }
            },
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                warn!("Event subscriber lagged, skipped {} events", skipped);
                None
            }
        }
    });

    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(hello.chain(frames))
}
