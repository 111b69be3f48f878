use actix_web::http::header;
use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::models::*;
use crate::store::AdStore;
use crate::validation::{validate_board, validate_comment};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(
                web::resource("/boards")
                    .route(web::get().to(list_boards))
                    .route(web::post().to(create_board)),
            )
            .service(web::resource("/boards/{code}").route(web::get().to(get_board)))
            .service(
                web::resource("/boards/{code}/comments")
                    .route(web::get().to(list_comments))
                    .route(web::post().to(create_comment)),
            ),
    );
}

#[derive(Clone)]
pub struct AppState {
    pub store: AdStore,
}

fn board_location(code: &str) -> String {
    format!("/api/v1/boards/{code}")
}

#[utoipa::path(
    get,
    path = "/api/v1/boards",
    tag = "boards",
    responses(
        (status = 200, description = "Boards with display index", body = [ListedBoard])
    )
)]
pub async fn list_boards(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let boards = data.store.list_boards().await?;
    Ok(HttpResponse::Ok().json(boards))
}

#[utoipa::path(
    post,
    path = "/api/v1/boards",
    tag = "boards",
    request_body = NewBoard,
    responses(
        (status = 201, description = "Board created, or the board already posted with this text", body = Created),
        (status = 400, description = "Creator or text too long")
    )
)]
pub async fn create_board(
    data: web::Data<AppState>,
    payload: web::Json<NewBoard>,
) -> Result<HttpResponse, ApiError> {
    let new = payload.into_inner();
    validate_board(&new.creator, &new.text)?;
    let code = data.store.create_board(&new.creator, &new.text).await?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, board_location(&code)))
        .json(Created { code }))
}

#[utoipa::path(
    get,
    path = "/api/v1/boards/{code}",
    tag = "boards",
    params(("code" = String, Path, description = "Board short code")),
    responses(
        (status = 200, description = "Board with its comments", body = BoardPage),
        (status = 404, description = "Board not found")
    )
)]
pub async fn get_board(data: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let code = path.into_inner();
    let board = data.store.get_board_detail(&code).await?;
    let comments = data.store.list_comments(&code).await?;
    Ok(HttpResponse::Ok().json(BoardPage { board, comments }))
}

#[utoipa::path(
    get,
    path = "/api/v1/boards/{code}/comments",
    tag = "comments",
    params(("code" = String, Path, description = "Board short code")),
    responses(
        (status = 200, description = "Comments on the board", body = [Comment])
    )
)]
pub async fn list_comments(data: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let comments = data.store.list_comments(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(comments))
}

#[utoipa::path(
    post,
    path = "/api/v1/boards/{code}/comments",
    tag = "comments",
    request_body = NewComment,
    params(("code" = String, Path, description = "Board short code")),
    responses(
        (status = 201, description = "Comment added", body = Created),
        (status = 400, description = "Creator or text too long"),
        (status = 404, description = "Board not found")
    )
)]
pub async fn create_comment(
    data: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<NewComment>,
) -> Result<HttpResponse, ApiError> {
    let board_code = path.into_inner();
    let new = payload.into_inner();
    validate_comment(&new.creator, &new.text)?;
    if !data.store.board_exists(&board_code).await? {
        return Err(ApiError::NotFound);
    }
    let code = data.store.add_comment(&board_code, &new.creator, &new.text).await?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, board_location(&board_code)))
        .json(Created { code }))
}
