use crate::models::{BoardDetail, BoardPage, Comment, Created, ListedBoard, NewBoard, NewComment};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::list_boards,
        crate::routes::create_board,
        crate::routes::get_board,
        crate::routes::list_comments,
        crate::routes::create_comment,
    ),
    components(schemas(
        NewBoard, NewComment, ListedBoard, BoardDetail, BoardPage, Comment, Created
    )),
    tags(
        (name = "boards", description = "Board operations"),
        (name = "comments", description = "Comment operations"),
    )
)]
pub struct ApiDoc;
