use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Base-36 short code of a board or comment.
pub type Code = String;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewBoard {
    pub creator: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewComment {
    pub creator: String,
    pub text: String,
}

/// One row of the board listing. `index` is 1-based and only meaningful for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ListedBoard {
    pub index: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BoardDetail {
    #[schema(value_type = String)]
    pub code: Code,
    pub creator: String,
    pub text: String,
    pub created_at: String, // opaque, server-local
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Comment {
    pub creator: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BoardPage {
    pub board: BoardDetail,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Created {
    #[schema(value_type = String)]
    pub code: Code,
}
