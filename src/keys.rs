//! Key layout in the flat key-value namespace.
//!
//! ```text
//! board:{code}              -> board text
//! creator:board:{code}      -> board creator name
//! time:board:{code}         -> creation timestamp
//! board-name:{text}         -> code of the board posted with that text
//! comment:{code}            -> comment text
//! creator:comment:{code}    -> comment creator name
//! comment:board:{code}      -> list of comment codes, most recent first
//! last-board-id             -> board counter
//! last-comment-id           -> comment counter
//! ```

pub const BOARD_PREFIX: &str = "board:";
pub const LAST_BOARD_ID: &str = "last-board-id";
pub const LAST_COMMENT_ID: &str = "last-comment-id";

pub fn board(code: &str) -> String {
    format!("{BOARD_PREFIX}{code}")
}

pub fn board_creator(code: &str) -> String {
    format!("creator:board:{code}")
}

pub fn board_time(code: &str) -> String {
    format!("time:board:{code}")
}

pub fn board_name(text: &str) -> String {
    format!("board-name:{text}")
}

pub fn comment(code: &str) -> String {
    format!("comment:{code}")
}

pub fn comment_creator(code: &str) -> String {
    format!("creator:comment:{code}")
}

pub fn thread(board_code: &str) -> String {
    format!("comment:board:{board_code}")
}

/// Code part of a `board:{code}` key.
pub fn board_code(key: &str) -> Option<&str> {
    key.strip_prefix(BOARD_PREFIX)
}
