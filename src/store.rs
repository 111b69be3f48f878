//! Boards, comments and threads laid out over the flat key-value namespace.
//!
//! `AdStore` is the only code that builds storage keys. Writes are sequences of
//! independent single-key operations, so a failure midway leaves a partially
//! written board or comment behind. Reads detect that state: a board missing any
//! of its keys is `NotFound`, a thread entry without comment data is
//! `Inconsistent`.

use std::cmp::Ordering;
use std::str::FromStr;
use std::sync::Arc;

use chrono::Local;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::keys;
use crate::kv::{KvError, KvStore};
use crate::models::{BoardDetail, Code, Comment, ListedBoard};
use crate::shortcode::{self, ShortCodeError};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("inconsistent store content: {0}")]
    Inconsistent(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("invalid code: {0}")]
    InvalidCode(#[from] ShortCodeError),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<KvError> for StoreError {
    fn from(e: KvError) -> Self {
        match e {
            KvError::Unavailable(msg) => StoreError::Unavailable(msg),
            // a key of the wrong shape means someone else wrote into our namespace
            other => StoreError::Inconsistent(other.to_string()),
        }
    }
}

/// How listings order codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingOrder {
    /// By the seed each code encodes, i.e. creation order.
    #[default]
    Numeric,
    /// Plain string order of the codes. `"10"` sorts before `"9"`.
    Lexicographic,
}

impl ListingOrder {
    fn compare(self, a: &str, b: &str) -> Ordering {
        match self {
            ListingOrder::Numeric => shortcode::cmp_numeric(a, b),
            ListingOrder::Lexicographic => a.cmp(b),
        }
    }
}

impl FromStr for ListingOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "numeric" => Ok(ListingOrder::Numeric),
            "lexicographic" => Ok(ListingOrder::Lexicographic),
            other => Err(format!("unknown listing order '{other}' (expected numeric or lexicographic)")),
        }
    }
}

#[derive(Clone)]
pub struct AdStore {
    kv: Arc<dyn KvStore>,
    order: ListingOrder,
}

impl AdStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv, order: ListingOrder::default() }
    }

    pub fn with_order(mut self, order: ListingOrder) -> Self {
        self.order = order;
        self
    }

    pub fn order(&self) -> ListingOrder {
        self.order
    }

    /// Post a board, or return the code of the board already posted with `text`.
    ///
    /// A board left half written by an earlier failed attempt is completed
    /// under its existing code. Lengths are not checked here.
    pub async fn create_board(&self, creator: &str, text: &str) -> StoreResult<Code> {
        let name_key = keys::board_name(text);
        let code = match self.kv.get(&name_key).await? {
            Some(existing) => existing,
            None => {
                let seed = self.kv.incr(keys::LAST_BOARD_ID).await?;
                let code = shortcode::encode(seed)?;
                if self.kv.set_nx(&name_key, &code).await? {
                    code
                } else {
                    // lost a race for the same text; this seed stays unused
                    self.kv.get(&name_key).await?.ok_or_else(|| {
                        StoreError::Inconsistent(format!("{name_key} vanished after set"))
                    })?
                }
            }
        };
        if self.finish_board(&code, creator, text).await? {
            info!(code = %code, creator = %creator, "board created");
        }
        Ok(code)
    }

    /// Write whichever board keys are still missing. Existing values win, so
    /// concurrent finishers agree. The text goes last since it makes the board
    /// visible in listings. Returns whether anything was written.
    async fn finish_board(&self, code: &str, creator: &str, text: &str) -> StoreResult<bool> {
        let created_at = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let wrote_time = self.kv.set_nx(&keys::board_time(code), &created_at).await?;
        let wrote_creator = self.kv.set_nx(&keys::board_creator(code), creator).await?;
        let wrote_text = self.kv.set_nx(&keys::board(code), text).await?;
        if (wrote_time || wrote_creator || wrote_text) && !(wrote_time && wrote_creator && wrote_text) {
            warn!(code = %code, "completed partially written board");
        }
        Ok(wrote_time || wrote_creator || wrote_text)
    }

    pub async fn board_exists(&self, code: &str) -> StoreResult<bool> {
        Ok(self.kv.get(&keys::board(code)).await?.is_some())
    }

    pub async fn list_boards(&self) -> StoreResult<Vec<ListedBoard>> {
        let mut codes: Vec<String> = self
            .kv
            .scan_prefix(keys::BOARD_PREFIX)
            .await?
            .iter()
            .filter_map(|k| keys::board_code(k).map(str::to_string))
            .collect();
        codes.sort_by(|a, b| self.order.compare(a, b));

        let mut out = Vec::with_capacity(codes.len());
        for (i, code) in codes.iter().enumerate() {
            let key = keys::board(code);
            let text = self.kv.get(&key).await?.ok_or_else(|| {
                error!(key = %key, "listed board key has no value");
                StoreError::Inconsistent(format!("{key} listed but missing"))
            })?;
            out.push(ListedBoard { index: i + 1, text });
        }
        Ok(out)
    }

    pub async fn get_board_detail(&self, code: &str) -> StoreResult<BoardDetail> {
        let text = self.kv.get(&keys::board(code)).await?;
        let creator = self.kv.get(&keys::board_creator(code)).await?;
        let created_at = self.kv.get(&keys::board_time(code)).await?;
        match (text, creator, created_at) {
            (Some(text), Some(creator), Some(created_at)) => Ok(BoardDetail {
                code: code.to_string(),
                creator,
                text,
                created_at,
            }),
            (None, None, None) => Err(StoreError::NotFound(format!("board {code}"))),
            (text, creator, created_at) => {
                warn!(
                    code = %code,
                    has_text = text.is_some(),
                    has_creator = creator.is_some(),
                    has_time = created_at.is_some(),
                    "partially written board"
                );
                Err(StoreError::NotFound(format!("board {code}")))
            }
        }
    }

    /// Attach a comment to `board_code`. The board itself is not checked; see
    /// [`AdStore::board_exists`].
    pub async fn add_comment(&self, board_code: &str, creator: &str, text: &str) -> StoreResult<Code> {
        let seed = self.kv.incr(keys::LAST_COMMENT_ID).await?;
        let code = shortcode::encode(seed)?;
        self.kv.set(&keys::comment(&code), text).await?;
        self.kv.set(&keys::comment_creator(&code), creator).await?;
        self.kv.lpush(&keys::thread(board_code), &code).await?;
        info!(board = %board_code, code = %code, creator = %creator, "comment added");
        Ok(code)
    }

    pub async fn list_comments(&self, board_code: &str) -> StoreResult<Vec<Comment>> {
        let thread_key = keys::thread(board_code);
        let len = self.kv.llen(&thread_key).await?;
        let mut codes = Vec::with_capacity(len);
        for i in 0..len {
            // the list only grows at the front, so every index below len stays valid
            let code = self.kv.lindex(&thread_key, i).await?.ok_or_else(|| {
                StoreError::Inconsistent(format!("{thread_key}[{i}] missing"))
            })?;
            codes.push(code);
        }
        codes.sort_by(|a, b| self.order.compare(a, b));

        let mut out = Vec::with_capacity(codes.len());
        for code in codes {
            let creator = self.kv.get(&keys::comment_creator(&code)).await?;
            let text = self.kv.get(&keys::comment(&code)).await?;
            match (creator, text) {
                (Some(creator), Some(text)) => out.push(Comment { creator, text }),
                _ => {
                    error!(board = %board_code, comment = %code, "thread references comment without data");
                    return Err(StoreError::Inconsistent(format!(
                        "comment {code} in {thread_key} has no data"
                    )));
                }
            }
        }
        Ok(out)
    }
}
