use chrono::{DateTime, FixedOffset};
use poem_openapi::Object;
use validator::Validate;

use super::trimmed;
use crate::error::ApiResult;
use crate::repository::{CommentChanges, CommentRecord};

#[derive(Object, Debug, Clone)]
#[oai(rename_all = "snake_case")]
pub struct CommentRead {
    pub id: i32,
    pub author: String,
    pub post: i32,
    pub text: String,
    pub created: DateTime<FixedOffset>,
}

impl From<CommentRecord> for CommentRead {
    fn from(record: CommentRecord) -> Self {
        let comment = record.comment;
        Self {
            id: comment.id,
            author: record.author,
            post: comment.post_id,
            text: comment.text,
            created: comment.created,
        }
    }
}

/// Body of POST and PUT.
#[derive(Object, Validate, Debug, Clone, Default)]
#[oai(rename_all = "snake_case")]
pub struct CommentWrite {
    #[validate(required(message = "This field is required."), length(min = 1, message = "This field may not be blank."))]
    pub text: Option<String>,
}

/// Body of PATCH.
#[derive(Object, Validate, Debug, Clone, Default)]
#[oai(rename_all = "snake_case")]
pub struct CommentPatch {
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub text: Option<String>,
}

impl CommentWrite {
    /// Validated text of a new or fully replaced comment.
    pub fn into_text(mut self) -> ApiResult<String> {
        self.text = trimmed(self.text);
        self.validate()?;
        Ok(self.text.unwrap_or_default())
    }
}

impl CommentPatch {
    pub fn into_changes(mut self) -> ApiResult<CommentChanges> {
        self.text = trimmed(self.text);
        self.validate()?;
        Ok(CommentChanges { text: self.text })
    }
}
