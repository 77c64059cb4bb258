use chrono::{DateTime, FixedOffset};
use poem_openapi::Object;
use poem_openapi::types::MaybeUndefined;
use validator::Validate;

use super::trimmed;
use crate::error::{ApiResult, FieldErrors};
use crate::media::{DecodedImage, MediaStore};
use crate::repository::{GroupRepository, Patch, PostRecord};

#[derive(Object, Debug, Clone)]
#[oai(rename_all = "snake_case")]
pub struct PostRead {
    pub id: i32,
    /// Username of the author.
    pub author: String,
    pub text: String,
    pub pub_date: DateTime<FixedOffset>,
    /// Media URL of the attached image.
    pub image: Option<String>,
    pub group: Option<i32>,
}

impl PostRead {
    pub fn from_record(record: PostRecord, media: &MediaStore) -> Self {
        let post = record.post;
        Self {
            id: post.id,
            author: record.author,
            text: post.text,
            pub_date: post.pub_date,
            image: post.image.as_deref().map(|path| media.url(path)),
            group: post.group_id,
        }
    }
}

/// One limit/offset page of posts.
#[derive(Object, Debug, Clone)]
#[oai(rename_all = "snake_case")]
pub struct PostPage {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<PostRead>,
}

/// Body of POST and PUT.
#[derive(Object, Validate, Debug, Clone, Default)]
#[oai(rename_all = "snake_case")]
pub struct PostWrite {
    #[validate(required(message = "This field is required."), length(min = 1, message = "This field may not be blank."))]
    pub text: Option<String>,
    /// Base64 image, optionally as a `data:image/<ext>;base64,` URI.
    pub image: MaybeUndefined<String>,
    pub group: MaybeUndefined<i32>,
}

/// Body of PATCH.
#[derive(Object, Validate, Debug, Clone, Default)]
#[oai(rename_all = "snake_case")]
pub struct PostPatch {
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub text: Option<String>,
    pub image: MaybeUndefined<String>,
    pub group: MaybeUndefined<i32>,
}

/// A post payload that passed every field check.
#[derive(Debug, Clone)]
pub struct ValidatedPost {
    pub text: Option<String>,
    pub image: Patch<DecodedImage>,
    pub group: Patch<i32>,
}

impl PostWrite {
    pub async fn validate_with(mut self, groups: &GroupRepository) -> ApiResult<ValidatedPost> {
        self.text = trimmed(self.text);
        let errors = self.validate().err().map(FieldErrors::from).unwrap_or_default();
        validate_fields(self.text, self.image, self.group, groups, errors).await
    }
}

impl PostPatch {
    pub async fn validate_with(mut self, groups: &GroupRepository) -> ApiResult<ValidatedPost> {
        self.text = trimmed(self.text);
        let errors = self.validate().err().map(FieldErrors::from).unwrap_or_default();
        validate_fields(self.text, self.image, self.group, groups, errors).await
    }
}

async fn validate_fields(
    text: Option<String>,
    image: MaybeUndefined<String>,
    group: MaybeUndefined<i32>,
    groups: &GroupRepository,
    mut errors: FieldErrors,
) -> ApiResult<ValidatedPost> {
    let image = match image {
        MaybeUndefined::Undefined => Patch::Keep,
        MaybeUndefined::Null => Patch::Clear,
        MaybeUndefined::Value(payload) if payload.trim().is_empty() => Patch::Clear,
        MaybeUndefined::Value(payload) => match DecodedImage::from_base64(&payload) {
            Ok(decoded) => Patch::Set(decoded),
            Err(message) => {
                errors.add("image", message);
                Patch::Keep
            }
        },
    };

    let group = match group {
        MaybeUndefined::Undefined => Patch::Keep,
        MaybeUndefined::Null => Patch::Clear,
        MaybeUndefined::Value(id) => {
            if !groups.exists(id).await? {
                errors.add("group", format!("Invalid pk \"{id}\" - object does not exist."));
            }
            Patch::Set(id)
        }
    };

    errors.into_result()?;
    Ok(ValidatedPost { text, image, group })
}
