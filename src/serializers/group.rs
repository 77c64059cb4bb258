use poem_openapi::Object;

use crate::entities::group;

#[derive(Object, Debug, Clone)]
#[oai(rename_all = "snake_case")]
pub struct GroupRead {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl From<group::Model> for GroupRead {
    fn from(model: group::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            slug: model.slug,
            description: model.description,
        }
    }
}
