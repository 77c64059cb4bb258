//! Follow edge: `user` subscribes to `following`.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "follows")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// The user who follows.
    pub user_id: i32,
    /// The user being followed.
    pub following_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Follower,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::FollowingId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Following,
}

// Joins resolve to the followed side; the follower is always the requester.
impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Following.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
