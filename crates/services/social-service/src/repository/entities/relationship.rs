//! Follow relationship entity for SeaORM.
//!
//! The composite primary key `(follower_id, followed_id)` is what keeps
//! edges unique, including under concurrent follows.

use sea_orm::entity::prelude::*;

use domain::Relationship;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "relationships")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub follower_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub followed_id: Uuid,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::FollowerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Follower,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::FollowedId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Followed,
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Relationship {
    fn from(model: Model) -> Self {
        Relationship {
            follower_id: model.follower_id,
            followed_id: model.followed_id,
            created_at: model.created_at,
        }
    }
}
