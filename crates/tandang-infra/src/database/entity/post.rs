//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use tandang_core::domain::Category;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub category: String,
    #[sea_orm(column_type = "Text")]
    pub excerpt: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub cover_image_url: Option<String>,
    pub is_published: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
///
/// The column is CHECK-constrained to the four category names; an out-of-set
/// value from a hand-edited row falls back to the default category.
impl From<Model> for tandang_core::domain::Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            slug: model.slug,
            category: model.category.parse::<Category>().unwrap_or_default(),
            excerpt: model.excerpt,
            content: model.content,
            cover_image_url: model.cover_image_url,
            is_published: model.is_published,
            created_at: model.created_at.into(),
        }
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel.
impl From<tandang_core::domain::Post> for ActiveModel {
    fn from(post: tandang_core::domain::Post) -> Self {
        Self {
            id: Set(post.id),
            title: Set(post.title),
            slug: Set(post.slug),
            category: Set(post.category.as_str().to_string()),
            excerpt: Set(post.excerpt),
            content: Set(post.content),
            cover_image_url: Set(post.cover_image_url),
            is_published: Set(post.is_published),
            created_at: Set(post.created_at.into()),
        }
    }
}
