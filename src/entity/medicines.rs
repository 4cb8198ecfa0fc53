use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "medicines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub generic_name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category: String,
    pub company: Option<String>,
    pub price: i64,
    pub seller_email: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::banners::Entity")]
    Banners,
}

impl Related<super::banners::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Banners.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
