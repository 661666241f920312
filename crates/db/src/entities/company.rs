use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub subdomain: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::company_branch::Entity")]
    CompanyBranch,
}

impl Related<super::company_branch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompanyBranch.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
