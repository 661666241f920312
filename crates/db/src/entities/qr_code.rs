use sea_orm::entity::prelude::*;

// `qr_options` is carried through untouched; nothing here interprets it.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "qr_codes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub company_branch_id: i64,
    pub qr_options: Option<Json>,
    #[sea_orm(unique)]
    pub url_hash: String,
    pub scan_count: i32,
    pub last_scanned: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::company_branch::Entity",
        from = "Column::CompanyBranchId",
        to = "super::company_branch::Column::Id",
        on_delete = "Cascade"
    )]
    CompanyBranch,
}

impl Related<super::company_branch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompanyBranch.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
