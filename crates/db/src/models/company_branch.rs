use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, Set};

use crate::entities::company_branch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyBranch {
    pub id: i64,
    pub company_id: i64,
}

impl CompanyBranch {
    pub(crate) fn from_model(model: company_branch::Model) -> Self {
        Self {
            id: model.id,
            company_id: model.company_id,
        }
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<Self>, DbErr> {
        let record = company_branch::Entity::find_by_id(id).one(db).await?;
        Ok(record.map(Self::from_model))
    }

    pub async fn create<C: ConnectionTrait>(db: &C, company_id: i64) -> Result<Self, DbErr> {
        let active = company_branch::ActiveModel {
            company_id: Set(company_id),
            ..Default::default()
        };
        let model = active.insert(db).await?;
        Ok(Self::from_model(model))
    }
}
