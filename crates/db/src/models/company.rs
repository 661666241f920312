use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set};

use crate::entities::company;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub subdomain: String,
}

#[derive(Debug, Clone)]
pub struct CreateCompany {
    pub name: String,
    pub subdomain: String,
}

impl Company {
    pub(crate) fn from_model(model: company::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            subdomain: model.subdomain,
        }
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<Self>, DbErr> {
        let record = company::Entity::find_by_id(id).one(db).await?;
        Ok(record.map(Self::from_model))
    }

    pub async fn find_by_subdomain<C: ConnectionTrait>(
        db: &C,
        subdomain: &str,
    ) -> Result<Option<Self>, DbErr> {
        let record = company::Entity::find()
            .filter(company::Column::Subdomain.eq(subdomain))
            .one(db)
            .await?;
        Ok(record.map(Self::from_model))
    }

    pub async fn create<C: ConnectionTrait>(db: &C, data: &CreateCompany) -> Result<Self, DbErr> {
        let active = company::ActiveModel {
            name: Set(data.name.clone()),
            subdomain: Set(data.subdomain.clone()),
            ..Default::default()
        };
        let model = active.insert(db).await?;
        Ok(Self::from_model(model))
    }

    /// Removes the company; branches and their QR codes go with it.
    pub async fn delete<C: ConnectionTrait>(db: &C, id: i64) -> Result<u64, DbErr> {
        let result = company::Entity::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected)
    }
}
