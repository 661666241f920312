use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, FromQueryResult,
    JoinType, QueryFilter, QuerySelect, RelationTrait, Set,
};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::{
    entities::{company, company_branch, qr_code},
    models::{company::Company, company_branch::CompanyBranch},
    retry::retry_on_sqlite_busy,
};

#[derive(Debug, Clone, PartialEq)]
pub struct QrCode {
    pub id: i64,
    pub company_branch_id: i64,
    pub qr_options: Option<Value>,
    pub url_hash: String,
    pub scan_count: i32,
    pub last_scanned: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct CreateQrCode {
    pub company_branch_id: i64,
    /// Defaults to [`QrCode::default_url_hash`] of the branch id.
    pub url_hash: Option<String>,
    pub qr_options: Option<Value>,
    pub scan_count: i32,
}

/// A QR code joined with the branch it belongs to and that branch's company.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanTarget {
    pub qr_code: QrCode,
    pub branch: CompanyBranch,
    pub company: Company,
}

#[derive(Debug, FromQueryResult)]
struct ScanTargetRow {
    qr_code_id: i64,
    company_branch_id: i64,
    qr_options: Option<Value>,
    url_hash: String,
    scan_count: i32,
    last_scanned: Option<DateTime<Utc>>,
    company_id: i64,
    company_name: String,
    company_subdomain: String,
}

impl From<ScanTargetRow> for ScanTarget {
    fn from(row: ScanTargetRow) -> Self {
        Self {
            qr_code: QrCode {
                id: row.qr_code_id,
                company_branch_id: row.company_branch_id,
                qr_options: row.qr_options,
                url_hash: row.url_hash,
                scan_count: row.scan_count,
                last_scanned: row.last_scanned,
            },
            branch: CompanyBranch {
                id: row.company_branch_id,
                company_id: row.company_id,
            },
            company: Company {
                id: row.company_id,
                name: row.company_name,
                subdomain: row.company_subdomain,
            },
        }
    }
}

impl QrCode {
    fn from_model(model: qr_code::Model) -> Self {
        Self {
            id: model.id,
            company_branch_id: model.company_branch_id,
            qr_options: model.qr_options,
            url_hash: model.url_hash,
            scan_count: model.scan_count,
            last_scanned: model.last_scanned,
        }
    }

    /// Hex SHA-256 of the branch id, the hash provisioning hands out by default.
    pub fn default_url_hash(company_branch_id: i64) -> String {
        let digest = Sha256::digest(company_branch_id.to_string().as_bytes());
        format!("{digest:x}")
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<Self>, DbErr> {
        let record = qr_code::Entity::find_by_id(id).one(db).await?;
        Ok(record.map(Self::from_model))
    }

    pub async fn find_by_url_hash<C: ConnectionTrait>(
        db: &C,
        url_hash: &str,
    ) -> Result<Option<Self>, DbErr> {
        let record = qr_code::Entity::find()
            .filter(qr_code::Column::UrlHash.eq(url_hash))
            .one(db)
            .await?;
        Ok(record.map(Self::from_model))
    }

    /// Exact-match lookup of `url_hash`, loading the owning branch and company
    /// in the same query.
    pub async fn find_scan_target_by_url_hash<C: ConnectionTrait>(
        db: &C,
        url_hash: &str,
    ) -> Result<Option<ScanTarget>, DbErr> {
        let row = qr_code::Entity::find()
            .select_only()
            .column_as(qr_code::Column::Id, "qr_code_id")
            .column(qr_code::Column::CompanyBranchId)
            .column(qr_code::Column::QrOptions)
            .column(qr_code::Column::UrlHash)
            .column(qr_code::Column::ScanCount)
            .column(qr_code::Column::LastScanned)
            .column_as(company::Column::Id, "company_id")
            .column_as(company::Column::Name, "company_name")
            .column_as(company::Column::Subdomain, "company_subdomain")
            .join(JoinType::InnerJoin, qr_code::Relation::CompanyBranch.def())
            .join(JoinType::InnerJoin, company_branch::Relation::Company.def())
            .filter(qr_code::Column::UrlHash.eq(url_hash))
            .into_model::<ScanTargetRow>()
            .one(db)
            .await?;
        Ok(row.map(ScanTarget::from))
    }

    pub async fn create<C: ConnectionTrait>(db: &C, data: &CreateQrCode) -> Result<Self, DbErr> {
        let url_hash = data
            .url_hash
            .clone()
            .unwrap_or_else(|| Self::default_url_hash(data.company_branch_id));
        let active = qr_code::ActiveModel {
            company_branch_id: Set(data.company_branch_id),
            qr_options: Set(Some(
                data.qr_options
                    .clone()
                    .unwrap_or_else(|| Value::Object(Default::default())),
            )),
            url_hash: Set(url_hash),
            scan_count: Set(data.scan_count),
            last_scanned: Set(None),
            ..Default::default()
        };
        let model = active.insert(db).await?;
        Ok(Self::from_model(model))
    }

    /// Counts one scan: `scan_count + 1` and `last_scanned = now`, applied as a
    /// single UPDATE so concurrent scans never overwrite each other's increment.
    pub async fn record_scan<C: ConnectionTrait>(db: &C, id: i64) -> Result<Self, DbErr> {
        let scanned_at = Utc::now();
        let result = retry_on_sqlite_busy(|| {
            qr_code::Entity::update_many()
                .col_expr(
                    qr_code::Column::ScanCount,
                    Expr::col(qr_code::Column::ScanCount).add(1),
                )
                .col_expr(qr_code::Column::LastScanned, Expr::value(scanned_at))
                .filter(qr_code::Column::Id.eq(id))
                .exec(db)
        })
        .await?;

        if result.rows_affected == 0 {
            return Err(DbErr::RecordNotFound(format!("QR code {id} not found")));
        }

        Self::find_by_id(db, id)
            .await?
            .ok_or(DbErr::RecordNotFound(format!("QR code {id} not found")))
    }
}
