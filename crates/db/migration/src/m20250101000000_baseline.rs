use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .if_not_exists()
                    .table(Companies::Table)
                    .col(pk_id_col(manager, Companies::Id))
                    .col(ColumnDef::new(Companies::Name).string_len(128).not_null())
                    .col(ColumnDef::new(Companies::Subdomain).string_len(63).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_companies_subdomain")
                    .table(Companies::Table)
                    .col(Companies::Subdomain)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .if_not_exists()
                    .table(CompanyBranches::Table)
                    .col(pk_id_col(manager, CompanyBranches::Id))
                    .col(fk_id_col(manager, CompanyBranches::CompanyId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_company_branches_company_id_companies")
                            .from(CompanyBranches::Table, CompanyBranches::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("ix_company_branches_company_id")
                    .table(CompanyBranches::Table)
                    .col(CompanyBranches::CompanyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .if_not_exists()
                    .table(QrCodes::Table)
                    .col(pk_id_col(manager, QrCodes::Id))
                    .col(fk_id_col(manager, QrCodes::CompanyBranchId))
                    .col(ColumnDef::new(QrCodes::QrOptions).json())
                    .col(ColumnDef::new(QrCodes::UrlHash).char_len(64).not_null())
                    .col(
                        ColumnDef::new(QrCodes::ScanCount)
                            .integer()
                            .not_null()
                            .default(Expr::val(0)),
                    )
                    .col(ColumnDef::new(QrCodes::LastScanned).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_qr_codes_company_branch_id_company_branches")
                            .from(QrCodes::Table, QrCodes::CompanyBranchId)
                            .to(CompanyBranches::Table, CompanyBranches::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One QR code per branch.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_qr_codes_company_branch_id")
                    .table(QrCodes::Table)
                    .col(QrCodes::CompanyBranchId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_qr_codes_url_hash")
                    .table(QrCodes::Table)
                    .col(QrCodes::UrlHash)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(QrCodes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CompanyBranches::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Companies::Table).to_owned())
            .await?;
        Ok(())
    }
}

fn pk_id_col<T: Iden>(manager: &SchemaManager, col: T) -> ColumnDef {
    let mut col = ColumnDef::new(col);
    match manager.get_database_backend() {
        DatabaseBackend::Sqlite => {
            col.integer();
        }
        _ => {
            col.big_integer();
        }
    }
    col.not_null().auto_increment().primary_key().to_owned()
}

fn fk_id_col<T: Iden>(manager: &SchemaManager, col: T) -> ColumnDef {
    let mut col = ColumnDef::new(col);
    match manager.get_database_backend() {
        DatabaseBackend::Sqlite => {
            col.integer();
        }
        _ => {
            col.big_integer();
        }
    }
    col.not_null().to_owned()
}

#[derive(Iden)]
enum Companies {
    Table,
    Id,
    Name,
    Subdomain,
}

#[derive(Iden)]
enum CompanyBranches {
    Table,
    Id,
    CompanyId,
}

#[derive(Iden)]
enum QrCodes {
    Table,
    Id,
    CompanyBranchId,
    QrOptions,
    UrlHash,
    ScanCount,
    LastScanned,
}
