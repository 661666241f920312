use db::{
    DbErr, DbPool,
    models::{
        company::Company,
        company_branch::CompanyBranch,
        qr_code::{QrCode, ScanTarget},
    },
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QrCodeServiceError {
    #[error("QR code with hash '{url_hash}' not found")]
    NotFound { url_hash: String },
    #[error(transparent)]
    Database(#[from] DbErr),
}

pub type Result<T> = std::result::Result<T, QrCodeServiceError>;

/// Outcome of a successful scan: where to send the visitor, plus the counters
/// as they stand after this scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedScan {
    pub branch: CompanyBranch,
    pub company: Company,
    pub qr_code: QrCode,
}

#[derive(Clone, Default)]
pub struct QrCodeService;

impl QrCodeService {
    pub fn new() -> Self {
        Self
    }

    /// Resolves `url_hash` to its branch and company and counts the scan.
    ///
    /// Unknown hashes leave every counter untouched. The increment is committed
    /// before this returns, so each successful call counts exactly once.
    pub async fn resolve_and_record_scan(
        &self,
        db: &DbPool,
        url_hash: &str,
    ) -> Result<ResolvedScan> {
        let Some(ScanTarget {
            qr_code,
            branch,
            company,
        }) = QrCode::find_scan_target_by_url_hash(db, url_hash).await?
        else {
            tracing::warn!(url_hash, "QR code not found");
            return Err(QrCodeServiceError::NotFound {
                url_hash: url_hash.to_string(),
            });
        };

        let qr_code = QrCode::record_scan(db, qr_code.id).await?;
        tracing::info!(
            url_hash,
            company_branch_id = branch.id,
            scan_count = qr_code.scan_count,
            "Recorded QR code scan"
        );

        Ok(ResolvedScan {
            branch,
            company,
            qr_code,
        })
    }
}
