use sqlx::PgPool;

use crate::models::{CreateSignupConversion, SignupConversion};

pub struct SignupConversionRepository;

impl SignupConversionRepository {
    /// Write-only, fire-and-forget; never read back by the kernel
    /// (spec.md §6).
    pub async fn create(
        pool: &PgPool,
        input: CreateSignupConversion,
    ) -> Result<SignupConversion, sqlx::Error> {
        let id = shared::types::SignupConversionId::new();

        sqlx::query_as::<_, SignupConversion>(
            r#"
            INSERT INTO signup_conversions (id, tenant_id, source)
            VALUES ($1, $2, $3)
            RETURNING id, tenant_id, source, created_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(input.tenant_id.as_uuid())
        .bind(&input.source)
        .fetch_one(pool)
        .await
    }
}
