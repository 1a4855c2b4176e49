//! PostgreSQL implementation of the record store.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::models::{
    CertificateRow, DonationRequestRow, DriveRow, ExpenditureRow, TransactionRow, UserRow,
};
use super::{
    CreateMany, DirectoryRepository, DriveRepository, ExpenditureRepository, PageRequest,
    TransactionRepository,
};
use crate::config::AdminConfig;
use crate::domain::{
    Certificate, DateRange, DirectoryFilter, DonationRequest, Drive, DriveFilter, Expenditure,
    ExpenditureFilter, NewCertificate, NewDonationRequest, NewDrive, NewExpenditure,
    NewTransaction, RecordId, Transaction, TransactionFilter, UserSummary,
};
use crate::error::AdminError;

const TRANSACTION_COLUMNS: &str = "id, transaction_id, name, email, phone, user_type, amount, \
    transaction_type, transaction_nature, date, money_for, custom_money_for, entry_type, \
    entry_by, entry_at, status, status_description, verified_by, verified_at, description, \
    screenshot_path, user_id, organization_id";

const DRIVE_COLUMNS: &str = "id, title, location, description, status, dtype, start_date, \
    end_date, time_interval, latitude, longitude, place_link, photos, created_at";

const EXPENDITURE_COLUMNS: &str =
    "id, amount, date, description, category, custom_category, entry_by, user_id, created_at";

/// PostgreSQL-backed record store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Wraps an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects with the pool settings from `config` and applies the
    /// embedded migrations.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Persistence`] if the database is unreachable or
    /// a migration fails.
    pub async fn connect(config: &AdminConfig) -> Result<Self, AdminError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AdminError::Persistence(e.to_string()))?;
        tracing::info!("database migrations applied");
        Ok(Self::new(pool))
    }
}

fn push_transaction_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &TransactionFilter) {
    qb.push(" WHERE TRUE");
    if let Some(search) = &filter.search {
        let pattern = format!("%{search}%");
        qb.push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR email ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR transaction_id ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
    push_date_bounds(qb, "date", filter.date_range);
}

/// Adds one inclusive comparison per present bound.
fn push_date_bounds(qb: &mut QueryBuilder<'_, Postgres>, column: &str, range: DateRange) {
    if let Some(from) = range.from {
        qb.push(format!(" AND {column} >= ")).push_bind(from);
    }
    if let Some(to) = range.to {
        qb.push(format!(" AND {column} <= ")).push_bind(to);
    }
}

fn collect<R, T>(rows: Vec<R>) -> Result<Vec<T>, AdminError>
where
    T: TryFrom<R, Error = AdminError>,
{
    rows.into_iter().map(T::try_from).collect()
}

#[async_trait]
impl CreateMany<NewTransaction, Transaction> for PostgresStore {
    async fn create_many(
        &self,
        records: Vec<NewTransaction>,
    ) -> Result<Vec<Transaction>, AdminError> {
        let sql = format!(
            "INSERT INTO transactions ({TRANSACTION_COLUMNS}) VALUES \
             ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, \
             $19, $20, $21, $22, $23) RETURNING {TRANSACTION_COLUMNS}"
        );
        let mut db_tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(records.len());
        for r in records {
            let row = sqlx::query_as::<_, TransactionRow>(&sql)
                .bind(RecordId::new().as_uuid())
                .bind(&r.transaction_id)
                .bind(&r.name)
                .bind(&r.email)
                .bind(&r.phone)
                .bind(r.user_type.as_str())
                .bind(r.amount)
                .bind(r.transaction_type.as_str())
                .bind(r.transaction_nature.as_str())
                .bind(r.date)
                .bind(r.money_for.as_str())
                .bind(&r.custom_money_for)
                .bind(r.entry_type.as_str())
                .bind(&r.entry_by)
                .bind(r.entry_at)
                .bind(r.status.as_str())
                .bind(&r.status_description)
                .bind(&r.verified_by)
                .bind(r.verified_at)
                .bind(&r.description)
                .bind(&r.screenshot_path)
                .bind(&r.user_id)
                .bind(&r.organization_id)
                .fetch_one(&mut *db_tx)
                .await?;
            created.push(Transaction::try_from(row)?);
        }
        db_tx.commit().await?;
        Ok(created)
    }
}

#[async_trait]
impl TransactionRepository for PostgresStore {
    async fn list_transactions(
        &self,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> Result<Vec<Transaction>, AdminError> {
        let mut qb = QueryBuilder::new(format!("SELECT {TRANSACTION_COLUMNS} FROM transactions"));
        push_transaction_filter(&mut qb, filter);
        qb.push(" ORDER BY date DESC, entry_at DESC LIMIT ")
            .push_bind(i64::from(page.limit))
            .push(" OFFSET ")
            .push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));
        let rows = qb
            .build_query_as::<TransactionRow>()
            .fetch_all(&self.pool)
            .await?;
        collect(rows)
    }

    async fn count_transactions(&self, filter: &TransactionFilter) -> Result<u64, AdminError> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM transactions");
        push_transaction_filter(&mut qb, filter);
        let count: i64 = qb.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn all_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, AdminError> {
        let mut qb = QueryBuilder::new(format!("SELECT {TRANSACTION_COLUMNS} FROM transactions"));
        push_transaction_filter(&mut qb, filter);
        qb.push(" ORDER BY date DESC, entry_at DESC");
        let rows = qb
            .build_query_as::<TransactionRow>()
            .fetch_all(&self.pool)
            .await?;
        collect(rows)
    }

    async fn get_transaction(&self, id: RecordId) -> Result<Option<Transaction>, AdminError> {
        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Transaction::try_from).transpose()
    }

    async fn save_transaction(&self, tx: &Transaction) -> Result<(), AdminError> {
        let result = sqlx::query(
            "UPDATE transactions SET transaction_id = $2, name = $3, email = $4, phone = $5, \
             user_type = $6, amount = $7, transaction_type = $8, transaction_nature = $9, \
             date = $10, money_for = $11, custom_money_for = $12, entry_type = $13, \
             entry_by = $14, status = $15, status_description = $16, verified_by = $17, \
             verified_at = $18, description = $19, screenshot_path = $20, user_id = $21, \
             organization_id = $22 WHERE id = $1",
        )
        .bind(tx.id.as_uuid())
        .bind(&tx.transaction_id)
        .bind(&tx.name)
        .bind(&tx.email)
        .bind(&tx.phone)
        .bind(tx.user_type.as_str())
        .bind(tx.amount)
        .bind(tx.transaction_type.as_str())
        .bind(tx.transaction_nature.as_str())
        .bind(tx.date)
        .bind(tx.money_for.as_str())
        .bind(&tx.custom_money_for)
        .bind(tx.entry_type.as_str())
        .bind(&tx.entry_by)
        .bind(tx.status.as_str())
        .bind(&tx.status_description)
        .bind(&tx.verified_by)
        .bind(tx.verified_at)
        .bind(&tx.description)
        .bind(&tx.screenshot_path)
        .bind(&tx.user_id)
        .bind(&tx.organization_id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AdminError::not_found("transaction", tx.id));
        }
        Ok(())
    }

    async fn delete_transaction(&self, id: RecordId) -> Result<bool, AdminError> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl CreateMany<NewDrive, Drive> for PostgresStore {
    async fn create_many(&self, records: Vec<NewDrive>) -> Result<Vec<Drive>, AdminError> {
        let sql = format!(
            "INSERT INTO drives ({DRIVE_COLUMNS}) VALUES \
             ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {DRIVE_COLUMNS}"
        );
        let mut db_tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(records.len());
        for d in records {
            let (latitude, longitude) = d
                .geo_location
                .map(|g| (Some(g.latitude), Some(g.longitude)))
                .unwrap_or_default();
            let row = sqlx::query_as::<_, DriveRow>(&sql)
                .bind(RecordId::new().as_uuid())
                .bind(&d.title)
                .bind(&d.location)
                .bind(&d.description)
                .bind(d.status.as_str())
                .bind(&d.dtype)
                .bind(d.start_date)
                .bind(d.end_date)
                .bind(&d.time_interval)
                .bind(latitude)
                .bind(longitude)
                .bind(&d.place_link)
                .bind(&d.photos)
                .bind(d.created_at)
                .fetch_one(&mut *db_tx)
                .await?;
            created.push(Drive::try_from(row)?);
        }
        db_tx.commit().await?;
        Ok(created)
    }
}

#[async_trait]
impl DriveRepository for PostgresStore {
    async fn list_drives(&self, filter: &DriveFilter) -> Result<Vec<Drive>, AdminError> {
        let mut qb = QueryBuilder::new(format!("SELECT {DRIVE_COLUMNS} FROM drives WHERE TRUE"));
        if let Some(search) = &filter.search {
            let pattern = format!("%{search}%");
            qb.push(" AND (title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR location ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR dtype ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(dtype) = &filter.dtype {
            qb.push(" AND dtype = ").push_bind(dtype.clone());
        }
        if let Some(location) = &filter.location {
            qb.push(" AND location = ").push_bind(location.clone());
        }
        push_date_bounds(&mut qb, "created_at::date", filter.created_between);
        qb.push(" ORDER BY created_at DESC");
        let rows = qb.build_query_as::<DriveRow>().fetch_all(&self.pool).await?;
        collect(rows)
    }

    async fn get_drive(&self, id: RecordId) -> Result<Option<Drive>, AdminError> {
        let row = sqlx::query_as::<_, DriveRow>(&format!(
            "SELECT {DRIVE_COLUMNS} FROM drives WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Drive::try_from).transpose()
    }

    async fn save_drive(&self, drive: &Drive) -> Result<(), AdminError> {
        let (latitude, longitude) = drive
            .geo_location
            .as_ref()
            .map(|g| (Some(g.latitude.as_str()), Some(g.longitude.as_str())))
            .unwrap_or_default();
        let result = sqlx::query(
            "UPDATE drives SET title = $2, location = $3, description = $4, status = $5, \
             dtype = $6, start_date = $7, end_date = $8, time_interval = $9, latitude = $10, \
             longitude = $11, place_link = $12, photos = $13 WHERE id = $1",
        )
        .bind(drive.id.as_uuid())
        .bind(&drive.title)
        .bind(&drive.location)
        .bind(&drive.description)
        .bind(drive.status.as_str())
        .bind(&drive.dtype)
        .bind(drive.start_date)
        .bind(drive.end_date)
        .bind(&drive.time_interval)
        .bind(latitude)
        .bind(longitude)
        .bind(&drive.place_link)
        .bind(&drive.photos)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AdminError::not_found("drive", drive.id));
        }
        Ok(())
    }

    async fn delete_drive(&self, id: RecordId) -> Result<bool, AdminError> {
        let result = sqlx::query("DELETE FROM drives WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl CreateMany<NewExpenditure, Expenditure> for PostgresStore {
    async fn create_many(
        &self,
        records: Vec<NewExpenditure>,
    ) -> Result<Vec<Expenditure>, AdminError> {
        let sql = format!(
            "INSERT INTO expenditures ({EXPENDITURE_COLUMNS}) VALUES \
             ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {EXPENDITURE_COLUMNS}"
        );
        let mut db_tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(records.len());
        for e in records {
            let row = sqlx::query_as::<_, ExpenditureRow>(&sql)
                .bind(RecordId::new().as_uuid())
                .bind(e.amount)
                .bind(e.date)
                .bind(&e.description)
                .bind(e.category.as_str())
                .bind(&e.custom_category)
                .bind(&e.entry_by)
                .bind(&e.user_id)
                .bind(e.created_at)
                .fetch_one(&mut *db_tx)
                .await?;
            created.push(Expenditure::try_from(row)?);
        }
        db_tx.commit().await?;
        Ok(created)
    }
}

#[async_trait]
impl ExpenditureRepository for PostgresStore {
    async fn list_expenditures(
        &self,
        filter: &ExpenditureFilter,
    ) -> Result<Vec<Expenditure>, AdminError> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT {EXPENDITURE_COLUMNS} FROM expenditures WHERE TRUE"
        ));
        if let Some(category) = filter.category {
            qb.push(" AND category = ").push_bind(category.as_str());
        }
        if let Some(start) = filter.start_date {
            qb.push(" AND date >= ").push_bind(start);
        }
        if let Some(end) = filter.end_date {
            qb.push(" AND date <= ").push_bind(end);
        }
        if let Some(user_id) = &filter.user_id {
            qb.push(" AND user_id = ").push_bind(user_id.clone());
        }
        qb.push(" ORDER BY date DESC, created_at DESC");
        let rows = qb
            .build_query_as::<ExpenditureRow>()
            .fetch_all(&self.pool)
            .await?;
        collect(rows)
    }

    async fn get_expenditure(&self, id: RecordId) -> Result<Option<Expenditure>, AdminError> {
        let row = sqlx::query_as::<_, ExpenditureRow>(&format!(
            "SELECT {EXPENDITURE_COLUMNS} FROM expenditures WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Expenditure::try_from).transpose()
    }

    async fn save_expenditure(&self, exp: &Expenditure) -> Result<(), AdminError> {
        let result = sqlx::query(
            "UPDATE expenditures SET amount = $2, date = $3, description = $4, category = $5, \
             custom_category = $6, user_id = $7 WHERE id = $1",
        )
        .bind(exp.id.as_uuid())
        .bind(exp.amount)
        .bind(exp.date)
        .bind(&exp.description)
        .bind(exp.category.as_str())
        .bind(&exp.custom_category)
        .bind(&exp.user_id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AdminError::not_found("expenditure", exp.id));
        }
        Ok(())
    }

    async fn delete_expenditure(&self, id: RecordId) -> Result<bool, AdminError> {
        let result = sqlx::query("DELETE FROM expenditures WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl CreateMany<NewCertificate, Certificate> for PostgresStore {
    async fn create_many(
        &self,
        records: Vec<NewCertificate>,
    ) -> Result<Vec<Certificate>, AdminError> {
        let mut db_tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(records.len());
        for c in records {
            let row = sqlx::query_as::<_, CertificateRow>(
                "INSERT INTO certificates (id, donation_id, email, certificate_type, fullname, \
                 mobile, description, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
                 RETURNING id, donation_id, email, certificate_type, fullname, mobile, \
                 description, created_at",
            )
            .bind(RecordId::new().as_uuid())
            .bind(&c.donation_id)
            .bind(&c.email)
            .bind(&c.certificate_type)
            .bind(&c.fullname)
            .bind(&c.mobile)
            .bind(&c.description)
            .bind(c.created_at)
            .fetch_one(&mut *db_tx)
            .await?;
            created.push(Certificate::from(row));
        }
        db_tx.commit().await?;
        Ok(created)
    }
}

#[async_trait]
impl CreateMany<NewDonationRequest, DonationRequest> for PostgresStore {
    async fn create_many(
        &self,
        records: Vec<NewDonationRequest>,
    ) -> Result<Vec<DonationRequest>, AdminError> {
        let mut db_tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(records.len());
        for r in records {
            let row = sqlx::query_as::<_, DonationRequestRow>(
                "INSERT INTO donation_requests (id, fullname, mobile, email, address, \
                 donation_type, quantity, status, created_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
                 RETURNING id, fullname, mobile, email, address, donation_type, quantity, \
                 status, created_at",
            )
            .bind(RecordId::new().as_uuid())
            .bind(&r.fullname)
            .bind(&r.mobile)
            .bind(&r.email)
            .bind(&r.address)
            .bind(&r.donation_type)
            .bind(&r.quantity)
            .bind(&r.status)
            .bind(r.created_at)
            .fetch_one(&mut *db_tx)
            .await?;
            created.push(DonationRequest::from(row));
        }
        db_tx.commit().await?;
        Ok(created)
    }
}

fn push_directory_filter(
    qb: &mut QueryBuilder<'_, Postgres>,
    filter: &DirectoryFilter,
    third_column: &str,
) {
    if let Some(search) = &filter.search {
        let pattern = format!("%{search}%");
        qb.push(" AND (fullname ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR email ILIKE ")
            .push_bind(pattern.clone())
            .push(format!(" OR {third_column} ILIKE "))
            .push_bind(pattern)
            .push(")");
    }
    push_date_bounds(qb, "created_at::date", filter.created_between);
}

fn order_clause(newest_first: bool) -> &'static str {
    if newest_first {
        " ORDER BY created_at DESC"
    } else {
        " ORDER BY created_at ASC"
    }
}

#[async_trait]
impl DirectoryRepository for PostgresStore {
    async fn list_donation_requests(
        &self,
        filter: &DirectoryFilter,
        newest_first: bool,
    ) -> Result<Vec<DonationRequest>, AdminError> {
        let mut qb = QueryBuilder::new(
            "SELECT id, fullname, mobile, email, address, donation_type, quantity, status, \
             created_at FROM donation_requests WHERE TRUE",
        );
        push_directory_filter(&mut qb, filter, "donation_type");
        if let Some(status) = &filter.status {
            qb.push(" AND status = ").push_bind(status.clone());
        }
        if let Some(kind) = &filter.donation_type {
            qb.push(" AND donation_type = ").push_bind(kind.clone());
        }
        qb.push(order_clause(newest_first));
        let rows = qb
            .build_query_as::<DonationRequestRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(DonationRequest::from).collect())
    }

    async fn list_users(
        &self,
        filter: &DirectoryFilter,
        newest_first: bool,
    ) -> Result<Vec<UserSummary>, AdminError> {
        let mut qb = QueryBuilder::new(
            "SELECT id, fullname, email, address, mobile, created_at FROM users WHERE TRUE",
        );
        push_directory_filter(&mut qb, filter, "COALESCE(mobile, '')");
        qb.push(order_clause(newest_first));
        let rows = qb.build_query_as::<UserRow>().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(UserSummary::from).collect())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        let Some(date) = NaiveDate::from_ymd_opt(y, m, d) else {
            panic!("valid date");
        };
        date
    }

    #[test]
    fn end_only_range_binds_a_single_upper_bound() {
        let filter = TransactionFilter {
            date_range: DateRange {
                from: None,
                to: Some(day(2025, 1, 31)),
            },
            ..TransactionFilter::default()
        };
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM transactions");
        push_transaction_filter(&mut qb, &filter);
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM transactions WHERE TRUE AND date <= $1"
        );
    }

    #[test]
    fn start_only_range_binds_a_single_lower_bound() {
        let filter = DirectoryFilter {
            created_between: DateRange {
                from: Some(day(2025, 1, 1)),
                to: None,
            },
            ..DirectoryFilter::default()
        };
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM users WHERE TRUE");
        push_directory_filter(&mut qb, &filter, "mobile");
        assert_eq!(
            qb.sql(),
            "SELECT * FROM users WHERE TRUE AND created_at::date >= $1"
        );
    }

    #[test]
    fn unbounded_range_adds_no_clause() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM transactions");
        push_transaction_filter(&mut qb, &TransactionFilter::default());
        assert_eq!(qb.sql(), "SELECT * FROM transactions WHERE TRUE");
    }
}
