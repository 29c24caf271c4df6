use async_trait::async_trait;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend, FromQueryResult,
    Statement, TransactionTrait, Value,
};

use crate::error::{ProductError, ProductResult};
use crate::models::CreateProduct;
use crate::store::{ProductRow, ProductSelection, ProductStore, StoreTransaction};

const INSERT_PRODUCT: &str = r#"
    INSERT INTO products (user_id, name, description, price, qty)
    VALUES ($1, $2, $3, $4, $5)
    RETURNING id
"#;

const SELECT_COLUMNS: &str =
    "SELECT COUNT(*) OVER() AS total_data, id, user_id, name, description, price, qty FROM products";

const DECREMENT_QTY: &str = "UPDATE products SET qty = qty - $1 WHERE id = $2 AND qty >= $1";

#[derive(Debug, FromQueryResult)]
struct InsertedRow {
    id: String,
}

fn window_statement(limit: u64, offset: u64) -> Statement {
    Statement::from_sql_and_values(
        DbBackend::Postgres,
        format!("{SELECT_COLUMNS} ORDER BY created_at, id LIMIT $1 OFFSET $2"),
        [clamp_i64(limit).into(), clamp_i64(offset).into()],
    )
}

fn ids_statement(ids: &[String]) -> Statement {
    Statement::from_sql_and_values(
        DbBackend::Postgres,
        format!("{SELECT_COLUMNS} WHERE id = ANY($1)"),
        [Value::from(ids.to_vec())],
    )
}

fn clamp_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// PostgreSQL-backed product store
#[derive(Clone)]
pub struct PgProductStore {
    db: DatabaseConnection,
}

impl PgProductStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    type Tx = PgTransaction;

    async fn begin(&self) -> ProductResult<PgTransaction> {
        Ok(PgTransaction {
            tx: self.db.begin().await?,
        })
    }

    async fn select_products(&self, selection: &ProductSelection) -> ProductResult<Vec<ProductRow>> {
        let stmt = match selection {
            ProductSelection::Window { limit, offset } => window_statement(*limit, *offset),
            ProductSelection::Ids(ids) if ids.is_empty() => return Ok(Vec::new()),
            ProductSelection::Ids(ids) => ids_statement(ids),
        };

        Ok(ProductRow::find_by_statement(stmt).all(&self.db).await?)
    }

    async fn ping(&self) -> ProductResult<()> {
        database::postgres::check_health(&self.db)
            .await
            .map_err(|e| ProductError::Unavailable(e.to_string()))
    }
}

/// Rolls back on drop unless committed.
pub struct PgTransaction {
    tx: DatabaseTransaction,
}

#[async_trait]
impl StoreTransaction for PgTransaction {
    async fn insert_product(&mut self, input: &CreateProduct) -> ProductResult<String> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            INSERT_PRODUCT,
            [
                input.user_id.clone().into(),
                input.name.clone().into(),
                input.description.clone().into(),
                input.price.into(),
                input.qty.into(),
            ],
        );

        InsertedRow::find_by_statement(stmt)
            .one(&self.tx)
            .await?
            .map(|row| row.id)
            .ok_or_else(|| ProductError::Internal("INSERT returned no id".to_string()))
    }

    async fn decrement_quantity(&mut self, product_id: &str, delta: i32) -> ProductResult<u64> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            DECREMENT_QTY,
            [delta.into(), product_id.into()],
        );

        Ok(self.tx.execute_raw(stmt).await?.rows_affected())
    }

    async fn commit(self) -> ProductResult<()> {
        Ok(self.tx.commit().await?)
    }

    async fn rollback(self) -> ProductResult<()> {
        Ok(self.tx.rollback().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::collections::BTreeMap;

    #[test]
    fn test_window_statement_binds_limit_and_offset() {
        let stmt = window_statement(10, 20);
        assert!(stmt.sql.ends_with("ORDER BY created_at, id LIMIT $1 OFFSET $2"));
        assert!(stmt.sql.contains("COUNT(*) OVER() AS total_data"));
        assert_eq!(stmt.values.map(|v| v.0.len()), Some(2));
    }

    #[test]
    fn test_ids_statement_binds_a_single_array() {
        let ids: Vec<String> = (0..70_000).map(|i| format!("p{i}")).collect();
        let stmt = ids_statement(&ids);

        assert!(stmt.sql.ends_with("WHERE id = ANY($1)"));
        let values = stmt.values.unwrap().0;
        assert_eq!(values.len(), 1);
        assert!(matches!(&values[0], Value::Array(_, Some(items)) if items.len() == 70_000));
    }

    #[tokio::test]
    async fn test_decrement_reports_rows_affected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();
        let store = PgProductStore::new(db);

        let mut tx = store.begin().await.unwrap();
        assert_eq!(tx.decrement_quantity("p1", 2).await.unwrap(), 1);
        assert_eq!(tx.decrement_quantity("p2", 9).await.unwrap(), 0);
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_insert_returns_generated_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![BTreeMap::from([(
                "id",
                Value::from("0f9c5e0e-8a4b-4f8e-9d55-3f1d2f0c7a11"),
            )])]])
            .into_connection();
        let store = PgProductStore::new(db);

        let mut tx = store.begin().await.unwrap();
        let id = tx
            .insert_product(&CreateProduct {
                user_id: "u1".to_string(),
                name: "Widget".to_string(),
                description: String::new(),
                price: 3.0,
                qty: 5,
            })
            .await
            .unwrap();
        tx.commit().await.unwrap();

        assert_eq!(id, "0f9c5e0e-8a4b-4f8e-9d55-3f1d2f0c7a11");
    }
}
