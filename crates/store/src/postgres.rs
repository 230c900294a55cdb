use async_trait::async_trait;
use indexer_common::model::{BlockTimestamp, Heights, Pair, PoolType, Token};
use sqlx::{postgres::PgPoolOptions, PgPool, QueryBuilder, Row};

use crate::error::StoreError;
use crate::filter::{PairFilter, PairSortBy, QueryOptions, SortOrder, TokenFilter, TokenSortBy};
use crate::store::Store;

const BLOCK_TIMESTAMP_CHUNK: usize = 10_000;
const TOKEN_CHUNK: usize = 10_000;
const PAIR_CHUNK: usize = 100_000;
/// `GetBlockAtTimestamp` restricts its scan to a ±20s window for efficiency.
const NEAREST_BLOCK_WINDOW_SECS: i64 = 20;

/// `sqlx`-backed reference implementation of [`Store`], one instance per
/// chain (each chain owns its own database — spec.md §4.3.1).
pub struct PostgresStore {
    chain_id: u64,
    pool: PgPool,
}

impl PostgresStore {
    pub async fn connect(chain_id: u64, database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        Ok(Self { chain_id, pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn pool_type_sql(pt: PoolType) -> i16 {
    pt.as_i16()
}

fn pool_type_from_sql(v: i16) -> PoolType {
    if v == PoolType::V3.as_i16() {
        PoolType::V3
    } else {
        PoolType::V2
    }
}

#[async_trait]
impl Store for PostgresStore {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn init(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    async fn ready(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn heights(&self) -> Result<Heights, StoreError> {
        let blocks: Option<i64> =
            sqlx::query_scalar("SELECT MAX(block) FROM block_timestamps")
                .fetch_one(&self.pool)
                .await?;
        let tokens: Option<i64> = sqlx::query_scalar("SELECT MAX(created_at) FROM tokens")
            .fetch_one(&self.pool)
            .await?;
        let pairs: Option<i64> = sqlx::query_scalar("SELECT MAX(created_at) FROM pairs")
            .fetch_one(&self.pool)
            .await?;
        Ok(Heights {
            blocks: blocks.unwrap_or(0) as u64,
            tokens: tokens.unwrap_or(0) as u64,
            pairs: pairs.unwrap_or(0) as u64,
        })
    }

    async fn get_block_at_timestamp(&self, timestamp: u64) -> Result<BlockTimestamp, StoreError> {
        let lo = timestamp as i64 - NEAREST_BLOCK_WINDOW_SECS;
        let hi = timestamp as i64 + NEAREST_BLOCK_WINDOW_SECS;
        let row = sqlx::query(
            r#"
            SELECT block, timestamp FROM block_timestamps
            WHERE timestamp BETWEEN $1 AND $2
            ORDER BY ABS(timestamp - $3) ASC
            LIMIT 1
            "#,
        )
        .bind(lo)
        .bind(hi)
        .bind(timestamp as i64)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(BlockTimestamp {
                block: row.try_get::<i64, _>("block")? as u64,
                timestamp: row.try_get::<i64, _>("timestamp")? as u64,
            }),
            None => Err(StoreError::NotFound),
        }
    }

    async fn get_block_timestamps(
        &self,
        from: u64,
        to: u64,
    ) -> Result<Vec<BlockTimestamp>, StoreError> {
        let rows = sqlx::query(
            "SELECT block, timestamp FROM block_timestamps WHERE block BETWEEN $1 AND $2 ORDER BY block ASC",
        )
        .bind(from as i64)
        .bind(to as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| BlockTimestamp {
                block: row.get::<i64, _>("block") as u64,
                timestamp: row.get::<i64, _>("timestamp") as u64,
            })
            .collect())
    }

    async fn insert_block_timestamp(&self, row: BlockTimestamp) -> Result<(), StoreError> {
        self.bulk_insert_block_timestamp(std::slice::from_ref(&row))
            .await
    }

    async fn bulk_insert_block_timestamp(
        &self,
        rows: &[BlockTimestamp],
    ) -> Result<(), StoreError> {
        for chunk in rows.chunks(BLOCK_TIMESTAMP_CHUNK) {
            if chunk.is_empty() {
                continue;
            }
            let mut qb: QueryBuilder<sqlx::Postgres> =
                QueryBuilder::new("INSERT INTO block_timestamps (block, timestamp) ");
            qb.push_values(chunk, |mut b, row| {
                b.push_bind(row.block as i64).push_bind(row.timestamp as i64);
            });
            qb.push(" ON CONFLICT (block) DO NOTHING");
            qb.build().execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn find_tokens(
        &self,
        filter: &TokenFilter,
        options: QueryOptions<TokenSortBy>,
    ) -> Result<Vec<Token>, StoreError> {
        let mut qb: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
            "SELECT address, name, symbol, decimals, creator, creation_hash, created_at FROM tokens WHERE 1=1",
        );
        push_string_predicate(&mut qb, "address", &filter.address, filter.fuzzy);
        push_string_predicate(&mut qb, "creator", &filter.creator, filter.fuzzy);
        push_string_predicate(&mut qb, "name", &filter.name, filter.fuzzy);
        push_string_predicate(&mut qb, "symbol", &filter.symbol, filter.fuzzy);
        if let Some(decimals) = filter.decimals {
            qb.push(" AND decimals = ").push_bind(decimals as i16);
        }

        qb.push(" ORDER BY ")
            .push(options.sort_by.as_column())
            .push(" ")
            .push(options.sort_order.as_sql());
        qb.push(" LIMIT ").push_bind(options.limit as i64);
        qb.push(" OFFSET ").push_bind(options.offset as i64);

        let rows = qb.build().fetch_all(&self.pool).await?;
        Ok(rows
            .into_iter()
            .map(|row| Token {
                chain_id: self.chain_id,
                address: row.get("address"),
                name: row.get("name"),
                symbol: row.get("symbol"),
                decimals: row.get::<i16, _>("decimals") as u8,
                creator: row.get("creator"),
                creation_hash: row.get("creation_hash"),
                created_at: row.get::<i64, _>("created_at") as u64,
            })
            .collect())
    }

    async fn get_token_count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tokens")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn insert_token_info(&self, token: Token) -> Result<(), StoreError> {
        self.bulk_insert_token_info(std::slice::from_ref(&token))
            .await
    }

    async fn bulk_insert_token_info(&self, tokens: &[Token]) -> Result<(), StoreError> {
        for chunk in tokens.chunks(TOKEN_CHUNK) {
            if chunk.is_empty() {
                continue;
            }
            let mut qb: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
                "INSERT INTO tokens (address, name, symbol, decimals, creator, creation_hash, created_at) ",
            );
            qb.push_values(chunk, |mut b, token| {
                let token = token.clone().lowercased();
                b.push_bind(token.address)
                    .push_bind(token.name)
                    .push_bind(token.symbol)
                    .push_bind(token.decimals as i16)
                    .push_bind(token.creator)
                    .push_bind(token.creation_hash)
                    .push_bind(token.created_at as i64);
            });
            qb.push(" ON CONFLICT (address) DO NOTHING");
            qb.build().execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn find_pairs(
        &self,
        filter: &PairFilter,
        options: QueryOptions<PairSortBy>,
    ) -> Result<Vec<Pair>, StoreError> {
        let mut qb: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
            "SELECT hash, token0_address, token1_address, pool_address, fee, tick_spacing, pool_type, created_at FROM pairs WHERE 1=1",
        );
        push_string_predicate(&mut qb, "token0_address", &filter.token0_address, filter.fuzzy);
        push_string_predicate(&mut qb, "token1_address", &filter.token1_address, filter.fuzzy);
        push_string_predicate(&mut qb, "pool_address", &filter.pool_address, filter.fuzzy);
        push_string_predicate(&mut qb, "hash", &filter.hash, filter.fuzzy);
        if let Some(pool_type) = filter.pool_type {
            qb.push(" AND pool_type = ").push_bind(pool_type_sql(pool_type));
        }

        qb.push(" ORDER BY ")
            .push(options.sort_by.as_column())
            .push(" ")
            .push(options.sort_order.as_sql());
        qb.push(" LIMIT ").push_bind(options.limit as i64);
        qb.push(" OFFSET ").push_bind(options.offset as i64);

        let rows = qb.build().fetch_all(&self.pool).await?;
        Ok(rows
            .into_iter()
            .map(|row| Pair {
                chain_id: self.chain_id,
                hash: row.get("hash"),
                token0_address: row.get("token0_address"),
                token1_address: row.get("token1_address"),
                pool_address: row.get("pool_address"),
                fee: row.get("fee"),
                tick_spacing: row.get("tick_spacing"),
                pool_type: pool_type_from_sql(row.get::<i16, _>("pool_type")),
                created_at: row.get::<i64, _>("created_at") as u64,
            })
            .collect())
    }

    async fn get_pair_count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pairs")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn insert_pair_info(&self, pair: Pair) -> Result<(), StoreError> {
        self.bulk_insert_pair_info(std::slice::from_ref(&pair)).await
    }

    async fn bulk_insert_pair_info(&self, pairs: &[Pair]) -> Result<(), StoreError> {
        for chunk in pairs.chunks(PAIR_CHUNK) {
            if chunk.is_empty() {
                continue;
            }
            let mut qb: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
                "INSERT INTO pairs (hash, token0_address, token1_address, pool_address, fee, tick_spacing, pool_type, created_at) ",
            );
            qb.push_values(chunk, |mut b, pair| {
                let pair = pair.clone().lowercased();
                b.push_bind(pair.hash)
                    .push_bind(pair.token0_address)
                    .push_bind(pair.token1_address)
                    .push_bind(pair.pool_address)
                    .push_bind(pair.fee)
                    .push_bind(pair.tick_spacing)
                    .push_bind(pool_type_sql(pair.pool_type))
                    .push_bind(pair.created_at as i64);
            });
            // Untargeted: a pair's identity is its creation hash, but
            // `pool_address` is independently unique (spec.md §4.3), so
            // either constraint being hit is a legitimate no-op replay.
            qb.push(" ON CONFLICT DO NOTHING");
            qb.build().execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn unique_addresses_from_pairs(&self) -> Result<Vec<String>, StoreError> {
        let rows: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT addr FROM (
                SELECT LOWER(token0_address) AS addr FROM pairs
                UNION
                SELECT LOWER(token1_address) AS addr FROM pairs
            ) t",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn unique_addresses_from_tokens(&self) -> Result<Vec<String>, StoreError> {
        let rows: Vec<String> = sqlx::query_scalar("SELECT DISTINCT LOWER(address) FROM tokens")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn pairs_without_token_info(&self) -> Result<Vec<String>, StoreError> {
        let rows: Vec<String> = sqlx::query_scalar(
            "SELECT addr FROM (
                SELECT LOWER(token0_address) AS addr FROM pairs
                UNION
                SELECT LOWER(token1_address) AS addr FROM pairs
            ) t
            EXCEPT
            SELECT LOWER(address) FROM tokens",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

fn push_string_predicate(
    qb: &mut QueryBuilder<sqlx::Postgres>,
    column: &str,
    value: &Option<String>,
    fuzzy: bool,
) {
    if let Some(v) = value {
        if fuzzy {
            qb.push(format!(" AND {column} ILIKE "))
                .push_bind(format!("%{v}%"));
        } else {
            qb.push(format!(" AND {column} = ")).push_bind(v.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_type_round_trips_through_sql_repr() {
        assert_eq!(pool_type_from_sql(pool_type_sql(PoolType::V2)), PoolType::V2);
        assert_eq!(pool_type_from_sql(pool_type_sql(PoolType::V3)), PoolType::V3);
    }
}
