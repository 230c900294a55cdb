//! Filter/options types shared by `FindTokens`/`FindPairs`. Every field is
//! nullable; non-null fields contribute a conjunctive predicate. `fuzzy`
//! switches string fields from exact match to `ILIKE '%value%'`.

use indexer_common::model::PoolType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSortBy {
    Address,
    Creator,
    Name,
    Symbol,
    Decimals,
    CreatedAt,
}

impl TokenSortBy {
    pub fn as_column(self) -> &'static str {
        match self {
            TokenSortBy::Address => "address",
            TokenSortBy::Creator => "creator",
            TokenSortBy::Name => "name",
            TokenSortBy::Symbol => "symbol",
            TokenSortBy::Decimals => "decimals",
            TokenSortBy::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairSortBy {
    Token0Address,
    Token1Address,
    PoolAddress,
    Fee,
    TickSpacing,
    Hash,
    PoolType,
    CreatedAt,
}

impl PairSortBy {
    pub fn as_column(self) -> &'static str {
        match self {
            PairSortBy::Token0Address => "token0_address",
            PairSortBy::Token1Address => "token1_address",
            PairSortBy::PoolAddress => "pool_address",
            PairSortBy::Fee => "fee",
            PairSortBy::TickSpacing => "tick_spacing",
            PairSortBy::Hash => "hash",
            PairSortBy::PoolType => "pool_type",
            PairSortBy::CreatedAt => "created_at",
        }
    }
}

/// Pagination + sort. `limit == 0` is treated as 1000 by the caller before
/// reaching the store (spec.md §6's "0 treated as 1000" validation rule).
#[derive(Debug, Clone, Copy)]
pub struct QueryOptions<S> {
    pub offset: u32,
    pub limit: u32,
    pub sort_by: S,
    pub sort_order: SortOrder,
}

impl<S: Default> Default for QueryOptions<S> {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 1000,
            sort_by: S::default(),
            sort_order: SortOrder::default(),
        }
    }
}

impl Default for TokenSortBy {
    fn default() -> Self {
        TokenSortBy::CreatedAt
    }
}

impl Default for PairSortBy {
    fn default() -> Self {
        PairSortBy::CreatedAt
    }
}

#[derive(Debug, Clone, Default)]
pub struct TokenFilter {
    pub address: Option<String>,
    pub creator: Option<String>,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub decimals: Option<u8>,
    pub fuzzy: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PairFilter {
    pub token0_address: Option<String>,
    pub token1_address: Option<String>,
    pub pool_address: Option<String>,
    pub hash: Option<String>,
    pub pool_type: Option<PoolType>,
    pub fuzzy: bool,
}
