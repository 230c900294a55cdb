use serde::Deserialize;

use indexer_store::{PairFilter, PairSortBy, QueryOptions, SortOrder, TokenFilter, TokenSortBy};

use crate::validate::{require_chain_id, Validate, ValidationError};

/// Default `limit` when the caller sends `0` or omits it (spec.md §6).
pub const DEFAULT_LIMIT: u32 = 1000;
pub const MAX_LIMIT: u32 = 10_000;
/// Widest accepted `[from_block, to_block]` span for a single request
/// (spec.md §6).
pub const MAX_BLOCK_RANGE: u64 = 10_000;

fn parse_sort_order(raw: Option<&str>) -> Result<SortOrder, ValidationError> {
    match raw {
        None => Ok(SortOrder::Asc),
        Some("asc") => Ok(SortOrder::Asc),
        Some("desc") => Ok(SortOrder::Desc),
        Some(other) => Err(ValidationError::new(format!(
            "sort_order must be one of [asc, desc], got {other:?}"
        ))),
    }
}

fn clamp_limit(limit: u32) -> Result<u32, ValidationError> {
    if limit > MAX_LIMIT {
        return Err(ValidationError::new(format!(
            "limit must be <= {MAX_LIMIT}, got {limit}"
        )));
    }
    if limit == 0 {
        Ok(DEFAULT_LIMIT)
    } else {
        Ok(limit)
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct EmptyParams {}

impl Validate for EmptyParams {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChainIdParams {
    pub chain_id: u64,
}

impl Validate for ChainIdParams {
    fn validate(&self) -> Result<(), ValidationError> {
        require_chain_id(self.chain_id)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetBlockTimestampsParams {
    pub chain_id: u64,
    pub from_block: u64,
    pub to_block: u64,
}

impl Validate for GetBlockTimestampsParams {
    fn validate(&self) -> Result<(), ValidationError> {
        require_chain_id(self.chain_id)?;
        if self.from_block > self.to_block {
            return Err(ValidationError::new("from_block must be <= to_block"));
        }
        if self.from_block == 0 && self.to_block == 0 {
            return Err(ValidationError::new("from_block and to_block cannot both be zero"));
        }
        if self.to_block - self.from_block > MAX_BLOCK_RANGE {
            return Err(ValidationError::new(format!(
                "range must not exceed {MAX_BLOCK_RANGE} blocks"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetBlockAtTimestampParams {
    pub chain_id: u64,
    pub timestamp: u64,
}

impl Validate for GetBlockAtTimestampParams {
    fn validate(&self) -> Result<(), ValidationError> {
        require_chain_id(self.chain_id)?;
        if self.timestamp == 0 {
            return Err(ValidationError::new("timestamp must be > 0"));
        }
        Ok(())
    }
}

/// Wire shape of the `filter` block shared by `findTokens`. Every field is
/// nullable; non-null fields contribute a conjunctive predicate.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenFilterWire {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub decimals: Option<u8>,
    #[serde(default)]
    pub fuzzy: bool,
}

impl From<TokenFilterWire> for TokenFilter {
    fn from(w: TokenFilterWire) -> Self {
        TokenFilter {
            address: w.address,
            creator: w.creator,
            name: w.name,
            symbol: w.symbol,
            decimals: w.decimals,
            fuzzy: w.fuzzy,
        }
    }
}

/// Wire shape of the `filter` block shared by `findPairs`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PairFilterWire {
    #[serde(default)]
    pub token0_address: Option<String>,
    #[serde(default)]
    pub token1_address: Option<String>,
    #[serde(default)]
    pub pool_address: Option<String>,
    #[serde(default)]
    pub hash: Option<String>,
    /// `2` or `3`; any other value is a validation error at `FindPairs`
    /// dispatch time since it isn't part of the store's `PoolType`.
    #[serde(default)]
    pub pool_type: Option<u8>,
    #[serde(default)]
    pub fuzzy: bool,
}

impl PairFilterWire {
    fn pool_type(&self) -> Result<Option<indexer_common::model::PoolType>, ValidationError> {
        match self.pool_type {
            None => Ok(None),
            Some(2) => Ok(Some(indexer_common::model::PoolType::V2)),
            Some(3) => Ok(Some(indexer_common::model::PoolType::V3)),
            Some(other) => Err(ValidationError::new(format!(
                "pool_type must be 2 or 3, got {other}"
            ))),
        }
    }
}

/// Wire shape of the `options` block shared by `findTokens`/`findPairs`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryOptionsWire {
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_order: Option<String>,
}

fn parse_token_sort_by(raw: Option<&str>) -> Result<TokenSortBy, ValidationError> {
    match raw {
        None => Ok(TokenSortBy::CreatedAt),
        Some("address") => Ok(TokenSortBy::Address),
        Some("creator") => Ok(TokenSortBy::Creator),
        Some("name") => Ok(TokenSortBy::Name),
        Some("symbol") => Ok(TokenSortBy::Symbol),
        Some("decimals") => Ok(TokenSortBy::Decimals),
        Some("created_at") => Ok(TokenSortBy::CreatedAt),
        Some(other) => Err(ValidationError::new(format!(
            "sort_by must be one of [address, creator, name, symbol, decimals, created_at] for tokens, got {other:?}"
        ))),
    }
}

fn parse_pair_sort_by(raw: Option<&str>) -> Result<PairSortBy, ValidationError> {
    match raw {
        None => Ok(PairSortBy::CreatedAt),
        Some("token0_address") => Ok(PairSortBy::Token0Address),
        Some("token1_address") => Ok(PairSortBy::Token1Address),
        Some("pool_address") => Ok(PairSortBy::PoolAddress),
        Some("fee") => Ok(PairSortBy::Fee),
        Some("tick_spacing") => Ok(PairSortBy::TickSpacing),
        Some("hash") => Ok(PairSortBy::Hash),
        Some("pool_type") => Ok(PairSortBy::PoolType),
        Some("created_at") => Ok(PairSortBy::CreatedAt),
        Some(other) => Err(ValidationError::new(format!(
            "sort_by must be one of [token0_address, token1_address, pool_address, fee, tick_spacing, hash, pool_type, created_at] for pairs, got {other:?}"
        ))),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FindTokensParams {
    pub chain_id: u64,
    #[serde(default)]
    pub filter: TokenFilterWire,
    #[serde(default)]
    pub options: QueryOptionsWire,
}

impl Validate for FindTokensParams {
    fn validate(&self) -> Result<(), ValidationError> {
        require_chain_id(self.chain_id)?;
        clamp_limit(self.options.limit)?;
        parse_token_sort_by(self.options.sort_by.as_deref())?;
        parse_sort_order(self.options.sort_order.as_deref())?;
        Ok(())
    }
}

impl FindTokensParams {
    pub fn store_options(&self) -> QueryOptions<TokenSortBy> {
        QueryOptions {
            offset: self.options.offset,
            limit: clamp_limit(self.options.limit).unwrap_or(DEFAULT_LIMIT),
            sort_by: parse_token_sort_by(self.options.sort_by.as_deref()).unwrap_or_default(),
            sort_order: parse_sort_order(self.options.sort_order.as_deref()).unwrap_or_default(),
        }
    }

    pub fn store_filter(&self) -> TokenFilter {
        self.filter.clone().into()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FindPairsParams {
    pub chain_id: u64,
    #[serde(default)]
    pub filter: PairFilterWire,
    #[serde(default)]
    pub options: QueryOptionsWire,
}

impl Validate for FindPairsParams {
    fn validate(&self) -> Result<(), ValidationError> {
        require_chain_id(self.chain_id)?;
        clamp_limit(self.options.limit)?;
        parse_pair_sort_by(self.options.sort_by.as_deref())?;
        parse_sort_order(self.options.sort_order.as_deref())?;
        self.filter.pool_type()?;
        Ok(())
    }
}

impl FindPairsParams {
    pub fn store_options(&self) -> QueryOptions<PairSortBy> {
        QueryOptions {
            offset: self.options.offset,
            limit: clamp_limit(self.options.limit).unwrap_or(DEFAULT_LIMIT),
            sort_by: parse_pair_sort_by(self.options.sort_by.as_deref()).unwrap_or_default(),
            sort_order: parse_sort_order(self.options.sort_order.as_deref()).unwrap_or_default(),
        }
    }

    pub fn store_filter(&self) -> Result<PairFilter, ValidationError> {
        Ok(PairFilter {
            token0_address: self.filter.token0_address.clone(),
            token1_address: self.filter.token1_address.clone(),
            pool_address: self.filter.pool_address.clone(),
            hash: self.filter.hash.clone(),
            pool_type: self.filter.pool_type()?,
            fuzzy: self.filter.fuzzy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_timestamps_range_exactly_10000_is_accepted() {
        let p = GetBlockTimestampsParams {
            chain_id: 1,
            from_block: 0,
            to_block: 10_000,
        };
        assert!(p.validate().is_ok());
    }

    #[test]
    fn block_timestamps_range_10001_is_rejected() {
        let p = GetBlockTimestampsParams {
            chain_id: 1,
            from_block: 0,
            to_block: 10_001,
        };
        let err = p.validate().unwrap_err();
        assert!(err.0.contains("10000"));
    }

    #[test]
    fn block_timestamps_from_equals_to_is_single_row_range() {
        let p = GetBlockTimestampsParams {
            chain_id: 1,
            from_block: 42,
            to_block: 42,
        };
        assert!(p.validate().is_ok());
    }

    #[test]
    fn chain_id_zero_is_rejected() {
        let p = ChainIdParams { chain_id: 0 };
        assert!(p.validate().is_err());
    }

    #[test]
    fn limit_zero_defaults_to_1000() {
        let p = FindTokensParams {
            chain_id: 1,
            filter: TokenFilterWire::default(),
            options: QueryOptionsWire::default(),
        };
        assert!(p.validate().is_ok());
        assert_eq!(p.store_options().limit, 1000);
    }

    #[test]
    fn limit_over_10000_is_rejected() {
        let p = FindTokensParams {
            chain_id: 1,
            filter: TokenFilterWire::default(),
            options: QueryOptionsWire {
                limit: 10_001,
                ..Default::default()
            },
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn unknown_sort_by_is_rejected() {
        let p = FindPairsParams {
            chain_id: 1,
            filter: PairFilterWire::default(),
            options: QueryOptionsWire {
                sort_by: Some("nonexistent".to_string()),
                ..Default::default()
            },
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn pool_type_outside_two_or_three_is_rejected() {
        let filter = PairFilterWire {
            pool_type: Some(4),
            ..Default::default()
        };
        assert!(filter.pool_type().is_err());
    }
}
