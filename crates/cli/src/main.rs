use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};

use indexer_api_server::ApiServer;
use indexer_auth::{AuthBackend, Authenticator, InMemoryAuth, KeyType, NoAuth, SqlAuth};
use indexer_chain_client::ChainClient;
use indexer_common::ChainDescriptor;
use indexer_config::{AuthKeyType, AuthProviderKind, Config, RateLimitStrategyKind};
use indexer_ratelimit::{RateLimitStrategy, RateLimiter};
use indexer_store::{PostgresStore, Store, StoreRegistry};
use indexer_sync::{Factories, SyncConfig, SyncController};

/// Default pass interval for the archive-sync loop; not itself part of
/// `[sync.*]` since it governs scheduling, not batch shape (spec.md §4.5's
/// "the next pass reconciles" left this to the driver).
const SYNC_INTERVAL: Duration = Duration::from_secs(15);

#[derive(Parser)]
#[command(name = "indexer", about = "multi-chain EVM on-chain data indexer")]
struct Cli {
    #[arg(long, env = "INDEXER_CONFIG", default_value = "indexer.toml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the sync loop for every configured chain and serve the JSON-RPC API.
    Serve,
    /// Bulk-load cold-start CSV fixtures into one chain's store, then exit.
    Bootstrap {
        #[arg(long)]
        chain_id: u64,
        #[arg(long)]
        pairs_csv: Option<PathBuf>,
        #[arg(long)]
        tokens_csv: Option<PathBuf>,
        #[arg(long)]
        block_timestamps_csv: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Bootstrap {
            chain_id,
            pairs_csv,
            tokens_csv,
            block_timestamps_csv,
        } => bootstrap(config, chain_id, pairs_csv, tokens_csv, block_timestamps_csv).await,
    }
}

fn chain_database_url(config: &Config, descriptor: &ChainDescriptor) -> String {
    config
        .storage
        .postgres
        .connection_url(&descriptor.normalized_short_name())
}

async fn build_store_registry(config: &Config) -> anyhow::Result<Arc<StoreRegistry>> {
    let registry = Arc::new(StoreRegistry::new());
    for chain in &config.chains {
        let descriptor = ChainDescriptor::from(chain);
        let url = chain_database_url(config, &descriptor);
        let store = PostgresStore::connect(chain.chain_id, &url)
            .await
            .with_context(|| format!("connecting store for chain {}", chain.chain_id))?;
        store
            .init()
            .await
            .with_context(|| format!("migrating store for chain {}", chain.chain_id))?;
        registry.register(Arc::new(store));
    }
    Ok(registry)
}

fn to_auth_key_type(kind: AuthKeyType) -> KeyType {
    match kind {
        AuthKeyType::Uuid => KeyType::Uuid,
        AuthKeyType::Hex16 => KeyType::Hex16,
        AuthKeyType::Hex32 => KeyType::Hex32,
        AuthKeyType::Hex64 => KeyType::Hex64,
        AuthKeyType::Hex128 => KeyType::Hex128,
        AuthKeyType::Hex256 => KeyType::Hex256,
    }
}

fn to_rate_limit_strategy(kind: RateLimitStrategyKind) -> RateLimitStrategy {
    match kind {
        RateLimitStrategyKind::Ip => RateLimitStrategy::Ip,
        RateLimitStrategyKind::Key => RateLimitStrategy::Key,
        RateLimitStrategyKind::None => RateLimitStrategy::None,
    }
}

async fn build_authenticator(config: &Config) -> anyhow::Result<Arc<Authenticator>> {
    let key_type = to_auth_key_type(config.api.auth_key_type);
    let master_key = (!config.api.auth_master_key.is_empty()).then(|| config.api.auth_master_key.clone());

    let backend: Arc<dyn AuthBackend> = match config.api.auth_provider {
        AuthProviderKind::Memory => Arc::new(InMemoryAuth::new(key_type)),
        AuthProviderKind::Noauth => Arc::new(NoAuth),
        AuthProviderKind::Sql => {
            let url = config.storage.postgres.connection_url(&config.storage.postgres.name);
            Arc::new(
                SqlAuth::connect(&url, key_type)
                    .await
                    .context("connecting auth database")?,
            )
        }
    };

    Ok(Arc::new(Authenticator::new(master_key, backend)))
}

fn build_rate_limiter(config: &Config) -> (Option<Arc<RateLimiter>>, RateLimitStrategy) {
    let strategy = to_rate_limit_strategy(config.api.rate_limit_strategy);
    if matches!(strategy, RateLimitStrategy::None) {
        return (None, strategy);
    }
    let limiter = Arc::new(RateLimiter::new(
        config.api.rate_limit_requests,
        indexer_ratelimit::DEFAULT_LIFETIME_SECS,
    ));
    (Some(limiter), strategy)
}

/// Drives one chain's `SyncController` on a fixed interval until the
/// process exits (spec.md §4.5's reconcile-next-pass idempotence makes an
/// unbounded loop safe even across transient failures).
async fn drive_sync_loop(chain_id: u64, controller: SyncController) {
    let mut ticker = tokio::time::interval(SYNC_INTERVAL);
    loop {
        ticker.tick().await;
        match controller.archive_sync().await {
            Ok(report) => tracing::info!(
                chain_id,
                tip = report.tip,
                blocks_before = report.heights_before.blocks,
                tokens_before = report.heights_before.tokens,
                pairs_before = report.heights_before.pairs,
                block_timestamps_inserted = report.block_timestamps_inserted,
                pairs_inserted = report.pairs_inserted,
                tokens_inserted = report.tokens_inserted,
                "archive sync pass complete"
            ),
            Err(e) => tracing::warn!(chain_id, error = %e, "archive sync pass failed, will retry next interval"),
        }
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let store_registry = build_store_registry(&config).await?;
    let authenticator = build_authenticator(&config).await?;
    let (rate_limiter, rate_limit_strategy) = build_rate_limiter(&config);
    let chains: Vec<ChainDescriptor> = config.chains.iter().map(ChainDescriptor::from).collect();

    let sync_config = SyncConfig {
        block_timestamps_batch_size: config.sync.block_timestamps.batch_size as u64,
        block_timestamps_concurrency: config.sync.block_timestamps.batch_concurrency,
        pairs_block_range: config.sync.pairs.effective_block_range(),
        pairs_concurrency: config.sync.pairs.batch_concurrency,
        tokens_concurrency: config.sync.tokens.batch_concurrency,
    };

    for chain in &config.chains {
        let store = store_registry
            .get(chain.chain_id)
            .expect("just registered above");
        let client = ChainClient::new(&chain.rpc_url)
            .with_context(|| format!("building chain client for chain {}", chain.chain_id))?;
        let factories = Factories {
            v2: (!chain.factory_v2_address.is_empty()).then(|| chain.factory_v2_address.clone()),
            v3: (!chain.factory_v3_address.is_empty()).then(|| chain.factory_v3_address.clone()),
        };
        let controller = SyncController::new(client, store, factories, sync_config);
        tokio::spawn(drive_sync_loop(chain.chain_id, controller));
    }

    let addr: SocketAddr = format!("{}:{}", config.api.host, config.api.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.api.host, config.api.port))?;

    ApiServer::new(addr, store_registry, authenticator, rate_limiter, rate_limit_strategy, chains)
        .serve()
        .await
        .context("api server exited")
}

async fn bootstrap(
    config: Config,
    chain_id: u64,
    pairs_csv: Option<PathBuf>,
    tokens_csv: Option<PathBuf>,
    block_timestamps_csv: Option<PathBuf>,
) -> anyhow::Result<()> {
    let chain = config
        .chains
        .iter()
        .find(|c| c.chain_id == chain_id)
        .with_context(|| format!("chain {chain_id} not present in config"))?;
    let descriptor = ChainDescriptor::from(chain);
    let url = chain_database_url(&config, &descriptor);
    let store = PostgresStore::connect(chain_id, &url).await.context("connecting store")?;
    store.init().await.context("migrating store")?;

    if let Some(path) = block_timestamps_csv {
        let rows = indexer_bootstrap::block_timestamps_from_csv(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        store.bulk_insert_block_timestamp(&rows).await.context("inserting block timestamps")?;
        tracing::info!(count = rows.len(), "bootstrapped block timestamps");
    }

    if let Some(path) = tokens_csv {
        let mut rows = indexer_bootstrap::tokens_from_csv(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        for row in &mut rows {
            row.chain_id = chain_id;
        }
        store.bulk_insert_token_info(&rows).await.context("inserting tokens")?;
        tracing::info!(count = rows.len(), "bootstrapped tokens");
    }

    if let Some(path) = pairs_csv {
        let mut rows = indexer_bootstrap::pairs_from_csv(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        for row in &mut rows {
            row.chain_id = chain_id;
        }
        store.bulk_insert_pair_info(&rows).await.context("inserting pairs")?;
        tracing::info!(count = rows.len(), "bootstrapped pairs");
    }

    Ok(())
}
