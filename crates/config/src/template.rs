/// Written to disk the first time `Config::load` is pointed at a path that
/// doesn't exist yet, mirroring the original's write-default-then-reread
/// behavior (`config/config.go`'s `defaultConfig`).
pub const DEFAULT_CONFIG_TOML: &str = r#"
[[chains]]
chainID = 1
name = "ethereum"
shortName = "eth"
explorerURL = "https://etherscan.io"
routerV2Address = "0x0000000000000000000000000000000000000000"
factoryV2Address = "0x0000000000000000000000000000000000000000"
routerV3Address = "0x0000000000000000000000000000000000000000"
factoryV3Address = "0x0000000000000000000000000000000000000000"
rpcURL = "http://127.0.0.1:8545"
blockDuration = 12

[api]
host = "0.0.0.0"
port = 8080
authProvider = "noauth"
authKeyType = "hex64"
authDefaultExpirary = 0
authMasterKey = ""
rateLimitStrategy = "none"
rateLimitRequests = 500

[sync.pairs]
batchConcurrency = 2
batchSize = 100
blockRange = 200

[sync.tokens]
batchConcurrency = 2
batchSize = 100

[sync.blockTimestamps]
batchConcurrency = 2
batchSize = 100

[storage.postgres]
user = "postgres"
password = "postgres"
host = "localhost"
port = "5432"
sslmode = "disable"
name = "indexer"
"#;
