//! Canonical test configuration.
//!
//! Single source of truth for the TOML used by config, bootstrap and CLI
//! tests. It has no `[workflow]` section so tests can append one.

/// Goerli config with a backend, a separate stake token and three levels.
pub const CONFIG_TOML: &str = r#"
[logging]
level = "warn"
format = "pretty"

[network]
chain_id = 5
rpc_url = "http://localhost:8545"

[wallet]
account = "0x1111111111111111111111111111111111111111"

[token]
address = "0x7070707070707070707070707070707070707070"
symbol = "GRO"
name = "Grove Token"
decimals = 18

[stake_token]
address = "0x5151515151515151515151515151515151515151"
symbol = "sGRO"
name = "Staked Grove"
decimals = 18

[staking]
contract = "0x5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a"

[backend]
api_url = "https://api.example.com/api"
community_id = 7

[etherscan]
api_key = "TESTKEY"

[[levels]]
id = 1
name = "Guest"

[[levels]]
id = 2
name = "Holder"
type = "hold"
amount = "10"

[[levels]]
id = 3
name = "Staker"
description = "30 day lock"
type = "stake"
amount = "250"
timelock_ms = 2592000000
"#;
