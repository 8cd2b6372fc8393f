//! Account constants.

/// ERC-7579 `accountId()` value: `vendorname.accountname.semver`.
pub const ACCOUNT_ID: &str = "modular.stylus-account.0.0.1";

/// Gas forwarded to each module registry query.
pub const REGISTRY_QUERY_GAS: u64 = 50_000;
