//! Solidity ABI of the module registry the account consults.

use alloy_sol_types::sol;

sol! {
    interface IModuleRegistry {
        function isValidatorEnabled(address validator) external view returns (bool enabled);
        function isExecutorEnabled(address executor) external view returns (bool enabled);
    }
}
