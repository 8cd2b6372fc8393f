//! ERC-7579 account-side constants and the ABI of the collaborators the account talks to.

pub mod constants;
pub mod interfaces;
