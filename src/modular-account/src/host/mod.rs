//! Collaborator implementations backed by the Stylus host.

pub mod onchain;
