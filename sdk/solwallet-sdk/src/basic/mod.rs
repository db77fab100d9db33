pub mod keypair;
pub mod ledger;
pub mod secret_store;
pub mod session;
pub mod transfer;
