//! Derived index builder (spec §4.3, component C): address-of-
//! transaction, contract creation, ERC-20/721 transfer, and log filter
//! indices, all written into the same atomic batch as component B's
//! block write.

pub mod builder;
pub mod codec;
pub mod error;
pub mod reader;
pub mod types;

pub use builder::IndexBuilder;
pub use error::{IndexError, IndexResult};
pub use reader::IndexReader;
pub use types::{
    ContractCreation, Erc20Transfer, Erc721Transfer, InternalTransfer, LogPosition, Page,
    PageParams, MAX_PAGE_LIMIT, TRANSFER_EVENT_SIGNATURE,
};
