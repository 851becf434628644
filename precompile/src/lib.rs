//! Calls into the chain's fixed-address precompiles.
//!
//! Calldata is `selector || word_0 || word_1 || ...`: the 4 byte selector of the function
//! followed by 32 byte, left zero padded scalar words. Selector tables are generated from
//! each precompile's solidity signatures.
mod call;
mod codec;
mod error;
mod inclusion;
mod interface;
mod selector;
mod word;

pub use call::{dispatch_call, submit, view_call, DispatchOptions};
pub use codec::{encode_call, PrecompileCall};
pub use error::Error;
pub use inclusion::{wait_for_inclusion, ExecutionStatus, InclusionResult};
pub use interface::{Precompile, PrecompileSet};
pub use selector::{Selector, SelectorTable};
pub use word::{ParseWordError, Word};
