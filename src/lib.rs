pub mod error;
pub mod filter;
pub mod model;
pub mod parse;
pub mod session;
pub mod source;
pub mod util;
