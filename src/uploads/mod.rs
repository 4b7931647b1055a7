mod data_uri;
mod decode;
mod store;

pub use data_uri::*;
pub use decode::*;
pub use store::*;
