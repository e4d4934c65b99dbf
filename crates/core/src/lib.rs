pub mod entry;
pub mod store;

pub use entry::{Entry, normalize_tel};
pub use store::{PhoneStore, StoreError};
