//! Vendor (business partner) records and their persistence gateway.

pub mod model;
pub mod store;

pub use model::{Vendor, VendorFilter, VendorInput};
pub use store::{MemoryVendorStore, StoreError, VendorStore};
