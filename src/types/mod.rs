mod device;
mod device_family;
mod family_version;
mod result;

pub use device::*;
pub use device_family::*;
pub use family_version::*;
pub use result::*;
