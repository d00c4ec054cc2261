pub mod device;
pub mod scenario;
pub mod util;

pub use device::Device;
pub use util::{artifacts_dir, capture_artifacts, split_csv};
