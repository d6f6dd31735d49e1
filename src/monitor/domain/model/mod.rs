pub mod node_aggregate;
pub mod report;
pub mod vm_record;

pub use node_aggregate::{ClusterSnapshot, NodeAggregate, NodeMap};
pub use report::{ClusterReport, VmReport};
pub use vm_record::{DiskInfo, NetworkInterface, VmRecord};
