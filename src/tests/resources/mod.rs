mod node_tests;
mod storage_tests;
mod vm_tests;
