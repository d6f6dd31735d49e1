pub mod node_list_item;
pub mod node_status;
pub mod proxmox_auth;
pub mod proxmox_connection;
pub mod storage;
pub mod vm;
