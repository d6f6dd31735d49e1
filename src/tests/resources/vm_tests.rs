use crate::{ProxmoxError, core::domain::cluster_api::ClusterApi, tests::logged_in_client};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

#[tokio::test]
async fn test_vms_list_success() {
    let mock_server = MockServer::start().await;
    let client = logged_in_client(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api2/json/nodes/pve1/qemu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {
                    "vmid": 100,
                    "name": "ubuntu-vm",
                    "status": "running",
                    "cpu": 0.23,
                    "cpus": 4,
                    "mem": 4294967296_i64,
                    "maxmem": 8589934592_i64,
                    "uptime": 123456,
                    "tags": "ubuntu;production"
                },
                {
                    "vmid": 9000,
                    "status": "stopped",
                    "template": 1
                }
            ]
        })))
        .mount(&mock_server)
        .await;

    let vms = client.vms("pve1").await.unwrap();
    assert_eq!(vms.len(), 2);
    assert_eq!(vms[0].vmid, 100);
    assert_eq!(vms[0].name.as_deref(), Some("ubuntu-vm"));
    assert!(vms[0].is_running());
    assert_eq!(vms[0].cpus, Some(4.0));
    assert_eq!(vms[0].tags.as_deref(), Some("ubuntu;production"));
    assert_eq!(vms[1].name, None);
    assert!(!vms[1].is_running());
}

#[tokio::test]
async fn test_vm_config_keeps_every_key() {
    let mock_server = MockServer::start().await;
    let client = logged_in_client(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api2/json/nodes/pve1/qemu/100/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "name": "ubuntu-vm",
                "cores": 4,
                "memory": "8192",
                "scsi0": "local-lvm:vm-100-disk-0,iothread=1,size=32G",
                "net0": "virtio=BC:24:11:2E:7D:01,bridge=vmbr0,firewall=1",
                "digest": "6d2f0e0c"
            }
        })))
        .mount(&mock_server)
        .await;

    let config = client.vm_config("pve1", 100).await.unwrap();
    assert_eq!(config.len(), 6);
    assert_eq!(config["memory"], "8192");
    assert_eq!(config["cores"], 4);
}

#[tokio::test]
async fn test_vm_status_current() {
    let mock_server = MockServer::start().await;
    let client = logged_in_client(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api2/json/nodes/pve1/qemu/100/status/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "status": "running",
                "cpu": 0.0423,
                "uptime": 7200,
                "mem": 2147483648_i64,
                "maxmem": 8589934592_i64,
                "qmpstatus": "running"
            }
        })))
        .mount(&mock_server)
        .await;

    let live = client.vm_status_current("pve1", 100).await.unwrap();
    assert_eq!(live["uptime"], 7200);
    assert_eq!(live["qmpstatus"], "running");
}

#[tokio::test]
async fn test_vm_config_malformed_payload() {
    let mock_server = MockServer::start().await;
    let client = logged_in_client(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api2/json/nodes/pve1/qemu/100/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": ["not", "a", "map"]})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = client.vm_config("pve1", 100).await;
    assert!(matches!(result, Err(ProxmoxError::MalformedResponse(_))));
}
