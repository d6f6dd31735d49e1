use crate::{core::domain::cluster_api::ClusterApi, tests::logged_in_client};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

#[tokio::test]
async fn test_storage_list_success() {
    let mock_server = MockServer::start().await;
    let client = logged_in_client(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api2/json/nodes/pve1/storage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [
                {"storage": "local", "type": "dir", "content": "iso,vztmpl,backup",
                 "active": 1, "shared": 0, "total": 100000, "used": 40000},
                {"storage": "local-lvm", "type": "lvmthin", "content": "images,rootdir",
                 "active": 1, "shared": 0},
                {"storage": "nas", "type": "nfs", "content": "backup", "shared": 1}
            ]
        })))
        .mount(&mock_server)
        .await;

    let storages = client.storages("pve1").await.unwrap();
    let local: Vec<&str> = storages
        .iter()
        .filter(|s| s.is_local())
        .map(|s| s.storage.as_str())
        .collect();
    assert_eq!(storages.len(), 3);
    assert_eq!(local, vec!["local", "local-lvm"]);
    assert_eq!(storages[0].total, Some(100000));
}

#[tokio::test]
async fn test_storage_status_success() {
    let mock_server = MockServer::start().await;
    let client = logged_in_client(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api2/json/nodes/pve1/storage/local-lvm/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {
                "type": "lvmthin",
                "total": 999653638144_i64,
                "used": 120000000000_i64,
                "avail": 879653638144_i64,
                "active": 1,
                "enabled": 1,
                "content": "images,rootdir"
            }
        })))
        .mount(&mock_server)
        .await;

    let status = client.storage_status("pve1", "local-lvm").await.unwrap();
    assert_eq!(status.storage_type.as_deref(), Some("lvmthin"));
    assert_eq!(status.total, Some(999653638144));
    assert_eq!(status.avail, Some(879653638144));
}
