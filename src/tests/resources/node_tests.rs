use crate::{
    ProxmoxError,
    core::domain::cluster_api::ClusterApi,
    tests::{logged_in_client, mount_login, test_client},
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

#[tokio::test]
async fn test_nodes_list_success() {
    let mock_server = MockServer::start().await;
    let client = logged_in_client(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api2/json/nodes"))
        .and(header(
            "Cookie",
            "PVEAuthCookie=PVE:monitor@pve:66300A1B::c2lnbmF0dXJl",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [
                {
                    "node": "pve1",
                    "status": "online",
                    "cpu": 0.15,
                    "maxcpu": 8,
                    "mem": 8589934592_i64,
                    "maxmem": 17179869184_i64,
                    "uptime": 1234567,
                    "id": "node/pve1",
                    "ssl_fingerprint": "AA:BB:CC:DD:EE:FF"
                },
                {
                    "node": "pve2",
                    "status": "offline",
                    "id": "node/pve2"
                }
            ]
        })))
        .mount(&mock_server)
        .await;

    let nodes = client.nodes().await.unwrap();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].node, "pve1");
    assert!(nodes[0].is_local_to("pve1.example.com"));
    assert_eq!(nodes[1].status, "offline");
    assert!(!nodes[1].is_local_to("pve1.example.com"));
}

#[tokio::test]
async fn test_node_status_success() {
    let mock_server = MockServer::start().await;
    let client = logged_in_client(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api2/json/nodes/pve1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {
                "cpu": 0.031,
                "wait": 0.0,
                "uptime": 86400,
                "kversion": "Linux 6.8.12-4-pve #1 SMP PREEMPT_DYNAMIC",
                "pveversion": "pve-manager/8.3.0/c1689ccb1065a83b",
                "memory": {"total": 68719476736_i64, "used": 17179869184_i64, "free": 51539607552_i64},
                "swap": {"total": 8589934592_i64, "used": 0, "free": 8589934592_i64},
                "cpuinfo": {"cpus": 32, "sockets": 2, "cores": 8, "model": "AMD EPYC 7302"},
                "loadavg": ["0.10", "0.20", "0.30"],
                "rootfs": {"total": 100, "used": 10, "avail": 90, "free": 90}
            }
        })))
        .mount(&mock_server)
        .await;

    let status = client.node_status("pve1").await.unwrap();
    assert_eq!(status.cpu_count(), 32.0);
    assert_eq!(status.memory_total_bytes(), 68719476736);
    assert_eq!(status.uptime, Some(86400));
    assert_eq!(
        status.cpuinfo.and_then(|c| c.model).as_deref(),
        Some("AMD EPYC 7302")
    );
}

#[tokio::test]
async fn test_node_status_not_found() {
    let mock_server = MockServer::start().await;
    let client = logged_in_client(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api2/json/nodes/ghost/status"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such node"))
        .mount(&mock_server)
        .await;

    match client.node_status("ghost").await {
        Err(ProxmoxError::Api { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "no such node");
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_first_request_logs_in() {
    let mock_server = MockServer::start().await;
    mount_login(&mock_server).await;
    let client = test_client(&mock_server);
    assert!(!client.is_authenticated().await);

    Mock::given(method("GET"))
        .and(path("/api2/json/nodes"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    assert!(client.nodes().await.unwrap().is_empty());
    assert!(client.is_authenticated().await);
    assert!(client.auth_token().await.is_some());
}
