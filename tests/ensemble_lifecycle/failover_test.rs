use d_engine_ensemble::NodeState;
use tracing::info;

use crate::common::check_ensemble_is_ready;
use crate::common::connect_any;
use crate::common::is_disconnected;
use crate::common::loopback_ensemble;

/// Start 3 nodes, connect, find the serving node, kill it, reconnect elsewhere
#[tokio::test]
async fn test_3_node_kill_and_reconnect() {
    crate::enable_logger();
    let root = tempfile::tempdir().unwrap();
    let ensemble = loopback_ensemble(3, &root);
    let _handles = ensemble.start().unwrap();
    check_ensemble_is_ready(&ensemble).await.unwrap();

    let connect_string = ensemble.connect_string();
    assert_eq!(connect_string.split(',').count(), 3);

    let mut client = connect_any(&connect_string).await.unwrap();
    let victim = ensemble.find_connection_instance(&client).unwrap();
    info!("client connected to {}", victim);

    assert!(ensemble.kill_server(&victim).await);
    assert!(is_disconnected(&mut client).await);
    assert_eq!(ensemble.node_state(&victim), Some(NodeState::Stopped));
    assert!(!victim.data_directory().exists());

    let client = connect_any(&connect_string).await.unwrap();
    let survivor = ensemble.find_connection_instance(&client).unwrap();
    assert_ne!(survivor, victim);
    assert_eq!(ensemble.node_state(&survivor), Some(NodeState::Running));

    ensemble.close().await;
}

#[tokio::test]
async fn test_killed_node_refuses_connections() {
    let root = tempfile::tempdir().unwrap();
    let ensemble = loopback_ensemble(3, &root);
    let handles = ensemble.start().unwrap();
    check_ensemble_is_ready(&ensemble).await.unwrap();

    let instances = ensemble.instances();
    assert!(ensemble.kill_server(&instances[0]).await);

    let mut handles = handles.into_iter();
    let killed = handles.next().unwrap();
    assert!(killed.join().await.is_ok());

    assert!(tokio::net::TcpStream::connect(("127.0.0.1", instances[0].port()))
        .await
        .is_err());
    for instance in &instances[1..] {
        assert!(tokio::net::TcpStream::connect(("127.0.0.1", instance.port()))
            .await
            .is_ok());
    }

    ensemble.close().await;
}

#[tokio::test]
async fn test_server_ids_follow_connect_string_order() {
    let root = tempfile::tempdir().unwrap();
    let ensemble = loopback_ensemble(5, &root);
    let _handles = ensemble.start().unwrap();
    check_ensemble_is_ready(&ensemble).await.unwrap();

    let connect_string = ensemble.connect_string();
    for (index, segment) in connect_string.split(',').enumerate() {
        let client = tokio::net::TcpStream::connect(segment).await.unwrap();
        let instance = ensemble.find_connection_instance(&client).unwrap();
        assert_eq!(ensemble.server_id(&instance), Some(index as u64 + 1));
    }

    ensemble.close().await;
}
