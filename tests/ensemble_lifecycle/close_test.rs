use d_engine_ensemble::Ensemble;
use d_engine_ensemble::Error;
use d_engine_ensemble::InstanceSpec;

use crate::common::check_ensemble_is_ready;
use crate::common::connect_any;
use crate::common::is_disconnected;
use crate::common::join_all;
use crate::common::loopback_ensemble;
use crate::common::test_config;
use crate::common::LoopbackEngine;

#[tokio::test]
async fn test_close_twice_releases_everything() {
    let root = tempfile::tempdir().unwrap();
    let ensemble = loopback_ensemble(3, &root);
    let handles = ensemble.start().unwrap();
    check_ensemble_is_ready(&ensemble).await.unwrap();

    let mut client = connect_any(&ensemble.connect_string()).await.unwrap();
    let instances = ensemble.instances();

    ensemble.close().await;
    ensemble.close().await;
    join_all(handles).await;

    assert!(is_disconnected(&mut client).await);
    assert!(instances.iter().all(|i| !i.data_directory().exists()));
    assert!(connect_any(&ensemble.connect_string()).await.is_err());
    assert!(matches!(ensemble.start(), Err(Error::Closed)));
}

#[tokio::test]
async fn test_ports_are_reusable_after_close() {
    let root = tempfile::tempdir().unwrap();
    let ensemble = loopback_ensemble(1, &root);
    let handles = ensemble.start().unwrap();
    check_ensemble_is_ready(&ensemble).await.unwrap();

    let instance = ensemble.instances().remove(0);
    ensemble.close().await;
    join_all(handles).await;

    let data_dir = root.path().join("reused");
    std::fs::create_dir_all(&data_dir).unwrap();
    let reused = InstanceSpec::new(
        &data_dir,
        instance.port(),
        instance.election_port(),
        instance.quorum_port(),
        false,
    );
    let ensemble = Ensemble::builder(|_| LoopbackEngine::default())
        .config(test_config(&root))
        .instances([reused])
        .build()
        .unwrap();
    let _handles = ensemble.start().unwrap();
    check_ensemble_is_ready(&ensemble).await.unwrap();

    ensemble.close().await;
    assert!(data_dir.exists());
}
