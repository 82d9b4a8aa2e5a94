use daemon_state::{DaemonError, DaemonState, VolumeCreateRequest};
use rstest::*;
use std::collections::HashMap;
use tokio_test::{assert_err, assert_ok};

use test_utils::{options, Call, FakeDaemon, Operation, TestResult, DEFAULT_DRIVER};

#[fixture]
fn daemon() -> FakeDaemon {
    FakeDaemon::new()
}

fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    options(pairs)
}

#[rstest]
#[case(&[("name", "test1")], "test1", &[], &[])]
#[case(&[("name", "test2"), ("labels", "case=2")], "test2", &[("case", "2")], &[])]
#[case(
    &[("name", "test3"), ("options", "type=tmpfs,device=tmpfs")],
    "test3",
    &[],
    &[("type", "tmpfs"), ("device", "tmpfs")]
)]
#[tokio::test]
async fn test_create_volume(
    daemon: FakeDaemon,
    #[case] opts: &[(&str, &str)],
    #[case] expected_name: &str,
    #[case] expected_labels: &[(&str, &str)],
    #[case] expected_options: &[(&str, &str)],
) -> TestResult {
    let mut state = DaemonState::initialize(daemon.boxed()).await?;

    let name = state.create_volume(&options(opts)).await?;
    assert_eq!(name, expected_name);

    state.refresh_volumes().await?;
    let volume = state.find_volume_by_name(&name)?;

    assert_eq!(volume.name, expected_name);
    assert_eq!(volume.driver, DEFAULT_DRIVER);
    assert_eq!(volume.labels, map(expected_labels));
    assert_eq!(volume.options, map(expected_options));

    state.remove_volume(&name).await?;
    Ok(())
}

#[rstest]
#[tokio::test]
async fn test_create_does_not_update_cache(daemon: FakeDaemon) -> TestResult {
    let mut state = DaemonState::initialize(daemon.boxed()).await?;

    let name = state.create_volume(&options(&[("name", "fresh")])).await?;
    assert!(matches!(
        state.find_volume_by_name(&name),
        Err(DaemonError::NotFound(_))
    ));

    state.refresh_volumes().await?;
    assert_ok!(state.find_volume_by_name(&name));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn test_remove_volume(daemon: FakeDaemon) -> TestResult {
    let mut state = DaemonState::initialize(daemon.boxed()).await?;

    let name = state
        .create_volume(&options(&[("name", "remove_volume")]))
        .await?;
    state.refresh_volumes().await?;
    assert_ok!(state.find_volume_by_name(&name));

    state.remove_volume(&name).await?;
    // Still cached until the next refresh
    assert_ok!(state.find_volume_by_name(&name));

    state.refresh_volumes().await?;
    match state.find_volume_by_name(&name) {
        Err(DaemonError::NotFound(missing)) => assert_eq!(missing, name),
        other => panic!("expected NotFound, got {:?}", other),
    }
    assert!(daemon.stored_volume(&name).is_none());
    Ok(())
}

#[rstest]
#[tokio::test]
async fn test_find_before_any_refresh(daemon: FakeDaemon) {
    let state = DaemonState::new(daemon.boxed());

    let err = assert_err!(state.find_volume_by_name("anything"));
    assert!(matches!(err, DaemonError::NotFound(_)));
    assert!(daemon.calls().is_empty());
}

#[tokio::test]
async fn test_find_unknown_name() {
    let daemon = FakeDaemon::populated();
    let state = DaemonState::initialize(daemon.boxed()).await.unwrap();

    assert_ok!(state.find_volume_by_name("data"));
    let err = assert_err!(state.find_volume_by_name("never-created"));
    assert_eq!(err.to_string(), "No volume never-created found");
}

#[rstest]
#[case(&[("name", "bad"), ("labels", "no-equals-sign")])]
#[case(&[("name", "bad"), ("options", "type=tmpfs,device")])]
#[tokio::test]
async fn test_malformed_options_make_no_remote_call(
    daemon: FakeDaemon,
    #[case] opts: &[(&str, &str)],
) {
    let state = DaemonState::new(daemon.boxed());

    let err = assert_err!(state.create_volume(&options(opts)).await);
    assert!(matches!(err, DaemonError::Parse { .. }));
    assert!(daemon.calls().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_unknown_option_keys_are_ignored(daemon: FakeDaemon) -> TestResult {
    let state = DaemonState::new(daemon.boxed());

    state
        .create_volume(&options(&[("name", "extra"), ("scope", "global"), ("size", "1G")]))
        .await?;

    assert_eq!(
        daemon.calls(),
        vec![Call::CreateVolume(VolumeCreateRequest {
            name: Some("extra".to_string()),
            ..Default::default()
        })]
    );
    Ok(())
}

#[rstest]
#[tokio::test]
async fn test_create_without_name_returns_generated_name(daemon: FakeDaemon) -> TestResult {
    let state = DaemonState::new(daemon.boxed());

    let name = state.create_volume(&HashMap::new()).await?;
    assert!(!name.is_empty());
    assert!(daemon.stored_volume(&name).is_some());
    Ok(())
}

#[rstest]
#[tokio::test]
async fn test_explicit_driver_is_passed_through(daemon: FakeDaemon) -> TestResult {
    let state = DaemonState::new(daemon.boxed());

    let name = state
        .create_volume(&options(&[("name", "nfs-share"), ("driver", "nfs")]))
        .await?;
    assert_eq!(daemon.stored_volume(&name).unwrap().driver, "nfs");
    Ok(())
}

#[rstest]
#[tokio::test]
async fn test_duplicate_create_is_create_error(daemon: FakeDaemon) -> TestResult {
    let state = DaemonState::new(daemon.boxed());
    state.create_volume(&options(&[("name", "dup")])).await?;

    match state.create_volume(&options(&[("name", "dup")])).await {
        Err(DaemonError::Create { name, source }) => {
            assert_eq!(name, "dup");
            assert!(source.to_string().contains("already exists"));
        }
        other => panic!("expected create error, got {:?}", other),
    }
    Ok(())
}

#[rstest]
#[tokio::test]
async fn test_remove_missing_volume_is_remove_error(daemon: FakeDaemon) {
    let state = DaemonState::new(daemon.boxed());

    let err = assert_err!(state.remove_volume("ghost").await);
    match err {
        DaemonError::Remove { name, .. } => assert_eq!(name, "ghost"),
        other => panic!("expected remove error, got {:?}", other),
    }
}

#[rstest]
#[tokio::test]
async fn test_remote_create_failure(daemon: FakeDaemon) {
    daemon.fail(Operation::CreateVolume);
    let state = DaemonState::new(daemon.boxed());

    let err = assert_err!(state.create_volume(&options(&[("name", "x")])).await);
    assert!(matches!(err, DaemonError::Create { .. }));
    assert!(daemon.stored_volume("x").is_none());
}
