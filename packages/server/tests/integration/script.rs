use crate::common::{TestApp, routes, test_config};

#[cfg(unix)]
#[tokio::test]
async fn successful_run_reports_the_script_output() {
    let app = TestApp::spawn().await;

    let res = app.post_empty(routes::GENERATION_SCRIPT).await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["message"], "Generation script completed");
    assert_eq!(res.body["output"], "done");
}

#[cfg(unix)]
#[tokio::test]
async fn script_receives_the_configured_credentials() {
    let mut config = test_config();
    config.trigger.args = vec![
        "-c".to_string(),
        "printf '%s:%s' \"$GENERATION_USERNAME\" \"$GENERATION_PASSWORD\"".to_string(),
    ];
    let app = TestApp::spawn_with(config).await;

    let res = app.post_empty(routes::GENERATION_SCRIPT).await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["output"], "generator:hunter2");
}

#[cfg(unix)]
#[tokio::test]
async fn failing_script_is_an_external_process_error() {
    let mut config = test_config();
    config.trigger.args = vec!["-c".to_string(), "echo boom >&2; exit 3".to_string()];
    let app = TestApp::spawn_with(config).await;

    let res = app.post_empty(routes::GENERATION_SCRIPT).await;

    assert_eq!(res.status, 500);
    assert_eq!(res.body["code"], "EXTERNAL_PROCESS_ERROR");
    assert!(res.text.contains("boom"), "{}", res.text);
}

#[tokio::test]
async fn missing_program_is_an_external_process_error() {
    let mut config = test_config();
    config.trigger.program = "definitely-not-a-real-program-4821".to_string();
    config.trigger.args = vec![];
    let app = TestApp::spawn_with(config).await;

    let res = app.post_empty(routes::GENERATION_SCRIPT).await;

    assert_eq!(res.status, 500);
    assert_eq!(res.body["code"], "EXTERNAL_PROCESS_ERROR");
}

#[tokio::test]
async fn missing_credentials_fail_before_spawning() {
    let mut config = test_config();
    config.trigger.password = None;
    let app = TestApp::spawn_with(config).await;

    let res = app.post_empty(routes::GENERATION_SCRIPT).await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}
