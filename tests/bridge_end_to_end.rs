mod common;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::Level;

use adobe_bridge::bridge::PAYLOAD_LOG_TARGET;
use adobe_bridge::types::{InvocationStyle, LogMode};
use adobe_bridge::{BridgeError, FunctionCall};
use adobe_bridge_test_utils::{FakeInterpreter, LogCapture, parse_script};

use common::{ILLUSTRATOR, indesign, mixed_text};

#[tokio::test]
async fn echo_returns_its_argument() {
    let fake = FakeInterpreter::bridge_test();
    let app = indesign(&fake);

    let result: Value = app.invoke("echo", &json!({ "x": 1 })).await.unwrap();

    assert_eq!(result, json!({ "x": 1 }));
    assert_eq!(fake.script_count(), 1);
}

#[tokio::test]
async fn raw_execute_prints_a_success_envelope() {
    let fake = FakeInterpreter::bridge_test();
    let stdout = indesign(&fake).execute_raw("main", "{}").await.unwrap();

    let envelope: Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(envelope["success"], json!(true));
    assert_eq!(envelope["result"], json!("main"));
    assert_eq!(envelope["exception"], Value::Null);
}

#[tokio::test]
async fn throwing_function_raises_application_error_after_replaying_logs() {
    let capture = LogCapture::new();
    let _guard = capture.install();

    let fake = FakeInterpreter::bridge_test();
    let err = indesign(&fake)
        .invoke_value("croak", &json!({}))
        .await
        .unwrap_err();

    match &err {
        BridgeError::Application(exception) => {
            assert_eq!(exception.name, "Error");
            assert_eq!(exception.description, "croak died");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("croak died"));

    let replayed = capture.for_target(PAYLOAD_LOG_TARGET);
    assert_eq!(
        replayed.first(),
        Some(&(Level::INFO, "dispatcher starting".to_string()))
    );
    assert!(replayed.contains(&(Level::DEBUG, "caught exception \"Error\"".to_string())));
    assert_eq!(
        replayed.last(),
        Some(&(Level::INFO, "dispatcher done".to_string()))
    );
}

#[tokio::test]
async fn payload_log_is_replayed_in_order_at_matching_levels() {
    let capture = LogCapture::new();
    let _guard = capture.install();

    let fake = FakeInterpreter::bridge_test();
    indesign(&fake).invoke_value("logger", &json!({})).await.unwrap();

    let logger_lines: Vec<(Level, String)> = capture
        .for_target(PAYLOAD_LOG_TARGET)
        .into_iter()
        .filter(|(_, message)| message.starts_with("logger-"))
        .collect();
    assert_eq!(
        logger_lines,
        vec![
            (Level::DEBUG, "logger-debug test".to_string()),
            (Level::INFO, "logger-info test".to_string()),
            (Level::WARN, "logger-warn test".to_string()),
            (Level::ERROR, "logger-error test".to_string()),
        ]
    );
}

#[tokio::test]
async fn discard_mode_sends_back_no_log() {
    let capture = LogCapture::new();
    let _guard = capture.install();

    let fake = FakeInterpreter::bridge_test();
    indesign(&fake)
        .log_mode(LogMode::Discard)
        .invoke_value("logger", &json!({}))
        .await
        .unwrap();

    assert!(capture.for_target(PAYLOAD_LOG_TARGET).is_empty());
    let script = fake.last_script().unwrap();
    assert!(script.contains("set scriptLogger to \"none\""));
}

#[tokio::test]
async fn long_mixed_string_survives_chunked_assignment() {
    let text = mixed_text(1000);
    let fake = FakeInterpreter::bridge_test();

    let result: Value = indesign(&fake)
        .invoke("echo", &json!({ "text": text }))
        .await
        .unwrap();

    assert_eq!(result["text"].as_str(), Some(text.as_str()));

    let script = fake.last_script().unwrap();
    let appends = script
        .lines()
        .filter(|l| l.starts_with("set scriptArgs to scriptArgs & "))
        .count();
    assert!(appends >= 25, "expected chunked assignment, got {appends} appends");
    assert!(script.lines().all(|l| l.chars().count() < 400));

    let call = parse_script(&script).unwrap();
    let args: Value = serde_json::from_str(call.json_args.as_deref().unwrap()).unwrap();
    assert_eq!(args["text"].as_str(), Some(text.as_str()));
}

#[tokio::test]
async fn nonzero_exit_is_command_execution_error_without_parsing() {
    let fake = FakeInterpreter::failing(
        1,
        "execution error: Adobe InDesign CC 2014 got an error: Can't continue. (-1708)\n",
    );

    let err = indesign(&fake)
        .invoke_value("main", &json!({}))
        .await
        .unwrap_err();

    match err {
        BridgeError::CommandExecution { exit_code, stderr } => {
            assert_eq!(exit_code, 1);
            assert!(stderr.ends_with("(-1708)"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn garbage_on_stdout_is_protocol_error() {
    let fake = FakeInterpreter::printing("missing value\n");
    let err = indesign(&fake)
        .invoke_value("main", &json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::Protocol(_)));
    assert!(err.is_bridge_failure());
}

#[tokio::test]
async fn failure_envelope_without_exception_is_protocol_error() {
    let capture = LogCapture::new();
    let _guard = capture.install();

    let fake = FakeInterpreter::printing(
        r#"{"success":false,"result":{},"log":[{"severity":"error","message":"doc locked"}],"exception":null}"#,
    );
    let err = indesign(&fake)
        .invoke_value("main", &json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::Protocol(_)));

    // The payload's log survives the malformed envelope.
    assert_eq!(
        capture.for_target(PAYLOAD_LOG_TARGET),
        vec![(Level::ERROR, "doc locked".to_string())]
    );
}

#[tokio::test]
async fn missing_payload_is_resource_error_and_never_runs() {
    let fake = FakeInterpreter::bridge_test();
    let err = indesign(&fake)
        .payload("export_pdf.jsx")
        .execute_raw("main", "{}")
        .await
        .unwrap_err();

    assert!(matches!(err, BridgeError::Resource(_)));
    assert_eq!(fake.script_count(), 0);
}

#[tokio::test]
async fn unknown_function_is_reported_by_the_dispatcher() {
    let fake = FakeInterpreter::bridge_test();
    let err = indesign(&fake)
        .invoke_value("nope", &json!({}))
        .await
        .unwrap_err();

    match err {
        BridgeError::Application(exception) => {
            assert_eq!(exception.description, "Function \"nope\" does not exist, stopping.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn typed_arguments_are_sent_with_camel_case_keys() {
    #[derive(Serialize)]
    struct ExportArgs {
        file_path: String,
        page_range: Vec<u32>,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Echoed {
        file_path: String,
        page_range: Vec<u32>,
    }

    let fake = FakeInterpreter::bridge_test();
    let echoed: Echoed = indesign(&fake)
        .invoke(
            "echo",
            &ExportArgs {
                file_path: "/tmp/out.pdf".to_string(),
                page_range: vec![1, 2],
            },
        )
        .await
        .unwrap();

    assert_eq!(
        echoed,
        Echoed {
            file_path: "/tmp/out.pdf".to_string(),
            page_range: vec![1, 2],
        }
    );
}

#[tokio::test]
async fn call_descriptor_round_trips() {
    let fake = FakeInterpreter::bridge_test();
    let app = indesign(&fake);

    let no_args: String = app.call(&FunctionCall::new("main")).await.unwrap();
    assert_eq!(no_args, "main");

    let echoed: Value = app
        .call(&FunctionCall::new("echo").arg(json!({ "document_name": "a.indd" })))
        .await
        .unwrap();
    assert_eq!(echoed, json!({ "documentName": "a.indd" }));
}

#[tokio::test]
async fn eval_file_form_reaches_the_dispatcher_too() {
    let fake = FakeInterpreter::bridge_test();
    let result: Value = indesign(&fake)
        .invocation_style(InvocationStyle::EvalFile)
        .invoke("echo", &json!({ "app": ILLUSTRATOR }))
        .await
        .unwrap();

    assert_eq!(result, json!({ "app": ILLUSTRATOR }));
    assert!(fake.last_script().unwrap().contains("$.evalFile('"));
}

#[tokio::test]
async fn each_call_gets_its_own_staging_directory() {
    let fake = FakeInterpreter::bridge_test();
    let app = indesign(&fake);

    app.invoke_value("main", &json!({})).await.unwrap();
    app.invoke_value("main", &json!({})).await.unwrap();

    let scripts = fake.scripts();
    let scripts = scripts.lock().unwrap();
    let first = parse_script(&scripts[0]).unwrap().payload;
    let second = parse_script(&scripts[1]).unwrap().payload;
    assert_ne!(first, second);
    assert!(!std::path::Path::new(&first).exists());
}
