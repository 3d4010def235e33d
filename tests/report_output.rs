//! Snapshot tests for the text and JSON report formats.

use n8n_validate::{RunReport, Validator};

#[test]
fn legacy_export_text_report() {
    let validator = Validator::default();
    let report = validator.validate_str(
        "legacy_export.json",
        include_str!("fixtures/legacy_export.json"),
    );
    let run = RunReport::from_reports(vec![report]);

    insta::assert_snapshot!(run.render_text(false), @r"
    == legacy_export.json (Legacy)
      warning [N002] Function: node type 'n8n-nodes-base.function' is deprecated, use 'n8n-nodes-base.code'
      warning [N004] HTTP Request: parameter 'jsonParameters' is deprecated: use 'sendBody' with 'specifyBody' instead
      warning [N002] Start: node type 'n8n-nodes-base.start' is deprecated, use 'n8n-nodes-base.manualTrigger'
    Summary: 1 documents, 0 failed, 0 errors, 3 warnings
    ");
}

#[test]
fn mixed_run_text_report() {
    let validator = Validator::default();
    let run = RunReport::from_reports(vec![
        validator.validate_str("a/minimal.json", include_str!("fixtures/minimal.json")),
        validator.validate_str("b/dangling.json", include_str!("fixtures/dangling_target.json")),
    ]);
    assert!(!run.success);

    insta::assert_snapshot!(run.render_text(false), @r"
    == a/minimal.json [minimal] (Webhook to rows)
      ok
    == b/dangling.json [dangling] (Dangling destination)
      error   [S007] trigger1: connection references unknown destination node 'missing'
      warning [R002] step1: node 'step1' has no inbound connection
    Summary: 2 documents, 1 failed, 1 errors, 1 warnings
    ");
}

#[test]
fn parse_failure_has_no_node_context() {
    let report = Validator::default()
        .validate_str("broken.json", include_str!("fixtures/truncated.json"));
    let mut text = String::new();
    report.write_text(&mut text);
    assert!(text.starts_with("== broken.json\n  error   [P001] Failed to parse workflow JSON: "));
    assert_eq!(report.findings.len(), 1);
}

#[test]
fn json_report_shape() {
    let validator = Validator::default();
    let run = RunReport::from_reports(vec![validator.validate_str(
        "self_loop.json",
        include_str!("fixtures/self_loop.json"),
    )]);

    insta::assert_json_snapshot!(run, @r#"
    {
      "documents": [
        {
          "document": "self-loop",
          "source": "self_loop.json",
          "name": null,
          "findings": [
            {
              "code": "C002",
              "check": 7,
              "severity": "warning",
              "message": "node 'retry' is connected to itself",
              "nodeId": "retry"
            }
          ],
          "valid": true
        }
      ],
      "summary": {
        "documents": 1,
        "failed": 0,
        "errors": 0,
        "warnings": 1
      },
      "success": true
    }
    "#);
}
