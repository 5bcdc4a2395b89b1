use super::*;
use std::sync::Arc;

use client_core::Method;
use serde_json::json;
use shared::domain::LocatedPoint;

use crate::controller::support::{RecordingNotifier, RecordingView, Reply, ScriptedTransport};

type TestDashboard = DashboardController<RecordingView, RecordingNotifier>;

fn dashboard(transport: &Arc<ScriptedTransport>, view: RecordingView) -> TestDashboard {
    DashboardController::new(transport.client(), view, RecordingNotifier::default())
        .with_focus_refresh_delay(Duration::ZERO)
}

fn plan_reply() -> Reply {
    Reply::Json(json!({
        "success": true,
        "analysis": "A text editor is open",
        "strategy": "Type the greeting then save",
        "actions": [
            {"type": "type", "text": "hello", "description": "Type greeting"},
            {"type": "hotkey", "keys": ["ctrl", "s"]}
        ],
        "warnings": ["The file will be overwritten"],
        "success_criteria": "File saved"
    }))
}

#[tokio::test]
async fn blank_instruction_warns_without_request() {
    let transport = ScriptedTransport::new(Vec::new());
    let mut page = dashboard(
        &transport,
        RecordingView::with_input(InputField::Instruction, "   \n\t"),
    );

    page.execute_instruction().await;

    assert!(transport.requests().is_empty());
    assert_eq!(
        page.notifier().entries(),
        vec![("Please enter an instruction".to_string(), Severity::Warning)]
    );
    assert!(page.view().loading_labels.is_empty());
}

#[tokio::test]
async fn empty_required_inputs_never_reach_the_backend() {
    let transport = ScriptedTransport::new(Vec::new());
    let mut page = dashboard(&transport, RecordingView::default());

    page.execute_instruction().await;
    page.find_element().await;
    page.quick_type().await;

    assert!(transport.requests().is_empty());
    assert_eq!(page.notifier().count(Severity::Warning), 3);
    assert_eq!(page.notifier().entries().len(), 3);
}

#[tokio::test]
async fn plan_is_shown_for_review_and_not_executed() {
    let transport = ScriptedTransport::new(vec![plan_reply()]);
    let mut page = dashboard(
        &transport,
        RecordingView::with_input(InputField::Instruction, "  write hello  "),
    );

    page.execute_instruction().await;

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].endpoint, "/api/ai/execute");
    assert_eq!(requests[0].body, Some(json!({"instruction": "write hello"})));

    let Some(Panel::Plan(plan)) = page.view().panel(Region::InstructionResult) else {
        panic!("plan panel not rendered");
    };
    assert_eq!(plan.actions.len(), 2);
    assert_eq!(plan.actions[0].label(), "Type greeting");
    assert_eq!(plan.actions[1].label(), "hotkey");
    assert_eq!(plan.warnings, vec!["The file will be overwritten"]);

    assert_eq!(page.session().pending_actions().len(), 2);
    assert_eq!(page.view().loading, None);
    assert_eq!(page.notifier().last().map(|(_, s)| s), Some(Severity::Success));
}

#[tokio::test]
async fn confirm_submits_the_reviewed_actions_verbatim() {
    let transport = ScriptedTransport::new(vec![
        plan_reply(),
        Reply::Json(json!({"success": true, "message": "2 actions executed"})),
    ]);
    let mut page = dashboard(
        &transport,
        RecordingView::with_input(InputField::Instruction, "write hello"),
    );

    page.execute_instruction().await;
    page.confirm_execution().await;

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].method, Method::Post);
    assert_eq!(requests[1].endpoint, "/api/automation/execute");
    assert_eq!(
        requests[1].body,
        Some(json!({
            "actions": [
                {"type": "type", "text": "hello", "description": "Type greeting"},
                {"type": "hotkey", "keys": ["ctrl", "s"]}
            ]
        }))
    );

    assert!(page.session().pending_actions().is_empty());
    assert!(page.view().hidden.contains(&Region::InstructionResult));
    assert_eq!(page.view().input(InputField::Instruction), "");
    assert_eq!(page.notifier().count(Severity::Success), 2);
}

#[tokio::test]
async fn cancel_discards_plan_so_confirm_is_rejected() {
    let transport = ScriptedTransport::new(vec![plan_reply()]);
    let mut page = dashboard(
        &transport,
        RecordingView::with_input(InputField::Instruction, "write hello"),
    );

    page.execute_instruction().await;
    page.cancel_execution();
    page.confirm_execution().await;

    assert_eq!(transport.requests().len(), 1);
    assert!(page.session().pending_actions().is_empty());
    assert!(page.view().hidden.contains(&Region::InstructionResult));
    assert_eq!(
        page.notifier().last(),
        Some(("No actions to execute".to_string(), Severity::Warning))
    );
}

#[tokio::test]
async fn failed_confirm_keeps_plan_for_retry() {
    let transport = ScriptedTransport::new(vec![
        plan_reply(),
        Reply::Json(json!({"success": false, "error": "automation backend busy"})),
    ]);
    let mut page = dashboard(
        &transport,
        RecordingView::with_input(InputField::Instruction, "write hello"),
    );

    page.execute_instruction().await;
    page.confirm_execution().await;

    assert_eq!(page.session().pending_actions().len(), 2);
    assert!(!page.view().hidden.contains(&Region::InstructionResult));
    assert_eq!(page.view().loading, None);
    assert_eq!(
        page.notifier().last(),
        Some((
            "Execution failed: automation backend busy".to_string(),
            Severity::Error
        ))
    );
}

#[tokio::test]
async fn failed_calls_notify_once_and_leave_regions_untouched() {
    let transport = ScriptedTransport::new(vec![
        Reply::Raw("<!doctype html><title>proxy error</title>"),
        Reply::Unreachable,
        Reply::Json(json!({"success": false})),
    ]);
    let mut page = dashboard(&transport, RecordingView::default());

    page.capture_screen().await;
    page.analyze_screen().await;
    page.refresh_windows().await;

    assert_eq!(transport.requests().len(), 3);
    assert_eq!(page.notifier().count(Severity::Error), 3);
    assert_eq!(page.notifier().entries().len(), 3);
    assert!(page.view().regions.is_empty());
    assert_eq!(page.view().loading, None);
    assert_eq!(
        page.notifier().last(),
        Some(("Error: unknown error".to_string(), Severity::Error))
    );
}

#[tokio::test]
async fn capture_caption_and_analysis_prompt_follow_inputs() {
    let transport = ScriptedTransport::new(vec![
        Reply::Json(json!({
            "success": true,
            "image": "data:image/png;base64,iVBORw0KGgo=",
            "width": 1920,
            "height": 1080
        })),
        Reply::Json(json!({"success": true, "analysis": "Two dialogs are open"})),
        Reply::Json(json!({"success": true, "analysis": "A desktop"})),
    ]);
    let mut page = dashboard(
        &transport,
        RecordingView::with_input(InputField::AnalysisPrompt, "  List the open dialogs "),
    );

    page.capture_screen().await;
    page.analyze_screen().await;
    page.view_mut().set_input(InputField::AnalysisPrompt, "   ");
    page.analyze_screen().await;

    assert_eq!(
        page.view().panel(Region::ScreenPreview),
        Some(&Panel::Image {
            source: "data:image/png;base64,iVBORw0KGgo=".into(),
            caption: Some("1920 x 1080".into()),
        })
    );
    let requests = transport.requests();
    assert_eq!(
        requests[1].body,
        Some(json!({"prompt": "List the open dialogs"}))
    );
    assert_eq!(requests[2].body, Some(json!({})));
    assert_eq!(
        page.view().panel(Region::AnalysisResult),
        Some(&Panel::Text("A desktop".into()))
    );
}

#[tokio::test]
async fn found_element_enables_single_click_at_that_point() {
    let transport = ScriptedTransport::new(vec![
        Reply::Json(json!({"success": true, "found": true, "x": 120, "y": 340})),
        Reply::Json(json!({"success": true, "message": "clicked"})),
    ]);
    let mut page = dashboard(
        &transport,
        RecordingView::with_input(InputField::ElementDescription, "login button"),
    );

    page.find_element().await;

    assert_eq!(
        page.view().panel(Region::FindElementResult),
        Some(&Panel::ElementFound(LocatedPoint { x: 120, y: 340 }))
    );
    assert_eq!(page.view().enabled.get(&Control::ClickElement), Some(&true));
    assert_eq!(
        page.session().located_point(),
        Some(LocatedPoint { x: 120, y: 340 })
    );

    page.click_element().await;
    page.click_element().await;

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].endpoint, "/api/automation/click");
    assert_eq!(requests[1].body, Some(json!({"x": 120, "y": 340})));
    assert_eq!(page.session().located_point(), None);
    assert_eq!(page.view().enabled.get(&Control::ClickElement), Some(&false));
    assert_eq!(
        page.notifier().last(),
        Some(("No element to click".to_string(), Severity::Warning))
    );
}

#[tokio::test]
async fn failed_click_keeps_point_and_control() {
    let transport = ScriptedTransport::new(vec![
        Reply::Json(json!({"success": true, "found": true, "x": 120, "y": 340})),
        Reply::Json(json!({"success": false, "error": "input blocked"})),
        Reply::Json(json!({"success": true, "message": "clicked"})),
    ]);
    let mut page = dashboard(
        &transport,
        RecordingView::with_input(InputField::ElementDescription, "login button"),
    );

    page.find_element().await;
    page.click_element().await;

    assert_eq!(
        page.session().located_point(),
        Some(LocatedPoint { x: 120, y: 340 })
    );
    assert_eq!(page.view().enabled.get(&Control::ClickElement), Some(&true));
    assert_eq!(
        page.notifier().last(),
        Some(("Error: input blocked".to_string(), Severity::Error))
    );

    page.click_element().await;

    let requests = transport.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[2].endpoint, "/api/automation/click");
    assert_eq!(requests[2].body, Some(json!({"x": 120, "y": 340})));
    assert_eq!(page.session().located_point(), None);
    assert_eq!(page.view().enabled.get(&Control::ClickElement), Some(&false));
    assert_eq!(
        page.notifier().last(),
        Some(("Click executed".to_string(), Severity::Success))
    );
}

#[tokio::test]
async fn not_found_clears_previous_point_and_disables_click() {
    let transport = ScriptedTransport::new(vec![
        Reply::Json(json!({"success": true, "found": true, "x": 5, "y": 6})),
        Reply::Json(json!({"success": true, "found": false, "message": "element not found"})),
    ]);
    let mut page = dashboard(
        &transport,
        RecordingView::with_input(InputField::ElementDescription, "save icon"),
    );

    page.find_element().await;
    page.find_element().await;

    assert_eq!(page.session().located_point(), None);
    assert_eq!(
        page.view().panel(Region::FindElementResult),
        Some(&Panel::ElementNotFound)
    );
    assert_eq!(page.view().enabled.get(&Control::ClickElement), Some(&false));
    assert_eq!(
        page.notifier().last(),
        Some(("Element not found".to_string(), Severity::Warning))
    );

    page.click_element().await;
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn quick_type_sends_trimmed_text_and_clears_input() {
    let transport = ScriptedTransport::new(vec![Reply::Json(json!({"success": true}))]);
    let mut page = dashboard(
        &transport,
        RecordingView::with_input(InputField::QuickTypeText, " hello world "),
    );

    page.quick_type().await;

    assert_eq!(
        transport.requests()[0].body,
        Some(json!({"text": "hello world"}))
    );
    assert_eq!(page.view().input(InputField::QuickTypeText), "");
    assert_eq!(
        page.notifier().entries(),
        vec![("Text typed".to_string(), Severity::Success)]
    );
}

#[tokio::test]
async fn focus_window_refreshes_list_afterwards() {
    let transport = ScriptedTransport::new(vec![
        Reply::Json(json!({"success": true, "message": "focused"})),
        Reply::Json(json!({
            "success": true,
            "count": 2,
            "windows": [
                {"index": 0, "title": "Terminal", "is_active": false},
                {"index": 1, "title": "Browser", "is_active": true}
            ]
        })),
    ]);
    let mut page = dashboard(&transport, RecordingView::default());

    page.run(DashboardAction::FocusWindow(WindowIndex(1))).await;

    let endpoints: Vec<_> = transport
        .requests()
        .into_iter()
        .map(|r| (r.method, r.endpoint))
        .collect();
    assert_eq!(
        endpoints,
        vec![
            (Method::Post, "/api/windows/focus/1".to_string()),
            (Method::Get, "/api/windows".to_string()),
        ]
    );
    let Some(Panel::Windows(windows)) = page.view().panel(Region::WindowsList) else {
        panic!("windows panel not rendered");
    };
    assert!(windows[1].is_active);
    assert_eq!(
        page.notifier().last(),
        Some(("2 windows found".to_string(), Severity::Success))
    );
}

#[tokio::test]
async fn capture_window_shows_title_caption() {
    let transport = ScriptedTransport::new(vec![Reply::Json(json!({
        "success": true,
        "image": "data:image/png;base64,AAAA",
        "window_title": "Browser"
    }))]);
    let mut page = dashboard(&transport, RecordingView::default());

    page.capture_window(WindowIndex(4)).await;

    assert_eq!(transport.requests()[0].endpoint, "/api/capture/window/4");
    assert_eq!(
        page.view().panel(Region::ScreenPreview),
        Some(&Panel::Image {
            source: "data:image/png;base64,AAAA".to_string(),
            caption: Some("Browser".to_string()),
        })
    );
}

#[tokio::test]
async fn unreachable_backend_marks_status_indicator() {
    let transport = ScriptedTransport::new(vec![Reply::Unreachable]);
    let mut page = dashboard(&transport, RecordingView::default());

    page.check_status().await;

    assert_eq!(
        page.view().panel(Region::StatusIndicator),
        Some(&Panel::Connection(ConnectionState::Unreachable))
    );
    assert_eq!(page.notifier().count(Severity::Error), 1);
}

#[tokio::test]
async fn load_checks_status_lists_windows_and_shows_mouse_placeholder() {
    let transport = ScriptedTransport::new(vec![
        Reply::Json(json!({
            "success": true,
            "status": {
                "ai_enabled": false,
                "api_key_configured": false,
                "model": null,
                "screen_size": [1280, 720]
            }
        })),
        Reply::Json(json!({"success": true, "count": 0, "windows": []})),
    ]);
    let mut page = dashboard(&transport, RecordingView::default());

    page.load().await;

    assert_eq!(
        page.view().panel(Region::StatusIndicator),
        Some(&Panel::Connection(ConnectionState::NotConfigured))
    );
    assert_eq!(
        page.view().panel(Region::WindowsList),
        Some(&Panel::Windows(Vec::new()))
    );
    assert_eq!(
        page.view().panel(Region::MousePosition),
        Some(&Panel::Text(MOUSE_POSITION_PLACEHOLDER.to_string()))
    );
}

#[tokio::test]
async fn dispatch_routes_bound_events_only() {
    let transport = ScriptedTransport::new(vec![plan_reply()]);
    let mut page = dashboard(
        &transport,
        RecordingView::with_input(InputField::Instruction, "write hello"),
    );

    assert!(!page.dispatch(Trigger::Click, "unknownBtn").await);
    assert!(!page.dispatch(Trigger::ENTER, "instructionInput").await);
    assert!(transport.requests().is_empty());

    assert!(page.dispatch(Trigger::CTRL_ENTER, "instructionInput").await);
    assert_eq!(transport.requests().len(), 1);

    assert!(page.dispatch(Trigger::Click, "cancelExecutionBtn").await);
    assert!(page.session().pending_actions().is_empty());
}
