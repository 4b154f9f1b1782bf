//! Output-panel state machine: Idle -> Loading -> Displayed | Failed, with
//! each classify action re-entering Loading.

use classify_core::{parse, ParsedResult};
use shared::domain::CategoryLevels;

#[derive(Debug, Clone, PartialEq)]
pub enum OutputPanelState {
    Idle,
    Loading,
    Displayed {
        levels: CategoryLevels,
        pretty: String,
    },
    Failed {
        kind: FailureKind,
        message: String,
        raw: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Validation,
    Parse,
    Client,
}

pub fn on_classify_requested() -> OutputPanelState {
    OutputPanelState::Loading
}

/// A raw classifier result arrived: decode it, or degrade to a parse
/// failure that keeps the raw text around for optional display.
pub fn on_classification_ready(raw: &str) -> OutputPanelState {
    match parse(raw) {
        Ok(ParsedResult { levels, value }) => OutputPanelState::Displayed {
            levels,
            pretty: serde_json::to_string_pretty(&value).unwrap_or_else(|_| raw.to_string()),
        },
        Err(err) => {
            tracing::warn!("classifier response failed to parse: {err}");
            OutputPanelState::Failed {
                kind: FailureKind::Parse,
                message: "Invalid model response.".to_string(),
                raw: Some(raw.to_string()),
            }
        }
    }
}

pub fn on_classification_failed(message: String) -> OutputPanelState {
    OutputPanelState::Failed {
        kind: FailureKind::Client,
        message,
        raw: None,
    }
}

pub fn on_validation_rejected(message: String) -> OutputPanelState {
    OutputPanelState::Failed {
        kind: FailureKind::Validation,
        message,
        raw: None,
    }
}

pub fn on_cleared() -> OutputPanelState {
    OutputPanelState::Idle
}

/// Values for the three metric tiles; placeholders unless a result is
/// currently displayed.
pub fn metric_levels(state: &OutputPanelState) -> CategoryLevels {
    match state {
        OutputPanelState::Displayed { levels, .. } => levels.clone(),
        _ => CategoryLevels::placeholders(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::LEVEL_PLACEHOLDER;

    #[test]
    fn classify_request_enters_loading() {
        assert_eq!(on_classify_requested(), OutputPanelState::Loading);
    }

    #[test]
    fn parseable_result_transitions_to_displayed() {
        let state = on_classification_ready(r#"{"L1":"Raw Materials","L2":"Metals","L3":"Steel"}"#);
        let OutputPanelState::Displayed { levels, pretty } = state else {
            panic!("expected Displayed, got {state:?}");
        };
        assert_eq!(levels.l1, "Raw Materials");
        assert_eq!(levels.l3, "Steel");
        assert!(pretty.contains("\"L2\": \"Metals\""));
    }

    #[test]
    fn unparseable_result_fails_and_retains_raw_text() {
        let state = on_classification_ready("not json");
        assert_eq!(
            state,
            OutputPanelState::Failed {
                kind: FailureKind::Parse,
                message: "Invalid model response.".to_string(),
                raw: Some("not json".to_string()),
            }
        );
    }

    #[test]
    fn non_object_json_is_a_parse_failure() {
        let state = on_classification_ready("[1,2,3]");
        assert!(matches!(
            state,
            OutputPanelState::Failed {
                kind: FailureKind::Parse,
                ..
            }
        ));
    }

    #[test]
    fn client_failure_carries_message_without_raw_text() {
        let state = on_classification_failed("endpoint unreachable".to_string());
        assert_eq!(
            state,
            OutputPanelState::Failed {
                kind: FailureKind::Client,
                message: "endpoint unreachable".to_string(),
                raw: None,
            }
        );
    }

    #[test]
    fn clear_returns_to_idle() {
        assert_eq!(on_cleared(), OutputPanelState::Idle);
    }

    #[test]
    fn metric_tiles_show_placeholders_outside_displayed() {
        for state in [
            OutputPanelState::Idle,
            OutputPanelState::Loading,
            on_validation_rejected("empty".to_string()),
        ] {
            let levels = metric_levels(&state);
            assert_eq!(levels.l1, LEVEL_PLACEHOLDER);
            assert_eq!(levels.l2, LEVEL_PLACEHOLDER);
            assert_eq!(levels.l3, LEVEL_PLACEHOLDER);
        }
    }

    #[test]
    fn metric_tiles_reflect_displayed_levels() {
        let state = on_classification_ready(r#"{"l1":"A"}"#);
        let levels = metric_levels(&state);
        assert_eq!(levels.l1, "A");
        assert_eq!(levels.l2, LEVEL_PLACEHOLDER);
    }
}
