//! Integration tests for StateManager with state change events
//!
//! These tests verify that the StateManager correctly:
//! - Emits state change events on quiz session mutations
//! - Supports multiple subscribers
//! - Handles concurrent access from multiple threads
//! - Keeps request generations independent per channel

use quizdeck::models::{OptionKey, QuizSource, Verdict};
use quizdeck::{
    Question, QuizSession, RequestChannel, RequestTracker, Screen, StateChange, StateManager,
};
use std::sync::Arc;
use tokio::time::{Duration, timeout};

fn question(id: &str) -> Question {
    Question {
        id: id.to_string(),
        number: 1,
        text: format!("Question {id}"),
        options: vec!["A) one".to_string(), "B) two".to_string()],
        is_multiple_choice: false,
        select_count: 1,
        category: None,
        correct: None,
        has_translation: false,
        ai_verified: None,
    }
}

fn session(ids: &[&str]) -> QuizSession {
    QuizSession::new(QuizSource::Random, ids.iter().map(|id| question(id)).collect())
}

async fn next_event(rx: &mut tokio::sync::broadcast::Receiver<StateChange>) -> StateChange {
    timeout(Duration::from_millis(100), rx.recv())
        .await
        .expect("Timeout waiting for event")
        .expect("Channel closed")
}

#[tokio::test]
async fn test_start_session_emits_screen_and_question_events() {
    let state = StateManager::new();
    let mut rx = state.subscribe();

    state.start_session(session(&["q1", "q2"]));

    assert_eq!(
        next_event(&mut rx).await,
        StateChange::ScreenChanged {
            from: Screen::Welcome,
            to: Screen::Quiz
        }
    );
    assert_eq!(
        next_event(&mut rx).await,
        StateChange::QuestionChanged {
            question_id: Some("q1".to_string()),
            index: 0,
            total: 2
        }
    );
}

#[tokio::test]
async fn test_multiple_subscribers_receive_events() {
    let state = Arc::new(StateManager::new());
    let mut rx1 = state.subscribe();
    let mut rx2 = state.subscribe();
    let mut rx3 = state.subscribe();

    state.set_loading(true);

    for rx in [&mut rx1, &mut rx2, &mut rx3] {
        assert_eq!(
            next_event(rx).await,
            StateChange::LoadingChanged { is_loading: true }
        );
    }
}

#[tokio::test]
async fn test_selection_and_verdict_events() {
    let state = StateManager::new();
    state.start_session(session(&["q1"]));
    let mut rx = state.subscribe();

    let changes = state.update(|s| {
        if let Some(session) = s.session.as_mut() {
            session.select(&OptionKey::new("B")).unwrap();
        }
    });
    assert_eq!(
        changes,
        vec![StateChange::SelectionChanged {
            selected: vec![OptionKey::new("B")],
            required: 1,
            can_submit: true
        }]
    );
    assert!(matches!(
        next_event(&mut rx).await,
        StateChange::SelectionChanged { .. }
    ));

    let changes = state.update(|s| {
        if let Some(session) = s.session.as_mut() {
            let verdict = Verdict {
                correct: Some(true),
                ..Default::default()
            };
            session
                .record_verdict("q1", &[OptionKey::new("B")], verdict)
                .unwrap();
        }
    });

    assert!(changes.contains(&StateChange::VerdictRecorded {
        question_id: "q1".to_string(),
        correct: true
    }));
    assert!(
        changes
            .iter()
            .any(|c| matches!(c, StateChange::StatsChanged { stats } if stats.correct == 1))
    );
}

#[tokio::test]
async fn test_reset_session_emits_session_reset() {
    let state = StateManager::new();
    state.start_session(session(&["q1"]));

    let changes = state.reset_session();

    assert!(changes.contains(&StateChange::SessionReset));
    assert!(state.read(|s| s.session.is_none()));
}

#[tokio::test]
async fn test_no_events_without_changes() {
    let state = StateManager::new();
    let changes = state.update(|_| {});
    assert!(changes.is_empty());
}

#[tokio::test]
async fn test_concurrent_updates_from_threads() {
    let state = Arc::new(StateManager::new());
    state.start_session(session(&["q1", "q2", "q3", "q4"]));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let state = Arc::clone(&state);
            std::thread::spawn(move || {
                for _ in 0..10 {
                    state.update(|s| {
                        if let Some(session) = s.session.as_mut() {
                            if !session.advance() {
                                while session.retreat() {}
                            }
                        }
                    });
                    let _ = state.read(|s| s.current_question_id());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let index = state.read(|s| s.session.as_ref().map(QuizSession::index));
    assert!(matches!(index, Some(i) if i < 4));
}

#[test]
fn test_request_tracker_clones_share_generations() {
    let tracker = RequestTracker::new();
    let clone = tracker.clone();

    let token = tracker.issue(RequestChannel::Verdict);
    let browse = tracker.issue(RequestChannel::Browse);
    assert!(clone.is_current(&token));

    clone.issue(RequestChannel::Verdict);
    assert!(!tracker.is_current(&token));
    assert!(tracker.is_current(&browse));

    tracker.invalidate_all();
    assert!(!clone.is_current(&browse));
}
