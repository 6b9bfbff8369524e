//! Comprehensive tests for domain_claims

use proptest::prelude::*;
use serde_json::json;

use domain_claims::ports::mock::{GateKey, MockFailure};
use domain_claims::{
    filter_claims, ClaimError, ClaimStatus, ClusterQuery, Decision, DeskChange, FraudLabel,
    PanelPhase, ScoringStage,
};
use test_utils::{
    apply_next, assert_banner, assert_filter_exact, assert_no_banner, assert_panel_phase,
    claims_strategy, mock_desk, mounted_desk, query_strategy, settle, ClaimFixtures,
    ClusterFixtures, IdFixtures, ScoringFixtures, SummaryFixtures, TestClaimBuilder,
    TestScoringBuilder,
};

// ============================================================================
// Filter Tests
// ============================================================================

mod filter_tests {
    use super::*;

    #[test]
    fn test_filter_by_provider_prefix() {
        let queue = ClaimFixtures::queue();
        let filtered = filter_claims("prv51001", &queue);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|c| c.provider_id.as_ref().unwrap().as_str() == "PRV51001"));
    }

    #[test]
    fn test_filter_tolerates_missing_fields() {
        let queue = vec![
            TestClaimBuilder::new().with_id("CLM1").with_provider_id(None).with_diagnosis(None).build(),
            TestClaimBuilder::new().with_id("CLM2").with_diagnosis(Some("201")).build(),
        ];
        let filtered = filter_claims("201", &queue);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id.as_str(), "CLM2");
    }

    proptest! {
        #[test]
        fn prop_empty_query_returns_input(claims in claims_strategy(), blanks in " {0,4}") {
            let filtered = filter_claims(&blanks, &claims);
            prop_assert_eq!(filtered.as_ref(), claims.as_slice());
        }

        #[test]
        fn prop_filter_is_exact(claims in claims_strategy(), query in query_strategy()) {
            let filtered = filter_claims(&query, &claims);
            assert_filter_exact(&query, &claims, &filtered);
        }

        #[test]
        fn prop_filter_preserves_order(claims in claims_strategy(), query in query_strategy()) {
            let filtered = filter_claims(&query, &claims);
            let mut source = claims.iter();
            for claim in filtered.iter() {
                prop_assert!(source.any(|c| c == claim));
            }
        }
    }
}

// ============================================================================
// Queue Loading Tests
// ============================================================================

mod queue_tests {
    use super::*;

    #[tokio::test]
    async fn test_mount_loads_queue_once() {
        let (mut desk, port) = mock_desk(ClaimFixtures::queue());
        port.set_summary(SummaryFixtures::busy_day());

        assert!(desk.mount());
        assert!(!desk.mount());
        assert!(desk.is_loading());
        settle(&mut desk).await;

        assert!(!desk.is_loading());
        assert_eq!(desk.claims().len(), 3);
        assert_eq!(desk.summary(), SummaryFixtures::busy_day());
        assert_eq!(port.pending_calls(), 1);
        assert_eq!(port.summary_calls(), 1);
        assert_no_banner(&desk);
    }

    #[tokio::test]
    async fn test_pending_failure_keeps_fetched_counters() {
        let (mut desk, port) = mock_desk(ClaimFixtures::queue());
        port.set_summary(SummaryFixtures::busy_day());
        port.fail_pending(Some(MockFailure::network()));

        desk.mount();
        settle(&mut desk).await;

        assert!(desk.claims().is_empty());
        assert_eq!(desk.summary(), SummaryFixtures::busy_day());
        assert_banner(&desk, "Failed to load pending claims");
    }

    #[tokio::test]
    async fn test_summary_failure_uses_server_message() {
        let (mut desk, port) = mock_desk(ClaimFixtures::queue());
        port.fail_summary(Some(MockFailure::server_error(500, "Summary view unavailable")));

        desk.mount();
        settle(&mut desk).await;

        assert_eq!(desk.claims().len(), 3);
        assert_eq!(desk.summary().total, 0);
        assert_banner(&desk, "Summary view unavailable");
    }

    #[tokio::test]
    async fn test_first_failure_wins() {
        let (mut desk, port) = mock_desk(ClaimFixtures::queue());
        port.fail_pending(Some(MockFailure::network()));
        port.fail_summary(Some(MockFailure::network()));
        let summary_gate = port.hold(GateKey::Summary);

        desk.mount();
        assert_eq!(apply_next(&mut desk).await, DeskChange::LoadFailed("Failed to load pending claims".into()));
        summary_gate.release();
        assert_eq!(apply_next(&mut desk).await, DeskChange::LoadFailed("Failed to load admin summary".into()));

        assert_banner(&desk, "Failed to load pending claims");
    }

    #[tokio::test]
    async fn test_first_failure_wins_when_summary_settles_first() {
        let (mut desk, port) = mock_desk(ClaimFixtures::queue());
        port.fail_pending(Some(MockFailure::network()));
        port.fail_summary(Some(MockFailure::network()));
        let pending_gate = port.hold(GateKey::Pending);

        desk.mount();
        apply_next(&mut desk).await;
        pending_gate.release();
        apply_next(&mut desk).await;

        assert_banner(&desk, "Failed to load admin summary");
    }

    #[tokio::test]
    async fn test_refresh_clears_banner_and_drops_superseded_cycle() {
        let (mut desk, port) = mock_desk(ClaimFixtures::queue());
        port.fail_summary(Some(MockFailure::network()));
        let slow_list = port.hold(GateKey::Pending);

        desk.mount();
        assert!(matches!(apply_next(&mut desk).await, DeskChange::LoadFailed(_)));
        assert!(desk.error().is_some());

        port.fail_summary(None);
        desk.refresh();
        assert_no_banner(&desk);

        let mut changes = vec![apply_next(&mut desk).await, apply_next(&mut desk).await];
        changes.sort_by_key(|c| format!("{c:?}"));
        assert_eq!(changes, vec![DeskChange::QueueUpdated, DeskChange::SummaryUpdated]);

        slow_list.release();
        assert_eq!(apply_next(&mut desk).await, DeskChange::Ignored);
        assert!(desk.is_idle());
        assert!(!desk.is_loading());
        assert_eq!(desk.claims().len(), 3);
    }

    #[tokio::test]
    async fn test_visible_claims_follow_query() {
        let (mut desk, _port) = mounted_desk(ClaimFixtures::queue()).await;

        desk.set_query("  CLM52 ");
        assert_eq!(desk.visible_claims().len(), 1);
        desk.set_query("");
        assert_eq!(desk.visible_claims().len(), 3);
    }
}

// ============================================================================
// Review Panel Tests
// ============================================================================

mod panel_tests {
    use super::*;

    #[tokio::test]
    async fn test_open_shows_claim_before_score() {
        let (mut desk, port) = mounted_desk(ClaimFixtures::queue()).await;
        let claim = ClaimFixtures::inpatient();
        port.set_scoring(claim.id.clone(), ScoringFixtures::report_for(&claim, ScoringFixtures::fraud(0.91)));

        desk.open_review_by_id("CLM46116").unwrap();
        assert_panel_phase(&desk, PanelPhase::ScoringInFlight);
        assert_eq!(desk.panel().current().unwrap().claim(), &claim);

        assert_eq!(apply_next(&mut desk).await, DeskChange::PanelUpdated);
        assert_panel_phase(&desk, PanelPhase::Scored);
        let result = desk.panel().current().unwrap().scoring_result().unwrap();
        assert_eq!(result.label, FraudLabel::Fraud);
        assert_eq!(result.top_features[0].name, "InscClaimAmtReimbursed");
    }

    #[tokio::test]
    async fn test_late_score_for_replaced_panel_is_dropped() {
        let (mut desk, port) = mounted_desk(ClaimFixtures::queue()).await;
        let a = ClaimFixtures::inpatient();
        let b = ClaimFixtures::outpatient();
        port.set_scoring(a.id.clone(), ScoringFixtures::report_for(&a, ScoringFixtures::fraud(0.95)));
        port.set_scoring(b.id.clone(), ScoringFixtures::report_for(&b, ScoringFixtures::not_fraud(0.08)));
        let gate_a = port.hold(GateKey::Scoring(a.id.clone()));

        desk.open_review(a.clone()).unwrap();
        desk.open_review(b.clone()).unwrap();
        assert_eq!(apply_next(&mut desk).await, DeskChange::PanelUpdated);

        gate_a.release();
        assert_eq!(apply_next(&mut desk).await, DeskChange::Ignored);

        let panel = desk.panel().current().unwrap();
        assert_eq!(panel.claim().id, b.id);
        assert_eq!(panel.scoring_result().unwrap().label, FraudLabel::NotFraud);
    }

    #[tokio::test]
    async fn test_late_score_after_close_does_not_reopen() {
        let (mut desk, port) = mounted_desk(ClaimFixtures::queue()).await;
        let a = ClaimFixtures::inpatient();
        port.set_scoring(a.id.clone(), ScoringFixtures::report_for(&a, ScoringFixtures::fraud(0.5)));
        let gate = port.hold(GateKey::Scoring(a.id.clone()));

        desk.open_review(a).unwrap();
        assert!(desk.cancel_key());
        gate.release();

        assert_eq!(apply_next(&mut desk).await, DeskChange::Ignored);
        assert_panel_phase(&desk, PanelPhase::Closed);
    }

    #[tokio::test]
    async fn test_scoring_failure_confined_to_panel() {
        let (mut desk, port) = mounted_desk(ClaimFixtures::queue()).await;
        port.fail_scoring(IdFixtures::claim_b(), MockFailure::server_detail(502, "model warming up"));

        desk.open_review_by_id("CLM52019").unwrap();
        apply_next(&mut desk).await;

        assert_panel_phase(&desk, PanelPhase::ScoringFailed);
        assert_eq!(
            desk.panel().current().unwrap().scoring(),
            &ScoringStage::Failed { message: "model warming up".into() }
        );
        assert_no_banner(&desk);
        assert!(matches!(desk.toggle_raw(), Err(ClaimError::RawUnavailable)));
    }

    #[tokio::test]
    async fn test_authoritative_claim_replaces_selection() {
        let (mut desk, port) = mounted_desk(ClaimFixtures::queue()).await;
        let selected = ClaimFixtures::inpatient();
        let stored = TestClaimBuilder::new().with_diagnosis(Some("202")).build();
        port.set_scoring(selected.id.clone(), ScoringFixtures::report_for(&stored, ScoringFixtures::fraud(0.6)));

        desk.open_review(selected).unwrap();
        apply_next(&mut desk).await;

        let panel = desk.panel().current().unwrap();
        assert_eq!(panel.claim().diagnosis_group_code.as_deref(), Some("202"));
    }

    #[tokio::test]
    async fn test_open_unknown_claim() {
        let (mut desk, _port) = mounted_desk(ClaimFixtures::queue()).await;
        assert!(matches!(desk.open_review_by_id("CLM0"), Err(ClaimError::ClaimNotInQueue(_))));
        assert!(matches!(desk.open_review_by_id("  "), Err(ClaimError::Identifier(_))));
        assert_panel_phase(&desk, PanelPhase::Closed);
    }

    #[tokio::test]
    async fn test_toggle_raw_is_display_only() {
        let (mut desk, port) = mounted_desk(ClaimFixtures::queue()).await;
        let claim = ClaimFixtures::inpatient();
        let result = TestScoringBuilder::new()
            .with_label(FraudLabel::Fraud)
            .with_probability(0.7)
            .with_raw(json!({ "prediction": 1 }))
            .build();
        port.set_scoring(claim.id.clone(), ScoringFixtures::report_for(&claim, result));

        desk.open_review(claim).unwrap();
        apply_next(&mut desk).await;
        let calls = port.scoring_calls();

        assert!(desk.toggle_raw().unwrap());
        assert!(desk.panel().current().unwrap().shows_raw());
        assert!(!desk.toggle_raw().unwrap());
        assert_eq!(port.scoring_calls(), calls);
        assert!(desk.is_idle());
    }
}

// ============================================================================
// Decision Tests
// ============================================================================

mod decision_tests {
    use super::*;

    #[tokio::test]
    async fn test_decide_sends_evidence_and_reloads() {
        let (mut desk, port) = mounted_desk(ClaimFixtures::queue()).await;
        let claim = ClaimFixtures::inpatient();
        let result = TestScoringBuilder::new().with_label(FraudLabel::Fraud).with_probability(0.73).build();
        port.set_scoring(claim.id.clone(), ScoringFixtures::report_for(&claim, result));

        desk.open_review(claim.clone()).unwrap();
        apply_next(&mut desk).await;
        assert!(desk.decide(Decision::Approved));
        assert!(desk.panel().is_busy());

        assert_eq!(
            apply_next(&mut desk).await,
            DeskChange::DecisionPersisted { claim_id: claim.id.clone(), decision: Decision::Approved }
        );
        assert_panel_phase(&desk, PanelPhase::Closed);
        assert!(desk.is_loading());

        let submitted = port.submitted();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].0, claim.id);
        assert_eq!(
            serde_json::to_value(&submitted[0].1).unwrap(),
            json!({ "decision": "Approved", "score": 0.73, "label": "Fraud" })
        );

        settle(&mut desk).await;
        assert_eq!(port.pending_calls(), 2);
        assert_eq!(desk.claims().len(), 2);
        assert_eq!(desk.summary().approved, 1);
    }

    #[tokio::test]
    async fn test_decide_after_scoring_failure_omits_evidence() {
        let (mut desk, port) = mounted_desk(ClaimFixtures::queue()).await;
        port.fail_scoring(IdFixtures::claim_a(), MockFailure::network());

        desk.open_review_by_id("CLM46116").unwrap();
        apply_next(&mut desk).await;
        assert!(desk.decide(Decision::Rejected));
        settle(&mut desk).await;

        let submitted = port.submitted();
        assert_eq!(serde_json::to_value(&submitted[0].1).unwrap(), json!({ "decision": "Rejected" }));
        assert_eq!(desk.summary().rejected, 1);
    }

    #[tokio::test]
    async fn test_decide_is_noop_without_settled_panel() {
        let (mut desk, port) = mounted_desk(ClaimFixtures::queue()).await;
        assert!(!desk.decide(Decision::Approved));

        let claim = ClaimFixtures::inpatient();
        port.set_scoring(claim.id.clone(), ScoringFixtures::report_for(&claim, ScoringFixtures::fraud(0.9)));
        let gate = port.hold(GateKey::Scoring(claim.id.clone()));
        desk.open_review(claim).unwrap();
        assert!(!desk.decide(Decision::Approved));

        gate.release();
        settle(&mut desk).await;
        assert!(port.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_keeps_panel_for_retry() {
        let (mut desk, port) = mounted_desk(ClaimFixtures::queue()).await;
        let claim = ClaimFixtures::outpatient();
        port.set_scoring(claim.id.clone(), ScoringFixtures::report_for(&claim, ScoringFixtures::not_fraud(0.1)));
        port.fail_decisions(Some(MockFailure::network()));

        desk.open_review(claim.clone()).unwrap();
        apply_next(&mut desk).await;
        assert!(desk.decide(Decision::Approved));
        assert_eq!(
            apply_next(&mut desk).await,
            DeskChange::DecisionFailed("Failed to persist decision".into())
        );

        assert_banner(&desk, "Failed to persist decision");
        assert_panel_phase(&desk, PanelPhase::Scored);
        assert!(!desk.panel().is_busy());

        port.fail_decisions(None);
        assert!(desk.decide(Decision::Approved));
        assert!(matches!(apply_next(&mut desk).await, DeskChange::DecisionPersisted { .. }));
        assert_no_banner(&desk);
        settle(&mut desk).await;
    }

    #[tokio::test]
    async fn test_server_refusal_message_shown() {
        let (mut desk, port) = mounted_desk(ClaimFixtures::queue()).await;
        let claim = ClaimFixtures::outpatient();
        port.set_scoring(claim.id.clone(), ScoringFixtures::report_for(&claim, ScoringFixtures::not_fraud(0.1)));
        port.fail_decisions(Some(MockFailure::server_error(409, "Claim already decided")));

        desk.open_review(claim).unwrap();
        apply_next(&mut desk).await;
        desk.decide(Decision::Rejected);
        apply_next(&mut desk).await;

        assert_banner(&desk, "Claim already decided");
    }

    #[tokio::test]
    async fn test_busy_panel_ignores_cancellation() {
        let (mut desk, port) = mounted_desk(ClaimFixtures::queue()).await;
        let claim = ClaimFixtures::inpatient();
        port.set_scoring(claim.id.clone(), ScoringFixtures::report_for(&claim, ScoringFixtures::fraud(0.8)));
        let gate = port.hold(GateKey::Decision(claim.id.clone()));

        desk.open_review(claim.clone()).unwrap();
        apply_next(&mut desk).await;
        assert!(desk.decide(Decision::Rejected));

        assert!(!desk.cancel_key());
        assert!(!desk.dismiss_outside());
        assert!(matches!(desk.close_review(), Err(ClaimError::PanelBusy)));
        assert!(matches!(desk.open_review_by_id("CLM52019"), Err(ClaimError::PanelBusy)));
        assert!(!desk.decide(Decision::Approved));
        assert_eq!(desk.panel().current().unwrap().claim().id, claim.id);

        gate.release();
        settle(&mut desk).await;
        assert_panel_phase(&desk, PanelPhase::Closed);
        assert_eq!(port.submitted().len(), 1);
    }

    #[tokio::test]
    async fn test_decided_claim_leaves_queue() {
        let (mut desk, port) = mounted_desk(ClaimFixtures::queue()).await;
        let claim = ClaimFixtures::inpatient();
        port.set_scoring(claim.id.clone(), ScoringFixtures::report_for(&claim, ScoringFixtures::fraud(0.8)));

        desk.open_review(claim.clone()).unwrap();
        apply_next(&mut desk).await;
        desk.decide(Decision::Rejected);
        settle(&mut desk).await;

        assert!(desk.claims().iter().all(|c| c.id != claim.id));
        assert!(desk.claims().iter().all(|c| c.status == ClaimStatus::Pending));
    }
}

// ============================================================================
// Cluster Lookup Tests
// ============================================================================

mod cluster_tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_known_provider() {
        let (desk, port) = mock_desk(Vec::new());
        port.set_cluster(ClusterFixtures::ring("PRV51001"));

        let query = ClusterQuery::new("PRV51001", Some(60)).unwrap();
        let report = desk.lookup_cluster(&query).await.unwrap();
        assert!(report.in_ring);
        assert_eq!(report.providers_in_cluster.len(), 2);
    }

    #[tokio::test]
    async fn test_lookup_failure_message() {
        let (desk, _port) = mock_desk(Vec::new());
        let query = ClusterQuery::new("PRV00000", None).unwrap();
        assert_eq!(desk.lookup_cluster(&query).await.unwrap_err(), "Provider not found");
    }
}
