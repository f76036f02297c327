//! Background recheck sweeps driven through the engine.

use registry_crypto::{keypair_from_seed, sign_message};
use registry_engine::{
    spawn_sweeper, ChallengeRequest, ChallengeTarget, EngineConfig, ErrorKind, RegistryEngine,
    ShutdownController, SubmitProofRequest,
};
use registry_intake::{ChainAddressesForm, RegistrationForm};
use registry_nullables::{NullChain, NullClock, NullFetcher, NullStore};
use registry_store::ProofStore;
use registry_types::{
    ActorId, AlertKind, AlertSeverity, ChainType, OrganizationStatus, ProofLocator, ProofStatus,
    ProofSubmission, SubjectId,
};
use registry_verification::formats::{dns_query_url, txt_record};
use registry_verification::{ChainMethodRequest, ChainRouter, DomainMethod};
use std::sync::Arc;
use std::time::Duration;

const DAY: u64 = 86_400;
const ETH: &str = "0x52908400098527886E0F7030069857D2E4169EE7";

struct Harness {
    engine: Arc<RegistryEngine<NullStore>>,
    store: Arc<NullStore>,
    fetcher: Arc<NullFetcher>,
    chain: Arc<NullChain>,
    clock: Arc<NullClock>,
}

fn harness() -> Harness {
    registry_utils::init_test_tracing();
    let store = Arc::new(NullStore::new());
    let fetcher = Arc::new(NullFetcher::new());
    let chain = Arc::new(NullChain::new());
    let clock = Arc::new(NullClock::new(1_700_000_000));
    let router = ChainRouter::new().with_client(ChainType::Ethereum, chain.clone());
    let engine = RegistryEngine::new(
        EngineConfig::default(),
        store.clone(),
        clock.clone(),
        fetcher.clone(),
        router,
    )
    .unwrap();
    Harness {
        engine: Arc::new(engine),
        store,
        fetcher,
        chain,
        clock,
    }
}

fn owner() -> ActorId {
    ActorId::new("alice")
}

async fn register(h: &Harness) -> SubjectId {
    let form = RegistrationForm {
        name: "Acme DAO".into(),
        website: "https://acme.example".into(),
        founding_date: "2021-06-01".into(),
        team_size: 4,
        chains: ChainAddressesForm {
            ethereum_contracts: vec![ETH.into()],
            ..Default::default()
        },
        ..Default::default()
    };
    h.engine
        .register_organization(&owner(), &form)
        .await
        .unwrap()
        .subject_id
}

/// A verified domain proof. Returns the DNS URL its recheck fetches.
async fn verified_domain(h: &Harness, subject: &SubjectId) -> String {
    let view = h
        .engine
        .request_challenge(
            &owner(),
            &ChallengeRequest {
                subject: subject.clone(),
                target: ChallengeTarget::Domain {
                    method: DomainMethod::DnsTxtRecord,
                },
            },
        )
        .await
        .unwrap();
    let url = dns_query_url("acme.example");
    h.fetcher.respond(&url, 200, &txt_record(&view.token));
    let outcome = h
        .engine
        .submit_proof(
            &owner(),
            &SubmitProofRequest {
                subject: subject.clone(),
                challenge_id: view.challenge_id,
                submission: ProofSubmission::None,
            },
        )
        .await
        .unwrap();
    assert!(outcome.result.success);
    url
}

#[tokio::test]
async fn missing_domain_proof_is_removed_after_grace() {
    let h = harness();
    let subject = register(&h).await;
    let url = verified_domain(&h, &subject).await;

    let report = h.engine.run_sweep().await.unwrap();
    assert_eq!((report.checked, report.healthy), (1, 1));

    h.fetcher.respond(&url, 200, "{}");
    let report = h.engine.run_sweep().await.unwrap();
    assert_eq!(report.pending, 1);
    assert_eq!(h.engine.metrics().pending_removal.get(), 1);
    let proof = &h.store.proofs_for_subject(&subject).unwrap()[0];
    assert_eq!(proof.status, ProofStatus::Active);
    assert!(proof.is_pending_removal());

    h.clock.advance(7 * DAY - 1);
    let report = h.engine.run_sweep().await.unwrap();
    assert_eq!((report.pending, report.removed), (1, 0));

    h.clock.advance(1);
    let report = h.engine.run_sweep().await.unwrap();
    assert_eq!(report.removed, 1);

    let state = h.engine.verification_state(&subject).unwrap();
    assert_eq!(state.proofs[0].status, ProofStatus::Removed);
    assert_eq!(state.verification_score, 0);
    assert_eq!(state.status, OrganizationStatus::Flagged);
    assert_eq!(h.engine.metrics().proofs_removed.get(), 1);
    assert_eq!(h.engine.metrics().pending_removal.get(), 0);

    // Removed proofs are no longer rechecked.
    let report = h.engine.run_sweep().await.unwrap();
    assert_eq!(report.checked, 0);
}

#[tokio::test]
async fn removal_raises_an_alert_for_the_owner_to_close() {
    let h = harness();
    let subject = register(&h).await;
    let url = verified_domain(&h, &subject).await;

    h.fetcher.respond(&url, 200, "{}");
    h.engine.run_sweep().await.unwrap();
    assert!(h.engine.community_alerts(None).unwrap().is_empty());
    h.clock.advance(7 * DAY);
    assert_eq!(h.engine.run_sweep().await.unwrap().removed, 1);

    let alerts = h.engine.subject_alerts(&subject).unwrap();
    assert_eq!(alerts.len(), 1);
    let alert = &alerts[0];
    assert_eq!(alert.kind, AlertKind::ProofRemoved);
    assert_eq!(alert.severity, AlertSeverity::Error);
    assert_eq!(alert.evidence, vec!["acme.example".to_string()]);
    assert_eq!(h.engine.community_alerts(Some(false)).unwrap().len(), 1);

    // A stranger may not close it, and the attempt is itself recorded.
    let err = h
        .engine
        .acknowledge_alert(&ActorId::new("mallory"), &alert.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    let security: Vec<_> = h
        .engine
        .subject_alerts(&subject)
        .unwrap()
        .into_iter()
        .filter(|a| a.kind == AlertKind::SecurityEvent)
        .collect();
    assert_eq!(security.len(), 1);
    assert_eq!(security[0].severity, AlertSeverity::Critical);

    let closed = h.engine.acknowledge_alert(&owner(), &alert.id).await.unwrap();
    assert_eq!(closed.acknowledged_by, Some(owner()));
    let err = h
        .engine
        .acknowledge_alert(&owner(), &alert.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let open = h.engine.community_alerts(Some(false)).unwrap();
    assert!(open.iter().all(|a| a.kind == AlertKind::SecurityEvent));
    assert_eq!(h.engine.community_alerts(Some(true)).unwrap().len(), 1);

    let err = h
        .engine
        .acknowledge_alert(&owner(), "no-such-alert")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn republished_proof_recovers() {
    let h = harness();
    let subject = register(&h).await;
    let url = verified_domain(&h, &subject).await;
    let proof = h.store.proofs_for_subject(&subject).unwrap().remove(0);
    let expected = match &proof.locator {
        ProofLocator::Url { expected, .. } => expected.clone(),
        other => panic!("unexpected locator {other:?}"),
    };

    h.fetcher.respond(&url, 404, "");
    h.engine.run_sweep().await.unwrap();
    h.clock.advance(DAY);

    h.fetcher.respond(&url, 200, &expected);
    let report = h.engine.run_sweep().await.unwrap();
    assert_eq!(report.recovered, 1);
    let proof = h.store.get_proof(&proof.id).unwrap();
    assert!(!proof.is_pending_removal());
    assert!(proof.history.is_empty());
    assert_eq!(h.engine.verification_state(&subject).unwrap().verification_score, 30);
}

#[tokio::test]
async fn rpc_outage_does_not_remove_zero_grace_chain_proof() {
    let h = harness();
    let subject = register(&h).await;
    let key = keypair_from_seed(&[9; 32]);
    h.chain.bind_key(ETH, key.public);

    let view = h
        .engine
        .request_challenge(
            &owner(),
            &ChallengeRequest {
                subject: subject.clone(),
                target: ChallengeTarget::Chain {
                    chain: ChainType::Ethereum,
                    address: ETH.into(),
                    method: ChainMethodRequest::SignMessage,
                },
            },
        )
        .await
        .unwrap();
    let signature = hex::encode(sign_message(view.token.as_bytes(), &key.private));
    h.engine
        .submit_proof(
            &owner(),
            &SubmitProofRequest {
                subject: subject.clone(),
                challenge_id: view.challenge_id,
                submission: ProofSubmission::Signature(signature),
            },
        )
        .await
        .unwrap();

    h.chain.set_failing(true);
    let report = h.engine.run_sweep().await.unwrap();
    assert_eq!((report.pending, report.removed), (1, 0));
    assert_eq!(h.engine.metrics().recheck_failures.get(), 1);

    h.clock.advance(DAY - 1);
    let report = h.engine.run_sweep().await.unwrap();
    assert_eq!(report.removed, 0);

    h.clock.advance(1);
    let report = h.engine.run_sweep().await.unwrap();
    assert_eq!(report.removed, 1);
}

#[tokio::test(start_paused = true)]
async fn hanging_fetch_is_bounded_by_check_timeout() {
    let h = harness();
    let subject = register(&h).await;
    let url = verified_domain(&h, &subject).await;

    h.fetcher.delay(&url, Duration::from_secs(3_600));
    let started = tokio::time::Instant::now();
    let report = h.engine.run_sweep().await.unwrap();
    assert!(started.elapsed() < Duration::from_secs(60));
    assert_eq!((report.pending, report.removed), (1, 0));
    let proof = &h.store.proofs_for_subject(&subject).unwrap()[0];
    assert_eq!(proof.status, ProofStatus::Active);
}

#[tokio::test]
async fn sweeper_stops_on_shutdown() {
    let h = harness();
    let shutdown = ShutdownController::new();
    let handle = spawn_sweeper(Arc::clone(&h.engine), shutdown.subscribe());
    shutdown.shutdown();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("sweeper did not stop")
        .unwrap();

    let text = h.engine.metrics().encode().unwrap();
    assert!(text.contains("registry_rechecks_total"));
}
