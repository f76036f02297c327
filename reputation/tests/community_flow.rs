use registry_nullables::NullStore;
use registry_reputation::{
    add_testimonial, community_validation, detect_fraud_signals, endorse, leaderboard,
    organizations_by_reputation, recompute_scores, stake_reputation, verify_testimonial, vouch,
    CommunityValidationStats, FraudSignal, ReputationError,
};
use registry_store::{IdentityStore, ProofStore};
use registry_types::{
    ActorId, OrganizationIdentity, OrganizationStatus, Platform, ProofLocator, ProofStatus,
    SubjectId, Timestamp, TrustParams, VerificationMethod, VerificationProof,
};

fn register(store: &NullStore, id: &str, reputation: u32) -> SubjectId {
    let mut org = OrganizationIdentity::new(id.into(), format!("{id}-owner").into(), Timestamp::new(0));
    org.basic_info.name = id.to_uppercase();
    org.reputation_score = reputation;
    store.put_identity(&org).unwrap();
    org.id
}

fn domain_proof(subject: &SubjectId) -> VerificationProof {
    VerificationProof {
        id: format!("{subject}-domain").into(),
        subject: subject.clone(),
        platform: Platform::Domain,
        target: "example.com".into(),
        challenge_id: "c".into(),
        locator: ProofLocator::Url {
            url: "https://dns.google/resolve?name=example.com&type=TXT".into(),
            expected: "tok".into(),
        },
        method: VerificationMethod::DnsTxtRecord,
        verified_at: Timestamp::new(0),
        status: ProofStatus::Active,
        required_text: None,
        pending_removal_since: None,
        history: Vec::new(),
    }
}

#[test]
fn endorsement_rules() {
    let store = NullStore::new();
    let acme = register(&store, "acme", 0);
    let strong = register(&store, "strong", 10);
    let weak = register(&store, "weak", 9);
    let params = TrustParams::default();
    let actor = ActorId::from("bob");
    let now = Timestamp::new(100);

    assert!(matches!(
        endorse(&store, &acme, &actor, &acme, String::new(), &params.reputation, now),
        Err(ReputationError::SelfEndorsement)
    ));
    assert!(matches!(
        endorse(&store, &weak, &actor, &acme, String::new(), &params.reputation, now),
        Err(ReputationError::EndorserReputationTooLow { have: 9, need: 10 })
    ));
    assert!(matches!(
        endorse(&store, &"ghost".into(), &actor, &acme, String::new(), &params.reputation, now),
        Err(ReputationError::SubjectNotFound(_))
    ));
    endorse(&store, &strong, &actor, &acme, "solid team".into(), &params.reputation, now).unwrap();
    assert!(matches!(
        endorse(&store, &strong, &actor, &acme, String::new(), &params.reputation, now),
        Err(ReputationError::AlreadyEndorsed { .. })
    ));

    let snapshot = recompute_scores(&store, &acme, &params, now).unwrap();
    assert_eq!(snapshot.reputation_score, 10);
}

#[test]
fn scores_follow_attestations_and_proofs() {
    let store = NullStore::new();
    let acme = register(&store, "acme", 0);
    let params = TrustParams::default();
    let now = Timestamp::new(100);

    store.append_proof(&domain_proof(&acme)).unwrap();
    let first = recompute_scores(&store, &acme, &params, now).unwrap();
    assert_eq!(first.verification_score, 30);
    assert_eq!(first.reputation_score, 7);
    let again = recompute_scores(&store, &acme, &params, now).unwrap();
    assert_eq!(first, again);

    let t = add_testimonial(&store, &acme, "Ann Lee".into(), "Auditor".into(), "legit".into(), now).unwrap();
    assert!(!t.verified);
    assert_eq!(recompute_scores(&store, &acme, &params, now).unwrap().reputation_score, 9);
    verify_testimonial(&store, &acme, &t.id).unwrap();
    assert_eq!(recompute_scores(&store, &acme, &params, now).unwrap().reputation_score, 12);
    assert!(matches!(
        verify_testimonial(&store, &acme, "testimonial-99"),
        Err(ReputationError::TestimonialNotFound(_))
    ));

    let v = vouch(&store, &"carol".into(), &acme, "trust them".into(), now).unwrap();
    assert_eq!(v.weight, 1);
    assert_eq!(stake_reputation(&store, &acme, 1_000).unwrap(), 1_000);
    let snap = recompute_scores(&store, &acme, &params, now).unwrap();
    // 30/4 + 5 + 3*1 + 2*3
    assert_eq!(snap.reputation_score, 21);
    assert_eq!(snap.status, OrganizationStatus::Verified);

    let stored = store.get_identity(&acme).unwrap();
    assert_eq!(stored.reputation_score, 21);
    assert_eq!(stored.reputation_staked, 1_000);

    let mut removed = domain_proof(&acme);
    removed.transition(ProofStatus::Removed, now, "gone");
    store.update_proof(&removed).unwrap();
    let snap = recompute_scores(&store, &acme, &params, now).unwrap();
    assert_eq!(snap.verification_score, 0);
    assert_eq!(snap.status, OrganizationStatus::Flagged);
}

#[test]
fn vouch_weight_grows_with_voucher_activity() {
    let store = NullStore::new();
    let subjects: Vec<_> = (0..4).map(|i| register(&store, &format!("org{i}"), 0)).collect();
    let carol = ActorId::from("carol");
    let weights: Vec<u32> = subjects
        .iter()
        .map(|s| vouch(&store, &carol, s, String::new(), Timestamp::new(0)).unwrap().weight)
        .collect();
    assert_eq!(weights, vec![1, 1, 1, 2]);
}

#[test]
fn fraud_signals_are_reported() {
    let store = NullStore::new();
    let params = TrustParams::default();
    let acme = register(&store, "acme", 50);
    let endorsers: Vec<_> = (0..6).map(|i| register(&store, &format!("e{i}"), 50)).collect();
    for (i, e) in endorsers.iter().enumerate() {
        endorse(&store, e, &"x".into(), &acme, String::new(), &params.reputation, Timestamp::new(100 + i as u64 * 60)).unwrap();
    }
    endorse(&store, &acme, &"x".into(), &endorsers[0], String::new(), &params.reputation, Timestamp::new(1_000)).unwrap();

    for s in [&acme, &endorsers[1], &endorsers[2], &endorsers[3]] {
        add_testimonial(&store, s, "Mallory".into(), "CEO".into(), String::new(), Timestamp::new(0)).unwrap();
    }

    let signals = detect_fraud_signals(&store, &acme).unwrap();
    assert!(signals.contains(&FraudSignal::EndorsementBurst {
        count: 6,
        window_start: Timestamp::new(100)
    }));
    assert!(signals.contains(&FraudSignal::MutualEndorsement {
        other: endorsers[0].clone()
    }));
    assert!(signals.contains(&FraudSignal::SharedTestimonialAuthor {
        author: "mallory".into(),
        other_subjects: 3
    }));

    assert!(detect_fraud_signals(&store, &endorsers[5]).unwrap().is_empty());
}

#[test]
fn leaderboard_orders_by_reputation() {
    let store = NullStore::new();
    register(&store, "a", 5);
    register(&store, "b", 40);
    register(&store, "c", 40);
    let mut suspended = OrganizationIdentity::new("d".into(), "o".into(), Timestamp::new(0));
    suspended.reputation_score = 99;
    suspended.status = OrganizationStatus::Suspended;
    store.put_identity(&suspended).unwrap();

    let top: Vec<String> = leaderboard(&store, 2)
        .unwrap()
        .into_iter()
        .map(|e| e.subject.to_string())
        .collect();
    assert_eq!(top, vec!["b", "c"]);
}

#[test]
fn reputation_floor_filters_listing() {
    let store = NullStore::new();
    register(&store, "a", 5);
    register(&store, "b", 40);
    register(&store, "c", 60);

    let names: Vec<String> = organizations_by_reputation(&store, 40, 50)
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, vec!["C", "B"]);
    assert!(organizations_by_reputation(&store, 61, 50).unwrap().is_empty());
    assert_eq!(organizations_by_reputation(&store, 0, 1).unwrap().len(), 1);
}

#[test]
fn community_validation_lists_every_attestation() {
    let store = NullStore::new();
    let acme = register(&store, "acme", 0);
    add_testimonial(
        &store,
        &acme,
        "Ann".into(),
        "CTO".into(),
        "great".into(),
        Timestamp::new(1),
    )
    .unwrap();
    vouch(&store, &ActorId::from("carol"), &acme, String::new(), Timestamp::new(2)).unwrap();

    let record = community_validation(&store, &acme).unwrap();
    assert_eq!(record.testimonials.len(), 1);
    assert_eq!(record.vouches.len(), 1);
    let stats = CommunityValidationStats::from_state(&record);
    assert_eq!((stats.total_testimonials, stats.total_vouches), (1, 1));

    assert!(matches!(
        community_validation(&store, &"ghost".into()),
        Err(ReputationError::SubjectNotFound(_))
    ));
}
