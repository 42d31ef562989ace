//! End-to-end turn flow tests with mocked services
//!
//! The orchestrator is driven against scripted trait implementations, so every
//! dialogue path runs without network services or real audio hardware.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use sahayak_agent::{ConversationSession, SessionConfig};
use sahayak_audio::{AudioBackend, AudioDeviceManager};
use sahayak_core::{
    AgentStatus, AgentTurnResult, AnswerGate, AssistantModel, AudioResource, DeviceError, Error,
    GateDecision, Language, ProfileSnapshot, ProfileSource, RegistrationBackend, Result,
    SpeechToText, TextToSpeech, Turn,
};
use sahayak_pipeline::{
    messages, FailureLeg, OrchestratorEvent, OrchestratorState, TurnOutcome, VoiceOrchestrator,
};

#[derive(Default)]
struct FakeAudio {
    playing: AtomicBool,
    /// When set, playback never completes on its own
    hold_playback: AtomicBool,
}

impl AudioBackend for FakeAudio {
    fn start_capture(&self) -> std::result::Result<(), DeviceError> {
        Ok(())
    }

    fn finish_capture(&self) -> std::result::Result<AudioResource, DeviceError> {
        Ok(AudioResource::new(vec![0u8; 64], 16000))
    }

    fn abort_capture(&self) {}

    fn start_playback(&self, _resource: &AudioResource) -> std::result::Result<(), DeviceError> {
        self.playing.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop_playback(&self) {
        self.playing.store(false, Ordering::SeqCst);
    }

    fn playback_active(&self) -> bool {
        self.hold_playback.load(Ordering::SeqCst) && self.playing.load(Ordering::SeqCst)
    }
}

struct FakeStt {
    transcript: String,
    fail: bool,
    /// Optional rendezvous: signal entry, then block until released
    gate: Option<(Arc<Notify>, Arc<Notify>)>,
    calls: AtomicUsize,
}

impl FakeStt {
    fn ok(transcript: &str) -> Self {
        Self {
            transcript: transcript.to_string(),
            fail: false,
            gate: None,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::ok("")
        }
    }
}

#[async_trait]
impl SpeechToText for FakeStt {
    async fn transcribe(&self, _audio: &AudioResource, _language: Language) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some((entered, release)) = &self.gate {
            entered.notify_one();
            release.notified().await;
        }
        if self.fail {
            return Err(Error::Transcription("service unavailable".into()));
        }
        Ok(self.transcript.clone())
    }
}

struct FakeTts {
    fail: bool,
    calls: AtomicUsize,
}

impl FakeTts {
    fn ok() -> Self {
        Self {
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TextToSpeech for FakeTts {
    async fn synthesize(&self, _text: &str, _language: Language) -> Result<AudioResource> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::Synthesis("quota exceeded".into()));
        }
        Ok(AudioResource::new(vec![0u8; 32], 22050))
    }
}

enum GateScript {
    Decide(GateDecision),
    Fail,
}

struct FakeGate {
    script: Mutex<VecDeque<GateScript>>,
    gate: Option<(Arc<Notify>, Arc<Notify>)>,
    calls: AtomicUsize,
    seen_pending: Mutex<Vec<Option<String>>>,
}

impl FakeGate {
    fn scripted(script: Vec<GateScript>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            gate: None,
            calls: AtomicUsize::new(0),
            seen_pending: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AnswerGate for FakeGate {
    async fn evaluate(
        &self,
        _history: &[Turn],
        pending_request: Option<&str>,
        _utterance: &str,
        _language: Language,
    ) -> Result<GateDecision> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_pending
            .lock()
            .push(pending_request.map(str::to_string));
        if let Some((entered, release)) = &self.gate {
            entered.notify_one();
            release.notified().await;
        }
        match self.script.lock().pop_front() {
            Some(GateScript::Decide(decision)) => Ok(decision),
            Some(GateScript::Fail) => Err(Error::Reasoning("model overloaded".into())),
            None => panic!("gate called more times than scripted"),
        }
    }
}

struct FakeAssistant {
    reply: String,
    calls: AtomicUsize,
}

impl FakeAssistant {
    fn ok(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AssistantModel for FakeAssistant {
    async fn respond(
        &self,
        _history: &[Turn],
        _utterance: &str,
        _language: Language,
    ) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }
}

struct FakeBackend {
    script: Mutex<VecDeque<AgentTurnResult>>,
    fail: bool,
    gate: Option<(Arc<Notify>, Arc<Notify>)>,
    calls: AtomicUsize,
    seen_profiles: Mutex<Vec<ProfileSnapshot>>,
}

impl FakeBackend {
    fn scripted(script: Vec<AgentTurnResult>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fail: false,
            gate: None,
            calls: AtomicUsize::new(0),
            seen_profiles: Mutex::new(Vec::new()),
        }
    }

    fn unreachable() -> Self {
        Self {
            fail: true,
            ..Self::scripted(Vec::new())
        }
    }
}

#[async_trait]
impl RegistrationBackend for FakeBackend {
    async fn chat(
        &self,
        _session_id: &str,
        _message: &str,
        profile: &ProfileSnapshot,
    ) -> Result<AgentTurnResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_profiles.lock().push(profile.clone());
        if let Some((entered, release)) = &self.gate {
            entered.notify_one();
            release.notified().await;
        }
        if self.fail {
            return Err(Error::Backend("connection refused".into()));
        }
        self.script
            .lock()
            .pop_front()
            .ok_or_else(|| Error::Backend("backend called more times than scripted".into()))
    }
}

struct FakeProfile {
    snapshot: Mutex<ProfileSnapshot>,
}

impl FakeProfile {
    fn sample() -> Self {
        Self {
            snapshot: Mutex::new(ProfileSnapshot {
                name: "Ramesh Pawar".into(),
                mobile: "9876543210".into(),
                state: "Maharashtra".into(),
                district: "Nashik".into(),
                taluka: "Dindori".into(),
                language: "mr".into(),
                documents: vec!["aadhaar".into(), "bank_passbook".into()],
            }),
        }
    }
}

impl ProfileSource for FakeProfile {
    fn snapshot(&self) -> ProfileSnapshot {
        self.snapshot.lock().clone()
    }
}

struct Harness {
    audio: Arc<FakeAudio>,
    stt: Arc<FakeStt>,
    tts: Arc<FakeTts>,
    gate: Arc<FakeGate>,
    assistant: Arc<FakeAssistant>,
    backend: Arc<FakeBackend>,
}

impl Harness {
    fn new() -> Self {
        Self {
            audio: Arc::new(FakeAudio::default()),
            stt: Arc::new(FakeStt::ok("मेरी फसल गेहूं है")),
            tts: Arc::new(FakeTts::ok()),
            gate: Arc::new(FakeGate::scripted(Vec::new())),
            assistant: Arc::new(FakeAssistant::ok("generic reply")),
            backend: Arc::new(FakeBackend::scripted(Vec::new())),
        }
    }

    fn build(&self) -> Arc<VoiceOrchestrator> {
        let device = Arc::new(AudioDeviceManager::new(self.audio.clone()));
        Arc::new(VoiceOrchestrator::new(
            device,
            self.stt.clone(),
            self.tts.clone(),
            self.gate.clone(),
            self.assistant.clone(),
            self.backend.clone(),
            Arc::new(FakeProfile::sample()),
        ))
    }
}

fn scheme_session() -> ConversationSession {
    ConversationSession::new(Some("PMFBY".into()), SessionConfig::default())
}

fn scheme_session_in(language: Language) -> ConversationSession {
    ConversationSession::new(
        Some("PMFBY".into()),
        SessionConfig {
            language,
            history_limit: None,
        },
    )
}

fn generic_session() -> ConversationSession {
    ConversationSession::new(None, SessionConfig::default())
}

fn requires_input(message: &str, options: Option<Vec<&str>>) -> AgentTurnResult {
    AgentTurnResult {
        status: AgentStatus::RequiresInput,
        message: message.to_string(),
        options: options.map(|o| o.into_iter().map(str::to_string).collect()),
    }
}

async fn run_turn(
    orchestrator: &VoiceOrchestrator,
    session: &mut ConversationSession,
) -> TurnOutcome {
    orchestrator.start_recording().unwrap();
    orchestrator.finish_turn(session).await.unwrap()
}

#[tokio::test]
async fn scheme_bootstrap_seeds_system_and_spoken_greeting() {
    let harness = Harness::new();
    let orchestrator = harness.build();
    let mut session = scheme_session();

    orchestrator.bootstrap(&mut session).await.unwrap();

    let history = session.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, sahayak_core::TurnRole::System);
    assert_eq!(history[1].role, sahayak_core::TurnRole::Assistant);
    assert!(history[1].content.contains("फसल बीमा"));
    assert_eq!(harness.tts.calls.load(Ordering::SeqCst), 1);
    assert_eq!(orchestrator.state(), OrchestratorState::Idle);

    // bootstrapping twice is a no-op
    orchestrator.bootstrap(&mut session).await.unwrap();
    assert_eq!(session.history().len(), 2);
}

#[tokio::test]
async fn generic_bootstrap_seeds_only_the_system_turn() {
    let harness = Harness::new();
    let orchestrator = harness.build();
    let mut session = generic_session();

    orchestrator.bootstrap(&mut session).await.unwrap();

    assert_eq!(session.history().len(), 1);
    assert_eq!(harness.tts.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn clarification_is_spoken_and_pending_request_survives() {
    let mut harness = Harness::new();
    harness.gate = Arc::new(FakeGate::scripted(vec![GateScript::Decide(
        GateDecision::Clarify("आपकी फसल कौन सी है?".into()),
    )]));
    let orchestrator = harness.build();
    let mut session = scheme_session();
    orchestrator.bootstrap(&mut session).await.unwrap();
    session.set_pending_backend_request(Some("Which crop?".into()));
    let before = session.history().len();

    let outcome = run_turn(&orchestrator, &mut session).await;

    match outcome {
        TurnOutcome::Replied { text, spoken } => {
            assert_eq!(text, "आपकी फसल कौन सी है?");
            assert!(spoken);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    // clarification never reaches the backend, never clears the pending ask
    assert_eq!(harness.backend.calls.load(Ordering::SeqCst), 0);
    assert_eq!(session.pending_backend_request(), Some("Which crop?"));
    assert_eq!(session.history().len(), before + 2);
    assert_eq!(
        harness.gate.seen_pending.lock()[0].as_deref(),
        Some("Which crop?")
    );
}

#[tokio::test]
async fn sufficient_answer_dispatches_with_fresh_profile_and_sets_pending() {
    let mut harness = Harness::new();
    harness.gate = Arc::new(FakeGate::scripted(vec![GateScript::Decide(
        GateDecision::Sufficient,
    )]));
    harness.backend = Arc::new(FakeBackend::scripted(vec![requires_input(
        "Are you the cultivator of this land?",
        Some(vec!["Yes", "No"]),
    )]));
    let orchestrator = harness.build();
    let mut session = scheme_session_in(Language::English);
    orchestrator.bootstrap(&mut session).await.unwrap();

    let outcome = run_turn(&orchestrator, &mut session).await;

    let TurnOutcome::Replied { text, spoken } = outcome else {
        panic!("expected a reply");
    };
    assert!(spoken);
    assert!(text.starts_with("Are you the cultivator"));
    assert!(text.ends_with("Option 2: No."));
    // the next question becomes the pending backend request, options included
    assert_eq!(session.pending_backend_request(), Some(text.as_str()));
    assert_eq!(harness.backend.seen_profiles.lock()[0].district, "Nashik");
    // user transcript + assistant reply committed together
    let history = session.history();
    assert_eq!(history[history.len() - 2].content, "मेरी फसल गेहूं है");
    assert_eq!(history[history.len() - 1].content, text);
}

#[tokio::test]
async fn ready_to_submit_clears_pending_and_asks_for_confirmation() {
    let mut harness = Harness::new();
    harness.gate = Arc::new(FakeGate::scripted(vec![GateScript::Decide(
        GateDecision::Sufficient,
    )]));
    harness.backend = Arc::new(FakeBackend::scripted(vec![AgentTurnResult {
        status: AgentStatus::ReadyToSubmit,
        message: "सभी जानकारी मिल गई है।".into(),
        options: None,
    }]));
    let orchestrator = harness.build();
    let mut session = scheme_session();
    orchestrator.bootstrap(&mut session).await.unwrap();
    session.set_pending_backend_request(Some("Which crop?".into()));

    let outcome = run_turn(&orchestrator, &mut session).await;

    let TurnOutcome::Replied { text, .. } = outcome else {
        panic!("expected a reply");
    };
    assert!(text.starts_with("सभी जानकारी मिल गई है।"));
    assert!(text.contains("क्या मैं आपका आवेदन जमा कर दूँ?"));
    assert!(session.pending_backend_request().is_none());
}

#[tokio::test]
async fn backend_domain_error_is_a_normal_spoken_reply() {
    let mut harness = Harness::new();
    harness.gate = Arc::new(FakeGate::scripted(vec![GateScript::Decide(
        GateDecision::Sufficient,
    )]));
    harness.backend = Arc::new(FakeBackend::scripted(vec![AgentTurnResult {
        status: AgentStatus::Error,
        message: "Aadhaar number did not validate".into(),
        options: None,
    }]));
    let orchestrator = harness.build();
    let mut session = scheme_session();
    orchestrator.bootstrap(&mut session).await.unwrap();
    let before = session.history().len();

    let outcome = run_turn(&orchestrator, &mut session).await;

    let TurnOutcome::Replied { text, .. } = outcome else {
        panic!("expected a reply");
    };
    assert!(text.contains("Aadhaar number did not validate"));
    // the error turn is still a committed exchange
    assert_eq!(session.history().len(), before + 2);
}

#[tokio::test]
async fn transcription_failure_leaves_history_untouched() {
    let mut harness = Harness::new();
    harness.stt = Arc::new(FakeStt::failing());
    let orchestrator = harness.build();
    let mut session = scheme_session();
    orchestrator.bootstrap(&mut session).await.unwrap();
    let before = session.history().len();

    let outcome = run_turn(&orchestrator, &mut session).await;

    assert_eq!(
        outcome,
        TurnOutcome::Failed {
            leg: FailureLeg::Transcription
        }
    );
    assert_eq!(session.history().len(), before);
    assert_eq!(orchestrator.state(), OrchestratorState::Idle);
    assert_eq!(harness.gate.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn gate_failure_leaves_history_untouched() {
    let mut harness = Harness::new();
    harness.gate = Arc::new(FakeGate::scripted(vec![GateScript::Fail]));
    let orchestrator = harness.build();
    let mut session = scheme_session();
    orchestrator.bootstrap(&mut session).await.unwrap();
    let before = session.history().len();

    let outcome = run_turn(&orchestrator, &mut session).await;

    assert_eq!(
        outcome,
        TurnOutcome::Failed {
            leg: FailureLeg::Reasoning
        }
    );
    assert_eq!(session.history().len(), before);
    assert_eq!(harness.backend.calls.load(Ordering::SeqCst), 0);
    assert_eq!(orchestrator.state(), OrchestratorState::Idle);
}

#[tokio::test]
async fn unreachable_backend_leaves_history_untouched() {
    let mut harness = Harness::new();
    harness.gate = Arc::new(FakeGate::scripted(vec![GateScript::Decide(
        GateDecision::Sufficient,
    )]));
    harness.backend = Arc::new(FakeBackend::unreachable());
    let orchestrator = harness.build();
    let mut session = scheme_session();
    orchestrator.bootstrap(&mut session).await.unwrap();
    session.set_pending_backend_request(Some("Which crop?".into()));
    let before = session.history().len();

    let outcome = run_turn(&orchestrator, &mut session).await;

    assert_eq!(
        outcome,
        TurnOutcome::Failed {
            leg: FailureLeg::Backend
        }
    );
    assert_eq!(session.history().len(), before);
    assert_eq!(session.pending_backend_request(), Some("Which crop?"));
}

#[tokio::test]
async fn synthesis_failure_keeps_the_reply_as_display_only() {
    let mut harness = Harness::new();
    harness.gate = Arc::new(FakeGate::scripted(vec![GateScript::Decide(
        GateDecision::Clarify("Which district?".into()),
    )]));
    harness.tts = Arc::new(FakeTts::failing());
    let orchestrator = harness.build();
    let mut session = scheme_session();
    // skip the greeting so bootstrap does not hit the failing synthesizer
    session.seed_system("instruction");
    let before = session.history().len();
    let mut events = orchestrator.subscribe();

    let outcome = run_turn(&orchestrator, &mut session).await;

    let TurnOutcome::Replied { text, spoken } = outcome else {
        panic!("expected a reply");
    };
    assert_eq!(text, "Which district?");
    assert!(!spoken);
    // reply text still lands in history even though nothing played
    assert_eq!(session.history().len(), before + 2);
    assert_eq!(orchestrator.state(), OrchestratorState::Idle);

    // the failure event carries the localized apology, not the raw error
    let mut failure_message = None;
    while let Ok(event) = events.try_recv() {
        if let OrchestratorEvent::TurnFailed { leg, message } = event {
            assert_eq!(leg, FailureLeg::Synthesis);
            failure_message = Some(message);
        }
    }
    assert_eq!(
        failure_message.as_deref(),
        Some(messages::synthesis_failed(Language::Hindi))
    );
}

#[tokio::test]
async fn generic_session_uses_the_assistant_not_the_gate() {
    let harness = Harness::new();
    let orchestrator = harness.build();
    let mut session = generic_session();
    orchestrator.bootstrap(&mut session).await.unwrap();

    let outcome = run_turn(&orchestrator, &mut session).await;

    let TurnOutcome::Replied { text, .. } = outcome else {
        panic!("expected a reply");
    };
    assert_eq!(text, "generic reply");
    assert_eq!(harness.assistant.calls.load(Ordering::SeqCst), 1);
    assert_eq!(harness.gate.calls.load(Ordering::SeqCst), 0);
    assert_eq!(harness.backend.calls.load(Ordering::SeqCst), 0);
    assert_eq!(session.history().len(), 3); // system + one exchange
}

#[tokio::test]
async fn recording_is_rejected_while_a_turn_is_in_flight() {
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let mut harness = Harness::new();
    harness.stt = Arc::new(FakeStt {
        gate: Some((entered.clone(), release.clone())),
        ..FakeStt::ok("wheat")
    });
    harness.gate = Arc::new(FakeGate::scripted(vec![GateScript::Decide(
        GateDecision::Clarify("Which district?".into()),
    )]));
    let orchestrator = harness.build();
    let mut session = scheme_session();
    session.seed_system("instruction");

    orchestrator.start_recording().unwrap();
    let worker = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move {
            let outcome = orchestrator.finish_turn(&mut session).await.unwrap();
            (outcome, session)
        })
    };

    entered.notified().await;
    assert_eq!(orchestrator.state(), OrchestratorState::Transcribing);
    assert!(orchestrator.start_recording().is_err());

    release.notify_one();
    let (outcome, _) = worker.await.unwrap();
    assert!(matches!(outcome, TurnOutcome::Replied { .. }));
}

#[tokio::test]
async fn recording_is_rejected_while_reasoning_and_dispatching() {
    let gate_entered = Arc::new(Notify::new());
    let gate_release = Arc::new(Notify::new());
    let backend_entered = Arc::new(Notify::new());
    let backend_release = Arc::new(Notify::new());
    let mut harness = Harness::new();
    harness.gate = Arc::new(FakeGate {
        gate: Some((gate_entered.clone(), gate_release.clone())),
        ..FakeGate::scripted(vec![GateScript::Decide(GateDecision::Sufficient)])
    });
    harness.backend = Arc::new(FakeBackend {
        gate: Some((backend_entered.clone(), backend_release.clone())),
        ..FakeBackend::scripted(vec![requires_input("Which district?", None)])
    });
    let orchestrator = harness.build();
    let mut session = scheme_session();
    session.seed_system("instruction");

    orchestrator.start_recording().unwrap();
    let worker = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move {
            let outcome = orchestrator.finish_turn(&mut session).await.unwrap();
            (outcome, session)
        })
    };

    gate_entered.notified().await;
    assert_eq!(orchestrator.state(), OrchestratorState::Reasoning);
    assert!(orchestrator.start_recording().is_err());
    gate_release.notify_one();

    backend_entered.notified().await;
    assert_eq!(orchestrator.state(), OrchestratorState::Dispatching);
    assert!(orchestrator.start_recording().is_err());
    backend_release.notify_one();

    let (outcome, session) = worker.await.unwrap();
    assert!(matches!(outcome, TurnOutcome::Replied { .. }));
    // the rejected attempts left no trace
    assert_eq!(session.history().len(), 3);
    assert_eq!(orchestrator.state(), OrchestratorState::Idle);
}

#[tokio::test]
async fn interrupt_during_reasoning_discards_the_result() {
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let mut harness = Harness::new();
    harness.gate = Arc::new(FakeGate {
        gate: Some((entered.clone(), release.clone())),
        ..FakeGate::scripted(vec![GateScript::Decide(GateDecision::Sufficient)])
    });
    let orchestrator = harness.build();
    let mut session = scheme_session();
    session.seed_system("instruction");
    session.set_pending_backend_request(Some("Which crop?".into()));

    orchestrator.start_recording().unwrap();
    let worker = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move {
            let outcome = orchestrator.finish_turn(&mut session).await.unwrap();
            (outcome, session)
        })
    };

    entered.notified().await;
    orchestrator.interrupt();
    release.notify_one();

    let (outcome, session) = worker.await.unwrap();
    assert_eq!(outcome, TurnOutcome::Superseded);
    // the completed gate call changed nothing
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.pending_backend_request(), Some("Which crop?"));
    assert_eq!(harness.backend.calls.load(Ordering::SeqCst), 0);
    assert_eq!(orchestrator.state(), OrchestratorState::Idle);
}

#[tokio::test]
async fn interrupt_during_playback_cuts_audio_and_keeps_history() {
    let harness = Harness::new();
    harness.audio.hold_playback.store(true, Ordering::SeqCst);
    let orchestrator = harness.build();
    let mut session = scheme_session();

    let worker = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move {
            orchestrator.bootstrap(&mut session).await.unwrap();
            session
        })
    };

    // wait for playback of the greeting to start
    while orchestrator.state() != OrchestratorState::Speaking {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    orchestrator.interrupt();

    let session = worker.await.unwrap();
    assert_eq!(session.history().len(), 2); // greeting stays committed
    assert!(!harness.audio.playing.load(Ordering::SeqCst));
    assert_eq!(orchestrator.state(), OrchestratorState::Idle);
}

#[tokio::test]
async fn recording_during_playback_barges_in() {
    let harness = Harness::new();
    harness.audio.hold_playback.store(true, Ordering::SeqCst);
    let orchestrator = harness.build();
    let mut session = scheme_session();

    let worker = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move {
            orchestrator.bootstrap(&mut session).await.unwrap();
            session
        })
    };

    while orchestrator.state() != OrchestratorState::Speaking {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    orchestrator.start_recording().unwrap();

    worker.await.unwrap();
    assert_eq!(orchestrator.state(), OrchestratorState::Listening);
    assert!(!harness.audio.playing.load(Ordering::SeqCst));
}

#[tokio::test]
async fn finish_without_recording_is_rejected() {
    let harness = Harness::new();
    let orchestrator = harness.build();
    let mut session = generic_session();
    session.seed_system("instruction");

    assert!(orchestrator.finish_turn(&mut session).await.is_err());
    assert_eq!(orchestrator.state(), OrchestratorState::Idle);
}
