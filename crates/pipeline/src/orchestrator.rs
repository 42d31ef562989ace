//! Conversation orchestrator
//!
//! Sequences the audio device, transcription, reasoning gate, registration
//! backend and speech synthesis into one stateful dialogue:
//!
//! `Idle -> Listening -> Transcribing -> (Reasoning)? -> (Dispatching)? ->
//! Synthesizing -> Speaking -> Idle`
//!
//! A single state enum is the source of truth for which operations are legal;
//! illegal calls are rejected, never queued. Every turn captures a generation
//! counter at dispatch; an interrupt bumps it, and a completed await whose
//! counter is stale discards its result instead of applying it to a turn the
//! user has already abandoned.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;

use sahayak_agent::ConversationSession;
use sahayak_audio::{AudioDeviceManager, PlaybackHandle, RecordingHandle};
use sahayak_core::{
    AgentStatus, AnswerGate, AssistantModel, Error, GateDecision, Language, ProfileSource,
    RegistrationBackend, Result, SpeechToText, TextToSpeech, Utterance,
};
use sahayak_llm::prompt;

use crate::messages;

/// Orchestrator state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorState {
    /// Waiting for user input
    Idle,
    /// Microphone held, user speaking
    Listening,
    /// STT call in flight
    Transcribing,
    /// Reasoning gate or generic assistant call in flight
    Reasoning,
    /// Registration backend call in flight
    Dispatching,
    /// TTS call in flight
    Synthesizing,
    /// Speaker held, reply playing
    Speaking,
}

/// Which leg of a turn failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureLeg {
    Transcription,
    Reasoning,
    Backend,
    Synthesis,
}

/// Events emitted toward the UI layer
#[derive(Debug, Clone)]
pub enum OrchestratorEvent {
    StateChanged(OrchestratorState),
    /// Final transcript of the user's utterance
    TranscriptReady { text: String },
    /// Assistant reply, recorded in history and displayed; `spoken` is false
    /// when synthesis failed and only the text is available
    AssistantMessage { text: String, spoken: bool },
    /// A turn leg failed; `message` is the localized apology to display
    TurnFailed { leg: FailureLeg, message: String },
    /// Playback or recording was cut by the user
    Interrupted,
}

/// Result of one completed `finish_turn` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The assistant replied; `spoken` mirrors whether playback happened
    Replied { text: String, spoken: bool },
    /// A leg failed; history is unchanged and the state is back to idle
    Failed { leg: FailureLeg },
    /// The user interrupted while a call was in flight; the result was
    /// discarded without touching session or state
    Superseded,
}

/// The voice conversation orchestrator
///
/// One instance processes one logical conversation at a time. The session is
/// owned by the screen controller and passed in explicitly.
pub struct VoiceOrchestrator {
    device: Arc<AudioDeviceManager>,
    stt: Arc<dyn SpeechToText>,
    tts: Arc<dyn TextToSpeech>,
    gate: Arc<dyn AnswerGate>,
    assistant: Arc<dyn AssistantModel>,
    backend: Arc<dyn RegistrationBackend>,
    profile: Arc<dyn ProfileSource>,
    state: Mutex<OrchestratorState>,
    recording: Mutex<Option<RecordingHandle>>,
    playback: Mutex<Option<PlaybackHandle>>,
    /// Bumped on every interrupt; stale turns discard their results
    generation: AtomicU64,
    events: broadcast::Sender<OrchestratorEvent>,
}

impl VoiceOrchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        device: Arc<AudioDeviceManager>,
        stt: Arc<dyn SpeechToText>,
        tts: Arc<dyn TextToSpeech>,
        gate: Arc<dyn AnswerGate>,
        assistant: Arc<dyn AssistantModel>,
        backend: Arc<dyn RegistrationBackend>,
        profile: Arc<dyn ProfileSource>,
    ) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            device,
            stt,
            tts,
            gate,
            assistant,
            backend,
            profile,
            state: Mutex::new(OrchestratorState::Idle),
            recording: Mutex::new(None),
            playback: Mutex::new(None),
            generation: AtomicU64::new(0),
            events,
        }
    }

    /// Subscribe to orchestrator events
    pub fn subscribe(&self) -> broadcast::Receiver<OrchestratorEvent> {
        self.events.subscribe()
    }

    /// Current state
    pub fn state(&self) -> OrchestratorState {
        *self.state.lock()
    }

    fn emit(&self, event: OrchestratorEvent) {
        let _ = self.events.send(event);
    }

    fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.current_generation() != generation
    }

    /// Move to `next` unless the turn was superseded meanwhile
    fn advance(&self, generation: u64, next: OrchestratorState) -> bool {
        {
            let mut state = self.state.lock();
            if self.is_stale(generation) {
                return false;
            }
            *state = next;
        }
        self.emit(OrchestratorEvent::StateChanged(next));
        true
    }

    /// Seed a fresh session and speak the scheme greeting, if any
    ///
    /// A scheme session starts with the system instruction and a spoken
    /// greeting as the first assistant turn; a generic session seeds only the
    /// system instruction.
    pub async fn bootstrap(&self, session: &mut ConversationSession) -> Result<()> {
        if session.is_bootstrapped() {
            return Ok(());
        }

        let language = session.language();
        let scheme = session.scheme_context().map(str::to_string);
        session.seed_system(prompt::system_prompt(scheme.as_deref(), language));

        if let Some(scheme) = scheme {
            let greeting = prompt::greeting(&scheme, language);
            session.push_assistant(greeting.clone());
            let generation = self.current_generation();
            self.speak(generation, &greeting, language).await;
        }

        Ok(())
    }

    /// User pressed the record control
    ///
    /// Legal in `Idle`; in `Speaking` it doubles as an interrupt and the new
    /// recording preempts playback. Rejected without side effects everywhere
    /// else.
    pub fn start_recording(&self) -> Result<()> {
        {
            let mut state = self.state.lock();
            match *state {
                OrchestratorState::Idle => {}
                OrchestratorState::Speaking => {
                    self.generation.fetch_add(1, Ordering::SeqCst);
                    if let Some(handle) = self.playback.lock().take() {
                        self.device.stop_playback(handle);
                    }
                }
                _ => {
                    return Err(Error::state(
                        "recording is not available while a turn is being processed",
                    ))
                }
            }

            let handle = self.device.acquire_recording()?;
            *self.recording.lock() = Some(handle);
            *state = OrchestratorState::Listening;
        }
        self.emit(OrchestratorEvent::StateChanged(OrchestratorState::Listening));
        Ok(())
    }

    /// User tapped to interrupt
    ///
    /// Always permitted: cuts playback or a pending recording and returns to
    /// idle without altering history. While a network call is in flight it
    /// only bumps the generation; the call completes and its result is
    /// discarded.
    pub fn interrupt(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        {
            let mut state = self.state.lock();
            match *state {
                OrchestratorState::Speaking => {
                    if let Some(handle) = self.playback.lock().take() {
                        self.device.stop_playback(handle);
                    }
                }
                OrchestratorState::Listening => {
                    if let Some(handle) = self.recording.lock().take() {
                        self.device.stop_recording(handle);
                    }
                }
                _ => {}
            }
            *state = OrchestratorState::Idle;
        }
        self.emit(OrchestratorEvent::Interrupted);
        self.emit(OrchestratorEvent::StateChanged(OrchestratorState::Idle));
    }

    /// User released the record control: run the rest of the turn
    pub async fn finish_turn(&self, session: &mut ConversationSession) -> Result<TurnOutcome> {
        let generation = self.current_generation();
        let language = session.language();

        let handle = {
            let mut state = self.state.lock();
            if *state != OrchestratorState::Listening {
                return Err(Error::state("no recording in progress"));
            }
            let handle = self
                .recording
                .lock()
                .take()
                .ok_or_else(|| Error::state("recording handle missing"))?;
            *state = OrchestratorState::Transcribing;
            handle
        };
        self.emit(OrchestratorEvent::StateChanged(OrchestratorState::Transcribing));

        let audio = match self.device.release(handle) {
            Ok(audio) => audio,
            Err(e) => {
                tracing::warn!(error = %e, "recording flush failed");
                return Ok(self.fail_turn(generation, FailureLeg::Transcription, language));
            }
        };
        let utterance = Utterance::new(audio);

        let utterance = match self.stt.transcribe(&utterance.audio, language).await {
            Ok(text) => utterance.with_transcript(text),
            Err(e) => {
                tracing::warn!(error = %e, "transcription failed");
                return Ok(self.fail_turn(generation, FailureLeg::Transcription, language));
            }
        };
        if self.is_stale(generation) {
            return Ok(TurnOutcome::Superseded);
        }
        // transcribe guarantees a non-empty transcript
        let transcript = utterance.transcript.unwrap_or_default();
        self.emit(OrchestratorEvent::TranscriptReady {
            text: transcript.clone(),
        });

        // Route: reasoning gate inside a scheme context, generic assistant
        // otherwise. The session is only mutated after the leg succeeds, so a
        // failure never leaves an orphaned user turn.
        let (reply, pending_update) = if session.scheme_context().is_some() {
            match self.scheme_turn(generation, session, &transcript).await {
                Ok(result) => result,
                Err(outcome) => return Ok(outcome),
            }
        } else {
            if !self.advance(generation, OrchestratorState::Reasoning) {
                return Ok(TurnOutcome::Superseded);
            }
            match self
                .assistant
                .respond(session.history(), &transcript, language)
                .await
            {
                Ok(reply) => (reply, None),
                Err(e) => {
                    tracing::warn!(error = %e, "assistant call failed");
                    return Ok(self.fail_turn(generation, FailureLeg::Reasoning, language));
                }
            }
        };

        if self.is_stale(generation) {
            return Ok(TurnOutcome::Superseded);
        }

        if let Some(pending) = pending_update {
            session.set_pending_backend_request(pending);
        }
        session.push_exchange(&transcript, &reply);

        let spoken = self.speak(generation, &reply, language).await;
        Ok(TurnOutcome::Replied { text: reply, spoken })
    }

    /// Gate-then-dispatch leg of a scheme turn
    ///
    /// Returns the assistant reply plus an optional update to the pending
    /// backend request (`Some(None)` clears it). Failures come back as the
    /// finished outcome.
    async fn scheme_turn(
        &self,
        generation: u64,
        session: &ConversationSession,
        transcript: &str,
    ) -> std::result::Result<(String, Option<Option<String>>), TurnOutcome> {
        let language = session.language();

        if !self.advance(generation, OrchestratorState::Reasoning) {
            return Err(TurnOutcome::Superseded);
        }
        let decision = match self
            .gate
            .evaluate(
                session.history(),
                session.pending_backend_request(),
                transcript,
                language,
            )
            .await
        {
            Ok(decision) => decision,
            Err(e) => {
                tracing::warn!(error = %e, "reasoning gate failed");
                return Err(self.fail_turn(generation, FailureLeg::Reasoning, language));
            }
        };

        match decision {
            GateDecision::Clarify(text) => Ok((text, None)),
            GateDecision::Sufficient => {
                if !self.advance(generation, OrchestratorState::Dispatching) {
                    return Err(TurnOutcome::Superseded);
                }
                // Assembled fresh on every call, never cached in the client
                let profile = self.profile.snapshot();
                let result = match self
                    .backend
                    .chat(session.session_id(), transcript, &profile)
                    .await
                {
                    Ok(result) => result,
                    Err(e) => {
                        tracing::warn!(error = %e, "registration backend unreachable");
                        return Err(self.fail_turn(generation, FailureLeg::Backend, language));
                    }
                };

                match result.status {
                    AgentStatus::RequiresInput => {
                        let spoken = messages::with_options(
                            language,
                            &result.message,
                            result.options.as_deref().unwrap_or(&[]),
                        );
                        Ok((spoken.clone(), Some(Some(spoken))))
                    }
                    AgentStatus::ReadyToSubmit => {
                        let reply =
                            format!("{} {}", result.message, messages::confirm_submission(language));
                        Ok((reply, Some(None)))
                    }
                    AgentStatus::Error => {
                        // Normal dialogue outcome: spoken back wrapped, the
                        // session is otherwise unchanged
                        Ok((messages::backend_error(language, &result.message), None))
                    }
                }
            }
        }
    }

    /// Synthesize and play a committed reply
    ///
    /// Synthesis failure is non-fatal: the text is already in history and
    /// displayed, only audible playback is skipped. Returns whether audio
    /// actually played (or started playing).
    async fn speak(&self, generation: u64, text: &str, language: Language) -> bool {
        if !self.advance(generation, OrchestratorState::Synthesizing) {
            return false;
        }

        let resource = match self.tts.synthesize(text, language).await {
            Ok(resource) => resource,
            Err(e) => {
                tracing::warn!(error = %e, "synthesis failed, reply is display-only");
                self.emit(OrchestratorEvent::TurnFailed {
                    leg: FailureLeg::Synthesis,
                    message: messages::synthesis_failed(language).to_string(),
                });
                self.emit(OrchestratorEvent::AssistantMessage {
                    text: text.to_string(),
                    spoken: false,
                });
                self.advance(generation, OrchestratorState::Idle);
                return false;
            }
        };
        if self.is_stale(generation) {
            return false;
        }

        let handle = match self.device.acquire_playback(&resource) {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(error = %e, "speaker unavailable, reply is display-only");
                self.emit(OrchestratorEvent::AssistantMessage {
                    text: text.to_string(),
                    spoken: false,
                });
                self.advance(generation, OrchestratorState::Idle);
                return false;
            }
        };
        *self.playback.lock() = Some(handle);

        if !self.advance(generation, OrchestratorState::Speaking) {
            self.device.stop_playback(handle);
            self.playback.lock().take();
            return false;
        }
        self.emit(OrchestratorEvent::AssistantMessage {
            text: text.to_string(),
            spoken: true,
        });

        self.device.wait_playback(handle).await;
        {
            let mut playback = self.playback.lock();
            if *playback == Some(handle) {
                *playback = None;
            }
        }
        self.advance(generation, OrchestratorState::Idle);
        true
    }

    /// Common failure path: distinct localized apology, history untouched,
    /// back to idle
    fn fail_turn(
        &self,
        generation: u64,
        leg: FailureLeg,
        language: Language,
    ) -> TurnOutcome {
        let message = match leg {
            FailureLeg::Transcription => messages::transcription_failed(language),
            FailureLeg::Reasoning => messages::reasoning_failed(language),
            FailureLeg::Backend => messages::backend_unavailable(language),
            FailureLeg::Synthesis => messages::synthesis_failed(language),
        };
        self.emit(OrchestratorEvent::TurnFailed {
            leg,
            message: message.to_string(),
        });
        self.advance(generation, OrchestratorState::Idle);
        TurnOutcome::Failed { leg }
    }
}
