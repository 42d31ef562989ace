//! Terminal harness for the Sahayak voice assistant
//!
//! A push-to-talk loop over WAV files: each line naming a WAV file runs one
//! conversation turn through the full pipeline; synthesized replies land in
//! temporary WAV files whose paths are logged.

mod profile;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use sahayak_agent::{
    eligibility, evaluate_pmfby, ConversationSession, EligibilityAnswers, RegistrationClient,
    SessionConfig,
};
use sahayak_audio::{AudioDeviceManager, WavFileBackend};
use sahayak_config::load_settings;
use sahayak_core::{Language, ProfileSource};
use sahayak_llm::{Assistant, CompletionClient, LlmGate};
use sahayak_pipeline::{
    OrchestratorEvent, SynthesisClient, TranscriptionClient, TurnOutcome, VoiceOrchestrator,
};

use crate::profile::FileProfileSource;

#[derive(Parser)]
#[command(name = "sahayak", about = "Voice assistant for government scheme registration")]
struct Cli {
    /// Config environment overlay (reads config/{env}.yaml)
    #[arg(long)]
    env: Option<String>,

    /// Scheme context (e.g. PMFBY); omit for the generic question-answering
    /// assistant
    #[arg(long)]
    scheme: Option<String>,

    /// Conversation language code (hi / mr / en); overrides the config
    #[arg(long)]
    language: Option<String>,

    /// JSON file with the onboarding profile snapshot
    #[arg(long, default_value = "profile.json")]
    profile: String,
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sahayak_pipeline=debug"));

    fmt().with_env_filter(filter).with_target(true).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let settings = load_settings(cli.env.as_deref()).context("configuration is invalid")?;

    let language = match cli.language.as_deref() {
        Some(code) => {
            Language::from_code(code).with_context(|| format!("unsupported language: {code}"))?
        }
        None => Language::from_code(&settings.conversation.language)
            .context("unsupported language in config")?,
    };

    let wav_backend = Arc::new(WavFileBackend::new());
    let device = Arc::new(AudioDeviceManager::new(wav_backend.clone()));

    let completions = CompletionClient::new(settings.llm.clone())?;
    let registration = Arc::new(RegistrationClient::new(&settings.backend)?);
    let profile = Arc::new(FileProfileSource::load(&cli.profile)?);

    let orchestrator = Arc::new(VoiceOrchestrator::new(
        device,
        Arc::new(TranscriptionClient::new(settings.stt.clone())?),
        Arc::new(SynthesisClient::new(settings.tts.clone())?),
        Arc::new(LlmGate::new(completions.clone())),
        Arc::new(Assistant::new(completions)),
        registration.clone(),
        profile.clone(),
    ));

    spawn_event_logger(&orchestrator);

    let mut session = ConversationSession::new(
        cli.scheme.clone(),
        SessionConfig {
            language,
            history_limit: settings.conversation.history_limit,
        },
    );
    tracing::info!(
        session_id = session.session_id(),
        scheme = ?session.scheme_context(),
        language = language.code(),
        "session started"
    );

    orchestrator.bootstrap(&mut session).await?;
    if let Some(path) = wav_backend.last_playback_path() {
        println!("greeting audio: {}", path.display());
    }

    println!(
        "commands: <path.wav> run one turn | .stop interrupt | \
         .check <crop> <cultivator y/n> <land-docs y/n> | .quit"
    );
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            "" => continue,
            ".quit" => break,
            ".stop" => orchestrator.interrupt(),
            cmd if cmd.starts_with(".check") => {
                let mut args = cmd.split_whitespace().skip(1);
                let crop = args.next().unwrap_or_default().to_string();
                let is_cultivator = args.next().and_then(parse_answer);
                let has_land_documents = args.next().and_then(parse_answer);
                let answers = EligibilityAnswers {
                    is_cultivator,
                    has_land_documents,
                    crop,
                };

                // immediate local verdict; the agent verification runs in the
                // background and its failure is logged, not surfaced
                let verdict = evaluate_pmfby(&profile.snapshot(), &answers);
                println!("eligibility: {verdict:?}");

                let registration = registration.clone();
                let snapshot = profile.snapshot();
                tokio::spawn(async move {
                    match eligibility::sync_check(&registration, &snapshot).await {
                        Ok(report) => {
                            tracing::info!(%report, "agent eligibility verification")
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "agent eligibility verification failed")
                        }
                    }
                });
            }
            path => {
                wav_backend.set_input(path);
                if let Err(e) = orchestrator.start_recording() {
                    tracing::warn!(error = %e, "cannot start recording");
                    continue;
                }
                println!("{}", sahayak_pipeline::messages::working(language));
                match orchestrator.finish_turn(&mut session).await {
                    Ok(TurnOutcome::Replied { text, spoken }) => {
                        println!("assistant: {text}");
                        if spoken {
                            if let Some(out) = wav_backend.last_playback_path() {
                                println!("reply audio: {}", out.display());
                            }
                        }
                    }
                    Ok(TurnOutcome::Failed { leg }) => println!("turn failed: {leg:?}"),
                    Ok(TurnOutcome::Superseded) => println!("turn interrupted"),
                    Err(e) => tracing::error!(error = %e, "turn error"),
                }
            }
        }
    }

    tracing::info!(session_id = session.session_id(), "session ended");
    Ok(())
}

fn parse_answer(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "y" | "yes" | "haan" | "ho" => Some(true),
        "n" | "no" | "nahi" => Some(false),
        _ => None,
    }
}


fn spawn_event_logger(orchestrator: &Arc<VoiceOrchestrator>) {
    let mut events = orchestrator.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                OrchestratorEvent::StateChanged(state) => {
                    tracing::debug!(?state, "state changed")
                }
                OrchestratorEvent::TranscriptReady { text } => {
                    println!("you said: {text}");
                }
                OrchestratorEvent::TurnFailed { leg, message } => {
                    tracing::warn!(?leg, message, "turn leg failed");
                }
                OrchestratorEvent::Interrupted => tracing::debug!("interrupted"),
                OrchestratorEvent::AssistantMessage { .. } => {}
            }
        }
    });
}
