//! Command handlers.
//!
//! Each handler runs exactly one paired action per invocation; the
//! ambiguous commands open a follow-up session (or two) first. Handlers
//! never escalate effect failures — the executor logs them — but probe and
//! query errors propagate so the dispatch loop can log and resume.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;
use valet_foundation::AppError;
use valet_stores::{AlarmStore, ScheduleEntry, ScheduleStore, TimeKey};
use valet_telemetry::AssistantMetrics;

use super::classifier::Command;
use super::executor::ActionExecutor;
use super::session::{FollowUp, TerminalToken};
use crate::collab::Collaborators;
use crate::transcript::TranscriptSlot;

pub struct HandlerContext {
    pub executor: ActionExecutor,
    pub collab: Collaborators,
    pub slot: Arc<TranscriptSlot>,
    pub schedule: ScheduleStore,
    pub alarms: AlarmStore,
    pub session_timeout: Duration,
    pub metrics: Arc<AssistantMetrics>,
}

pub async fn handle(ctx: &HandlerContext, command: Command) -> Result<(), AppError> {
    match command {
        Command::Remind { text } => remind(ctx, &text).await,
        Command::SetAlarm { text } => set_alarm(ctx, &text).await,
        Command::Open { target, website } => open(ctx, target, website).await,
        Command::Close => {
            let automation = Arc::clone(&ctx.collab.automation);
            ctx.executor
                .run("closing that", async move {
                    automation.close_active_window().await
                })
                .await;
            Ok(())
        }
        Command::PlayMusic { target } => play_music(ctx, target).await,
        Command::SendMessage => send_message(ctx).await,
        Command::SearchGoogle { query } | Command::Search { query } => {
            let search = Arc::clone(&ctx.collab.search);
            let q = query.clone();
            ctx.executor
                .run(&format!("searching for {}", query), async move {
                    search.search(&q).await
                })
                .await;
            Ok(())
        }
        Command::CheckBattery => {
            let reading = ctx.collab.power.read()?;
            ctx.executor
                .alert(&format!(
                    "the device is running on {} percent power",
                    reading.percent
                ))
                .await;
            Ok(())
        }
        Command::CheckVolume => {
            let volume = ctx
                .collab
                .automation
                .volume_percent()
                .await
                .map_err(|e| AppError::Transient(e.to_string()))?;
            ctx.executor
                .run(
                    &format!("the device is at {} percent volume", volume),
                    async { Ok(()) },
                )
                .await;
            Ok(())
        }
        Command::SetVolume { percent } => {
            let Some(percent) = percent else {
                ctx.executor
                    .run("i did not catch a volume level", async { Ok(()) })
                    .await;
                return Ok(());
            };
            let automation = Arc::clone(&ctx.collab.automation);
            ctx.executor
                .run(&format!("volume set to {} percent", percent), async move {
                    automation.set_volume(percent).await
                })
                .await;
            Ok(())
        }
        Command::CheckBrightness => {
            let brightness = ctx
                .collab
                .automation
                .brightness_percent()
                .await
                .map_err(|e| AppError::Transient(e.to_string()))?;
            ctx.executor
                .run(
                    &format!("current brightness is {} percent", brightness),
                    async { Ok(()) },
                )
                .await;
            Ok(())
        }
        Command::SetBrightness { percent } => {
            let Some(percent) = percent else {
                ctx.executor
                    .run("i did not catch a brightness level", async { Ok(()) })
                    .await;
                return Ok(());
            };
            let automation = Arc::clone(&ctx.collab.automation);
            ctx.executor
                .run(
                    &format!("brightness set to {} percent", percent),
                    async move { automation.set_brightness(percent).await },
                )
                .await;
            Ok(())
        }
        Command::PlayPause => {
            let automation = Arc::clone(&ctx.collab.automation);
            ctx.executor
                .run("okay", async move { automation.play_pause().await })
                .await;
            Ok(())
        }
    }
}

/// The fallback fan-out for unclassified utterances: every fallback handler
/// is invoked unconditionally and decides internally whether the utterance
/// is its business.
pub async fn run_fallbacks(ctx: &HandlerContext, utterance: &str) {
    let automation = &ctx.collab.automation;
    let attempts = [
        ("browser", automation.browser_action(utterance).await),
        ("media", automation.media_action(utterance).await),
        ("scroll", automation.scroll_action(utterance).await),
    ];
    for (name, outcome) in attempts {
        match outcome {
            Ok(true) => {
                ctx.metrics.fallback_actions.fetch_add(1, Ordering::Relaxed);
            }
            Ok(false) => {}
            Err(e) => warn!(target: "dispatch", handler = name, "fallback failed: {}", e),
        }
    }
}

async fn open(ctx: &HandlerContext, target: String, website: bool) -> Result<(), AppError> {
    let automation = Arc::clone(&ctx.collab.automation);
    if website {
        let site = target.clone();
        ctx.executor
            .run(&format!("navigating {} website", target), async move {
                automation.open_website(&site).await
            })
            .await;
    } else {
        let app = target.clone();
        ctx.executor
            .run(&format!("navigating {} application", target), async move {
                automation.open_app(&app).await
            })
            .await;
    }
    Ok(())
}

async fn play_music(
    ctx: &HandlerContext,
    target: crate::collab::MusicTarget,
) -> Result<(), AppError> {
    let session = FollowUp::new(
        "which song do you want to play?",
        TerminalToken::Suffix("song"),
        ctx.session_timeout,
    );
    let Some(song) = session
        .await_parameter(&ctx.slot, &ctx.collab.speaker, &ctx.metrics)
        .await
    else {
        return Ok(());
    };

    let automation = Arc::clone(&ctx.collab.automation);
    let query = song.clone();
    ctx.executor
        .run(&format!("playing {}", song), async move {
            automation.play_music(&query, target).await
        })
        .await;
    Ok(())
}

async fn send_message(ctx: &HandlerContext) -> Result<(), AppError> {
    let who = FollowUp::new(
        "who do you want to send it to?",
        TerminalToken::Prefix("send to"),
        ctx.session_timeout,
    );
    let Some(recipient) = who
        .await_parameter(&ctx.slot, &ctx.collab.speaker, &ctx.metrics)
        .await
    else {
        return Ok(());
    };

    let body_session = FollowUp::new(
        "and what is the message?",
        TerminalToken::Prefix("message is"),
        ctx.session_timeout,
    );
    let Some(body) = body_session
        .await_parameter(&ctx.slot, &ctx.collab.speaker, &ctx.metrics)
        .await
    else {
        return Ok(());
    };

    let messenger = Arc::clone(&ctx.collab.messenger);
    ctx.executor
        .run("message sent successfully", async move {
            messenger.send(&recipient, &body).await
        })
        .await;
    Ok(())
}

async fn remind(ctx: &HandlerContext, text: &str) -> Result<(), AppError> {
    let Some((time, remainder)) = TimeKey::extract(text) else {
        ctx.executor
            .run("i could not find a time in that", async { Ok(()) })
            .await;
        return Ok(());
    };

    let activity = scrub_reminder_text(&remainder);
    let entry = ScheduleEntry::new(time.clone(), activity.clone());
    let store = ctx.schedule.clone();
    ctx.executor
        .run(
            &format!("i will remind you to {} at {}", activity, time),
            async move { store.save(&entry).map_err(Into::into) },
        )
        .await;
    Ok(())
}

async fn set_alarm(ctx: &HandlerContext, text: &str) -> Result<(), AppError> {
    let Some((time, _)) = TimeKey::extract(text) else {
        ctx.executor
            .run("i could not find a time in that", async { Ok(()) })
            .await;
        return Ok(());
    };

    let store = ctx.alarms.clone();
    let key = time.clone();
    ctx.executor
        .run(&format!("alarm set for {}", time), async move {
            store.save(&key).map_err(Into::into)
        })
        .await;
    Ok(())
}

/// Peel the command scaffolding off a reminder utterance, leaving the
/// activity: "remind me to take medicine at " -> "take medicine".
fn scrub_reminder_text(remainder: &str) -> String {
    let mut text = remainder.trim();
    for lead in ["remind me", "tell me"] {
        if let Some(rest) = text.strip_prefix(lead) {
            text = rest.trim_start();
        }
    }
    if let Some(rest) = text.strip_prefix("to ") {
        text = rest;
    }
    let text = text.trim();
    let text = text.strip_suffix(" at").unwrap_or(text);
    text.trim().to_string()
}
