//! Discord front controller.
//!
//! On the first `ready` event the handler announces itself and starts the
//! status loop. Button presses are acknowledged immediately and the reboot
//! runs afterwards on a tracked task, with the outcome sent as an ephemeral
//! follow-up.

pub mod sink;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use panelwatch_core::aggregator::Aggregator;
use panelwatch_core::backends::{dispatch_reboot, Rebooter};
use panelwatch_core::config::BotConfig;
use panelwatch_core::monitoring::HttpPanelClient;
use panelwatch_core::output::resolve_control;
use serenity::all::{
    ChannelId, ComponentInteraction, Context, CreateInteractionResponse,
    CreateInteractionResponseFollowup, EventHandler, Interaction, Ready,
};
use serenity::async_trait;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use self::sink::DiscordSink;

/// Posted once when the bot first connects.
pub const ONLINE_ANNOUNCEMENT: &str = "🤖 Bot is online and monitoring servers!";

/// Reply for a button whose target is not configured.
pub const UNKNOWN_TARGET_REPLY: &str = "Unknown server.";

/// Text of the follow-up sent after a reboot attempt.
pub fn reboot_reply(name: &str, outcome: &str) -> String {
    format!("Rebooting **{name}**: {outcome}")
}

pub struct Handler {
    config: Arc<BotConfig>,
    rebooter: Arc<dyn Rebooter>,
    tracker: TaskTracker,
    cancel: CancellationToken,
    started: AtomicBool,
}

impl Handler {
    pub fn new(
        config: Arc<BotConfig>,
        rebooter: Arc<dyn Rebooter>,
        tracker: TaskTracker,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            config,
            rebooter,
            tracker,
            cancel,
            started: AtomicBool::new(false),
        }
    }

    async fn start_status_loop(&self, ctx: &Context) {
        let channel = ChannelId::new(self.config.channel_id);
        if let Err(e) = channel.to_channel(ctx).await {
            error!("Channel with ID {} not found: {e}", self.config.channel_id);
            return;
        }

        if let Err(e) = channel.say(&ctx.http, ONLINE_ANNOUNCEMENT).await {
            warn!("Failed to post online announcement: {e}");
        }

        let panel = match HttpPanelClient::new(self.config.request_timeout) {
            Ok(panel) => panel,
            Err(e) => {
                error!("Failed to build panel client: {e}");
                return;
            }
        };

        let aggregator = Aggregator::new(
            self.config.targets.clone(),
            panel,
            DiscordSink::new(ctx.http.clone(), channel),
            self.config.state_file.clone(),
        );
        self.tracker
            .spawn(aggregator.run(self.config.delay, self.cancel.clone()));
    }

    async fn handle_component(&self, ctx: &Context, component: ComponentInteraction) {
        // Acknowledge first: the platform's deadline is shorter than an SSH timeout.
        if let Err(e) = component
            .create_response(&ctx.http, CreateInteractionResponse::Acknowledge)
            .await
        {
            warn!("Failed to acknowledge interaction: {e}");
            return;
        }

        let custom_id = component.data.custom_id.as_str();
        let Some((index, target)) = resolve_control(custom_id, &self.config.targets) else {
            warn!(custom_id, "Interaction for unknown control");
            send_followup(ctx, &component, UNKNOWN_TARGET_REPLY).await;
            return;
        };

        info!(index, server = %target.name, user = %component.user.name, "Reboot requested");

        let target = target.clone();
        let rebooter = self.rebooter.clone();
        let ctx = ctx.clone();
        self.tracker.spawn(async move {
            let outcome = dispatch_reboot(rebooter, &target).await;
            send_followup(&ctx, &component, &reboot_reply(&target.name, &outcome)).await;
        });
    }
}

async fn send_followup(ctx: &Context, component: &ComponentInteraction, content: &str) {
    let followup = CreateInteractionResponseFollowup::new()
        .content(content)
        .ephemeral(true);
    if let Err(e) = component.create_followup(&ctx.http, followup).await {
        warn!("Failed to send follow-up: {e}");
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("Bot logged in as {}", ready.user.name);

        if self.started.swap(true, Ordering::SeqCst) {
            debug!("Gateway resumed; status loop already running");
            return;
        }
        self.start_status_loop(&ctx).await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Component(component) = interaction {
            self.handle_component(&ctx, component).await;
        }
    }
}
