//! # Modbot Binary
//!
//! The entry point that assembles the moderation engine based on
//! compile-time features, then moderates `user: message` lines from stdin.
//! The stdin loop stands in for the chat transport, which lives outside
//! this workspace.

use std::sync::Arc;

use mb_configs::Settings;
use mb_core::{Message, MessageSource, Rule, SystemClock, User};
use mb_moderation::{ModerationConfig, Moderator};
use tokio::io::{AsyncBufReadExt, BufReader};

// Feature-gated imports: the binary is compiled-to-order
#[cfg(feature = "rules-basic")]
use mb_rules_basic::{BannedPhrase, BannedPhraseRule, CapsSpamRule, PhraseSeverity, WallOfTextRule};

#[cfg(feature = "modlog-sqlite")]
use mb_modlog_sqlite::SqliteModLogRepo;

#[cfg(feature = "exec-console")]
use mb_exec_console::ConsoleExecutor;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // 1. Settings (Modbot.toml + MODBOT_* environment overrides)
    let settings = Settings::load()?;

    // 2. Rule set, in evaluation order: hard filters first, point rules after
    #[cfg(feature = "rules-basic")]
    let rules: Vec<Box<dyn Rule>> = {
        let banned = settings
            .rules
            .banned_phrases
            .iter()
            .map(|p| BannedPhrase {
                pattern: p.pattern.clone(),
                severity: match p.points {
                    Some(points) => PhraseSeverity::Points(points),
                    None => PhraseSeverity::Instant,
                },
            })
            .collect();
        vec![
            Box::new(BannedPhraseRule::new(banned)?),
            Box::new(WallOfTextRule::new(settings.rules.max_message_chars)),
            Box::new(CapsSpamRule::new(
                settings.rules.caps_min_letters,
                settings.rules.caps_max_ratio,
                settings.rules.caps_points,
            )),
        ]
    };

    // 3. Audit sink
    #[cfg(feature = "modlog-sqlite")]
    let mod_log = Arc::new(SqliteModLogRepo::new(&settings.modlog.database_url).await?);

    // 4. Executor (dry-run against the console)
    #[cfg(feature = "exec-console")]
    let executor = Arc::new(ConsoleExecutor);

    // 5. Assemble the engine
    let config = ModerationConfig {
        points_for_timeout: settings.moderation.points_for_timeout,
        points_decay_per_second: settings.moderation.points_decay_per_second,
        min_points: settings.moderation.min_points,
        timeout_duration: chrono::Duration::seconds(settings.moderation.timeout_duration_secs),
    };
    let moderator = Moderator::new(rules, executor, mod_log, Arc::new(SystemClock), config)?;

    tracing::info!("modbot ready, reading `user: message` lines from stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut seq: u64 = 0;
    while let Some(line) = lines.next_line().await? {
        let Some((name, text)) = line.split_once(':') else {
            tracing::warn!(%line, "expected `user: message`");
            continue;
        };
        let (name, text) = (name.trim(), text.trim());
        if name.is_empty() || text.is_empty() {
            continue;
        }

        seq += 1;
        let message = Message::new(
            User::new(name.to_lowercase(), name),
            text,
            MessageSource::Chat,
            seq.to_string(),
        );

        match moderator.check(&message).await {
            Ok(true) => println!("ALLOWED  {name}: {text}"),
            Ok(false) => println!("BLOCKED  {name}: {text}"),
            Err(err) => {
                // Moderation undecided; this demo fails open.
                tracing::error!(error = %err, "check failed, allowing message");
                println!("ALLOWED  {name}: {text}");
            }
        }
    }

    Ok(())
}
