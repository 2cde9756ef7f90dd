//! # mb-rules-basic
//!
//! A small set of ready-made `Rule` implementations covering the usual
//! chat nuisances: banned phrases, caps spam, and walls of text.
//!
//! None of these rules touch the shared ledger; they only inspect the
//! message and report an outcome. Point values are deliberately knobs,
//! since every community calibrates severity differently.

use async_trait::async_trait;
use mb_core::{Message, Rule, RuleResult};
use regex::Regex;

/// How a matched banned phrase is punished.
#[derive(Debug, Clone)]
pub enum PhraseSeverity {
    /// Record points against the author, message stays (for now).
    Points(i32),
    /// Straight to timeout, no ledger involvement.
    Instant,
}

/// One banned-phrase pattern plus its punishment.
#[derive(Debug, Clone)]
pub struct BannedPhrase {
    pub pattern: String,
    pub severity: PhraseSeverity,
}

/// Matches messages against a configured list of banned phrases.
pub struct BannedPhraseRule {
    phrases: Vec<(Regex, PhraseSeverity)>,
}

impl BannedPhraseRule {
    /// Compiles all patterns up front; a malformed pattern is a
    /// construction error, not a runtime surprise.
    pub fn new(phrases: Vec<BannedPhrase>) -> anyhow::Result<Self> {
        let compiled = phrases
            .into_iter()
            .map(|p| {
                let regex = Regex::new(&p.pattern)?;
                Ok((regex, p.severity))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Self { phrases: compiled })
    }
}

#[async_trait]
impl Rule for BannedPhraseRule {
    fn id(&self) -> &str {
        "banned-phrase"
    }

    async fn check(&self, message: &Message) -> anyhow::Result<RuleResult> {
        for (regex, severity) in &self.phrases {
            if regex.is_match(&message.text) {
                tracing::debug!(user = %message.author.name, pattern = %regex, "banned phrase hit");
                return Ok(match severity {
                    PhraseSeverity::Points(points) => RuleResult::GivePoints {
                        points: *points,
                        reason: format!("banned phrase ({regex})"),
                    },
                    PhraseSeverity::Instant => RuleResult::Timeout {
                        message: "used a banned phrase".to_string(),
                    },
                });
            }
        }
        Ok(RuleResult::Nothing)
    }
}

/// Awards points for messages that are mostly uppercase.
pub struct CapsSpamRule {
    min_letters: usize,
    max_caps_ratio: f64,
    points: i32,
}

impl CapsSpamRule {
    pub fn new(min_letters: usize, max_caps_ratio: f64, points: i32) -> Self {
        Self { min_letters, max_caps_ratio, points }
    }
}

impl Default for CapsSpamRule {
    fn default() -> Self {
        // Short exclamations get a pass; sustained shouting does not.
        Self::new(20, 0.8, 20)
    }
}

#[async_trait]
impl Rule for CapsSpamRule {
    fn id(&self) -> &str {
        "caps-spam"
    }

    async fn check(&self, message: &Message) -> anyhow::Result<RuleResult> {
        let letters: Vec<char> = message.text.chars().filter(|c| c.is_alphabetic()).collect();
        if letters.len() < self.min_letters {
            return Ok(RuleResult::Nothing);
        }
        let caps = letters.iter().filter(|c| c.is_uppercase()).count();
        let ratio = caps as f64 / letters.len() as f64;
        if ratio > self.max_caps_ratio {
            return Ok(RuleResult::GivePoints {
                points: self.points,
                reason: "excessive use of capital letters".to_string(),
            });
        }
        Ok(RuleResult::Nothing)
    }
}

/// Deletes messages over a hard length cap. No points: the message itself
/// is the problem, not the author's pattern of behavior.
pub struct WallOfTextRule {
    max_chars: usize,
}

impl WallOfTextRule {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }
}

impl Default for WallOfTextRule {
    fn default() -> Self {
        Self::new(500)
    }
}

#[async_trait]
impl Rule for WallOfTextRule {
    fn id(&self) -> &str {
        "wall-of-text"
    }

    async fn check(&self, message: &Message) -> anyhow::Result<RuleResult> {
        if message.text.chars().count() > self.max_chars {
            return Ok(RuleResult::DeleteMessage);
        }
        Ok(RuleResult::Nothing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mb_core::{MessageSource, User};

    fn msg(text: &str) -> Message {
        Message::new(User::new("u1", "Chatter"), text, MessageSource::Chat, "")
    }

    #[tokio::test]
    async fn banned_phrase_awards_configured_points() {
        let rule = BannedPhraseRule::new(vec![BannedPhrase {
            pattern: r"(?i)buy followers".to_string(),
            severity: PhraseSeverity::Points(40),
        }])
        .unwrap();

        let result = rule.check(&msg("BUY FOLLOWERS at my site")).await.unwrap();
        assert!(matches!(result, RuleResult::GivePoints { points: 40, .. }));

        let result = rule.check(&msg("hello everyone")).await.unwrap();
        assert_eq!(result, RuleResult::Nothing);
    }

    #[tokio::test]
    async fn severe_phrase_times_out_immediately() {
        let rule = BannedPhraseRule::new(vec![BannedPhrase {
            pattern: r"(?i)free nitro".to_string(),
            severity: PhraseSeverity::Instant,
        }])
        .unwrap();

        let result = rule.check(&msg("click here for free nitro")).await.unwrap();
        assert!(matches!(result, RuleResult::Timeout { .. }));
    }

    #[test]
    fn malformed_pattern_is_a_construction_error() {
        let result = BannedPhraseRule::new(vec![BannedPhrase {
            pattern: "(unclosed".to_string(),
            severity: PhraseSeverity::Instant,
        }]);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn caps_rule_ignores_short_messages() {
        let rule = CapsSpamRule::default();
        let result = rule.check(&msg("WOW NICE")).await.unwrap();
        assert_eq!(result, RuleResult::Nothing);
    }

    #[tokio::test]
    async fn caps_rule_flags_sustained_shouting() {
        let rule = CapsSpamRule::default();
        let result = rule
            .check(&msg("STOP IGNORING ME I AM TALKING TO ALL OF YOU RIGHT NOW"))
            .await
            .unwrap();
        assert!(matches!(result, RuleResult::GivePoints { points: 20, .. }));
    }

    #[tokio::test]
    async fn caps_rule_allows_mixed_case() {
        let rule = CapsSpamRule::default();
        let result = rule
            .check(&msg("This is a normal sentence with Some capitals in it"))
            .await
            .unwrap();
        assert_eq!(result, RuleResult::Nothing);
    }

    #[tokio::test]
    async fn wall_of_text_is_deleted() {
        let rule = WallOfTextRule::new(10);
        assert_eq!(rule.check(&msg("short")).await.unwrap(), RuleResult::Nothing);
        assert_eq!(
            rule.check(&msg("this one is clearly too long")).await.unwrap(),
            RuleResult::DeleteMessage
        );
    }
}
