//! Best-effort company logo lookup.
//!
//! Guesses a domain from the plan name and probes the Clearbit logo CDN,
//! falling back to a generated avatar. Runs detached after the plan
//! mutation commits; a failed lookup only costs the logo.

use std::sync::Arc;
use std::time::Duration;

use crate::main_lib::AppState;

const DOMAIN_EXTENSIONS: [&str; 5] = ["com", "io", "co", "org", "net"];

/// Marketing words that hurt the domain guess.
const NOISE_WORDS: [&str; 7] = [
    "subscription",
    "plan",
    "premium",
    "basic",
    "standard",
    "pro",
    "plus",
];

pub struct LogoService {
    client: reqwest::Client,
}

fn clean_name(name: &str) -> String {
    name.split_whitespace()
        .filter(|word| !NOISE_WORDS.contains(&word.to_lowercase().as_str()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn domain_base(cleaned: &str) -> String {
    cleaned
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

fn fallback_avatar(cleaned: &str) -> String {
    let first_letter = cleaned
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or('K');
    format!(
        "https://ui-avatars.com/api/?name={}&background=random&color=fff&size=128",
        first_letter
    )
}

impl LogoService {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_default();
        Self { client }
    }

    pub async fn find_logo_url(&self, plan_name: &str) -> String {
        let cleaned = clean_name(plan_name);
        let base = domain_base(&cleaned);
        if base.is_empty() {
            return fallback_avatar(&cleaned);
        }

        for extension in DOMAIN_EXTENSIONS {
            let candidate = format!("https://logo.clearbit.com/{}.{}", base, extension);
            match self.client.head(&candidate).send().await {
                Ok(response) if response.status().is_success() => return candidate,
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!("logo probe for {} failed: {}", candidate, e);
                }
            }
        }

        fallback_avatar(&cleaned)
    }
}

impl Default for LogoService {
    fn default() -> Self {
        Self::new()
    }
}

/// Looks the logo up in a detached task and stores it on the plan.
pub fn spawn_logo_refresh(state: Arc<AppState>, plan_id: String, plan_name: String) {
    let Some(logo) = state.logo.clone() else {
        return;
    };
    tokio::spawn(async move {
        let url = logo.find_logo_url(&plan_name).await;
        if let Err(e) = state.plan_service.set_plan_logo(&plan_id, Some(url)).await {
            tracing::warn!("failed to store logo for plan {}: {}", plan_id, e);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_name_strips_marketing_words() {
        assert_eq!(clean_name("Netflix Premium Plan"), "Netflix");
        assert_eq!(clean_name("Spotify"), "Spotify");
    }

    #[test]
    fn domain_base_keeps_alphanumerics() {
        assert_eq!(domain_base("Disney+ Hotstar"), "disneyhotstar");
    }

    #[test]
    fn fallback_uses_first_letter() {
        assert!(fallback_avatar("Netflix").contains("name=N"));
        assert!(fallback_avatar("").contains("name=K"));
    }
}
