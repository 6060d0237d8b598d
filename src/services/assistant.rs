// SPDX-License-Identifier: MIT

//! "Zen" fitness assistant: OpenAI-backed with a deterministic fallback.
//!
//! [`ZenAssistant::ask`] never fails. When the upstream call errors (no key,
//! timeout, auth, quota) the question is classified by keyword into one of
//! five categories and answered with a fixed response.

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const OPENAI_MODEL: &str = "gpt-4o";
const MAX_RESPONSE_TOKENS: u32 = 300;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const SYSTEM_PROMPT: &str = "You are Zen, a fitness and nutrition AI assistant for ZenGym. \
You provide helpful, encouraging advice about:\n\
- Workout routines and exercises\n\
- Nutrition and meal planning\n\
- Fitness goals and motivation\n\
- Healthy lifestyle tips\n\n\
Keep responses concise (under 200 words), practical, and motivating. \
Always encourage users to consult healthcare professionals for medical advice.";

const FALLBACK_NUTRITION: &str = "For a high-protein breakfast, try Greek yogurt with berries \
and granola, or scrambled eggs with spinach and whole grain toast. These provide sustained \
energy and help with muscle recovery. Aim for 20-25g of protein to kickstart your metabolism!";

const FALLBACK_CALORIES: &str = "For someone who's 160lbs and lifting 3x/week, aim for around \
2,200-2,400 calories daily for maintenance, or 2,000-2,200 for gradual fat loss. Focus on \
0.8-1g protein per lb of body weight (128-160g daily). Adjust based on your energy levels \
and progress!";

const FALLBACK_WORKOUT: &str = "Here's a quick 20-minute core routine:\n\
\u{2022} Plank holds (3x 30-60 seconds)\n\
\u{2022} Russian twists (3x 20 reps)\n\
\u{2022} Mountain climbers (3x 30 seconds)\n\
\u{2022} Dead bugs (3x 10 each side)\n\
\u{2022} Bicycle crunches (3x 15 each side)\n\
Rest 30 seconds between exercises. Focus on form over speed!";

const FALLBACK_RECOVERY: &str = "Post-workout, eat within 30-60 minutes! Try chocolate milk, \
protein shake with banana, or grilled chicken with sweet potato. Aim for 3:1 or 4:1 \
carb-to-protein ratio to replenish glycogen and support muscle repair. Don't forget to hydrate!";

const FALLBACK_MOTIVATION: &str = "Rest days are growth days! Your muscles repair and get \
stronger during recovery. Try light activities like walking, yoga, or stretching. Remember: \
consistency beats intensity. Every small step forward is progress worth celebrating!";

const FALLBACK_DEFAULT: &str = "Great question! As your fitness companion, I recommend \
focusing on proper form, consistent nutrition, and adequate rest. Every fitness journey is \
unique - listen to your body and celebrate small wins. For personalized advice, consider \
consulting a fitness professional!";

/// The AI answer provider. Cheap to construct, holds a reqwest client.
#[derive(Clone)]
pub struct ZenAssistant {
    client: reqwest::Client,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl ZenAssistant {
    /// Without an API key the assistant answers from the fallback set only.
    pub fn new(api_key: Option<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed building assistant HTTP client")?;
        Ok(Self { client, api_key })
    }

    /// Answer a fitness question. Always returns a string.
    pub async fn ask(&self, question: &str) -> String {
        if let Some(api_key) = &self.api_key {
            match self.ask_openai(api_key, question).await {
                Ok(Some(answer)) => return answer,
                Ok(None) => {
                    tracing::debug!("Upstream returned an empty answer, using fallback");
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Assistant upstream call failed, using fallback");
                }
            }
        }
        fallback_response(question).to_string()
    }

    async fn ask_openai(&self, api_key: &str, question: &str) -> anyhow::Result<Option<String>> {
        let body = json!({
            "model": OPENAI_MODEL,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": question },
            ],
            "max_tokens": MAX_RESPONSE_TOKENS,
            "temperature": 0.7,
        });

        let response = self
            .client
            .post(OPENAI_CHAT_URL)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .context("Chat completion request failed")?
            .error_for_status()
            .context("Chat completion returned an error status")?;

        let chat: ChatResponse = response
            .json()
            .await
            .context("Invalid chat completion response body")?;

        let answer = chat
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Chat completion returned no choices"))?
            .message
            .content;

        Ok(answer.filter(|a| !a.trim().is_empty()))
    }
}

/// Classify a question by case-insensitive keyword containment and return
/// the fixed response for its category. First matching category wins.
pub fn fallback_response(question: &str) -> &'static str {
    let q = question.to_lowercase();
    // Recovery is checked first: "post-workout" contains "workout" as a
    // substring, and a post-workout meal question must land here rather
    // than in the nutrition or workout categories.
    if contains_any(&q, &["recovery", "post-workout", "muscle"]) {
        FALLBACK_RECOVERY
    } else if contains_any(&q, &["breakfast", "protein", "meal"]) {
        FALLBACK_NUTRITION
    } else if contains_any(&q, &["calorie", "weight", "lifting", "160"]) {
        FALLBACK_CALORIES
    } else if contains_any(&q, &["workout", "exercise", "core", "20"]) {
        FALLBACK_WORKOUT
    } else if contains_any(&q, &["motivation", "stay motivated", "rest day"]) {
        FALLBACK_MOTIVATION
    } else {
        FALLBACK_DEFAULT
    }
}

fn contains_any(question: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| question.contains(k))
}
