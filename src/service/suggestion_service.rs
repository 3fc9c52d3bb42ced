use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::clients::gemini_client;
use crate::models::appointment::Appointment;

pub const NO_HISTORY_MESSAGE: &str =
    "You have no past appointments. Book your first cut whenever you like!";
pub const SUGGESTION_FALLBACK: &str = "Unable to compute a suggestion right now.";
pub const CONFLICT_FALLBACK_JSON: &str = "{ \"conflict\": false, \"reason\": \"AI check failed\" }";

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        response_mime: Option<&str>,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}

pub struct GeminiService {
    api_key: String,
}

impl GeminiService {
    pub fn new(api_key: String) -> Self {
        Self { api_key }
    }
}

#[async_trait]
impl TextGenerator for GeminiService {
    async fn generate(
        &self,
        prompt: &str,
        response_mime: Option<&str>,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        gemini_client::generate_gemini_text(prompt, response_mime, &self.api_key).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    NoHistory,
    ServiceError(String),
}

/// Distinguishes a real service answer from a canned default, even though
/// the presentation layer renders both the same way.
#[derive(Debug, Clone, PartialEq)]
pub enum Advice {
    Generated(String),
    Fallback {
        text: String,
        reason: FallbackReason,
    },
}

impl Advice {
    pub fn text(&self) -> &str {
        match self {
            Advice::Generated(text) => text,
            Advice::Fallback { text, .. } => text,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Advice::Fallback { .. })
    }
}

pub struct SuggestionService;

impl SuggestionService {
    /// Drafts a next-appointment suggestion from the last cut and the desired
    /// frequency. Without history this answers locally, with no outbound
    /// call; any service failure is absorbed into the canned fallback.
    pub async fn suggest_next_date<C: TextGenerator + ?Sized>(
        last_appointment: Option<&Appointment>,
        frequency_days: i64,
        generator: &C,
    ) -> Advice {
        let Some(last) = last_appointment else {
            return Advice::Fallback {
                text: NO_HISTORY_MESSAGE.to_string(),
                reason: FallbackReason::NoHistory,
            };
        };

        let prompt = format!(
            "Act as a friendly, expert barber.\n\
             The client's last cut was on: {last_date}.\n\
             The desired frequency is {frequency} days.\n\
             \n\
             1. Compute the ideal date for the next cut.\n\
             2. Reply briefly (two sentences at most) suggesting the date and \
             motivating the client to keep the style fresh.\n\
             3. Keep the tone professional but warm.",
            last_date = last.date.format("%d/%m/%Y"),
            frequency = frequency_days,
        );

        match generator.generate(&prompt, None).await {
            Ok(body) => Advice::Generated(body),
            Err(err) => {
                eprintln!("Gemini suggestion error: {}", err);
                Advice::Fallback {
                    text: SUGGESTION_FALLBACK.to_string(),
                    reason: FallbackReason::ServiceError(err.to_string()),
                }
            }
        }
    }

    /// Asks the service for a structured conflict verdict against the given
    /// commitments. Returns the raw response text without validating its
    /// shape; failures yield a fallback JSON string.
    pub async fn analyze_conflict<C: TextGenerator + ?Sized>(
        proposed_date: NaiveDateTime,
        events: &[String],
        generator: &C,
    ) -> Advice {
        let prompt = format!(
            "I am trying to book a barber appointment for: {proposed}.\n\
             These are my existing commitments: {events}.\n\
             \n\
             Is there a likely conflict or overlap (assume one hour for the cut)?\n\
             Reply only with a JSON object: {{ \"conflict\": boolean, \"reason\": \"string\" }}",
            proposed = proposed_date.format("%d/%m/%Y %H:%M"),
            events = events.join(", "),
        );

        match generator.generate(&prompt, Some("application/json")).await {
            Ok(body) => Advice::Generated(body),
            Err(err) => Advice::Fallback {
                text: CONFLICT_FALLBACK_JSON.to_string(),
                reason: FallbackReason::ServiceError(err.to_string()),
            },
        }
    }
}
