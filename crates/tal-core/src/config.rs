//! Deployment configuration models.
//!
//! Branding is read-only configuration supplied per deployment; secrets hold
//! optional third-party credentials.

use serde::{Deserialize, Serialize};

/// Per-deployment branding and identity values.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct BrandConfig {
    /// Company display name (e.g. "Acme Corporation").
    pub name: String,
    /// Short name used inside scripted messages.
    pub short_name: String,
    /// URL-safe company identifier.
    pub slug: String,
    pub employee_count_text: String,
    pub logo_url: String,
    /// Brand colour as a CSS hex string.
    pub primary_color: String,
    /// Market the service covers ("your market", "Bengaluru").
    pub market_label: String,
    /// WhatsApp deep link to Tal (e.g. `https://wa.me/919876543210?text=hi%20tal`).
    pub whatsapp_link: String,
}

impl Default for BrandConfig {
    fn default() -> Self {
        Self {
            name: "Acme Corporation".to_string(),
            short_name: "Acme".to_string(),
            slug: "acme".to_string(),
            employee_count_text: "10,000+ Acme employees already use Tal on WhatsApp".to_string(),
            logo_url: "/logos/acme.svg".to_string(),
            primary_color: "#F97316".to_string(),
            market_label: "your market".to_string(),
            whatsapp_link: "https://wa.me/919876543210?text=hi%20tal".to_string(),
        }
    }
}

impl BrandConfig {
    /// Returns the WhatsApp link with `greeting` as the pre-filled text.
    ///
    /// Any query on the configured link is replaced.
    pub fn whatsapp_link_with_greeting(&self, greeting: &str) -> String {
        let base = self
            .whatsapp_link
            .split_once('?')
            .map_or(self.whatsapp_link.as_str(), |(base, _)| base);
        let encoded: String = url::form_urlencoded::byte_serialize(greeting.as_bytes()).collect();
        // WhatsApp expects %20 rather than '+' for spaces.
        format!("{}?text={}", base, encoded.replace('+', "%20"))
    }
}

/// Root configuration structure for secret.json
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SecretConfig {
    #[serde(default)]
    pub openai: Option<OpenAIConfig>,
    #[serde(default)]
    pub supabase: Option<SupabaseConfig>,
}

/// OpenAI API configuration
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OpenAIConfig {
    pub api_key: String,
    #[serde(default)]
    pub model_name: Option<String>,
}

/// Hosted lead store configuration
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL (e.g. `https://xyz.supabase.co`).
    pub url: String,
    pub service_role_key: String,
    /// Table receiving leads. Defaults to `leads`.
    #[serde(default)]
    pub table: Option<String>,
}
