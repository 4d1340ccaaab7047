use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Settings for the outbound text-generation provider.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    pub api_key: String,
    pub base_url: String,
    pub model_basic: String,
    pub model_premium: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PdfConfig {
    pub output_dir: PathBuf,
    pub font_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub generation: GenerationConfig,
    pub pdf: PdfConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "dilekcematik".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "dilekcematik-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(30),
        };
        let generation = GenerationConfig {
            api_key: std::env::var("OPENAI_API_KEY")?,
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".into()),
            model_basic: std::env::var("AI_MODEL_BASIC")
                .unwrap_or_else(|_| "gpt-3.5-turbo".into()),
            model_premium: std::env::var("AI_MODEL_PREMIUM").unwrap_or_else(|_| "gpt-4".into()),
            max_tokens: std::env::var("AI_MAX_TOKENS")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(2000),
            temperature: std::env::var("AI_TEMPERATURE")
                .ok()
                .and_then(|v| v.parse::<f32>().ok())
                .unwrap_or(0.7),
        };
        let pdf = PdfConfig {
            output_dir: std::env::var("PDF_DIR")
                .unwrap_or_else(|_| "temp_pdfs".into())
                .into(),
            font_path: std::env::var("PDF_FONT_PATH")
                .unwrap_or_else(|_| "fonts/DejaVuSans.ttf".into())
                .into(),
        };
        Ok(Self {
            database_url,
            jwt,
            generation,
            pdf,
        })
    }
}
