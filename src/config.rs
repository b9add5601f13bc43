use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub system: SystemConfig,
    #[serde(default)]
    pub asr: AsrConfig,
    #[serde(default)]
    pub tts: TtsConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding per-request temporary audio files.
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: String,
    /// Upper bound on an `/stt` request body.
    #[serde(default = "default_max_audio_bytes")]
    pub max_audio_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsrConfig {
    /// Transcription strategy: "cli" spawns the engine executable,
    /// "native" uses the in-process bindings (requires the `native-asr`
    /// build feature).
    #[serde(default = "default_asr_strategy")]
    pub strategy: String,
    #[serde(default = "default_engine_path")]
    pub engine_path: String,
    #[serde(default = "default_model_path")]
    pub model_path: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_asr_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsConfig {
    /// Speech service endpoint accepting `{text, voice, format}`.
    #[serde(default = "default_tts_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_voice")]
    pub voice: String,
    #[serde(default = "default_output_format")]
    pub output_format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_upstream_scheme")]
    pub upstream_scheme: String,
    #[serde(default = "default_upstream_host")]
    pub upstream_host: String,
    #[serde(default = "default_upstream_port")]
    pub upstream_port: u16,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_scratch_dir() -> String {
    "data".to_string()
}

fn default_max_audio_bytes() -> usize {
    32 * 1024 * 1024
}

fn default_asr_strategy() -> String {
    "cli".to_string()
}

fn default_engine_path() -> String {
    "./whisper/main".to_string()
}

fn default_model_path() -> String {
    "./whisper/ggml-base.en.bin".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_asr_timeout_secs() -> u64 {
    60
}

fn default_tts_endpoint() -> String {
    "http://127.0.0.1:5002/synthesize".to_string()
}

fn default_voice() -> String {
    "en-US-AriaNeural".to_string()
}

fn default_output_format() -> String {
    "audio-24khz-48kbitrate-mono-mp3".to_string()
}

fn default_upstream_scheme() -> String {
    "https".to_string()
}

fn default_upstream_host() -> String {
    "api.openai.com".to_string()
}

fn default_upstream_port() -> u16 {
    443
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;

        // Determine file type by extension
        let path_lower = path.to_lowercase();
        if path_lower.ends_with(".json") || path_lower.ends_with(".jsonld") {
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            let config: Config = serde_yaml::from_str(&content)?;
            Ok(config)
        }
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            scratch_dir: default_scratch_dir(),
            max_audio_bytes: default_max_audio_bytes(),
        }
    }
}

impl Default for AsrConfig {
    fn default() -> Self {
        Self {
            strategy: default_asr_strategy(),
            engine_path: default_engine_path(),
            model_path: default_model_path(),
            language: default_language(),
            timeout_secs: default_asr_timeout_secs(),
        }
    }
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            endpoint: default_tts_endpoint(),
            voice: default_voice(),
            output_format: default_output_format(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            upstream_scheme: default_upstream_scheme(),
            upstream_host: default_upstream_host(),
            upstream_port: default_upstream_port(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}
