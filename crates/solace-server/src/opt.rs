use clap::{Args, Parser, Subcommand};
use std::net::IpAddr;

#[derive(Debug, Parser)]
#[command(name = "solace", about = "Run the wellness journal backend")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    Run(Run),
}

#[derive(Debug, Clone, Args)]
#[group(multiple = true, required = false)]
pub(crate) struct Db {
    #[arg(long, help = "Min connections")]
    pub(crate) db_min_connections: Option<u32>,

    #[arg(long, help = "Max connections")]
    pub(crate) db_max_connections: Option<u32>,
}

#[derive(Debug, Clone, Args)]
#[group(multiple = true, required = false)]
pub(crate) struct Auth {
    #[arg(long, env = "JWT_SECRET", help = "Secret for signing session tokens")]
    pub(crate) jwt_secret: String,

    #[arg(long, default_value_t = 86_400, help = "Session token lifetime in seconds")]
    pub(crate) token_ttl_secs: i64,

    #[arg(long, help = "Allowed CORS origins")]
    pub(crate) origins: Vec<String>,
}

#[derive(Debug, Clone, Args)]
#[group(multiple = true, required = false)]
pub(crate) struct Groq {
    #[arg(long, env = "GROQ_API_KEY")]
    pub(crate) groq_api_key: String,

    #[arg(long, help = "Override the OpenAI-compatible API base url")]
    pub(crate) groq_api_base: Option<String>,

    #[arg(long, help = "Model for mood analysis")]
    pub(crate) sentiment_model: Option<String>,

    #[arg(long, help = "Model for image analysis")]
    pub(crate) vision_model: Option<String>,

    #[arg(long, help = "Model for chat replies")]
    pub(crate) chat_model: Option<String>,

    #[arg(long, help = "Primary transcription model")]
    pub(crate) transcription_model: Option<String>,

    #[arg(long, help = "Fallback transcription model")]
    pub(crate) transcription_fallback_model: Option<String>,

    #[arg(long, help = "Transcription model for voice calls")]
    pub(crate) call_transcription_model: Option<String>,

    #[arg(long, help = "Speech synthesis model")]
    pub(crate) tts_model: Option<String>,

    #[arg(long, help = "Speech synthesis voice")]
    pub(crate) tts_voice: Option<String>,
}

#[derive(Debug, Clone, Parser)]
pub(crate) struct Run {
    #[arg(long)]
    pub(crate) host: Option<IpAddr>,

    #[arg(short, long)]
    pub(crate) port: Option<u16>,

    #[arg(long, env = "DATABASE_URL")]
    pub(crate) database_url: String,

    #[command(flatten)]
    pub(crate) db: Db,

    #[command(flatten)]
    pub(crate) auth: Auth,

    #[command(flatten)]
    pub(crate) groq: Groq,

    #[arg(long, default_value = "dev", help = "Deployment environment name")]
    pub(crate) env: String,
}
