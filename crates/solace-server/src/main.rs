use crate::opt::{Commands, Run};
use anyhow::Result;
use axum::serve;
use clap::Parser;
use sea_orm::{ConnectOptions, Database};
use solace_core::groq::{GroqClient, GroqConfig};
use solace_core::journal::AnalyzerConfig;
use solace_core::provider::Provider;
use solace_core::transcribe::TranscribePolicy;
use solace_utils::net::create_listener;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

mod app;
mod auth;
mod opt;
mod routes;
mod user;

#[cfg(test)]
mod tests;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
const DEFAULT_PORT: u16 = 3030;

pub(crate) struct InnerAppConfig {
    jwt_secret: String,
    token_ttl_secs: i64,
    analyzer: AnalyzerConfig,
    chat_model: String,
    call_policy: TranscribePolicy,
    tts_model: String,
    tts_voice: String,
    provider_configured: bool,
}

#[derive(Clone)]
pub(crate) struct AppConfig(Arc<InnerAppConfig>);

impl AppConfig {
    pub(crate) fn new(groq: &GroqConfig, jwt_secret: String, token_ttl_secs: i64) -> Self {
        let analyzer = AnalyzerConfig::builder()
            .sentiment_model(&groq.sentiment_model)
            .vision_model(&groq.vision_model)
            .transcribe_policy(
                TranscribePolicy::builder()
                    .primary_model(&groq.transcription_model)
                    .fallback_model(&groq.transcription_fallback_model)
                    .build(),
            )
            .build();
        // Calls are English-only and latency sensitive, so they use the
        // turbo model without a fallback hop.
        let call_policy = TranscribePolicy::builder()
            .primary_model(&groq.call_transcription_model)
            .language(Some("en".to_owned()))
            .build();
        Self(Arc::new(InnerAppConfig {
            jwt_secret,
            token_ttl_secs,
            analyzer,
            chat_model: groq.chat_model.clone(),
            call_policy,
            tts_model: groq.tts_model.clone(),
            tts_voice: groq.tts_voice.clone(),
            provider_configured: !groq.api_key.is_empty(),
        }))
    }

    pub(crate) fn jwt_secret(&self) -> &str {
        &self.0.jwt_secret
    }

    pub(crate) fn token_ttl_secs(&self) -> i64 {
        self.0.token_ttl_secs
    }

    pub(crate) fn analyzer(&self) -> &AnalyzerConfig {
        &self.0.analyzer
    }

    pub(crate) fn chat_model(&self) -> &str {
        &self.0.chat_model
    }

    pub(crate) fn call_policy(&self) -> &TranscribePolicy {
        &self.0.call_policy
    }

    pub(crate) fn tts_model(&self) -> &str {
        &self.0.tts_model
    }

    pub(crate) fn tts_voice(&self) -> &str {
        &self.0.tts_voice
    }

    pub(crate) fn provider_configured(&self) -> bool {
        self.0.provider_configured
    }
}

fn build_groq_config(args: opt::Groq) -> GroqConfig {
    let mut config = GroqConfig::builder().api_key(args.groq_api_key).build();
    if let Some(api_base) = args.groq_api_base {
        config.api_base = api_base;
    }
    if let Some(model) = args.sentiment_model {
        config.sentiment_model = model;
    }
    if let Some(model) = args.vision_model {
        config.vision_model = model;
    }
    if let Some(model) = args.chat_model {
        config.chat_model = model;
    }
    if let Some(model) = args.transcription_model {
        config.transcription_model = model;
    }
    if let Some(model) = args.transcription_fallback_model {
        config.transcription_fallback_model = model;
    }
    if let Some(model) = args.call_transcription_model {
        config.call_transcription_model = model;
    }
    if let Some(model) = args.tts_model {
        config.tts_model = model;
    }
    if let Some(voice) = args.tts_voice {
        config.tts_voice = voice;
    }
    config
}

async fn run(opt: Run) -> Result<()> {
    solace_utils::tracing::setup(
        solace_utils::tracing::TracingConfig::builder()
            .package(env!("CARGO_PKG_NAME"))
            .version(env!("CARGO_PKG_VERSION"))
            .env(opt.env.clone())
            .build(),
    )?;

    let mut connect_options = ConnectOptions::new(&opt.database_url);
    if let Some(min_connections) = opt.db.db_min_connections {
        connect_options.min_connections(min_connections);
    }
    if let Some(max_connections) = opt.db.db_max_connections {
        connect_options.max_connections(max_connections);
    }
    let conn = Database::connect(connect_options).await?;
    solace_db::schema::setup(&conn)
        .await
        .inspect_err(|error| tracing::error!(error = error as &dyn std::error::Error, "failed to set up schema"))?;

    let groq_config = build_groq_config(opt.groq);
    let app_config = AppConfig::new(&groq_config, opt.auth.jwt_secret.clone(), opt.auth.token_ttl_secs);
    let provider: Arc<dyn Provider> = Arc::new(GroqClient::new(groq_config));

    let app = app::create_app(app_config, &opt.auth.origins, conn, provider)?;

    let listener = create_listener((opt.host, opt.port), (DEFAULT_HOST, DEFAULT_PORT)).await?;

    let service = app.into_make_service();
    tracing::info!(local_addr = %listener.local_addr()?, "starting app");
    serve(listener, service).await?;
    Ok(())
}

fn main() -> Result<()> {
    let main = async {
        let opt = opt::Cli::parse();

        match opt.command {
            Commands::Run(o) => run(o).await?,
        }
        Ok(())
    };

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(main)
}
