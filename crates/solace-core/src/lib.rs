pub mod audio;
pub mod call;
pub mod chat;
pub mod groq;
pub mod journal;
pub mod provider;
pub mod sentiment;
pub mod status;
pub mod transcribe;
pub mod tts;
pub mod vision;
