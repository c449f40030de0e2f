use std::env;
use std::net::SocketAddr;

use voxnova_server::auth::load_admin_keys;
use voxnova_server::catalog::{default_voice_for, Language, Tier};
use voxnova_server::cli;
use voxnova_server::config::constants::DEFAULT_SAMPLE_RATE;
use voxnova_server::config::{ProviderConfig, ServerConfig};
use voxnova_server::error::{self, TtsError};
use voxnova_server::logging::{self, LogConfig};
use voxnova_server::provider::{build_provider, SynthesisRequest};
use voxnova_server::server::{create_router, AppState};

#[tokio::main]
async fn main() -> error::Result<()> {
    // Load .env file if it exists (silently ignore if it doesn't)
    let _ = dotenvy::dotenv();

    let log_config = LogConfig::from_env();
    if let Err(e) = logging::init_logging(&log_config) {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new(&log_config.console_log_level))
            .with_target(false)
            .compact()
            .try_init()
            .ok();
        tracing::warn!("File logging unavailable, using console only: {}", e);
    }

    let args: Vec<String> = env::args().collect();

    if has_flag(&args, "--help", "-h") {
        cli::print_help();
        return Ok(());
    }

    if has_flag(&args, "--version", "-v") {
        cli::print_version();
        return Ok(());
    }

    let provider_config = ProviderConfig::from_env();
    let provider = build_provider(&provider_config)?;

    if args.iter().any(|arg| arg == "--server") {
        let port = parse_port(&args);
        logging::log_platform_info();

        let server_config = ServerConfig::from_env();
        let admin_keys = load_admin_keys(server_config.admin_key_file.as_deref());

        println!("VoxNova Server v{}", env!("CARGO_PKG_VERSION"));
        println!("Upstream provider: {}", provider.name());

        println!("\nAdmin API:");
        if admin_keys.is_enabled() {
            println!("  Status: ENABLED ({} key(s) configured)", admin_keys.count());
        } else {
            println!("  Status: DISABLED (no admin key file found)");
            println!("  Set ADMIN_API_KEY_FILE or create ./admin_keys.txt to enable");
        }

        println!("\nRate Limiting:");
        match &server_config.rate_limit {
            Some(limit) => {
                println!("  Rate: {} requests/second", limit.per_second);
                println!("  Burst size: {} requests", limit.burst_size);
            }
            None => println!("  Status: DISABLED"),
        }

        println!("\nRequest Timeout: {} seconds", server_config.request_timeout.as_secs());

        let state = AppState::new(provider, server_config, admin_keys);
        let app = create_router(state);

        let addr = format!("0.0.0.0:{}", port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        println!("\nServer listening on http://{}", addr);
        println!("\nAvailable endpoints:");
        cli::print_endpoints();

        tracing::info!(port, "Server started");

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await?;
    } else {
        let text = cli_text(&args);
        let voice = default_voice_for(Language::En, Tier::Free)
            .ok_or_else(|| TtsError::VoiceNotFound("default English voice".to_string()))?;

        println!("Generating speech for: \"{}\"", text);
        println!("Using voice: {} ({})", voice.name, voice.description);

        let request = SynthesisRequest {
            text,
            voice: voice.clone(),
            speed: 1.0,
            pitch: 0,
            emotion: None,
        };

        let audio = provider
            .synthesize(&request)
            .await?
            .into_wav(DEFAULT_SAMPLE_RATE)?;

        let output_path = format!("output.{}", audio.format.extension());
        std::fs::write(&output_path, &audio.bytes)?;

        println!("Speech saved to {}", output_path);
    }

    Ok(())
}

fn has_flag(args: &[String], long: &str, short: &str) -> bool {
    args.iter().skip(1).any(|arg| arg == long || arg == short)
}

fn parse_port(args: &[String]) -> u16 {
    args.iter()
        .position(|arg| arg == "--port")
        .and_then(|pos| args.get(pos + 1))
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(3000)
}

/// Positional arguments joined, or a greeting when none are given
fn cli_text(args: &[String]) -> String {
    let words: Vec<&str> = args
        .iter()
        .skip(1)
        .filter(|arg| !arg.starts_with("--"))
        .map(String::as_str)
        .collect();

    if words.is_empty() {
        "Hello, this is VoxNova speaking!".to_string()
    } else {
        words.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_port_default() {
        assert_eq!(parse_port(&args(&["voxnova_server", "--server"])), 3000);
    }

    #[test]
    fn test_parse_port_custom() {
        assert_eq!(
            parse_port(&args(&["voxnova_server", "--server", "--port", "8080"])),
            8080
        );
    }

    #[test]
    fn test_parse_port_invalid_falls_back() {
        assert_eq!(
            parse_port(&args(&["voxnova_server", "--port", "not-a-port"])),
            3000
        );
    }

    #[test]
    fn test_has_flag_ignores_program_name() {
        assert!(has_flag(&args(&["bin", "-v"]), "--version", "-v"));
        assert!(!has_flag(&args(&["-v"]), "--version", "-v"));
    }

    #[test]
    fn test_cli_text() {
        assert_eq!(cli_text(&args(&["bin", "Namaste", "duniya"])), "Namaste duniya");
        assert_eq!(cli_text(&args(&["bin"])), "Hello, this is VoxNova speaking!");
    }
}
