/// CLI argument parsing and help text

pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!("VoxNova Server v{}", version);
    println!("Multilingual text-to-speech proxy with accounts, voice tiers and UPI plans");
    println!();
    println!("USAGE:");
    println!("    voxnova_server [OPTIONS] [TEXT]");
    println!();
    println!("OPTIONS:");
    println!("    --server              Start HTTP server mode");
    println!("    --port <PORT>         Server port (default: 3000)");
    println!("    -h, --help            Print this help message");
    println!("    -v, --version         Print version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Start HTTP server on default port 3000");
    println!("    voxnova_server --server");
    println!();
    println!("    # CLI mode: synthesize with the default English voice into output.wav");
    println!("    voxnova_server \"Hello, world!\"");
    println!();
    println!("SERVER ENDPOINTS:");
    print_endpoints();
    println!();
    println!("ENVIRONMENT VARIABLES:");
    println!("    TTS_PROVIDER                     - Upstream provider (deapi/gemini, default: deapi)");
    println!("    TTS_API_KEY                      - Upstream API key (VITE_GEMINI_API_KEY also read)");
    println!("    TTS_API_BASE_URL                 - Override upstream base URL");
    println!("    TTS_MODEL                        - Upstream model name");
    println!("    TTS_MAX_RETRIES                  - Retries on transient upstream errors (default: 2)");
    println!("    TTS_RETRY_BASE_DELAY_MS          - Backoff base delay (default: 1000)");
    println!("    TTS_POLL_ATTEMPTS                - Job status polls before giving up (default: 30)");
    println!("    TTS_POLL_INTERVAL_MS             - Delay between job polls (default: 2000)");
    println!("    ADMIN_API_KEY_FILE               - Path to admin keys file");
    println!("    RATE_LIMIT_MODE                  - enabled/disabled (default: enabled)");
    println!("    RATE_LIMIT_PER_SECOND            - Synthesis requests per second per client");
    println!("    RATE_LIMIT_BURST_SIZE            - Burst size per client");
    println!("    REQUEST_TIMEOUT_SECONDS          - Request timeout in seconds (default: 120)");
    println!("    UPI_PAYEE, UPI_PAYEE_NAME        - Payee used in UPI payment links");
    println!("    VOXNOVA_LOG_DIR                  - Directory for access.log and application.log");
    println!("    LOG_FILES_ENABLED                - Write JSON log files (default: true)");
    println!("    RUST_LOG                         - Log level (error/warn/info/debug/trace)");
    println!();
    println!("CONFIGURATION:");
    println!("    Settings can also be placed in a .env file in the working directory");
}

pub fn print_endpoints() {
    println!("    GET    /health                     - Health check");
    println!("    GET    /languages                  - Supported languages");
    println!("    GET    /voices?language=<code>     - Voice catalog");
    println!("    POST   /voices/:id/preview         - Speak a voice sample");
    println!("    GET    /plans                      - Subscription plans");
    println!("    GET    /plans/:id/payment          - UPI payment instructions");
    println!("    POST   /accounts                   - Create an account");
    println!("    GET    /account                    - Current account state");
    println!("    GET    /account/referral           - Referral code and message");
    println!("    POST   /account/referral           - Redeem a referral code");
    println!("    POST   /tts                        - Synthesize speech");
    println!("    GET    /history                    - Recent generations");
    println!("    GET    /history/:id/audio          - Replay a generation");
    println!("    POST   /payments                   - Submit a UTR for verification");
    println!("    POST   /payments/:utr/approve      - Approve a payment (admin)");
    println!("    POST   /feedback                   - Report an issue");
}

pub fn print_version() {
    println!("VoxNova Server v{}", env!("CARGO_PKG_VERSION"));
}
