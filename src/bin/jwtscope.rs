use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use jwtscope::token::DEFAULT_EXPIRES_IN;
use jwtscope::{
    Algorithm, HttpFetcher, KeyConfig, KeyMaterial, KeyResolver, KeyRole, KeySource,
    StandardClaims, Token, TokenOptions, TokenValidator, ValidationResult, create_token,
    is_expired, sample_payload,
};
use miniserde::json::Object;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(name = "jwtscope", version, about = "Decode, verify and sign JSON Web Tokens")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the decoded header and payload without checking the signature
    Decode {
        /// Compact token; read from stdin when omitted
        token: Option<String>,
    },

    /// Verify a token's signature. Exits with status 1 when it is invalid.
    Verify {
        /// Compact token; read from stdin when omitted
        token: Option<String>,

        #[command(flatten)]
        key: KeyArgs,

        /// Key set document to consult for the token's kid
        #[arg(long, env = "JWTSCOPE_JWKS_URI")]
        jwks_uri: Option<String>,
    },

    /// Construct and sign a token
    Sign {
        /// Algorithm, e.g. HS256, RS256, PS384, ES512 or none
        #[arg(long)]
        alg: String,

        #[command(flatten)]
        key: KeyArgs,

        /// Claims as a JSON object
        #[arg(long, conflicts_with = "sample")]
        claims: Option<String>,

        /// Sign the demonstration claim set
        #[arg(long, default_value_t = false)]
        sample: bool,

        /// Seconds until `exp`
        #[arg(long, default_value_t = DEFAULT_EXPIRES_IN)]
        expires_in: u64,
    },
}

#[derive(Args, Debug)]
struct KeyArgs {
    /// Secret or PEM key text
    #[arg(long, env = "JWTSCOPE_KEY", hide_env_values = true, conflicts_with = "key_file")]
    key: Option<String>,

    /// File holding a secret or PEM key
    #[arg(long)]
    key_file: Option<PathBuf>,

    /// JSON object of named keys, e.g. {"RS256_verification": "-----BEGIN PUBLIC KEY-----..."}
    #[arg(long, env = "JWTSCOPE_KEYS_FILE")]
    keys_file: Option<PathBuf>,
}

impl KeyArgs {
    fn key_text(&self) -> anyhow::Result<Option<String>> {
        match (&self.key, &self.key_file) {
            (Some(key), _) => Ok(Some(key.clone())),
            (None, Some(path)) => Ok(Some(read_file(path)?)),
            (None, None) => Ok(None),
        }
    }

    fn key_config(&self) -> anyhow::Result<KeyConfig> {
        match &self.keys_file {
            Some(path) => KeyConfig::from_json(&read_file(path)?)
                .with_context(|| format!("loading named keys from {}", path.display())),
            None => Ok(KeyConfig::new()),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Decode { token } => decode(&token_text(token)?),
        Command::Verify {
            token,
            key,
            jwks_uri,
        } => verify(&token_text(token)?, &key, jwks_uri.as_deref()).await,
        Command::Sign {
            alg,
            key,
            claims,
            sample,
            expires_in,
        } => sign(&alg, &key, claims.as_deref(), sample, expires_in),
    }
}

fn decode(raw: &str) -> anyhow::Result<ExitCode> {
    let token = Token::parse(raw).context("decoding token")?;

    println!("header:    {}", token.header_json());
    println!("payload:   {}", token.payload_json());
    println!("signature: {}", token.signature_segment());
    if let Some(exp) = token.payload().expiration() {
        println!("exp:       {exp} (expired: {})", is_expired(token.payload()));
    }
    Ok(ExitCode::SUCCESS)
}

async fn verify(raw: &str, key: &KeyArgs, jwks_uri: Option<&str>) -> anyhow::Result<ExitCode> {
    let mut validator = TokenValidator::new();
    validator.named_keys(key.key_config()?);
    if let Some(text) = key.key_text()? {
        validator.key(&text);
    }
    if let Some(uri) = jwks_uri {
        validator.jwks(uri, Arc::new(HttpFetcher::new()));
    }

    let result = validator
        .validate(raw)
        .await
        .context("fetching key set")?;
    print_result(&result);

    Ok(if result.valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn sign(
    alg: &str,
    key: &KeyArgs,
    claims: Option<&str>,
    sample: bool,
    expires_in: u64,
) -> anyhow::Result<ExitCode> {
    let algorithm = Algorithm::from_str(alg)?;

    let claims: Object = match claims {
        Some(json) => miniserde::json::from_str(json).context("--claims must be a JSON object")?,
        None if sample => sample_payload(now()?),
        None => Object::new(),
    };

    let material = if algorithm == Algorithm::None {
        KeyMaterial::Placeholder(String::new())
    } else {
        let resolver = KeyResolver::new(key.key_config()?);
        let resolved = resolver.resolve(algorithm, KeyRole::Signing, key.key_text()?.as_deref())?;
        if resolved.source == KeySource::Placeholder {
            bail!("no key configured for {algorithm}; pass --key, --key-file or --keys-file");
        }
        resolved.material
    };

    let token = create_token(algorithm, &claims, &material, TokenOptions { expires_in })?;
    println!("{token}");
    Ok(ExitCode::SUCCESS)
}

fn print_result(result: &ValidationResult) {
    println!("valid:      {}", result.valid);
    println!("expired:    {}", result.expired);
    if let Some(algorithm) = result.algorithm {
        println!("algorithm:  {algorithm}");
    }
    if let Some(source) = &result.key_source {
        let source = match source {
            KeySource::Explicit => "explicit key".to_string(),
            KeySource::Named(name) => format!("named key '{name}'"),
            KeySource::Placeholder => "placeholder".to_string(),
            KeySource::Jwks(kid) => format!("key set entry '{kid}'"),
        };
        println!("key source: {source}");
    }
    if let Some(header) = result.header_json() {
        println!("header:     {header}");
    }
    if let Some(payload) = result.payload_json() {
        println!("payload:    {payload}");
    }
    if let Some(error) = &result.error {
        println!("error:      {error}");
    }
}

fn token_text(token: Option<String>) -> anyhow::Result<String> {
    match token {
        Some(token) => Ok(token),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading token from stdin")?;
            Ok(buf.trim().to_string())
        }
    }
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn now() -> anyhow::Result<u64> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock before 1970")?
        .as_secs())
}
