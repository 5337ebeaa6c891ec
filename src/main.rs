use anyhow::{Context, Result, bail};
use base64::{Engine, engine::general_purpose::STANDARD};
use clap::{Parser, Subcommand, ValueEnum};
mod auth;
use passbox::{
    Backend, CONFIG, Envelope, EnvelopeFile, Format, OsBackend, PassBox, ThreadRngBackend,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "PASSBOX_LOG";

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum FormatArg {
    /// Base64 text
    #[default]
    Encoded,
    /// Raw salt, nonce and ciphertext bytes
    Raw,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Encoded => Format::Encoded,
            FormatArg::Raw => Format::Raw,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum RngArg {
    /// Operating system generator
    #[default]
    Os,
    /// Userspace generator seeded from the OS
    Thread,
}

#[derive(Debug, clap::Args)]
struct IoArgs {
    /// Read input from this file instead of the command line
    #[arg(long, short, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Write output to this file instead of stdout
    #[arg(long, short, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Envelope representation
    #[arg(long, short, value_enum, default_value_t)]
    format: FormatArg,
}

#[derive(Debug, Parser)]
#[command(name = "passbox")]
#[command(
    version,
    about = "Password-based encryption envelopes and password hashing."
)]
struct Cli {
    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Random number generator backend
    #[arg(long, global = true, value_enum, default_value_t, env = "PASSBOX_RNG")]
    rng: RngArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Encrypts text under a password
    Encrypt {
        /// Text to encrypt
        text: Option<String>,
        #[command(flatten)]
        io: IoArgs,
    },

    /// Decrypts an envelope
    Decrypt {
        /// Base64 envelope
        data: Option<String>,
        #[command(flatten)]
        io: IoArgs,
    },

    /// Hashes a password for storage
    Hash,

    /// Checks a password against a stored hash
    #[command(arg_required_else_help = true)]
    Verify { hash: String },

    /// Derives a reusable key from a password
    Keygen {
        /// Base64 salt to reproduce an earlier key
        #[arg(long)]
        salt: Option<String>,
    },

    /// Prints secure random bytes
    #[command(arg_required_else_help = true)]
    Random {
        len: usize,
        /// Print hex instead of base64
        #[arg(long)]
        hex: bool,
    },

    /// Shows version and format parameters
    Info {
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("passbox=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> Result<ExitCode> {
    let _ = dotenvy::dotenv();
    let args = Cli::parse();
    init_tracing(args.verbose);

    match args.rng {
        RngArg::Os => run(PassBox::with_backend(OsBackend), args.command),
        RngArg::Thread => run(PassBox::with_backend(ThreadRngBackend), args.command),
    }
}

fn run<B: Backend>(pb: PassBox<B>, command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Encrypt { text, io } => {
            let plaintext = match (text, &io.input) {
                (Some(text), None) => text,
                (None, Some(path)) => {
                    let bytes = EnvelopeFile::new(path).read()?;
                    String::from_utf8(bytes)
                        .with_context(|| format!("{} is not UTF-8 text", path.display()))?
                }
                (Some(_), Some(_)) => bail!("pass either TEXT or --input, not both"),
                (None, None) => bail!("nothing to encrypt: pass TEXT or --input"),
            };

            let password = auth::read_new_password()?;
            let envelope = pb.encrypt(&plaintext, &password, io.format.into())?;
            let newline = envelope.format() == Format::Encoded;
            emit(io.output, envelope.into_bytes(), newline)?;
        }

        Commands::Decrypt { data, io } => {
            let envelope = match (Format::from(io.format), data, &io.input) {
                (_, Some(_), Some(_)) => bail!("pass either DATA or --input, not both"),
                (Format::Encoded, Some(data), None) => Envelope::Encoded(data),
                (Format::Encoded, None, Some(path)) => {
                    Envelope::Encoded(EnvelopeFile::new(path).read_text()?)
                }
                (Format::Raw, None, Some(path)) => Envelope::Raw(EnvelopeFile::new(path).read()?),
                (Format::Raw, Some(_), None) => bail!("raw envelopes must be read with --input"),
                (_, None, None) => bail!("nothing to decrypt: pass DATA or --input"),
            };

            let password = auth::read_password()?;
            let text = pb.decrypt(&envelope, &password)?;
            emit(io.output, text.into_bytes(), true)?;
        }

        Commands::Hash => {
            let password = auth::read_new_password()?;
            println!("{}", pb.hash(&password)?);
        }

        Commands::Verify { hash } => {
            let password = auth::read_password()?;
            if pb.verify_hash(&password, &hash) {
                println!("valid");
            } else {
                println!("invalid");
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Keygen { salt } => {
            let salt = salt
                .map(|s| STANDARD.decode(s.trim()))
                .transpose()
                .context("salt is not valid base64")?;

            let password = auth::read_password()?;
            let key = pb.generate_key(&password, salt.as_deref())?;
            println!("key:  {}", STANDARD.encode(key.key()));
            println!("salt: {}", STANDARD.encode(key.salt()));
        }

        Commands::Random { len, hex } => {
            let bytes = pb.random_bytes(len)?;
            if hex {
                let out: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
                println!("{out}");
            } else {
                println!("{}", STANDARD.encode(&bytes));
            }
        }

        Commands::Info { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&CONFIG)?);
            } else {
                println!("{}", passbox::version());
                println!("backend:            {}", pb.backend().name());
                println!("pbkdf2 iterations:  {}", CONFIG.pbkdf2_iterations);
                println!("pbkdf2 digest:      {}", CONFIG.pbkdf2_digest);
                println!("salt length:        {}", CONFIG.salt_length);
                println!("nonce length:       {}", CONFIG.nonce_length);
                println!("key length:         {}", CONFIG.key_length);
                println!(
                    "password length:    {}..={}",
                    CONFIG.min_password_length, CONFIG.max_password_length
                );
                println!("max text bytes:     {}", CONFIG.max_text_length);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Writes to `--output` atomically, or to stdout. Files get the bytes as
/// they are; stdout gets a trailing newline when `newline` is set.
fn emit(output: Option<PathBuf>, data: Vec<u8>, newline: bool) -> Result<()> {
    match output {
        Some(path) => EnvelopeFile::new(path).write(&data),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&data)?;
            if newline {
                stdout.write_all(b"\n")?;
            }
            stdout.flush()?;
            Ok(())
        }
    }
}
