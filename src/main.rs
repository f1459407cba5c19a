use std::fs::File;
use std::io::{self, Write};
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{debug, LevelFilter};

use fritzbox_client::{ApiError, FritzboxClient, Newtype, SessionInfo};

/// Maintenance tasks for a FRITZ!Box.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Router address, e.g. fritz.box or https://192.168.178.1
    #[arg(long = "host", value_name = "host")]
    host: String,

    #[arg(long = "user", value_name = "user")]
    user: String,

    #[arg(long = "pass", value_name = "pass", env = "FRITZBOX_PASSWORD", hide_env_values = true)]
    pass: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Replace the router's TLS certificate
    Cert(CertArgs),
    /// Disconnect and/or connect SIP lines
    Sip(SipArgs),
}

#[derive(Debug, Args)]
struct CertArgs {
    #[arg(value_name = "path_key")]
    key_path: String,
    #[arg(value_name = "path_cert")]
    cert_path: String,
    #[arg(value_name = "pass_key", default_value = "")]
    key_pass: String,
}

#[derive(Debug, Args)]
struct SipArgs {
    #[arg(value_enum, ignore_case = true)]
    task: SipTask,
    /// Only touch these lines (all SIP lines if omitted)
    #[arg(value_name = "uid")]
    ids: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SipTask {
    Connect,
    Disconnect,
    Reconnect,
}

impl SipTask {
    fn disables(self) -> bool {
        self == SipTask::Disconnect || self == SipTask::Reconnect
    }

    fn enables(self) -> bool {
        self == SipTask::Connect || self == SipTask::Reconnect
    }
}

/// Prints `label… ` and then either `Done.`-style output or the error.
fn step<T, F>(label: &str, f: F) -> Result<T, ApiError>
    where F: FnOnce() -> Result<T, ApiError> {
    print!("{}… ", label);
    let _ = io::stdout().flush();
    let result = f();
    if let Err(ref err) = result {
        println!("Error: {}", err);
    }
    result
}

fn login(cli: &Cli) -> Result<(FritzboxClient, SessionInfo), ApiError> {
    let label = format!("Logging in to {} as {}", cli.host, cli.user);
    let logged_in = step(&label, || {
        let client = FritzboxClient::new(&cli.host)?;
        let session = client.login(&cli.user, &cli.pass)?;
        Ok((client, session))
    })?;
    println!("Done.");
    Ok(logged_in)
}

fn command_cert(cli: &Cli, args: &CertArgs) -> Result<(), ApiError> {
    let (client, session) = login(cli)?;

    let label = format!("Loading certificate from {}", args.cert_path);
    let certificate = step(&label, || Ok(File::open(&args.cert_path)?))?;
    println!("Done.");

    let label = format!("Loading key from {}", args.key_path);
    let key = step(&label, || Ok(File::open(&args.key_path)?))?;
    println!("Done.");

    let message = step("Updating TLS certificate", || {
        client.update_tls_certificate(&session.sid, &args.key_pass, certificate, key)
    })?;
    println!("Done: {}", message);
    Ok(())
}

fn command_sip(cli: &Cli, args: &SipArgs) -> Result<(), ApiError> {
    let (client, session) = login(cli)?;

    let numbers = step("Querying list of phone numbers", || {
        client.list_phone_numbers(&session.sid)
    })?;
    println!("Found {} numbers.", numbers.len());

    for number in numbers.iter().filter(|n| n.is_sip()) {
        if !args.ids.is_empty() && !args.ids.iter().any(|id| id == number.uid.as_slice()) {
            debug!("skipping phone number {}", number.uid);
            continue;
        }
        let uid = &number.uid;

        let label = format!("Loading configuration for phone number {}", number.number);
        let data = step(&label, || client.get_phone_number(&session.sid, uid))?;
        println!("Done.");

        if args.task.disables() {
            let label = format!("Disabling SIP Number {}", number.number);
            step(&label, || client.disable_sip(&session.sid, uid))?;
            println!("Done.");
        }
        if args.task.enables() {
            let label = format!("Enabling SIP Number {}", number.number);
            step(&label, || client.enable_sip(&session.sid, uid, &data))?;
            println!("Done.");
        }
    }
    Ok(())
}

fn main() {
    let mut logger = colog::default_builder();
    logger.filter_level(LevelFilter::Warn);
    logger.parse_default_env();
    logger.init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            process::exit(if err.use_stderr() { 64 } else { 0 });
        },
    };

    let result = match cli.command {
        Command::Cert(ref args) => command_cert(&cli, args),
        Command::Sip(ref args)  => command_sip(&cli, args),
    };
    if result.is_err() {
        process::exit(1);
    }
}
