#![forbid(unsafe_code)]

use anyhow::{Result, anyhow};
use log::{info, error, LevelFilter};
use serde::Deserialize;
use std::{env, fs, path::Path};
use fs_mistrust::Mistrust;
use std::os::unix::fs::PermissionsExt;
use lazy_static::lazy_static;
use structopt::StructOpt;

use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config as LogConfig, Root};
use log4rs::encode::pattern::PatternEncoder;

// Chat Utilities
use crate::utils::errors::Errors;
use crate::utils::chat_utils::get_absolute_path;

// ***************************************************************************
//                                Constants
// ***************************************************************************
// Directory and file locations. Unless otherwise noted, all files and directories
// are relative to the root directory.
const ENV_CHAT_ROOT_DIR    : &str = "CHAT_ROOT_DIR";
const DEFAULT_ROOT_DIR     : &str = "~/.chat_server";
const CONFIG_DIR           : &str = "/config";
const LOGS_DIR             : &str = "/logs";
const LOG4RS_CONFIG_FILE   : &str = "/log4rs.yml"; // relative to config dir
const CHAT_CONFIG_FILE     : &str = "/chat.toml";  // relative to config dir

// Networking.
const DEFAULT_HTTP_ADDR    : &str = "http://localhost";
const DEFAULT_HTTP_PORT    : u16  = 3000;

// Used when no log4rs configuration file is installed.
const DEFAULT_LOG_PATTERN  : &str = "{d(%Y-%m-%dT%H:%M:%S%.3f)} {h({l})} {t} - {m}{n}";

// ***************************************************************************
//                             Static Variables
// ***************************************************************************
// Assign the command line arguments BEFORE the runtime context is initialized in main.
lazy_static! {
    pub static ref CHAT_ARGS: ChatArgs = init_chat_args();
}

// ***************************************************************************
//                             Directory Structs
// ***************************************************************************
// ---------------------------------------------------------------------------
// ChatDirs:
// ---------------------------------------------------------------------------
#[derive(Debug)]
pub struct ChatDirs {
    pub root_dir: String,
    pub config_dir: String,
    pub logs_dir: String,
}

// ***************************************************************************
//                               Config Structs
// ***************************************************************************
// ---------------------------------------------------------------------------
// ChatArgs:
// ---------------------------------------------------------------------------
#[derive(Debug, StructOpt)]
#[structopt(name = "chat_args", about = "Command line arguments for Chat Server.")]
pub struct ChatArgs {
    /// Specify the server's root data directory.
    ///
    /// This directory contains the configuration and log files.
    #[structopt(short, long)]
    pub root_dir: Option<String>,

    /// Create the data directories and then exit.
    ///
    /// The data directories will be rooted at a root directory calculated
    /// using the following priority order:
    ///
    ///   1. If set, the value of the CHAT_ROOT_DIR environment,
    ///
    ///   2. Otherwise, if set, the value of the --root_dir command line argument,
    ///
    ///   3. Otherwise, ~/.chat_server
    ///
    #[structopt(short, long)]
    pub create_dirs_only: bool,
}

// ---------------------------------------------------------------------------
// Parms:
// ---------------------------------------------------------------------------
#[derive(Debug)]
pub struct Parms {
    pub config_file: String,
    pub config: Config,
}

// ---------------------------------------------------------------------------
// RuntimeCtx:
// ---------------------------------------------------------------------------
#[derive(Debug)]
pub struct RuntimeCtx {
    pub parms: Parms,
    pub chat_dirs: ChatDirs,
}

// ---------------------------------------------------------------------------
// Config:
// ---------------------------------------------------------------------------
#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub title: String,
    pub http_addr: String,
    pub http_port: u16,
}

impl Config {
    pub fn new() -> Self {
        Config::default()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Chat Server".to_string(),
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            http_port: DEFAULT_HTTP_PORT,
        }
    }
}

// ***************************************************************************
//                            Directory Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// init_chat_args:
// ---------------------------------------------------------------------------
/** Get the command line arguments. */
fn init_chat_args() -> ChatArgs {
    let args = ChatArgs::from_args();
    println!("{:?}", args);
    args
}

// ---------------------------------------------------------------------------
// init_chat_dirs:
// ---------------------------------------------------------------------------
/** Calculate the external data directories, creating any that don't exist. */
pub fn init_chat_dirs() -> Result<ChatDirs> {
    let mistrust = get_mistrust()?;

    let root_dir = get_root_dir();
    check_chat_dir(&root_dir, "root directory", &mistrust)?;

    let config_dir = root_dir.clone() + CONFIG_DIR;
    check_chat_dir(&config_dir, "config directory", &mistrust)?;

    let logs_dir = root_dir.clone() + LOGS_DIR;
    check_chat_dir(&logs_dir, "logs directory", &mistrust)?;

    Ok(ChatDirs { root_dir, config_dir, logs_dir })
}

// ---------------------------------------------------------------------------
// check_chat_dir:
// ---------------------------------------------------------------------------
/** Check that the path is absolute and, if it exists, that is has the proper
 * permissions assigned.  If it doesn't exist, create it.  The mistrust package
 * creates directories with 0o700 permissions.
 */
fn check_chat_dir(dir: &str, msgname: &str, mistrust: &Mistrust) -> Result<()> {
    let path = Path::new(dir);
    if !path.is_absolute() {
        return Err(anyhow!("The chat server {} path must be absolute: {}", msgname, dir));
    }
    if path.exists() {
        if !path.is_dir() {
            return Err(anyhow!("The chat server {} path must be a directory: {}", msgname, dir));
        }

        // Make sure the directory has rwx for owner only.
        let perm = path.metadata()?.permissions().mode();
        if perm & 0o777 != 0o700 {
            return Err(anyhow!("The chat server {} path must have 0o700 permissions: {}", msgname, dir));
        }
    } else {
        mistrust.make_directory(path)
            .map_err(|e| anyhow!("Make directory error for {:?}: {}", path, e))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// get_mistrust:
// ---------------------------------------------------------------------------
/** Configure a new mistrust object for initial directory processing. */
fn get_mistrust() -> Result<Mistrust> {
    Mistrust::builder()
        .ignore_prefix(get_absolute_path("~"))
        .trust_group(0)
        .build()
        .map_err(|e| anyhow!("Mistrust configuration error: {}", e))
}

// ---------------------------------------------------------------------------
// get_root_dir:
// ---------------------------------------------------------------------------
fn get_root_dir() -> String {
    // Order of precedence:
    //  1. Environment variable
    //  2. Command line --root-dir argument
    //  3. Default location
    //
    let root_dir = env::var(ENV_CHAT_ROOT_DIR).unwrap_or_else(
        |_| {
            match CHAT_ARGS.root_dir.clone() {
                Some(r) => r,
                None => DEFAULT_ROOT_DIR.to_string(),
            }
        });

    get_absolute_path(&root_dir)
}

// ***************************************************************************
//                               Log Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// init_log:
// ---------------------------------------------------------------------------
/** Initialize log4rs from the configuration directory.  When no log4rs file
 * is installed, log info and above to the console.
 */
pub fn init_log(dirs: &ChatDirs) -> Result<()> {
    let logconfig = dirs.config_dir.clone() + LOG4RS_CONFIG_FILE;
    if !Path::new(&logconfig).exists() {
        init_console_log()?;
        info!("Log4rs configuration not found at {}, logging to console.", logconfig);
        return Ok(());
    }

    if let Err(e) = log4rs::init_file(&logconfig, Default::default()) {
        println!("{}", e);
        return Err(anyhow!("{}", Errors::Log4rsInitialization(logconfig)));
    }
    info!("Log4rs initialized using: {}", logconfig);
    Ok(())
}

// ---------------------------------------------------------------------------
// init_console_log:
// ---------------------------------------------------------------------------
fn init_console_log() -> Result<()> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(DEFAULT_LOG_PATTERN)))
        .build();
    let config = LogConfig::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info))?;
    log4rs::init_config(config)?;
    Ok(())
}

// ***************************************************************************
//                             Parms Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// get_parms:
// ---------------------------------------------------------------------------
/** Retrieve the application parameters from the configuration file in the
 * config directory.  A missing file means default values are used; a file
 * that can't be parsed is an error.
 */
fn get_parms(dirs: &ChatDirs) -> Result<Parms> {
    let config_file = dirs.config_dir.clone() + CHAT_CONFIG_FILE;
    info!("{}", Errors::ReadingConfigFile(config_file.clone()));
    let contents = match fs::read_to_string(&config_file) {
        Ok(c) => c,
        Err(_) => {
            info!("Unable to read configuration at {}. Using default values.", config_file);
            return Ok(Parms { config_file: Default::default(), config: Config::new() });
        }
    };

    let config = parse_config(&contents).map_err(|e| {
        let msg = format!("{}\n   {}", Errors::TOMLParseError(config_file.clone()), e);
        error!("{}", msg);
        anyhow!(msg)
    })?;

    Ok(Parms { config_file, config })
}

// ---------------------------------------------------------------------------
// parse_config:
// ---------------------------------------------------------------------------
fn parse_config(contents: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(contents)
}

// ***************************************************************************
//                             Config Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// init_runtime_context:
// ---------------------------------------------------------------------------
/** Read the input parameters and configure logging.  Any failure here
 * aborts server startup.
 */
pub fn init_runtime_context(chat_dirs: ChatDirs) -> Result<RuntimeCtx> {
    init_log(&chat_dirs)?;
    let parms = get_parms(&chat_dirs)?;
    Ok(RuntimeCtx { parms, chat_dirs })
}
