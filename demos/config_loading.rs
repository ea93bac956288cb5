//! Loads a configuration file that cannot be decoded and shows the different
//! renderings of the resulting chain.
//!
//! Key concepts:
//! - Installing a registry so that `Display` only shows user-safe text
//! - `chain!` and `wrap!` record the enclosing function name
//! - `{:+#}` and `.json()` render the full trace for logs

use std::io;

use errtrail::{Chain, Code, Metadata, Registry, prelude::*, wrap};
use tracing::Level;

const IO_EOF: Code = Code::new(102);
const INVALID_JSON: Code = Code::new(201);

fn read_config() -> Result<Vec<u8>, Chain> {
    let error = io::Error::new(io::ErrorKind::UnexpectedEof, "read: end of input");
    Err(Chain::from_error(error, Some(IO_EOF)))
}

fn decode_config() -> Result<(), Chain> {
    match read_config() {
        Ok(_) => Ok(()),
        Err(error) => Err(wrap!(error, code = INVALID_JSON, "could not decode configuration data")),
    }
}

fn load_config() -> Result<(), Chain> {
    decode_config()
        .track()
        .wrap_coded(Code::FATAL, "service configuration could not be loaded")
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .without_time()
        .init();

    Registry::new()
        .register(
            IO_EOF,
            Metadata::new("Service Unavailable", "unexpected end of input").with_http_status(503),
        )
        .register(
            INVALID_JSON,
            Metadata::new("Bad Request", "malformed json").with_http_status(400),
        )
        .install()
        .expect("registry is installed once");

    let chain = load_config().unwrap_err();

    println!("shown to users: {chain}");
    println!("http status:    {}", chain.http_status());
    println!("with caller:    {chain:-}");
    println!("full trace:\n{chain:+#}");
    println!("json:\n{:+#}", chain.json());

    let eof = chain.downcast_ref::<io::Error>().map(io::Error::kind);
    println!("root io error:  {eof:?}");

    chain.emit(Level::ERROR);
}
