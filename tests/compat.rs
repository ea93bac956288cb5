//! Crossing `Box<dyn Error>` boundaries and absorbing foreign errors.

use std::{error::Error, io, num::ParseIntError};

use errtrail::{
    Chain, Code, IntoChain,
    compat::{ChainError, IntoBoxedError},
    prelude::*,
    traverse::{self, ErrorEq},
};

#[derive(Debug, PartialEq, thiserror::Error)]
enum Account {
    #[error("account {0} is locked")]
    Locked(u32),
    #[error("account {0} does not exist")]
    Missing(u32),
}

fn parse_port(input: &str) -> Result<u16, Chain> {
    let port = input.parse::<u16>()?;
    Ok(port)
}

fn legacy_lookup(id: u32) -> Result<(), Box<dyn Error + Send + Sync>> {
    Err(Chain::from_error(Account::Locked(id), Some(Code::new(401)))
        .wrap(Code::UNKNOWN, "lookup failed"))
    .into_boxed_error()
}

#[test]
fn test_question_mark_absorbs_foreign_errors() {
    let (result, line) = (parse_port("http"), line!());
    let chain = result.unwrap_err();
    assert_eq!(chain.len(), 1);
    assert_eq!(chain.code(), Code::UNKNOWN);
    assert!(chain.downcast_ref::<ParseIntError>().is_some());
    // The frame is the `?` inside `parse_port`, not this test.
    assert_ne!(chain.caller().line(), line);
    assert!(chain.caller().file().ends_with("compat.rs"));
}

#[test]
fn test_boxed_round_trip_restores_the_chain() {
    let boxed = legacy_lookup(7).unwrap_err();
    assert_eq!(boxed.to_string(), "lookup failed");
    assert!(boxed.downcast_ref::<ChainError>().is_some());

    let chain = Chain::from_boxed_error(boxed);
    assert_eq!(chain.len(), 2);
    assert_eq!(chain.cause().code(), Code::new(401));
    assert!(chain.has(&ErrorEq(&Account::Locked(7))));
    assert!(!chain.has(&ErrorEq(&Account::Missing(7))));
}

#[test]
fn test_chain_error_through_question_mark() {
    fn inner() -> Result<(), ChainError> {
        Err(Chain::new("inner").into_error())
    }

    fn outer() -> Result<(), Chain> {
        inner()?;
        Ok(())
    }

    let chain = outer().unwrap_err();
    assert_eq!(chain.len(), 1);
    assert_eq!(chain.message(), "inner");
}

#[test]
fn test_source_walk_matches_nodes() {
    let chain = Chain::from_error(io::Error::new(io::ErrorKind::NotFound, "config.toml"), None)
        .wrap(Code::UNKNOWN, "open")
        .wrap(Code::UNKNOWN, "start");
    let error = chain.into_error();

    let mut current: Option<&(dyn Error + 'static)> = Some(&error);
    let mut messages = Vec::new();
    while let Some(error) = current {
        messages.push(error.to_string());
        current = traverse::unwrap_error(error);
    }
    assert_eq!(messages, ["start", "open", "config.toml"]);
}

#[test]
fn test_with_absorbs_foreign_and_chain_values() {
    let chain = Chain::new("shutdown")
        .with(Account::Missing(3))
        .with(Chain::new("flush failed").into_error());
    let messages: Vec<String> = chain.nodes().map(|node| node.message().into_owned()).collect();
    assert_eq!(messages, ["shutdown", "flush failed", "account 3 does not exist"]);
}

#[test]
fn test_result_ext_on_foreign_errors() {
    let result: Result<u8, Account> = Err(Account::Locked(1));
    let chain = result.wrap("signing in").unwrap_err();
    assert_eq!(chain.len(), 2);
    assert_eq!(chain.downcast_ref::<Account>(), Some(&Account::Locked(1)));

    let chain = Account::Missing(2).into_chain();
    assert_eq!(chain.message(), "account 2 does not exist");
}
