//! Exercises the `interface!` macro, `Dispatcher` and the transport helpers
//! together, the way a real client/server pair would use them, rather than
//! the crate's own unit tests which each exercise one piece in isolation.

use std::collections::HashMap;
use std::sync::Mutex;

use quickcheck_macros::quickcheck;
use wiretype::{Deserialize, Serialize};
use wiretype_rpc::dispatch::Dispatcher;
use wiretype_rpc::selector::SelectorWidth;
use wiretype_rpc::{interface, transport};

interface! {
    interface Accounts: Bits32 {
        fn balance(account: u32) -> u64;
        fn transfer(from: u32, to: u32, amount: u64) -> bool;
        fn reset() -> ();
    }
}

struct Ledger {
    balances: HashMap<u32, u64>,
}

fn serving_dispatcher() -> Dispatcher<Mutex<Ledger>> {
    let mut dispatcher = Dispatcher::new();
    dispatcher
        .bind(Accounts::balance(), |ledger: &Mutex<Ledger>, (account,): (u32,)| {
            *ledger.lock().unwrap().balances.get(&account).unwrap_or(&0)
        })
        .unwrap();
    dispatcher
        .bind(
            Accounts::transfer(),
            |ledger: &Mutex<Ledger>, (from, to, amount): (u32, u32, u64)| {
                let mut ledger = ledger.lock().unwrap();
                let from_balance = *ledger.balances.get(&from).unwrap_or(&0);
                if from_balance < amount {
                    return false;
                }
                *ledger.balances.entry(from).or_insert(0) -= amount;
                *ledger.balances.entry(to).or_insert(0) += amount;
                true
            },
        )
        .unwrap();
    dispatcher
        .bind(Accounts::reset(), |ledger: &Mutex<Ledger>, (): ()| {
            ledger.lock().unwrap().balances.clear();
        })
        .unwrap();
    dispatcher
}

/// Writes one RPC frame (selector plus argument tuple) the way a client's
/// generated `call` stub would, without needing a live duplex transport.
fn request_frame<Args: Serialize>(selector: u64, args: Args) -> Vec<u8> {
    let mut frame = Vec::new();
    transport::write_selector(SelectorWidth::Bits32, selector, &mut frame).unwrap();
    args.write(&mut frame).unwrap();
    frame
}

#[test]
fn client_call_reaches_the_bound_server_handler() {
    let mut balances = HashMap::new();
    balances.insert(1, 100u64);
    let passthrough = Mutex::new(Ledger { balances });
    let dispatcher = serving_dispatcher();

    let request = request_frame(Accounts::transfer(), (1u32, 2u32, 40u64));
    let mut reply = Vec::new();
    transport::serve(
        &dispatcher,
        SelectorWidth::Bits32,
        &passthrough,
        &mut request.as_slice(),
        &mut reply,
    )
    .unwrap();
    assert!(bool::from_bytes(&reply).unwrap());

    let request = request_frame(Accounts::balance(), (2u32,));
    let mut reply = Vec::new();
    transport::serve(
        &dispatcher,
        SelectorWidth::Bits32,
        &passthrough,
        &mut request.as_slice(),
        &mut reply,
    )
    .unwrap();
    assert_eq!(u64::from_bytes(&reply).unwrap(), 40);

    let request = request_frame(Accounts::balance(), (1u32,));
    let mut reply = Vec::new();
    transport::serve(
        &dispatcher,
        SelectorWidth::Bits32,
        &passthrough,
        &mut request.as_slice(),
        &mut reply,
    )
    .unwrap();
    assert_eq!(u64::from_bytes(&reply).unwrap(), 60);
}

#[test]
fn reset_clears_every_balance() {
    let mut balances = HashMap::new();
    balances.insert(1, 100u64);
    let passthrough = Mutex::new(Ledger { balances });
    let dispatcher = serving_dispatcher();

    let request = request_frame(Accounts::reset(), ());
    let mut reply = Vec::new();
    transport::serve(
        &dispatcher,
        SelectorWidth::Bits32,
        &passthrough,
        &mut request.as_slice(),
        &mut reply,
    )
    .unwrap();

    assert!(passthrough.lock().unwrap().balances.is_empty());
}

#[test]
fn unknown_selector_is_rejected_not_panicked_on() {
    let passthrough = Mutex::new(Ledger {
        balances: HashMap::new(),
    });
    let dispatcher = serving_dispatcher();

    let mut request = Vec::new();
    transport::write_selector(SelectorWidth::Bits32, 0xdead_beef, &mut request).unwrap();

    let mut reply = Vec::new();
    let err = transport::serve(
        &dispatcher,
        SelectorWidth::Bits32,
        &passthrough,
        &mut request.as_slice(),
        &mut reply,
    )
    .unwrap_err();
    assert!(matches!(err, wiretype::Error::InvalidInterfaceMethod));
}

#[quickcheck]
fn selector_round_trips_through_its_wire_width(selector: u32) -> bool {
    let mut buf = Vec::new();
    transport::write_selector(SelectorWidth::Bits32, selector as u64, &mut buf).unwrap();
    transport::read_selector(SelectorWidth::Bits32, &mut buf.as_slice()).unwrap() == selector as u64
}
