//! Transport-agnostic request/reply framing (§4.8): writes and reads the
//! method selector using the ordinary value codec, so an RPC frame differs
//! from a plain tuple only in its leading selector value.
//!
//! Composes over any `Input`/`Output` pair — a socket, a pipe, an
//! in-memory buffer — without this crate needing to know which.

use wiretype::{Deserialize, Error, Input, Output, Serialize};

use crate::dispatch::Dispatcher;
use crate::selector::SelectorWidth;

/// Writes a selector value sized per `width`.
pub fn write_selector<O: Output + ?Sized>(
    width: SelectorWidth,
    selector: u64,
    out: &mut O,
) -> Result<(), Error> {
    match width {
        SelectorWidth::Bits64 => selector.write(out),
        SelectorWidth::Bits32 => (selector as u32).write(out),
    }
}

/// Reads a selector value sized per `width`, widening a 32-bit selector
/// back out to `u64` for dispatch-table lookup.
pub fn read_selector<I: Input + ?Sized>(width: SelectorWidth, input: &mut I) -> Result<u64, Error> {
    match width {
        SelectorWidth::Bits64 => u64::read(input),
        SelectorWidth::Bits32 => u32::read(input).map(u64::from),
    }
}

/// Client-side call: writes the selector and argument tuple to `sender`,
/// then blocks reading the return value back off `receiver`.
pub fn call<O, I, Args, Ret>(
    width: SelectorWidth,
    selector: u64,
    args: Args,
    sender: &mut O,
    receiver: &mut I,
) -> Result<Ret, Error>
where
    O: Output + ?Sized,
    I: Input + ?Sized,
    Args: Serialize,
    Ret: Serialize + Deserialize,
{
    write_selector(width, selector, sender)?;
    args.write(sender)?;
    Ret::read(receiver)
}

/// Receiver-side dispatch: reads the selector off `input`, looks up the
/// bound handler in `dispatcher`, and writes its result to `output`.
/// `InvalidInterfaceMethod` if no binding matches the selector.
pub fn serve<P, I, O>(
    dispatcher: &Dispatcher<P>,
    width: SelectorWidth,
    passthrough: &P,
    input: &mut I,
    output: &mut O,
) -> Result<(), Error>
where
    P: 'static,
    I: Input + ?Sized,
    O: Output + ?Sized,
{
    let selector = read_selector(width, input)?;
    dispatcher.dispatch(selector, passthrough, input, output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_and_serve_round_trip() {
        let mut dispatcher: Dispatcher<()> = Dispatcher::new();
        dispatcher
            .bind(7, |_: &(), (a, b): (f32, f32)| a + b)
            .unwrap();

        let mut request = Vec::new();
        write_selector(SelectorWidth::Bits32, 7, &mut request).unwrap();
        (2.0f32, 5.0f32).write(&mut request).unwrap();

        let mut reply = Vec::new();
        let mut request_slice = request.as_slice();
        serve(
            &dispatcher,
            SelectorWidth::Bits32,
            &(),
            &mut request_slice,
            &mut reply,
        )
        .unwrap();

        assert_eq!(f32::from_bytes(&reply).unwrap(), 7.0);
    }

    #[test]
    fn selector_width_round_trips() {
        let mut buf = Vec::new();
        write_selector(SelectorWidth::Bits32, 0xdead_beef, &mut buf).unwrap();
        let got = read_selector(SelectorWidth::Bits32, &mut buf.as_slice()).unwrap();
        assert_eq!(got, 0xdead_beef);
    }
}
