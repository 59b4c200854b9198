//! Dispatch table (§4.8): selector-keyed bindings from a wire-level request
//! to a concrete handler, with optional leading *passthrough* arguments
//! supplied by the receiver rather than the caller (e.g. a connection
//! identity or session context).

use std::collections::HashMap;

use wiretype::{Deserialize, Error, Input, Output, Serialize};

type BoxedHandler<P> =
    Box<dyn Fn(&P, &mut dyn Input, &mut dyn Output) -> Result<(), Error> + Send + Sync>;

/// A compile-time dispatch table for one interface's methods, parameterized
/// by the passthrough argument type `P` every binding receives ahead of its
/// decoded argument tuple. `P = ()` for an interface with no passthrough
/// arguments.
pub struct Dispatcher<P = ()> {
    bindings: HashMap<u64, BoxedHandler<P>>,
}

impl<P> Default for Dispatcher<P> {
    fn default() -> Self {
        Dispatcher {
            bindings: HashMap::new(),
        }
    }
}

impl<P: 'static> Dispatcher<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `handler` to `selector`. Each method has at most one binding
    /// per dispatch table (§4.8); a second bind for the same selector is
    /// rejected rather than silently overwriting the first.
    pub fn bind<Args, Ret, F>(&mut self, selector: u64, handler: F) -> Result<(), Error>
    where
        Args: Serialize + Deserialize + 'static,
        Ret: Serialize + 'static,
        F: Fn(&P, Args) -> Ret + Send + Sync + 'static,
    {
        if self.bindings.contains_key(&selector) {
            return Err(Error::ProtocolError(
                "duplicate binding for dispatch table selector",
            ));
        }
        self.bindings.insert(
            selector,
            Box::new(move |passthrough, input, output| {
                let args = Args::read(input)?;
                handler(passthrough, args).write(output)
            }),
        );
        Ok(())
    }

    /// Looks up `selector`, and if bound, reads the argument tuple from
    /// `input`, invokes the handler with `passthrough`, and writes the
    /// return value to `output`. `InvalidInterfaceMethod` if no binding
    /// matches (§6.3).
    pub fn dispatch(
        &self,
        selector: u64,
        passthrough: &P,
        input: &mut dyn Input,
        output: &mut dyn Output,
    ) -> Result<(), Error> {
        let handler = match self.bindings.get(&selector) {
            Some(handler) => handler,
            None => {
                tracing::debug!(selector, "no dispatch binding for selector");
                return Err(Error::InvalidInterfaceMethod);
            }
        };
        handler(passthrough, input, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_invokes_the_bound_handler() {
        let mut dispatcher: Dispatcher<()> = Dispatcher::new();
        dispatcher
            .bind(1, |_: &(), (a, b): (f32, f32)| a + b)
            .unwrap();

        let mut request = Vec::new();
        (2.0f32, 3.0f32).write(&mut request).unwrap();

        let mut reply = Vec::new();
        dispatcher
            .dispatch(1, &(), &mut request.as_slice(), &mut reply)
            .unwrap();

        let result = f32::from_bytes(&reply).unwrap();
        assert_eq!(result, 5.0);
    }

    #[test]
    fn dispatch_rejects_unknown_selector() {
        let dispatcher: Dispatcher<()> = Dispatcher::new();
        let mut reply = Vec::new();
        let mut empty: &[u8] = &[];
        let err = dispatcher
            .dispatch(99, &(), &mut empty, &mut reply)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInterfaceMethod));
    }

    #[test]
    fn rebinding_the_same_selector_is_rejected() {
        let mut dispatcher: Dispatcher<()> = Dispatcher::new();
        dispatcher.bind(1, |_: &(), _: ()| ()).unwrap();
        let err = dispatcher.bind(1, |_: &(), _: ()| ()).unwrap_err();
        assert!(matches!(err, Error::ProtocolError(_)));
    }

    #[test]
    fn passthrough_argument_reaches_the_handler() {
        let mut dispatcher: Dispatcher<String> = Dispatcher::new();
        dispatcher
            .bind(1, |session: &String, (): ()| session.clone())
            .unwrap();

        let mut reply = Vec::new();
        let mut empty: &[u8] = &[];
        dispatcher
            .dispatch(1, &"session-42".to_string(), &mut empty, &mut reply)
            .unwrap();
        assert_eq!(String::from_bytes(&reply).unwrap(), "session-42");
    }
}
