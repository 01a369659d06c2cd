//! Wrapping callables with call-record capture.

use std::fmt;

use genbase_export::{ExportOptions, Value};
use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::record::CallRecord;
use crate::signature::{BindingError, BoundArguments, Signature};

/// What a captured callable receives: its bound arguments and, when the
/// signature accepts one, the call record.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    arguments: &'a BoundArguments,
    record: Option<&'a CallRecord>,
}

impl<'a> Invocation<'a> {
    pub fn arguments(&self) -> &'a BoundArguments {
        self.arguments
    }

    /// A bound argument. The reserved record parameter is never among
    /// them; see [`Invocation::call_record`].
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.arguments.get(name)
    }

    pub fn receiver(&self) -> Option<&'a Value> {
        self.arguments.receiver()
    }

    /// The record delivered through the reserved parameter.
    pub fn call_record(&self) -> Option<&'a CallRecord> {
        self.record
    }
}

/// A callable paired with its signature. See [`capture`].
pub struct Captured<F> {
    signature: Signature,
    options: ExportOptions,
    func: F,
}

/// Wraps `func` so each call is bound against `signature` first.
///
/// If the signature declares a keyword catch-all or the reserved
/// [`CALL_RECORD_PARAM`](crate::CALL_RECORD_PARAM) parameter, a fresh
/// [`CallRecord`] is built per call and handed to `func`; otherwise none is
/// built. Whatever `func` returns is passed back unchanged.
///
/// ```
/// use genbase_calldict::{capture, Param, Signature};
/// use genbase_export::Value;
///
/// let sig = Signature::function("scale", [Param::required("x"), Param::var_keyword("kwargs")]).unwrap();
/// let scale = capture(sig, |call| {
///     let record = call.call_record().expect("record");
///     (record.name().to_owned(), call.get("x").and_then(Value::as_i64))
/// });
/// assert_eq!(scale.call_positional(vec![Value::Int(4)]).unwrap(), ("scale".to_owned(), Some(4)));
/// ```
pub fn capture<F, R>(signature: Signature, func: F) -> Captured<F>
where
    F: Fn(&Invocation<'_>) -> R,
{
    Captured {
        signature,
        options: ExportOptions::default(),
        func,
    }
}

impl<F> Captured<F> {
    /// Options used to snapshot method receivers: excluded names are left out
    /// of the receiver and of every object nested in it.
    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn call<R>(&self, args: Vec<Value>, kwargs: IndexMap<String, Value>) -> Result<R, BindingError>
    where
        F: Fn(&Invocation<'_>) -> R,
    {
        let bound = self.signature.bind(args, kwargs)?;
        if !self.signature.accepts_call_record() {
            trace!(callable = %self.signature.name(), "no call record slot");
            return Ok((self.func)(&Invocation {
                arguments: &bound,
                record: None,
            }));
        }
        let record = CallRecord::build(&self.signature, &bound, &self.options)?;
        debug!(
            callable = %record.name(),
            arguments = record.arguments().len(),
            receiver = record.receiver().is_some(),
            "built call record"
        );
        Ok((self.func)(&Invocation {
            arguments: &bound,
            record: Some(&record),
        }))
    }

    pub fn call_positional<R>(&self, args: Vec<Value>) -> Result<R, BindingError>
    where
        F: Fn(&Invocation<'_>) -> R,
    {
        self.call(args, IndexMap::new())
    }

    /// Calls a method signature with `receiver` bound as `self`.
    pub fn call_method<R>(
        &self,
        receiver: impl Into<Value>,
        args: Vec<Value>,
        kwargs: IndexMap<String, Value>,
    ) -> Result<R, BindingError>
    where
        F: Fn(&Invocation<'_>) -> R,
    {
        let mut all = Vec::with_capacity(args.len() + 1);
        all.push(receiver.into());
        all.extend(args);
        self.call(all, kwargs)
    }
}

impl<F> fmt::Debug for Captured<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Captured")
            .field("signature", &self.signature)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
